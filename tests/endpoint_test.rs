use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use spargo::{ClientConfig, QueryResults, ReqwestTransport, SparqlClient, DEFAULT_ACCEPT, DEFAULT_AGENT};
use std::collections::HashMap;
use std::time::Duration;

const QUERY: &str = "SELECT ?s ?label WHERE { ?s rdfs:label ?label } LIMIT 2";

/// Answers with one row holding the query and headers it received
async fn echo(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    let body = serde_json::json!({
        "head": { "vars": ["query", "accept", "agent"] },
        "results": { "bindings": [{
            "query": { "type": "literal", "value": params.get("query").cloned().unwrap_or_default() },
            "accept": { "type": "literal", "value": header_text(header::ACCEPT) },
            "agent": { "type": "literal", "value": header_text(header::USER_AGENT), "xml:lang": "en" }
        }]}
    });

    (
        [(header::CONTENT_TYPE, "application/sparql-results+json")],
        body.to_string(),
    )
}

async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "short and stout")
}

async fn truncated() -> &'static str {
    "{\"Parsing should fail gracefully"
}

async fn empty() -> &'static str {
    r#"{"head":null,"results":{"bindings":null}}"#
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    r#"{"head":null,"results":{"bindings":null}}"#
}

/// Start a throwaway endpoint and return its base URL
async fn spawn_endpoint() -> String {
    let app = Router::new()
        .route("/sparql", get(echo))
        .route("/teapot", get(teapot))
        .route("/truncated", get(truncated))
        .route("/empty", get(empty))
        .route("/slow", get(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_query_parameter_and_headers() {
    let base = spawn_endpoint().await;
    let mut client = SparqlClient::new();
    client.init(&format!("{}/sparql", base), QUERY);

    let results = client.execute().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.vars(), vec!["query", "accept", "agent"]);

    let row = &results.rows()[0];
    assert_eq!(row["query"].value, QUERY);
    assert_eq!(row["accept"].value, DEFAULT_ACCEPT);
    assert_eq!(row["agent"].value, DEFAULT_AGENT);
    assert_eq!(row["agent"].lang.as_deref(), Some("en"));
}

#[tokio::test]
async fn test_overridden_agent_is_sent() {
    let base = spawn_endpoint().await;
    let mut client = SparqlClient::new();
    client.set_agent("integration-test/0.1");
    client.init(&format!("{}/sparql", base), QUERY);

    let results = client.execute().await.unwrap();
    assert_eq!(results.rows()[0]["agent"].value, "integration-test/0.1");
}

#[tokio::test]
async fn test_human_rendering_round_trips() {
    let base = spawn_endpoint().await;
    let mut client = SparqlClient::new();
    client.init(&format!("{}/sparql", base), QUERY);

    let machine = client.execute().await.unwrap();
    let human = QueryResults::from_json(machine.human().as_bytes()).unwrap();
    assert_eq!(machine.rows(), human.rows());
    assert_eq!(machine.head(), human.head());
}

#[tokio::test]
async fn test_non_200_status() {
    let base = spawn_endpoint().await;
    let mut client = SparqlClient::new();
    client.init(&format!("{}/teapot", base), QUERY);

    let err = client.execute().await.unwrap_err();
    assert_eq!(err.status(), Some(418));
    assert!(err.to_string().contains("418"));
}

#[tokio::test]
async fn test_truncated_body() {
    let base = spawn_endpoint().await;
    let mut client = SparqlClient::new();
    client.init(&format!("{}/truncated", base), QUERY);

    let err = client.execute().await.unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn test_empty_body() {
    let base = spawn_endpoint().await;
    let mut client = SparqlClient::new();
    client.init(&format!("{}/empty", base), QUERY);

    let results = client.execute().await.unwrap();
    assert!(results.is_empty());
    assert_eq!(results.render(), QueryResults::default().render());
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = SparqlClient::new();
    client.init(&format!("http://{}/sparql", addr), QUERY);

    let err = client.execute().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_transport_timeout() {
    let base = spawn_endpoint().await;
    let transport = ReqwestTransport::with_timeout(Duration::from_millis(200)).unwrap();
    let mut client = SparqlClient::with_transport(transport);
    client.init(&format!("{}/slow", base), QUERY);

    let err = client.execute().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_client_from_config() {
    let base = spawn_endpoint().await;
    let yaml = format!(
        "endpoint: {}/sparql\nquery: \"{}\"\nuser_agent: from-yaml/1.0\ntimeout_secs: 5\n",
        base, QUERY
    );
    let config = ClientConfig::from_yaml_str(&yaml).unwrap();
    let client = SparqlClient::from_config(&config).unwrap();

    let results = client.execute().await.unwrap();
    assert_eq!(results.rows()[0]["query"].value, QUERY);
    assert_eq!(results.rows()[0]["agent"].value, "from-yaml/1.0");
}
