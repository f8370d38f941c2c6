//! spargo CLI — run SPARQL queries from `.sparql` files, pipes or flags
//!
//! Uses the spargo SparqlClient to query a remote endpoint.

mod sparql_file;

use clap::{CommandFactory, Parser};
use comfy_table::{ContentArrangement, Table};
use spargo::{ClientConfig, QueryResults, SparqlClient, Term};
use std::collections::BTreeSet;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spargo", about = "Run SPARQL queries against remote endpoints", disable_version_flag = true)]
struct Cli {
    /// A .sparql query file (starting with `#!spargo`)
    file: Option<PathBuf>,

    /// Endpoint to query, used when the input does not declare one
    #[arg(long, env = "SPARGO_ENDPOINT")]
    endpoint: Option<String>,

    /// SPARQL query to run
    #[arg(long)]
    query: Option<String>,

    /// YAML client configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// User-Agent header to send
    #[arg(long)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, default_value = "human")]
    format: OutputFormat,

    /// Print version information
    #[arg(short = 'V', long)]
    version: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Human,
    Table,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.version {
        eprintln!("spargo {} ({})", env!("CARGO_PKG_VERSION"), spargo::DEFAULT_AGENT);
        return;
    }

    let result = match load_config(&cli) {
        Ok(Some(config)) => run_query(&config, &cli.format).await,
        Ok(None) => print_usage(&mut std::io::stdout())
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(out: &mut impl Write) -> std::io::Result<()> {
    Cli::command().write_help(out)?;
    out.flush()
}

/// Gather endpoint, query and overrides from the command line.
///
/// A query file wins over `--query`, which wins over piped input. Returns
/// `None` when there is nothing to run.
fn load_config(cli: &Cli) -> Result<Option<ClientConfig>, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            ClientConfig::from_yaml_file(path)?
        }
        None => ClientConfig::default(),
    };

    if let Some(path) = &cli.file {
        let text = std::fs::read_to_string(path)?;
        apply_file(&mut config, &text)?;
    } else if let Some(query) = &cli.query {
        config.query = query.clone();
    } else if cli.config.is_none() {
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Ok(None);
        }
        let mut text = String::new();
        stdin.read_to_string(&mut text)?;
        apply_file(&mut config, &text)?;
    }

    if config.endpoint.is_empty() {
        if let Some(endpoint) = &cli.endpoint {
            config.endpoint = endpoint.clone();
        }
    }
    if let Some(agent) = &cli.user_agent {
        config.user_agent = Some(agent.clone());
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = Some(secs);
    }

    if config.endpoint.is_empty() {
        return Err("no endpoint: add an ENDPOINT= line or pass --endpoint".into());
    }
    Ok(Some(config))
}

fn apply_file(config: &mut ClientConfig, text: &str) -> Result<(), sparql_file::SparqlFileError> {
    let file = sparql_file::parse(text)?;
    if !file.endpoint.is_empty() {
        config.endpoint = file.endpoint;
    }
    config.query = file.query;
    Ok(())
}

async fn run_query(
    config: &ClientConfig,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Connecting to: {}\n", config.endpoint);
    eprintln!("Query: {}\n", config.query);

    let client = SparqlClient::from_config(config)?;
    let results = client.execute().await?;

    match format {
        OutputFormat::Human => println!("{}", results.human()),
        OutputFormat::Table => {
            if results.is_empty() {
                println!("(no results)");
                return Ok(());
            }
            println!("{}", build_table(&results));
            println!("{} row(s)", results.len());
        }
    }

    Ok(())
}

fn build_table(results: &QueryResults) -> Table {
    let mut columns: Vec<String> = results.vars().into_iter().map(str::to_string).collect();
    if columns.is_empty() {
        let keys: BTreeSet<&String> = results.rows().iter().flat_map(|row| row.keys()).collect();
        columns = keys.into_iter().cloned().collect();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(&columns);

    for row in results.rows() {
        let cells: Vec<String> = columns
            .iter()
            .map(|var| row.get(var).map(format_term).unwrap_or_default())
            .collect();
        table.add_row(cells);
    }

    table
}

fn format_term(term: &Term) -> String {
    match term.kind.as_str() {
        "uri" => format!("<{}>", term.value),
        "bnode" => format!("_:{}", term.value),
        _ => match (&term.lang, &term.datatype) {
            (Some(lang), _) => format!("\"{}\"@{}", term.value, lang),
            (None, Some(datatype)) => format!("\"{}\"^^<{}>", term.value, datatype),
            (None, None) => term.value.clone(),
        },
    }
}
