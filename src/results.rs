//! SPARQL JSON results model
//!
//! A decoded response looks like this on the wire:
//!
//! ```json
//! {
//!   "head": { "vars": ["s", "label"] },
//!   "results": {
//!     "bindings": [
//!       {
//!         "s": { "type": "uri", "value": "http://the-fr.org/id/file-format/25" },
//!         "label": { "type": "literal", "value": "OS/2 Bitmap", "xml:lang": "en" }
//!       }
//!     ]
//!   }
//! }
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{SparqlError, SparqlResult};

/// A single RDF term bound to a variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Term kind (e.g., "uri", "literal", "bnode")
    #[serde(rename = "type")]
    pub kind: String,
    /// Lexical value
    pub value: String,
    /// Language tag of a language-tagged literal
    #[serde(
        rename = "xml:lang",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
    /// Datatype IRI of a typed literal
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub datatype: Option<String>,
}

impl Term {
    pub fn is_uri(&self) -> bool {
        self.kind == "uri"
    }

    pub fn is_literal(&self) -> bool {
        self.kind == "literal"
    }

    pub fn is_bnode(&self) -> bool {
        self.kind == "bnode"
    }
}

// Endpoints send both `"xml:lang": ""` and no key at all for untagged literals.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// One solution: variable name → term
pub type Row = BTreeMap<String, Term>;

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    head: Option<Map<String, Value>>,
    #[serde(default)]
    results: Option<Bindings>,
}

#[derive(Deserialize)]
struct Bindings {
    #[serde(default)]
    bindings: Option<Vec<Row>>,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    head: &'a Option<Map<String, Value>>,
    results: BindingsRef<'a>,
}

#[derive(Serialize)]
struct BindingsRef<'a> {
    bindings: &'a [Row],
}

/// Decoded response from a SPARQL endpoint
///
/// Built once per query; the default value is the empty result returned in
/// place of data whenever a query fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResults {
    head: Option<Map<String, Value>>,
    rows: Vec<Row>,
    human: String,
}

impl QueryResults {
    /// Build a result from its parts and attach the human rendering.
    pub fn new(head: Option<Map<String, Value>>, rows: Vec<Row>) -> Self {
        let mut results = Self {
            head,
            rows,
            human: String::new(),
        };
        results.human = results.render();
        results
    }

    /// Decode a SPARQL JSON results document.
    ///
    /// A document whose head and bindings are null or missing is an empty
    /// result, not an error, and so is `{}`. A JSON value carrying other keys
    /// but neither `head` nor `results` is rejected.
    pub fn from_json(body: &[u8]) -> SparqlResult<Self> {
        let value: Value = serde_json::from_slice(body)?;

        let recognised = value
            .as_object()
            .map_or(false, |doc| {
                doc.is_empty() || doc.contains_key("head") || doc.contains_key("results")
            });
        if !recognised {
            return Err(SparqlError::Decode(serde_json::Error::custom(
                "expected an object with `head` or `results`",
            )));
        }

        let doc: Document = serde_json::from_value(value)?;
        let rows = doc
            .results
            .and_then(|results| results.bindings)
            .unwrap_or_default();

        Ok(Self::new(doc.head, rows))
    }

    /// Canonical JSON rendering of the head and bindings.
    pub fn render(&self) -> String {
        let doc = DocumentRef {
            head: &self.head,
            results: BindingsRef {
                bindings: &self.rows,
            },
        };
        // String keys and JSON values only; serialisation cannot fail.
        serde_json::to_string_pretty(&doc).unwrap_or_default()
    }

    /// Header section exactly as the endpoint sent it
    pub fn head(&self) -> Option<&Map<String, Value>> {
        self.head.as_ref()
    }

    /// Variable names declared in `head.vars`
    pub fn vars(&self) -> Vec<&str> {
        self.head
            .as_ref()
            .and_then(|head| head.get("vars"))
            .and_then(Value::as_array)
            .map(|vars| vars.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Rows in the order the endpoint returned them
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Human rendering attached at decode time
    pub fn human(&self) -> &str {
        &self.human
    }

    /// Every term value across all rows
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .flat_map(|row| row.values())
            .map(|term| term.value.as_str())
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for QueryResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
