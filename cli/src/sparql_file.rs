//! `.sparql` query files
//!
//! ```text
//! #!/usr/bin/spargo
//!
//! ENDPOINT=https://query.wikidata.org/sparql
//!
//! SELECT ?item WHERE { ?item wdt:P31 wd:Q146 } LIMIT 3
//! ```

use thiserror::Error;

/// Marker lines that identify a spargo query file
pub const SHEBANGS: [&str; 2] = ["#!spargo", "#!/usr/bin/spargo"];

const ENDPOINT_KEY: &str = "ENDPOINT";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SparqlFileError {
    #[error("shebang is missing or incorrect, expected one of: {}", SHEBANGS.join(", "))]
    MissingShebang,

    #[error("incorrect endpoint formatting: {0}")]
    MalformedEndpoint(String),
}

/// Endpoint and query extracted from a query file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparqlFile {
    pub endpoint: String,
    pub query: String,
}

/// Split a query file into its endpoint and query text.
///
/// Blank lines are dropped; every other line that is neither the shebang nor
/// the endpoint declaration belongs to the query.
pub fn parse(text: &str) -> Result<SparqlFile, SparqlFileError> {
    let mut shebang = false;
    let mut file = SparqlFile::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if SHEBANGS.contains(&trimmed) {
            shebang = true;
        } else if let Some(rest) = endpoint_declaration(trimmed) {
            let value = rest
                .strip_prefix('=')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SparqlFileError::MalformedEndpoint(line.to_string()))?;
            file.endpoint = value.to_string();
        } else {
            file.query.push_str(line);
            file.query.push('\n');
        }
    }

    if !shebang {
        return Err(SparqlFileError::MissingShebang);
    }
    Ok(file)
}

// Returns what follows the key when `line` declares the endpoint.
fn endpoint_declaration(line: &str) -> Option<&str> {
    let key = line.get(..ENDPOINT_KEY.len())?;
    if !key.eq_ignore_ascii_case(ENDPOINT_KEY) {
        return None;
    }
    let rest = &line[ENDPOINT_KEY.len()..];
    match rest.chars().next() {
        None | Some('=') => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest.trim_start()),
        _ => None,
    }
}
