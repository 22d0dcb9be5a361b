//! MindsDB knowledge store over the HTTP SQL API
//!
//! Every operation is a SQL statement posted to `{url}/api/sql/query`.
//!
//! # Examples
//!
//! ```no_run
//! use mediassist_domain::traits::KnowledgeStore;
//! use mediassist_knowledge::MindsDbStore;
//!
//! let mut store = MindsDbStore::new("http://127.0.0.1:47334").unwrap();
//! store.get_or_create("medical_guidelines").unwrap();
//! ```

use crate::error::StoreError;
use mediassist_domain::traits::KnowledgeStore;
use mediassist_domain::{KnowledgeBase, KnowledgeDocument};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Default local MindsDB endpoint
pub const DEFAULT_MINDSDB_URL: &str = "http://127.0.0.1:47334";

/// Default request timeout (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Knowledge store backed by a MindsDB server
pub struct MindsDbStore {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SqlRequest<'a> {
    query: &'a str,
}

/// Reply from the SQL endpoint
#[derive(Debug, Deserialize)]
struct SqlResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    column_names: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
    #[serde(default)]
    error_message: Option<String>,
}

impl MindsDbStore {
    /// Create a store for the MindsDB server at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a store with a custom request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                StoreError::Communication(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Server URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query(&self, sql: &str) -> Result<SqlResponse, StoreError> {
        let url = format!("{}/api/sql/query", self.base_url);
        debug!("MindsDB query: {}", truncate(sql, 200));

        let response = self
            .client
            .post(&url)
            .json(&SqlRequest { query: sql })
            .send()
            .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Server(format!("HTTP {}: {}", status, body)));
        }

        let parsed: SqlResponse = response
            .json()
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if parsed.kind == "error" {
            return Err(StoreError::Server(
                parsed.error_message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(parsed)
    }

    fn names(&self) -> Result<Vec<String>, StoreError> {
        let response = self.query("SHOW KNOWLEDGE_BASES")?;
        Ok(knowledge_base_names(&response))
    }
}

fn knowledge_base_names(response: &SqlResponse) -> Vec<String> {
    let column = response
        .column_names
        .iter()
        .position(|c| c.eq_ignore_ascii_case("name"))
        .unwrap_or(0);

    response
        .data
        .iter()
        .filter_map(|row| row.get(column))
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Check that `name` can be spliced into SQL as a bare identifier
pub fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Quote a string as a SQL literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// Knowledge bases keep the originating file as a metadata column
fn create_statement(name: &str) -> String {
    format!(
        "CREATE KNOWLEDGE_BASE {} USING \
         metadata_columns = ['source'], content_columns = ['content']",
        name
    )
}

fn insert_statement(name: &str, documents: &[KnowledgeDocument]) -> String {
    let rows: Vec<String> = documents
        .iter()
        .map(|doc| format!("({}, {})", quote_literal(&doc.source), quote_literal(&doc.content)))
        .collect();
    format!("INSERT INTO {} (source, content) VALUES {}", name, rows.join(", "))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl KnowledgeStore for MindsDbStore {
    type Error = StoreError;

    fn get_or_create(&mut self, name: &str) -> Result<KnowledgeBase, Self::Error> {
        validate_identifier(name)?;

        if !self.names()?.iter().any(|n| n == name) {
            self.query(&create_statement(name))?;
            info!("Created knowledge base '{}'", name);
        }
        Ok(KnowledgeBase::new(name))
    }

    fn insert(
        &mut self,
        name: &str,
        documents: &[KnowledgeDocument],
    ) -> Result<usize, Self::Error> {
        validate_identifier(name)?;
        if documents.is_empty() {
            return Ok(0);
        }

        self.query(&insert_statement(name, documents))?;
        Ok(documents.len())
    }

    fn list(&self) -> Result<Vec<KnowledgeBase>, Self::Error> {
        Ok(self.names()?.into_iter().map(KnowledgeBase::new).collect())
    }

    fn drop_base(&mut self, name: &str) -> Result<bool, Self::Error> {
        validate_identifier(name)?;

        if !self.names()?.iter().any(|n| n == name) {
            return Ok(false);
        }
        self.query(&format!("DROP KNOWLEDGE_BASE {}", name))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("medical_guidelines").is_ok());
        assert!(validate_identifier("_kb2").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2kb").is_err());
        assert!(validate_identifier("kb; DROP DATABASE x").is_err());
        assert!(validate_identifier("my-kb").is_err());
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("plain"), "'plain'");
        assert_eq!(quote_literal("patient's chart"), "'patient''s chart'");
        assert_eq!(quote_literal(r"C:\notes"), r"'C:\\notes'");
    }

    #[test]
    fn test_parse_show_knowledge_bases() {
        let response: SqlResponse = serde_json::from_str(
            r#"{"type":"table","column_names":["PROJECT","NAME","MODEL"],
                "data":[["mindsdb","guidelines","emb"],["mindsdb","drug_labels","emb"]]}"#,
        )
        .unwrap();
        assert_eq!(knowledge_base_names(&response), vec!["guidelines", "drug_labels"]);
    }

    #[test]
    fn test_parse_ok_response() {
        let response: SqlResponse = serde_json::from_str(r#"{"type":"ok"}"#).unwrap();
        assert!(knowledge_base_names(&response).is_empty());
    }

    #[test]
    fn test_create_declares_source_metadata() {
        let sql = create_statement("guidelines");
        assert!(sql.starts_with("CREATE KNOWLEDGE_BASE guidelines"));
        assert!(sql.contains("metadata_columns = ['source']"));
    }

    #[test]
    fn test_insert_keeps_source() {
        let docs = vec![
            KnowledgeDocument::new("docs/asthma.pdf", "Inhaler use"),
            KnowledgeDocument::new("docs/flu.pdf", "patient's fever"),
        ];
        assert_eq!(
            insert_statement("guidelines", &docs),
            "INSERT INTO guidelines (source, content) VALUES \
             ('docs/asthma.pdf', 'Inhaler use'), ('docs/flu.pdf', 'patient''s fever')"
        );
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }

    #[test]
    fn test_unreachable_server() {
        // Nothing listens on the discard port
        let store = MindsDbStore::new("http://127.0.0.1:9/").unwrap();
        assert_eq!(store.base_url(), "http://127.0.0.1:9");
        assert!(matches!(store.list(), Err(StoreError::Communication(_))));
    }
}
