//! SQLite-backed knowledge store

use crate::error::StoreError;
use mediassist_domain::traits::KnowledgeStore;
use mediassist_domain::{KnowledgeBase, KnowledgeDocument};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS knowledge_bases (
    name        TEXT PRIMARY KEY,
    created_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    id              BLOB PRIMARY KEY,
    knowledge_base  TEXT NOT NULL REFERENCES knowledge_bases(name) ON DELETE CASCADE,
    source          TEXT NOT NULL,
    content         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_knowledge_base ON documents(knowledge_base);
"#;

/// SQLite implementation of KnowledgeStore
///
/// Keeps knowledge bases and their documents in a single database file.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// store instance.
pub struct SqliteKnowledgeStore {
    conn: Connection,
}

impl SqliteKnowledgeStore {
    /// Open (or create) a store at the given path
    ///
    /// Use `:memory:` for an in-memory database.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediassist_knowledge::SqliteKnowledgeStore;
    ///
    /// let store = SqliteKnowledgeStore::new(":memory:").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    /// Number of documents stored in a knowledge base
    pub fn document_count(&self, name: &str) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE knowledge_base = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Sources of every document in a knowledge base, in insertion order
    pub fn document_sources(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT source FROM documents WHERE knowledge_base = ?1 ORDER BY rowid")?;
        let sources = stmt
            .query_map(params![name], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(sources)
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM knowledge_bases WHERE name = ?1",
                params![name],
                |_| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl KnowledgeStore for SqliteKnowledgeStore {
    type Error = StoreError;

    fn get_or_create(&mut self, name: &str) -> Result<KnowledgeBase, Self::Error> {
        validate_name(name)?;

        let created = self.conn.execute(
            "INSERT OR IGNORE INTO knowledge_bases (name, created_at) VALUES (?1, ?2)",
            params![name, now_secs()],
        )?;
        if created > 0 {
            debug!("Created knowledge base '{}'", name);
        }

        Ok(KnowledgeBase::new(name))
    }

    fn insert(
        &mut self,
        name: &str,
        documents: &[KnowledgeDocument],
    ) -> Result<usize, Self::Error> {
        if !self.exists(name)? {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (id, knowledge_base, source, content) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for doc in documents {
                stmt.execute(params![
                    doc.id.value().to_be_bytes().to_vec(),
                    name,
                    &doc.source,
                    &doc.content,
                ])?;
            }
        }
        tx.commit()?;

        Ok(documents.len())
    }

    fn list(&self) -> Result<Vec<KnowledgeBase>, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT name FROM knowledge_bases ORDER BY name")?;
        let bases = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|name| name.map(KnowledgeBase::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bases)
    }

    fn drop_base(&mut self, name: &str) -> Result<bool, Self::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM knowledge_bases WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_initialization() {
        let store = SqliteKnowledgeStore::in_memory();
        assert!(store.is_ok(), "Store should initialize successfully");
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut store = SqliteKnowledgeStore::in_memory().unwrap();
        assert!(matches!(store.get_or_create("  "), Err(StoreError::InvalidName(_))));
    }

    #[test]
    fn test_insert_into_missing_base() {
        let mut store = SqliteKnowledgeStore::in_memory().unwrap();
        let docs = vec![KnowledgeDocument::new("a.pdf", "text")];
        assert!(matches!(store.insert("nope", &docs), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_drop_cascades_documents() {
        let mut store = SqliteKnowledgeStore::in_memory().unwrap();
        store.get_or_create("guidelines").unwrap();
        store
            .insert("guidelines", &[KnowledgeDocument::new("a.pdf", "page one")])
            .unwrap();

        assert!(store.drop_base("guidelines").unwrap());
        assert_eq!(store.document_count("guidelines").unwrap(), 0);
        assert!(!store.drop_base("guidelines").unwrap());
    }
}
