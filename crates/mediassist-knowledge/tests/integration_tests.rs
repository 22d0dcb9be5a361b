//! Integration tests for mediassist-knowledge
//!
//! These tests run the loader against real directories with a text-based
//! extractor standing in for PDF parsing.

use mediassist_domain::traits::{KnowledgeStore, PageResult, TextExtractor};
use mediassist_domain::{KnowledgeBase, KnowledgeDocument};
use mediassist_knowledge::{KnowledgeBaseLoader, LoaderConfig, LoaderError, SqliteKnowledgeStore};
use std::fs;
use std::path::Path;
use tracing_test::traced_test;

/// Reads files as plain text; pages are separated by form feeds.
///
/// A file starting with `CORRUPT` fails as a whole, a page reading `BAD`
/// fails on its own.
struct TestExtractor;

impl TextExtractor for TestExtractor {
    type Error = String;

    fn extract_pages(&self, path: &Path) -> Result<Vec<PageResult<String>>, String> {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        if text.starts_with("CORRUPT") {
            return Err(format!("cannot parse {}", path.display()));
        }
        Ok(text
            .split('\u{c}')
            .enumerate()
            .map(|(i, page)| {
                if page.trim() == "BAD" {
                    Err(format!("page {} is damaged", i + 1))
                } else {
                    Ok(page.to_string())
                }
            })
            .collect())
    }
}

/// Store whose every operation fails
struct OfflineStore;

impl KnowledgeStore for OfflineStore {
    type Error = String;

    fn get_or_create(&mut self, _name: &str) -> Result<KnowledgeBase, String> {
        Err("connection refused".to_string())
    }

    fn insert(&mut self, _name: &str, _documents: &[KnowledgeDocument]) -> Result<usize, String> {
        Err("connection refused".to_string())
    }

    fn list(&self) -> Result<Vec<KnowledgeBase>, String> {
        Err("connection refused".to_string())
    }

    fn drop_base(&mut self, _name: &str) -> Result<bool, String> {
        Err("connection refused".to_string())
    }
}

fn loader() -> KnowledgeBaseLoader<SqliteKnowledgeStore, TestExtractor> {
    KnowledgeBaseLoader::new(
        SqliteKnowledgeStore::in_memory().unwrap(),
        TestExtractor,
        LoaderConfig::default(),
    )
}

#[test]
#[traced_test]
fn test_one_failing_file_of_three() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), "Hypertension guideline").unwrap();
    fs::write(dir.path().join("b.pdf"), "CORRUPT data").unwrap();
    fs::write(dir.path().join("c.pdf"), "Diabetes guideline").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a pdf").unwrap();

    let mut loader = loader();
    let summary = loader.load_directory("guidelines", dir.path()).unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.succeeded(), 2);

    let failed: Vec<_> = summary.failed().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].file_path.ends_with("b.pdf"));
    assert!(failed[0].error.is_some());
    assert_eq!(summary.to_string(), "2/3 files loaded into 'guidelines'");

    assert_eq!(loader.store().document_count("guidelines").unwrap(), 2);

    logs_assert(|lines: &[&str]| {
        let errors: Vec<&&str> = lines.iter().filter(|line| line.contains("ERROR")).collect();
        match errors.as_slice() {
            [line] if line.contains("b.pdf") => Ok(()),
            other => Err(format!("expected one error naming b.pdf, got {:?}", other)),
        }
    });
}

#[test]
fn test_files_processed_in_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["zeta.pdf", "alpha.pdf", "mid.pdf"] {
        fs::write(dir.path().join(name), name).unwrap();
    }

    let mut loader = loader();
    let summary = loader.load_directory("kb", dir.path()).unwrap();

    let names: Vec<_> = summary
        .results
        .iter()
        .map(|r| r.file_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["alpha.pdf", "mid.pdf", "zeta.pdf"]);
}

#[test]
fn test_failing_page_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("chart.pdf"), "page one\u{c}BAD\u{c}page three").unwrap();

    let mut loader = loader();
    let summary = loader.load_directory("charts", dir.path()).unwrap();

    let result = &summary.results[0];
    assert!(result.success);
    assert_eq!(result.pages_extracted, 2);
    assert_eq!(result.pages_skipped, 1);
}

#[test]
fn test_blank_pages_are_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("form.pdf"), "intake form\u{c}   \u{c}signature").unwrap();

    let mut loader = loader();
    let summary = loader.load_directory("forms", dir.path()).unwrap();

    let result = &summary.results[0];
    assert!(result.success);
    assert_eq!(result.pages_extracted, 2);
    assert_eq!(result.pages_skipped, 0);
}

#[test]
fn test_file_without_text_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("scan.pdf"), "  \u{c}BAD").unwrap();

    let mut loader = loader();
    let summary = loader.load_directory("scans", dir.path()).unwrap();

    assert_eq!(summary.succeeded(), 0);
    assert_eq!(summary.results[0].error.as_deref(), Some("no text extracted"));
}

#[test]
fn test_custom_pattern() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), "pdf text").unwrap();
    fs::write(dir.path().join("b.txt"), "plain text").unwrap();

    let config = LoaderConfig {
        pattern: "*.txt".to_string(),
        ..Default::default()
    };
    let mut loader =
        KnowledgeBaseLoader::new(SqliteKnowledgeStore::in_memory().unwrap(), TestExtractor, config);
    let summary = loader.load_directory("notes", dir.path()).unwrap();

    assert_eq!(summary.total(), 1);
    assert!(summary.results[0].file_path.ends_with("b.txt"));
}

#[test]
fn test_missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let mut loader = loader();
    let result = loader.load_directory("kb", &missing);
    assert!(matches!(result, Err(LoaderError::Directory { .. })));
    assert!(loader.store().list().unwrap().is_empty());
}

#[test]
fn test_all_failing_files_leave_no_knowledge_base() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), "CORRUPT").unwrap();
    fs::write(dir.path().join("b.pdf"), "   ").unwrap();

    let mut loader = loader();
    let summary = loader.load_directory("scans", dir.path()).unwrap();

    assert_eq!(summary.succeeded(), 0);
    assert!(loader.store().list().unwrap().is_empty());
}

#[test]
fn test_store_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), "text").unwrap();

    let mut loader = KnowledgeBaseLoader::new(OfflineStore, TestExtractor, LoaderConfig::default());
    let result = loader.load_directory("kb", dir.path());
    assert!(matches!(result, Err(LoaderError::Store(_))));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();

    let mut loader = loader();
    let summary = loader.load_directory("empty", dir.path()).unwrap();

    assert_eq!(summary.total(), 0);
    assert!(loader.store().list().unwrap().is_empty());
}

#[test]
fn test_knowledge_base_created_on_first_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), "CORRUPT").unwrap();
    fs::write(dir.path().join("b.pdf"), "Asthma guideline").unwrap();

    let mut loader = loader();
    loader.load_directory("respiratory", dir.path()).unwrap();

    assert_eq!(loader.store().list().unwrap(), vec![KnowledgeBase::new("respiratory")]);
    assert_eq!(loader.store().document_count("respiratory").unwrap(), 1);
}

#[test]
fn test_get_or_create_is_idempotent() {
    let mut store = SqliteKnowledgeStore::in_memory().unwrap();

    let first = store.get_or_create("guidelines").unwrap();
    let second = store.get_or_create("guidelines").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_insert_and_list() {
    let mut store = SqliteKnowledgeStore::in_memory().unwrap();
    store.get_or_create("b_kb").unwrap();
    store.get_or_create("a_kb").unwrap();

    let docs = vec![
        KnowledgeDocument::new("one.pdf", "first document"),
        KnowledgeDocument::new("two.pdf", "second document"),
    ];
    assert_eq!(store.insert("a_kb", &docs).unwrap(), 2);
    assert_eq!(store.document_sources("a_kb").unwrap(), vec!["one.pdf", "two.pdf"]);

    let names: Vec<_> = store.list().unwrap().into_iter().map(|kb| kb.name).collect();
    assert_eq!(names, vec!["a_kb", "b_kb"]);
}

#[test]
fn test_store_persists_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge.db");

    {
        let mut store = SqliteKnowledgeStore::new(&path).unwrap();
        store.get_or_create("persistent").unwrap();
    }

    let store = SqliteKnowledgeStore::new(&path).unwrap();
    assert_eq!(store.list().unwrap(), vec![KnowledgeBase::new("persistent")]);
}
