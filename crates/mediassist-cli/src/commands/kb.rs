//! Knowledge base command implementation.

use crate::cli::{KbAction, KbArgs};
use crate::config::{Config, KnowledgeBackend};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use mediassist_domain::traits::KnowledgeStore;
use mediassist_knowledge::{
    KnowledgeBaseLoader, LoaderConfig, MindsDbStore, PdfTextExtractor, SqliteKnowledgeStore,
    StoreError,
};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Knowledge store selected by configuration.
pub type DynStore = Box<dyn KnowledgeStore<Error = StoreError>>;

/// Execute the kb command.
pub fn execute_kb(args: KbArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;

    match args.action {
        KbAction::Load { name, dir, pattern } => {
            let loader_config = LoaderConfig {
                pattern: pattern.unwrap_or_else(|| config.knowledge.pattern.clone()),
                ..LoaderConfig::default()
            };
            load(store, &name, &dir, loader_config, formatter)
        }
        KbAction::List => list(store.as_ref(), formatter),
        KbAction::Drop { name, yes } => drop_base(store, &name, yes, formatter),
    }
}

/// Open the configured knowledge store.
fn open_store(config: &Config) -> Result<DynStore> {
    match config.knowledge.backend {
        KnowledgeBackend::Sqlite => {
            let path = config.sqlite_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            debug!("Opening SQLite knowledge store at {}", path.display());
            Ok(Box::new(SqliteKnowledgeStore::new(&path)?))
        }
        KnowledgeBackend::Mindsdb => {
            debug!("Using MindsDB at {}", config.knowledge.mindsdb_url);
            Ok(Box::new(MindsDbStore::new(config.knowledge.mindsdb_url.clone())?))
        }
    }
}

fn load(
    store: DynStore,
    name: &str,
    dir: &Path,
    loader_config: LoaderConfig,
    formatter: &Formatter,
) -> Result<()> {
    let mut loader = KnowledgeBaseLoader::new(store, PdfTextExtractor::new(), loader_config);
    let summary = loader.load_directory(name, dir)?;
    println!("{}", formatter.format_load_summary(&summary)?);
    Ok(())
}

fn list(store: &dyn KnowledgeStore<Error = StoreError>, formatter: &Formatter) -> Result<()> {
    let bases = store.list()?;
    println!("{}", formatter.format_knowledge_bases(&bases)?);
    Ok(())
}

fn drop_base(mut store: DynStore, name: &str, yes: bool, formatter: &Formatter) -> Result<()> {
    if !yes {
        print!("About to drop knowledge base '{}'. Continue? [y/N] ", name);
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    if store.drop_base(name)? {
        println!("{}", formatter.success(&format!("Dropped knowledge base '{}'", name)));
        Ok(())
    } else {
        Err(CliError::Store(StoreError::NotFound(name.to_string())))
    }
}
