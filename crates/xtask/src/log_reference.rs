//! Log-reference command - write the log message reference.

use std::path::PathBuf;

use anyhow::{Context, Result};
use message_catalog::{LogReference, RegistryConfig, SeverityFilter, catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One DocBook `<variablelist>` file per category
    Docbook,
    /// Plain listing, one message per line
    Text,
}

pub struct LogReferenceConfig {
    pub format: Format,
    /// Document every severity, not just severe and fatal errors.
    pub all: bool,
    /// Directory (DocBook) or file (text); stdout when absent.
    pub output: Option<PathBuf>,
    /// Registry configuration file.
    pub config: Option<PathBuf>,
}

pub fn run(config: &LogReferenceConfig) -> Result<()> {
    let registry_config = match &config.config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    let registry = catalog::default_registry_with(registry_config)?;
    let filter = if config.all {
        SeverityFilter::All
    } else {
        SeverityFilter::Errors
    };
    let reference = LogReference::from_registry(&registry, filter);
    tracing::info!(
        messages = reference.len(),
        categories = reference.categories().len(),
        "built log reference"
    );

    match (config.format, &config.output) {
        (Format::Docbook, Some(dir)) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            for file in reference.to_docbook() {
                let path = dir.join(&file.file_name);
                std::fs::write(&path, &file.contents)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Wrote {}", path.display());
            }
        }
        (Format::Docbook, None) => {
            for file in reference.to_docbook() {
                print!("{}", file.contents);
            }
        }
        (Format::Text, Some(path)) => {
            std::fs::write(path, reference.to_text())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        (Format::Text, None) => print!("{}", reference.to_text()),
    }

    Ok(())
}
