//! Message catalog audit.
//!
//! Two groups of checks:
//! - the catalog data file: every key parses, every template parses, and no
//!   two entries share an id
//! - the Rust sources: message ids come from named constants, not from
//!   integer literals passed to `MessageId::from_raw`

mod catalog_data;
mod raw_id_literal;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Location of the catalog data file, relative to the workspace root.
pub const CATALOG_FILE: &str = "crates/message-catalog/message_catalog.json";

/// Configuration for audit runs.
pub struct AuditConfig {
    /// Show verbose output including all files checked.
    pub verbose: bool,
    /// Only show errors, no progress or summary.
    pub quiet: bool,
}

/// A problem found by the audit.
#[derive(Debug)]
pub struct Violation {
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Name of the check that failed
    pub rule: &'static str,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: [{}] {}",
            self.file.display(),
            self.line,
            self.column,
            self.rule,
            self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Run every audit check. Exits the process with status 1 on violations.
pub fn run(config: &AuditConfig) -> Result<()> {
    let violations = collect(config)?;

    if violations.is_empty() {
        if !config.quiet {
            eprintln!("\nAll checks passed!");
        }
        return Ok(());
    }

    eprintln!();
    for violation in &violations {
        eprintln!("{}\n", violation);
    }
    if !config.quiet {
        eprintln!(
            "Found {} violation(s) in {} file(s)",
            violations.len(),
            violations
                .iter()
                .map(|v| &v.file)
                .collect::<std::collections::HashSet<_>>()
                .len(),
        );
    }

    std::process::exit(1);
}

/// Run every audit check and return the violations.
pub fn collect(config: &AuditConfig) -> Result<Vec<Violation>> {
    let workspace_root = find_workspace_root()?;
    let mut violations = Vec::new();

    let catalog_path = workspace_root.join(CATALOG_FILE);
    if !config.quiet {
        eprintln!("Auditing message catalog {}", catalog_path.display());
    }
    let content = std::fs::read_to_string(&catalog_path)
        .with_context(|| format!("Failed to read catalog: {}", catalog_path.display()))?;
    violations.extend(catalog_data::check(&catalog_path, &content)?);

    let crates_dir = workspace_root.join("crates");
    let rust_files = find_rust_files(&crates_dir)?;
    if !config.quiet {
        eprintln!(
            "Checking {} Rust files under {}",
            rust_files.len(),
            crates_dir.display()
        );
    }

    for file in &rust_files {
        if config.verbose {
            eprintln!("Checking {}", file.display());
        }
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        violations.extend(raw_id_literal::check(file, &content)?);
    }

    tracing::debug!(violations = violations.len(), "audit finished");
    Ok(violations)
}

/// Find the workspace root directory by looking for the root Cargo.toml.
pub fn find_workspace_root() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Failed to get current working directory")?;

    for ancestor in current_dir.ancestors() {
        let cargo_toml = ancestor.join("Cargo.toml");
        if cargo_toml.exists() {
            let content =
                std::fs::read_to_string(&cargo_toml).context("Failed to read Cargo.toml")?;
            if content.contains("[workspace]") {
                return Ok(ancestor.to_path_buf());
            }
        }
    }

    anyhow::bail!(
        "Could not find workspace root (Cargo.toml with [workspace] section) \
         starting from {}",
        current_dir.display()
    )
}

/// Find all Rust source files in the given directory, skipping test-only trees.
fn find_rust_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !is_skipped_dir(e))
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path.to_path_buf());
        }
    }

    // Sort for deterministic output
    files.sort();

    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Cargo build output and integration test directories.
fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|s| s == "target" || s == "tests")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let violation = Violation {
            file: PathBuf::from("crates/demo/src/lib.rs"),
            line: 12,
            column: 5,
            rule: "raw-message-id-literal",
            message: "message id built from integer literal 10747934".to_string(),
            suggestion: Some("use a named constant".to_string()),
        };
        assert_eq!(
            violation.to_string(),
            "crates/demo/src/lib.rs:12:5: [raw-message-id-literal] message id built from \
             integer literal 10747934\n  suggestion: use a named constant"
        );
    }

    #[test]
    fn test_find_rust_files_skips_tests_and_target() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["src", "tests", "target/debug"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        std::fs::write(dir.path().join("src/lib.rs"), "").unwrap();
        std::fs::write(dir.path().join("tests/it.rs"), "").unwrap();
        std::fs::write(dir.path().join("target/debug/build.rs"), "").unwrap();

        let files = find_rust_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("src/lib.rs")]);
    }
}
