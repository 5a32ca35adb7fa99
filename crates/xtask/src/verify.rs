//! Verify command - Full project verification.
//!
//! Runs, in order:
//! 1. Build all crates
//! 2. Run all tests
//! 3. Audit the message catalog and sources

use anyhow::{Context, Result, bail};
use std::process::Command;

use crate::audit::{self, AuditConfig};

/// Configuration for the verify command.
#[derive(Default)]
pub struct VerifyConfig {
    pub skip_build: bool,
    pub skip_tests: bool,
    pub skip_audit: bool,
}

/// Run the verify command.
pub fn run(config: &VerifyConfig) -> Result<()> {
    let project_root = audit::find_workspace_root()?;

    if !config.skip_build {
        println!("\n━━━ Step 1/3: Building workspace ━━━\n");
        run_command(
            "cargo",
            &["build", "--workspace"],
            &project_root,
            "Build failed",
        )?;
        println!("✓ Build complete");
    } else {
        println!("\n━━━ Step 1/3: Skipping build ━━━\n");
    }

    if !config.skip_tests {
        println!("\n━━━ Step 2/3: Running tests ━━━\n");
        run_command(
            "cargo",
            &["nextest", "run", "--workspace"],
            &project_root,
            "Tests failed",
        )?;
        // nextest does not run doctests
        run_command(
            "cargo",
            &["test", "--workspace", "--doc"],
            &project_root,
            "Doctests failed",
        )?;
        println!("✓ Tests complete");
    } else {
        println!("\n━━━ Step 2/3: Skipping tests ━━━\n");
    }

    if !config.skip_audit {
        println!("\n━━━ Step 3/3: Auditing message catalog ━━━\n");
        let violations = audit::collect(&AuditConfig {
            verbose: false,
            quiet: true,
        })?;
        if !violations.is_empty() {
            for violation in &violations {
                eprintln!("{}\n", violation);
            }
            bail!("Audit found {} violation(s)", violations.len());
        }
        println!("✓ Audit complete");
    } else {
        println!("\n━━━ Step 3/3: Skipping audit ━━━\n");
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ All verification steps passed!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    Ok(())
}

/// Run a command and check for success.
fn run_command(program: &str, args: &[&str], dir: &std::path::Path, error_msg: &str) -> Result<()> {
    tracing::debug!(program, ?args, dir = %dir.display(), "running");
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .with_context(|| format!("Failed to run {} {:?}", program, args))?;

    if !status.success() {
        bail!("{}", error_msg);
    }

    Ok(())
}
