//! Audit rule: message ids must not be built from integer literals.
//!
//! An id written as `MessageId::from_raw(10747934)` hides its category,
//! severity and ordinal, and drifts silently when the catalog is renumbered.
//! Code must name ids through constants built with `MessageId::new` (see
//! `message_catalog::catalog::ids`).
//!
//! Test modules (`#[cfg(test)]`) are exempt, as is any call on a line
//! carrying the `message-id-audit-ignore` marker.

use std::path::Path;

use anyhow::Result;
use proc_macro2::Span;
use syn::visit::Visit;
use syn::{Expr, ExprCall, ExprLit, File, ItemMod, Lit};

use super::Violation;

const RULE_NAME: &str = "raw-message-id-literal";

const IGNORE_MARKER: &str = "message-id-audit-ignore";

/// Constructors that accept an untyped integer.
const RAW_CONSTRUCTORS: &[&str] = &["from_raw", "try_from"];

/// Check a file for message ids built from integer literals.
pub fn check(path: &Path, content: &str) -> Result<Vec<Violation>> {
    let syntax_tree: File = match syn::parse_file(content) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!(
                "Warning: Could not parse {}: {} (skipping)",
                path.display(),
                e
            );
            return Ok(Vec::new());
        }
    };

    let mut visitor = CallVisitor {
        violations: Vec::new(),
        file_path: path.to_path_buf(),
        lines: content.lines().collect(),
    };
    visitor.visit_file(&syntax_tree);

    Ok(visitor.violations)
}

struct CallVisitor<'a> {
    violations: Vec<Violation>,
    file_path: std::path::PathBuf,
    lines: Vec<&'a str>,
}

impl CallVisitor<'_> {
    fn span_to_location(&self, span: Span) -> (usize, usize) {
        let start = span.start();
        (start.line, start.column + 1)
    }

    /// `MessageId::from_raw` / `MessageId::try_from`, with any leading path.
    fn is_raw_constructor(call: &ExprCall) -> bool {
        let Expr::Path(func) = call.func.as_ref() else {
            return false;
        };
        let segments: Vec<String> = func
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        match segments.as_slice() {
            [.., ty, method] => ty == "MessageId" && RAW_CONSTRUCTORS.contains(&method.as_str()),
            _ => false,
        }
    }

    fn is_ignored(&self, line: usize) -> bool {
        line > 0
            && self
                .lines
                .get(line - 1)
                .is_some_and(|text| text.contains(IGNORE_MARKER))
    }

    fn check_call(&mut self, call: &ExprCall) {
        if !Self::is_raw_constructor(call) || call.args.len() != 1 {
            return;
        }
        let Some(Expr::Lit(ExprLit {
            lit: Lit::Int(literal),
            ..
        })) = call.args.first()
        else {
            return;
        };

        let (line, column) = self.span_to_location(literal.span());
        if self.is_ignored(line) {
            return;
        }

        let decoded = literal
            .base10_parse::<u32>()
            .ok()
            .and_then(|raw| message_catalog::MessageId::from_raw(raw).ok())
            .map(|id| {
                format!(
                    " ({} {} {})",
                    id.category(),
                    id.severity(),
                    id.ordinal()
                )
            })
            .unwrap_or_default();

        self.violations.push(Violation {
            file: self.file_path.clone(),
            line,
            column,
            rule: RULE_NAME,
            message: format!(
                "message id built from integer literal {}{}",
                literal.base10_digits(),
                decoded
            ),
            suggestion: Some(
                "Declare a constant with MessageId::new(category, severity, ordinal) \
                 next to the other ids in message_catalog::catalog::ids."
                    .to_string(),
            ),
        });
    }
}

fn is_test_module(item: &ItemMod) -> bool {
    item.attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

impl<'ast> Visit<'ast> for CallVisitor<'_> {
    fn visit_item_mod(&mut self, item: &'ast ItemMod) {
        if is_test_module(item) {
            return;
        }
        syn::visit::visit_item_mod(self, item);
    }

    fn visit_expr_call(&mut self, call: &'ast ExprCall) {
        self.check_call(call);
        syn::visit::visit_expr_call(self, call);
    }
}
