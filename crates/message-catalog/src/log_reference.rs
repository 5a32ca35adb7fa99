//! Log message reference generation.
//!
//! Administrators look messages up by the id printed in the server log. This
//! module renders the registry as a reference document, one DocBook
//! `<variablelist>` per category, or as a plain text listing.

use std::borrow::Cow;
use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::id::{Category, MessageId, Severity};
use crate::registry::MessageRegistry;

const DOCBOOK_ATTRS: &str = "xmlns='http://docbook.org/ns/docbook' version='5.0' xml:lang='en' \
     xmlns:xsi='http://www.w3.org/2001/XMLSchema-instance' \
     xsi:schemaLocation='http://docbook.org/ns/docbook http://docbook.org/xml/5.0/xsd/docbook.xsd' \
     xmlns:xlink='http://www.w3.org/1999/xlink' \
     xmlns:xinclude='http://www.w3.org/2001/XInclude'";

/// Which messages to document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeverityFilter {
    /// Only SEVERE_ERROR and FATAL_ERROR messages
    #[default]
    Errors,
    All,
}

impl SeverityFilter {
    pub fn includes(self, severity: Severity) -> bool {
        match self {
            SeverityFilter::Errors => {
                matches!(severity, Severity::SevereError | Severity::FatalError)
            }
            SeverityFilter::All => true,
        }
    }
}

/// One documented message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub id: MessageId,
    pub severity: Severity,
    pub name: Option<String>,
    /// The template as written
    pub text: String,
}

/// The documented messages of one category, sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReference {
    pub category: Category,
    pub entries: Vec<ReferenceEntry>,
}

/// A generated DocBook file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocbookFile {
    /// `log-ref-<CATEGORY>.xml`
    pub file_name: String,
    pub contents: String,
}

impl CategoryReference {
    /// A standalone DocBook document holding this category's `<variablelist>`.
    pub fn to_docbook(&self) -> String {
        let name = self.category.name();
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(out, " <variablelist xml:id=\"log-ref-{name}\" {DOCBOOK_ATTRS}>");
        let _ = writeln!(out, "  <title>Log Message Category: {name}</title>");
        let _ = writeln!(
            out,
            "  <para>This category concerns messages associated with {}</para>",
            escape(self.category.description())
        );
        for entry in &self.entries {
            let id = entry.id.raw();
            let _ = writeln!(out, "  <varlistentry xml:id=\"log-ref-{id}\">");
            let _ = writeln!(out, "   <term>ID: {id}</term>");
            out.push_str("   <listitem>\n");
            let _ = writeln!(out, "    <para>Severity: {}</para>", entry.severity.name());
            let _ = writeln!(out, "    <para>Message: {}</para>", escape(&entry.text));
            out.push_str("   </listitem>\n");
            out.push_str("  </varlistentry>\n");
        }
        out.push_str(" </variablelist>\n");
        out
    }
}

/// A reference of registered messages, grouped by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogReference {
    categories: Vec<CategoryReference>,
}

impl LogReference {
    /// Collect the messages of `registry` that pass `filter`.
    ///
    /// Categories without any documented message are omitted.
    pub fn from_registry(registry: &MessageRegistry, filter: SeverityFilter) -> Self {
        let mut categories: Vec<CategoryReference> = Category::ALL
            .iter()
            .map(|category| CategoryReference {
                category: *category,
                entries: Vec::new(),
            })
            .collect();

        // iter() is ordered by id, so each category's entries come out sorted.
        for entry in registry.iter() {
            let severity = entry.id.severity();
            if !filter.includes(severity) {
                continue;
            }
            let category = entry.id.category();
            if let Some(group) = categories.iter_mut().find(|c| c.category == category) {
                group.entries.push(ReferenceEntry {
                    id: entry.id,
                    severity,
                    name: entry.name.map(str::to_string),
                    text: entry.template.as_str().to_string(),
                });
            }
        }

        categories.retain(|c| !c.entries.is_empty());
        LogReference { categories }
    }

    pub fn categories(&self) -> &[CategoryReference] {
        &self.categories
    }

    /// Number of documented messages.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// One DocBook file per category.
    pub fn to_docbook(&self) -> Vec<DocbookFile> {
        self.categories
            .iter()
            .map(|c| DocbookFile {
                file_name: format!("log-ref-{}.xml", c.category.name()),
                contents: c.to_docbook(),
            })
            .collect()
    }

    /// Plain listing, one message per line: `ID  SEVERITY  NAME: text`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for category in &self.categories {
            for entry in &category.entries {
                let name: Cow<'_, str> = match &entry.name {
                    Some(name) => Cow::Borrowed(name),
                    None => Cow::Owned(format!("{}-{}", category.category, entry.id.ordinal())),
                };
                let _ = writeln!(
                    out,
                    "{}  {}  {}: {}",
                    entry.id,
                    entry.severity,
                    name,
                    entry.text
                );
            }
        }
        out
    }
}
