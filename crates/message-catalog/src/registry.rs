//! The message registry.
//!
//! Registration happens once, at start-up, through a [`RegistryBuilder`].
//! [`RegistryBuilder::seal`] turns it into an immutable [`MessageRegistry`]
//! that can be shared across threads and only answers lookups.
//!
//! # Example
//!
//! ```
//! use message_catalog::{Category, MessageId, RegistryBuilder, Severity};
//!
//! const CANNOT_LOAD_CLASS: MessageId =
//!     MessageId::new(Category::Config, Severity::SevereError, 2);
//!
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .register(
//!         CANNOT_LOAD_CLASS,
//!         "Unable to load class %s referenced in configuration entry %s",
//!     )
//!     .unwrap();
//! let registry = builder.seal();
//!
//! assert_eq!(
//!     registry.format(CANNOT_LOAD_CLASS, &[&"com.example.Foo", &"cn=config"]),
//!     "Unable to load class com.example.Foo referenced in configuration entry cn=config"
//! );
//! ```

use std::fmt;

use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;

use crate::config::{ArgumentMismatch, RegistryConfig};
use crate::error::{CatalogError, Result};
use crate::id::MessageId;
use crate::key::MessageKey;
use crate::message::Message;
use crate::template::Template;

/// One bulk-registration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: MessageId,
    pub name: Option<String>,
    pub template: String,
}

impl CatalogEntry {
    pub fn new(id: MessageId, template: impl Into<String>) -> Self {
        Self {
            id,
            name: None,
            template: template.into(),
        }
    }

    pub fn named(id: MessageId, name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            template: template.into(),
        }
    }

    /// Build an entry from a property key, naming it by the key's description.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidKey`] when the key is malformed.
    pub fn from_key(key: &str, template: impl Into<String>) -> Result<Self> {
        let key = MessageKey::parse(key)?;
        Ok(Self::named(key.id(), key.description(), template))
    }
}

#[derive(Debug, Clone)]
struct Registered {
    name: Option<String>,
    template: Template,
}

/// Accumulates registrations before the registry is sealed.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    fallback: Option<Template>,
    entries: FxHashMap<MessageId, Registered>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder whose registry will use `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] when the fallback template
    /// is unusable.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        let fallback = config.fallback()?;
        Ok(Self {
            config,
            fallback: Some(fallback),
            entries: FxHashMap::default(),
        })
    }

    /// Register `template` for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateMessageId`] if `id` already has a
    /// template, and [`CatalogError::InvalidTemplate`] if `template` uses a
    /// specifier that cannot be rendered.
    pub fn register(&mut self, id: MessageId, template: &str) -> Result<&mut Self> {
        self.insert(id, None, template)
    }

    /// Register `template` for `id` under a symbolic name.
    ///
    /// # Errors
    ///
    /// Same as [`RegistryBuilder::register`].
    pub fn register_named(&mut self, id: MessageId, name: &str, template: &str) -> Result<&mut Self> {
        self.insert(id, Some(name.to_string()), template)
    }

    /// Register one [`CatalogEntry`].
    ///
    /// # Errors
    ///
    /// Same as [`RegistryBuilder::register`].
    pub fn register_entry(&mut self, entry: CatalogEntry) -> Result<&mut Self> {
        self.insert(entry.id, entry.name, &entry.template)
    }

    /// Register every entry, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error reported by [`RegistryBuilder::register_entry`].
    pub fn register_all(
        &mut self,
        entries: impl IntoIterator<Item = CatalogEntry>,
    ) -> Result<&mut Self> {
        for entry in entries {
            self.register_entry(entry)?;
        }
        Ok(self)
    }

    fn insert(&mut self, id: MessageId, name: Option<String>, template: &str) -> Result<&mut Self> {
        if let Some(existing) = self.entries.get(&id) {
            return Err(CatalogError::DuplicateMessageId {
                id,
                existing: existing.template.as_str().to_string(),
            });
        }
        let template = parse_template(id, template)?;
        self.entries.insert(id, Registered { name, template });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the registrations.
    pub fn seal(self) -> MessageRegistry {
        let fallback = self.fallback.or_else(|| self.config.fallback().ok());

        let mut order: Vec<MessageId> = self.entries.keys().copied().collect();
        order.sort_unstable();

        tracing::debug!(messages = order.len(), "sealed message registry");

        MessageRegistry {
            config: self.config,
            fallback,
            entries: self.entries,
            order,
        }
    }
}

fn parse_template(id: MessageId, text: &str) -> Result<Template> {
    Template::parse(text).map_err(|e| CatalogError::InvalidTemplate {
        id,
        template: text.to_string(),
        reason: e.to_string(),
    })
}

/// A sealed, read-only mapping from [`MessageId`] to template.
#[derive(Debug, Clone)]
pub struct MessageRegistry {
    config: RegistryConfig,
    fallback: Option<Template>,
    entries: FxHashMap<MessageId, Registered>,
    order: Vec<MessageId>,
}

/// A registered message as seen through [`MessageRegistry::iter`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry<'a> {
    pub id: MessageId,
    pub name: Option<&'a str>,
    pub template: &'a Template,
}

impl Default for MessageRegistry {
    fn default() -> Self {
        RegistryBuilder::new().seal()
    }
}

impl MessageRegistry {
    /// Format the message for `id` with `args`.
    ///
    /// Never fails. An unregistered id yields the fallback text, which
    /// contains the id's decimal value. Argument-count mismatches render
    /// leniently: missing arguments leave their placeholder and extra
    /// arguments are ignored.
    pub fn format(&self, id: MessageId, args: &[&dyn fmt::Display]) -> String {
        self.render(id, args).0
    }

    /// Format the message for an untyped integer id.
    ///
    /// Integers that are not valid ids get the fallback text, like
    /// unregistered ones.
    pub fn format_raw(&self, raw: u32, args: &[&dyn fmt::Display]) -> String {
        match MessageId::from_raw(raw) {
            Ok(id) => self.format(id, args),
            Err(_) => {
                tracing::warn!(id = raw, "invalid message id");
                self.fallback_text(raw, args)
            }
        }
    }

    /// Same as [`MessageRegistry::format`], returning a structured [`Message`].
    pub fn message(&self, id: MessageId, args: &[&dyn fmt::Display]) -> Message {
        let (text, fallback) = self.render(id, args);
        let name = self.name_of(id).map(str::to_string);
        Message::new(id, name, text, fallback)
    }

    fn render(&self, id: MessageId, args: &[&dyn fmt::Display]) -> (String, bool) {
        let Some(entry) = self.entries.get(&id) else {
            tracing::warn!(
                id = id.raw(),
                category = id.category().name(),
                severity = id.severity().name(),
                "message not found"
            );
            return (self.fallback_text(id.raw(), args), true);
        };

        let rendered = entry.template.render(args);
        if !rendered.is_exact() && self.config.argument_mismatch == ArgumentMismatch::Warn {
            tracing::warn!(
                id = id.raw(),
                expected = entry.template.arity(),
                supplied = args.len(),
                missing = rendered.missing,
                unused = rendered.unused,
                "message argument count mismatch"
            );
        }
        (rendered.text, false)
    }

    fn fallback_text(&self, raw: u32, args: &[&dyn fmt::Display]) -> String {
        let mut text = match &self.fallback {
            Some(template) => template.render(&[&raw]).text,
            None => format!("message not found for id {}", raw),
        };
        if self.config.fallback_includes_arguments && !args.is_empty() {
            let joined: Vec<String> = args.iter().map(|a| a.to_string()).collect();
            text.push_str(" (arguments: ");
            text.push_str(&joined.join(", "));
            text.push(')');
        }
        text
    }

    /// The raw template for `id`, if registered.
    pub fn lookup_template(&self, id: MessageId) -> Option<&Template> {
        self.entries.get(&id).map(|e| &e.template)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Symbolic name recorded for `id`.
    pub fn name_of(&self, id: MessageId) -> Option<&str> {
        self.entries.get(&id).and_then(|e| e.name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = RegistryEntry<'_>> + '_ {
        self.order.iter().filter_map(move |id| {
            self.entries.get(id).map(|e| RegistryEntry {
                id: *id,
                name: e.name.as_deref(),
                template: &e.template,
            })
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

/// Check a whole table, reporting every duplicate id and malformed template.
///
/// [`RegistryBuilder::register_all`] stops at the first problem; this is the
/// variant for audits that want the full list.
pub fn check_entries(entries: &[CatalogEntry]) -> Vec<CatalogError> {
    let mut seen: FxHashMap<MessageId, &str> = FxHashMap::default();
    let mut findings = Vec::new();

    for entry in entries {
        if let Err(e) = parse_template(entry.id, &entry.template) {
            findings.push(e);
        }
        match seen.get(&entry.id) {
            Some(existing) => findings.push(CatalogError::DuplicateMessageId {
                id: entry.id,
                existing: (*existing).to_string(),
            }),
            None => {
                seen.insert(entry.id, &entry.template);
            }
        }
    }

    findings
}

static INSTALLED: OnceCell<MessageRegistry> = OnceCell::new();

/// Make `registry` the process-wide registry.
///
/// # Errors
///
/// Returns [`CatalogError::AlreadyInstalled`] on every call after the first.
pub fn install(registry: MessageRegistry) -> Result<&'static MessageRegistry> {
    INSTALLED
        .set(registry)
        .map_err(|_| CatalogError::AlreadyInstalled)?;
    INSTALLED.get().ok_or(CatalogError::AlreadyInstalled)
}

/// The process-wide registry, once installed.
pub fn installed() -> Option<&'static MessageRegistry> {
    INSTALLED.get()
}

/// Format through the process-wide registry.
///
/// Before a registry is installed every id gets the default fallback text.
pub fn format(id: MessageId, args: &[&dyn fmt::Display]) -> String {
    match installed() {
        Some(registry) => registry.format(id, args),
        None => {
            static EMPTY: OnceCell<MessageRegistry> = OnceCell::new();
            EMPTY.get_or_init(MessageRegistry::default).format(id, args)
        }
    }
}
