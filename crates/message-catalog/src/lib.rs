//! Structured message identifiers and a format-string registry.
//!
//! Every user-visible message in the directory server tools is named by a
//! [`MessageId`]: one `u32` packing the originating subsystem
//! ([`Category`]), the importance ([`Severity`]) and an ordinal. Ids map to
//! printf-style [`Template`]s held in a [`MessageRegistry`].
//!
//! # Architecture
//!
//! - [`id`]: the identifier codec
//! - [`template`]: template parsing and lenient rendering
//! - [`key`]: `CATEGORY_SEVERITY_DESCRIPTION_ORDINAL` property keys
//! - [`registry`]: build once, seal, then look up from any thread
//! - [`catalog`]: the embedded catalog and the ids code refers to
//! - [`log_reference`]: DocBook and text reference generation
//! - [`config`]: fallback and mismatch behaviour, loaded from TOML
//!
//! # Example
//!
//! ```
//! use message_catalog::catalog::{self, ids};
//!
//! let registry = catalog::default_registry().unwrap();
//! let msg = registry.message(ids::ENCPW_CANNOT_ENCODE, &[&"IOException: disk full"]);
//!
//! assert!(msg.severity.is_error());
//! assert_eq!(
//!     msg.to_text(),
//!     "[SEVERE_ERROR] TOOLS-30: An error occurred while attempting to encode the \
//!      clear-text password:  IOException: disk full"
//! );
//! ```
//!
//! Looking up an id that was never registered is not an error: the registry
//! returns fallback text naming the id and logs a warning, so reporting a
//! problem never hides the problem itself.

pub mod catalog;
pub mod config;
pub mod error;
pub mod id;
pub mod key;
pub mod log_reference;
pub mod message;
pub mod registry;
pub mod template;

// Macros for formatting through a registry
pub mod macros;

// Re-export main types for convenience
pub use config::{ArgumentMismatch, RegistryConfig};
pub use error::{CatalogError, Result};
pub use id::{Category, MAX_ORDINAL, MessageId, Severity};
pub use key::MessageKey;
pub use log_reference::{LogReference, SeverityFilter};
pub use message::Message;
pub use registry::{
    CatalogEntry, MessageRegistry, RegistryBuilder, RegistryEntry, check_entries, install,
    installed,
};
pub use template::{MAX_FIELD_WIDTH, Rendered, Template, TemplateError};
