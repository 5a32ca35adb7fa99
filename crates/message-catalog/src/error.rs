//! Error types for catalog construction.
//!
//! Everything here is a start-up or authoring defect. Looking up and
//! formatting a message never fails; see [`crate::MessageRegistry::format`].

use thiserror::Error;

use crate::id::MessageId;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while building, loading or configuring a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The ordinal does not fit in the bits reserved for it.
    #[error("Ordinal {ordinal} is out of range (max: {max})")]
    InvalidOrdinal { ordinal: u32, max: u32 },

    /// A raw integer whose category or severity bits match no known tag.
    #[error("Value {raw} ({raw:#010x}) is not a valid message id")]
    InvalidMessageId { raw: u32 },

    /// A second registration for an id that already has a template.
    #[error("Message id {id} is already registered with template {existing:?}")]
    DuplicateMessageId {
        id: MessageId,
        /// Template text of the earlier registration
        existing: String,
    },

    /// The template contains a format specifier that cannot be rendered.
    #[error("Invalid template for message id {id}: {reason} in {template:?}")]
    InvalidTemplate {
        id: MessageId,
        template: String,
        reason: String,
    },

    /// A property key that does not follow `CATEGORY_SEVERITY_DESCRIPTION_ORDINAL`.
    #[error("Invalid message key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Unknown message category: {0}")]
    UnknownCategory(String),

    #[error("Unknown message severity: {0}")]
    UnknownSeverity(String),

    /// The embedded catalog could not be read.
    #[error("Invalid catalog data: {0}")]
    CatalogData(String),

    #[error("Invalid registry configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not read configuration file {path}: {message}")]
    ConfigIo { path: String, message: String },

    /// A registry was already installed for this process.
    #[error("A message registry is already installed for this process")]
    AlreadyInstalled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{Category, Severity};

    #[test]
    fn test_duplicate_display_names_id_and_template() {
        let err = CatalogError::DuplicateMessageId {
            id: MessageId::new(Category::Tools, Severity::SevereError, 30),
            existing: "first".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("10747934"), "Got: {}", display);
        assert!(display.contains("\"first\""), "Got: {}", display);
    }

    #[test]
    fn test_invalid_message_id_display_shows_hex() {
        let err = CatalogError::InvalidMessageId { raw: 0x0008_0001 };
        assert_eq!(
            err.to_string(),
            "Value 524289 (0x00080001) is not a valid message id"
        );
    }
}
