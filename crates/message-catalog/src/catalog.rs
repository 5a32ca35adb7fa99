//! The embedded message catalog.
//!
//! The catalog lives in `message_catalog.json` and is embedded at compile
//! time with `include_str!()`, so there is no runtime file I/O. Each record
//! pairs a property key with its template:
//!
//! ```json
//! { "key": "TOOLS_SEVERE_ERR_ENCPW_CANNOT_ENCODE_30",
//!   "template": "An error occurred while attempting to encode the clear-text password:  %s" }
//! ```
//!
//! Ids that code refers to are exported as constants from [`ids`].

use serde::Deserialize;

use crate::config::RegistryConfig;
use crate::error::{CatalogError, Result};
use crate::registry::{CatalogEntry, MessageRegistry, RegistryBuilder};

const CATALOG_JSON: &str = include_str!("../message_catalog.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    key: String,
    template: String,
}

/// Every entry of the embedded catalog, in file order.
///
/// # Errors
///
/// Returns [`CatalogError::CatalogData`] if the JSON is malformed and
/// [`CatalogError::InvalidKey`] for a record whose key does not parse.
pub fn entries() -> Result<Vec<CatalogEntry>> {
    let raw: Vec<RawEntry> =
        serde_json::from_str(CATALOG_JSON).map_err(|e| CatalogError::CatalogData(e.to_string()))?;
    raw.into_iter()
        .map(|r| CatalogEntry::from_key(&r.key, r.template))
        .collect()
}

/// Build and seal a registry holding the whole embedded catalog.
///
/// # Errors
///
/// Any error from [`entries`] or from registration (duplicate id,
/// malformed template).
///
/// # Example
///
/// ```
/// use message_catalog::catalog::{self, ids};
///
/// let registry = catalog::default_registry().unwrap();
/// assert_eq!(
///     registry.format(ids::ENCPW_CANNOT_ENCODE, &[&"IOException: disk full"]),
///     "An error occurred while attempting to encode the clear-text password:  IOException: disk full"
/// );
/// ```
pub fn default_registry() -> Result<MessageRegistry> {
    default_registry_with(RegistryConfig::default())
}

/// Same as [`default_registry`] with an explicit configuration.
///
/// # Errors
///
/// As [`default_registry`], plus [`CatalogError::InvalidConfig`].
pub fn default_registry_with(config: RegistryConfig) -> Result<MessageRegistry> {
    let mut builder = RegistryBuilder::with_config(config)?;
    builder.register_all(entries()?)?;
    Ok(builder.seal())
}

/// Ids referenced from code.
pub mod ids {
    use crate::id::{Category, MessageId, Severity};

    pub const ACI_SYNTAX_GENERAL_PARSE_FAILED: MessageId =
        MessageId::new(Category::AccessControl, Severity::SevereWarning, 1);

    pub const CONFIG_LOAD_CLASS_FAILED: MessageId =
        MessageId::new(Category::Config, Severity::SevereError, 2);

    pub const PLUGIN_NULL_CONFIG_ENTRY: MessageId =
        MessageId::new(Category::Plugin, Severity::SevereError, 1);
    pub const STARTUP_PLUGIN_EXCEPTION: MessageId =
        MessageId::new(Category::Plugin, Severity::FatalError, 30);

    pub const BASE64_DECODE_INVALID_LENGTH: MessageId =
        MessageId::new(Category::Util, Severity::MildError, 1);

    pub const ENCPW_NO_CLEAR_PW: MessageId =
        MessageId::new(Category::Tools, Severity::SevereError, 27);
    pub const ENCPW_CANNOT_ENCODE: MessageId =
        MessageId::new(Category::Tools, Severity::SevereError, 30);
    pub const ENCPW_PASSWORDS_MATCH: MessageId =
        MessageId::new(Category::Tools, Severity::Informational, 31);
}
