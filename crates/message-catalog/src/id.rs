//! Message identifiers.
//!
//! A [`MessageId`] packs three independent values into one `u32`:
//!
//! ```text
//!  31                 20 19   16 15                 0
//! +---------------------+-------+--------------------+
//! |      category       | sever.|      ordinal       |
//! +---------------------+-------+--------------------+
//! ```
//!
//! The same integer serves as registry key, log-routing key (severity) and
//! subsystem-routing key (category). Sorting ids by their raw value groups
//! them by category first and severity second.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Bits holding the category mask.
pub const CATEGORY_MASK_BITS: u32 = 0xFFF0_0000;

/// Bits holding the severity mask.
pub const SEVERITY_MASK_BITS: u32 = 0x000F_0000;

/// Bits holding the ordinal.
pub const ORDINAL_MASK_BITS: u32 = 0x0000_FFFF;

/// Largest ordinal that fits in [`ORDINAL_MASK_BITS`].
pub const MAX_ORDINAL: u32 = ORDINAL_MASK_BITS;

/// The subsystem a message originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Core,
    Extensions,
    Protocol,
    Config,
    Log,
    Util,
    Schema,
    Plugin,
    Jeb,
    Backend,
    Tools,
    Task,
    AccessControl,
    Admin,
    Sync,
    Version,
    Quicksetup,
    AdminTool,
    Dsconfig,
    RuntimeInformation,
    UserDefined,
    ThirdParty,
}

impl Category {
    /// Every category, in mask order.
    pub const ALL: [Category; 22] = [
        Category::Core,
        Category::Extensions,
        Category::Protocol,
        Category::Config,
        Category::Log,
        Category::Util,
        Category::Schema,
        Category::Plugin,
        Category::Jeb,
        Category::Backend,
        Category::Tools,
        Category::Task,
        Category::AccessControl,
        Category::Admin,
        Category::Sync,
        Category::Version,
        Category::Quicksetup,
        Category::AdminTool,
        Category::Dsconfig,
        Category::RuntimeInformation,
        Category::UserDefined,
        Category::ThirdParty,
    ];

    /// The mask this category contributes to a [`MessageId`].
    pub const fn mask(self) -> u32 {
        match self {
            Category::Core => 0x0000_0000,
            Category::Extensions => 0x0010_0000,
            Category::Protocol => 0x0020_0000,
            Category::Config => 0x0030_0000,
            Category::Log => 0x0040_0000,
            Category::Util => 0x0050_0000,
            Category::Schema => 0x0060_0000,
            Category::Plugin => 0x0070_0000,
            Category::Jeb => 0x0080_0000,
            Category::Backend => 0x0090_0000,
            Category::Tools => 0x00A0_0000,
            Category::Task => 0x00B0_0000,
            Category::AccessControl => 0x00C0_0000,
            Category::Admin => 0x00D0_0000,
            Category::Sync => 0x00E0_0000,
            Category::Version => 0x00F0_0000,
            Category::Quicksetup => 0x0100_0000,
            Category::AdminTool => 0x0110_0000,
            Category::Dsconfig => 0x0120_0000,
            Category::RuntimeInformation => 0x0130_0000,
            Category::UserDefined => 0x7FF0_0000,
            Category::ThirdParty => 0x8000_0000,
        }
    }

    /// Recover a category from the category bits of an id.
    ///
    /// Bits outside [`CATEGORY_MASK_BITS`] are ignored.
    pub fn from_mask(bits: u32) -> Option<Category> {
        let bits = bits & CATEGORY_MASK_BITS;
        Category::ALL.into_iter().find(|c| c.mask() == bits)
    }

    /// Canonical upper-case name, as used in property keys.
    pub const fn name(self) -> &'static str {
        match self {
            Category::Core => "CORE",
            Category::Extensions => "EXTENSIONS",
            Category::Protocol => "PROTOCOL",
            Category::Config => "CONFIG",
            Category::Log => "LOG",
            Category::Util => "UTIL",
            Category::Schema => "SCHEMA",
            Category::Plugin => "PLUGIN",
            Category::Jeb => "JEB",
            Category::Backend => "BACKEND",
            Category::Tools => "TOOLS",
            Category::Task => "TASK",
            Category::AccessControl => "ACCESS_CONTROL",
            Category::Admin => "ADMIN",
            Category::Sync => "SYNC",
            Category::Version => "VERSION",
            Category::Quicksetup => "QUICKSETUP",
            Category::AdminTool => "ADMIN_TOOL",
            Category::Dsconfig => "DSCONFIG",
            Category::RuntimeInformation => "RUNTIME_INFORMATION",
            Category::UserDefined => "USER_DEFINED",
            Category::ThirdParty => "THIRD_PARTY",
        }
    }

    /// What the messages in this category are about.
    pub const fn description(self) -> &'static str {
        match self {
            Category::Core => "the core server.",
            Category::Extensions => {
                "server extensions (for example, extended operations, SASL mechanisms, \
                 password storage schemes, password validators, and so on)."
            }
            Category::Protocol => "connection and protocol handling (for example, ASN.1 and LDAP).",
            Category::Config => "configuration handling.",
            Category::Log => "the server loggers.",
            Category::Util => "the general server utilities.",
            Category::Schema => "the server schema elements.",
            Category::Plugin => "plugin processing.",
            Category::Jeb => "the JE backend.",
            Category::Backend => "generic backends.",
            Category::Tools => "tools.",
            Category::Task => "tasks.",
            Category::AccessControl => "access control.",
            Category::Admin => "the administration framework.",
            Category::Sync => "replication.",
            Category::Version => "version information.",
            Category::Quicksetup => "quicksetup tools.",
            Category::AdminTool => "tools like the offline installer and uninstaller.",
            Category::Dsconfig => "the dsconfig administration tool.",
            Category::RuntimeInformation => "the runtime information.",
            Category::UserDefined => "user-defined modules.",
            Category::ThirdParty => "third-party (including user-defined) modules.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

/// How important or urgent a message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Informational,
    MildWarning,
    SevereWarning,
    MildError,
    SevereError,
    FatalError,
    Debug,
    Notice,
}

impl Severity {
    /// Every severity, in mask order.
    pub const ALL: [Severity; 8] = [
        Severity::Informational,
        Severity::MildWarning,
        Severity::SevereWarning,
        Severity::MildError,
        Severity::SevereError,
        Severity::FatalError,
        Severity::Debug,
        Severity::Notice,
    ];

    /// The mask this severity contributes to a [`MessageId`].
    pub const fn mask(self) -> u32 {
        match self {
            Severity::Informational => 0x0000_0000,
            Severity::MildWarning => 0x0001_0000,
            Severity::SevereWarning => 0x0002_0000,
            Severity::MildError => 0x0003_0000,
            Severity::SevereError => 0x0004_0000,
            Severity::FatalError => 0x0005_0000,
            Severity::Debug => 0x0006_0000,
            Severity::Notice => 0x0007_0000,
        }
    }

    /// Recover a severity from the severity bits of an id.
    ///
    /// Bits outside [`SEVERITY_MASK_BITS`] are ignored.
    pub fn from_mask(bits: u32) -> Option<Severity> {
        let bits = bits & SEVERITY_MASK_BITS;
        Severity::ALL.into_iter().find(|s| s.mask() == bits)
    }

    /// Full upper-case name, e.g. `SEVERE_ERROR`.
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Informational => "INFORMATIONAL",
            Severity::MildWarning => "MILD_WARNING",
            Severity::SevereWarning => "SEVERE_WARNING",
            Severity::MildError => "MILD_ERROR",
            Severity::SevereError => "SEVERE_ERROR",
            Severity::FatalError => "FATAL_ERROR",
            Severity::Debug => "DEBUG",
            Severity::Notice => "NOTICE",
        }
    }

    /// Abbreviated form used inside property keys, e.g. `SEVERE_ERR`.
    pub const fn key_form(self) -> &'static str {
        match self {
            Severity::Informational => "INFO",
            Severity::MildWarning => "MILD_WARN",
            Severity::SevereWarning => "SEVERE_WARN",
            Severity::MildError => "MILD_ERR",
            Severity::SevereError => "SEVERE_ERR",
            Severity::FatalError => "FATAL_ERR",
            Severity::Debug => "DEBUG",
            Severity::Notice => "NOTICE",
        }
    }

    /// The tracing level messages of this severity are logged at.
    pub const fn level(self) -> tracing::Level {
        match self {
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Informational | Severity::Notice => tracing::Level::INFO,
            Severity::MildWarning | Severity::SevereWarning => tracing::Level::WARN,
            Severity::MildError | Severity::SevereError | Severity::FatalError => {
                tracing::Level::ERROR
            }
        }
    }

    /// True for the three error severities.
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Severity::MildError | Severity::SevereError | Severity::FatalError
        )
    }

    /// True for the two warning severities.
    pub const fn is_warning(self) -> bool {
        matches!(self, Severity::MildWarning | Severity::SevereWarning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = CatalogError;

    /// Accepts both the full name (`SEVERE_ERROR`) and the key form (`SEVERE_ERR`).
    fn from_str(s: &str) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.name().eq_ignore_ascii_case(s) || sev.key_form().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownSeverity(s.to_string()))
    }
}

/// A message identifier: category, severity and ordinal packed into one `u32`.
///
/// The field is private. Values come from [`MessageId::new`],
/// [`MessageId::encode`] or a validated [`MessageId::from_raw`], so every
/// `MessageId` decodes to a known category and severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u32);

impl MessageId {
    /// Build an id for a shared constant.
    ///
    /// The `u16` ordinal always fits the ordinal bits, so this cannot fail.
    ///
    /// ```
    /// use message_catalog::{Category, MessageId, Severity};
    ///
    /// const ENCPW_CANNOT_ENCODE: MessageId =
    ///     MessageId::new(Category::Tools, Severity::SevereError, 30);
    ///
    /// assert_eq!(ENCPW_CANNOT_ENCODE.ordinal(), 30);
    /// ```
    pub const fn new(category: Category, severity: Severity, ordinal: u16) -> Self {
        MessageId(category.mask() | severity.mask() | ordinal as u32)
    }

    /// Build an id from a wider ordinal, checking that it fits.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidOrdinal`] when `ordinal` exceeds
    /// [`MAX_ORDINAL`].
    pub fn encode(category: Category, severity: Severity, ordinal: u32) -> Result<Self> {
        if ordinal > MAX_ORDINAL {
            return Err(CatalogError::InvalidOrdinal {
                ordinal,
                max: MAX_ORDINAL,
            });
        }
        Ok(MessageId(category.mask() | severity.mask() | ordinal))
    }

    /// Accept an untyped integer, checking that its category and severity
    /// bits name known tags.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidMessageId`] otherwise.
    pub fn from_raw(raw: u32) -> Result<Self> {
        match (Category::from_mask(raw), Severity::from_mask(raw)) {
            (Some(_), Some(_)) => Ok(MessageId(raw)),
            _ => Err(CatalogError::InvalidMessageId { raw }),
        }
    }

    /// The packed integer value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The category bits, decoded.
    pub fn category(self) -> Category {
        // Construction guarantees the bits are a known mask.
        Category::from_mask(self.0).unwrap_or(Category::Core)
    }

    /// The severity bits, decoded.
    pub fn severity(self) -> Severity {
        Severity::from_mask(self.0).unwrap_or(Severity::Informational)
    }

    pub const fn ordinal(self) -> u32 {
        self.0 & ORDINAL_MASK_BITS
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MessageId> for u32 {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl TryFrom<u32> for MessageId {
    type Error = CatalogError;

    fn try_from(raw: u32) -> Result<Self> {
        MessageId::from_raw(raw)
    }
}

impl Serialize for MessageId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        MessageId::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_bitwise_or() {
        let id = MessageId::encode(Category::Tools, Severity::SevereError, 30).unwrap();
        assert_eq!(id.raw(), 0x00A0_0000 | 0x0004_0000 | 30);
        assert_eq!(id, MessageId::new(Category::Tools, Severity::SevereError, 30));
    }

    #[test]
    fn test_decode_components() {
        let id = MessageId::new(Category::AccessControl, Severity::MildWarning, 1234);
        assert_eq!(id.category(), Category::AccessControl);
        assert_eq!(id.severity(), Severity::MildWarning);
        assert_eq!(id.ordinal(), 1234);
    }

    #[test]
    fn test_high_bit_category_round_trips() {
        let id = MessageId::new(Category::ThirdParty, Severity::Notice, u16::MAX);
        assert_eq!(id.category(), Category::ThirdParty);
        assert_eq!(id.severity(), Severity::Notice);
        assert_eq!(id.ordinal(), MAX_ORDINAL);
    }

    #[test]
    fn test_ordinal_out_of_range() {
        let err = MessageId::encode(Category::Core, Severity::Notice, MAX_ORDINAL + 1).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidOrdinal { ordinal: 65536, max: 65535 }
        ));
    }

    #[test]
    fn test_from_raw_rejects_unknown_category() {
        // 0x0140_0000 lies between RUNTIME_INFORMATION and USER_DEFINED
        let err = MessageId::from_raw(0x0140_0000 | 5).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMessageId { raw } if raw == 0x0140_0005));
    }

    #[test]
    fn test_from_raw_rejects_unknown_severity() {
        assert!(MessageId::from_raw(0x0008_0001).is_err());
    }

    #[test]
    fn test_from_raw_accepts_encoded() {
        let id = MessageId::new(Category::Plugin, Severity::FatalError, 7);
        assert_eq!(MessageId::from_raw(id.raw()).unwrap(), id);
    }

    #[test]
    fn test_masks_fit_their_ranges() {
        for c in Category::ALL {
            assert_eq!(c.mask() & !CATEGORY_MASK_BITS, 0, "{c}");
        }
        for s in Severity::ALL {
            assert_eq!(s.mask() & !SEVERITY_MASK_BITS, 0, "{s}");
        }
        assert_eq!(CATEGORY_MASK_BITS & SEVERITY_MASK_BITS, 0);
        assert_eq!(SEVERITY_MASK_BITS & ORDINAL_MASK_BITS, 0);
        assert_eq!(CATEGORY_MASK_BITS & ORDINAL_MASK_BITS, 0);
        assert_eq!(
            CATEGORY_MASK_BITS | SEVERITY_MASK_BITS | ORDINAL_MASK_BITS,
            u32::MAX
        );
    }

    #[test]
    fn test_category_names_parse() {
        for c in Category::ALL {
            assert_eq!(c.name().parse::<Category>().unwrap(), c);
        }
        assert_eq!("access_control".parse::<Category>().unwrap(), Category::AccessControl);
        assert!("NETWORK".parse::<Category>().is_err());
    }

    #[test]
    fn test_severity_parses_both_forms() {
        assert_eq!("SEVERE_ERR".parse::<Severity>().unwrap(), Severity::SevereError);
        assert_eq!("SEVERE_ERROR".parse::<Severity>().unwrap(), Severity::SevereError);
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Informational);
        assert!("CRITICAL".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_routing() {
        assert_eq!(Severity::FatalError.level(), tracing::Level::ERROR);
        assert_eq!(Severity::MildWarning.level(), tracing::Level::WARN);
        assert_eq!(Severity::Notice.level(), tracing::Level::INFO);
        assert!(Severity::MildError.is_error());
        assert!(!Severity::SevereWarning.is_error());
        assert!(Severity::SevereWarning.is_warning());
    }

    #[test]
    fn test_ids_order_by_category_then_severity() {
        let a = MessageId::new(Category::Config, Severity::FatalError, 900);
        let b = MessageId::new(Category::Util, Severity::Informational, 1);
        let c = MessageId::new(Category::Util, Severity::MildError, 0);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_serde_uses_raw_integer() {
        let id = MessageId::new(Category::Tools, Severity::SevereError, 30);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.raw().to_string());
        let back: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<MessageId>("1310721").is_ok());
        assert!(serde_json::from_str::<MessageId>("524289").is_err());
    }
}
