//! Message property keys.
//!
//! Catalog entries are authored under keys of the form
//! `[CATEGORY]_[SEVERITY]_[DESCRIPTION]_[ORDINAL]`, for example
//! `TOOLS_SEVERE_ERR_ENCPW_CANNOT_ENCODE_30`. The key carries everything
//! needed to compute the entry's [`MessageId`]; the DESCRIPTION part becomes
//! the entry's symbolic name.

use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};
use crate::id::{Category, MAX_ORDINAL, MessageId, Severity};

/// A parsed property key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    category: Category,
    severity: Severity,
    description: String,
    ordinal: u32,
}

impl MessageKey {
    /// Parse a property key.
    ///
    /// Category and severity names may themselves contain underscores
    /// (`ACCESS_CONTROL`, `MILD_WARN`); the longest matching name wins.
    ///
    /// ```
    /// use message_catalog::{Category, MessageKey, Severity};
    ///
    /// let key = MessageKey::parse("ACCESS_CONTROL_MILD_WARN_ACI_SYNTAX_12").unwrap();
    /// assert_eq!(key.category(), Category::AccessControl);
    /// assert_eq!(key.severity(), Severity::MildWarning);
    /// assert_eq!(key.description(), "ACI_SYNTAX");
    /// assert_eq!(key.ordinal(), 12);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidKey`] describing which part is wrong.
    pub fn parse(key: &str) -> Result<MessageKey> {
        let invalid = |reason: &str| CatalogError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let (rest, ordinal_text) = key
            .rsplit_once('_')
            .ok_or_else(|| invalid("missing ordinal suffix"))?;
        if ordinal_text.is_empty() || !ordinal_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("missing ordinal suffix"));
        }
        let ordinal: u32 = ordinal_text
            .parse()
            .map_err(|_| invalid("ordinal is out of range"))?;
        if ordinal > MAX_ORDINAL {
            return Err(invalid("ordinal is out of range"));
        }

        let (category, rest) = longest_prefix(rest, Category::ALL.iter().map(|c| (*c, c.name())))
            .ok_or_else(|| invalid("unknown category"))?;
        let (severity, description) =
            longest_prefix(rest, Severity::ALL.iter().map(|s| (*s, s.key_form())))
                .ok_or_else(|| invalid("unknown severity"))?;

        if description.is_empty() {
            return Err(invalid("empty description"));
        }
        if !description
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
            || description.starts_with('_')
            || description.ends_with('_')
        {
            return Err(invalid(
                "description must be upper-case letters, digits and underscores",
            ));
        }

        Ok(MessageKey {
            category,
            severity,
            description: description.to_string(),
            ordinal,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// The id this key encodes.
    pub fn id(&self) -> MessageId {
        // parse() already checked the ordinal range
        MessageId::new(self.category, self.severity, self.ordinal as u16)
    }
}

/// Find the longest `name` such that `text` starts with `name_`, returning
/// the tag and the remainder after the underscore.
fn longest_prefix<'a, T: Copy>(
    text: &'a str,
    candidates: impl Iterator<Item = (T, &'static str)>,
) -> Option<(T, &'a str)> {
    candidates
        .filter_map(|(tag, name)| {
            text.strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| (tag, name.len(), rest))
        })
        .max_by_key(|(_, len, _)| *len)
        .map(|(tag, _, rest)| (tag, rest))
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.category.name(),
            self.severity.key_form(),
            self.description,
            self.ordinal
        )
    }
}

impl FromStr for MessageKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        MessageKey::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(key: &str) -> String {
        match MessageKey::parse(key) {
            Err(CatalogError::InvalidKey { reason, .. }) => reason,
            other => panic!("expected InvalidKey for {key}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tools_key() {
        let key = MessageKey::parse("TOOLS_SEVERE_ERR_ENCPW_CANNOT_ENCODE_30").unwrap();
        assert_eq!(key.category(), Category::Tools);
        assert_eq!(key.severity(), Severity::SevereError);
        assert_eq!(key.description(), "ENCPW_CANNOT_ENCODE");
        assert_eq!(key.ordinal(), 30);
        assert_eq!(
            key.id(),
            MessageId::new(Category::Tools, Severity::SevereError, 30)
        );
    }

    #[test]
    fn test_longest_category_wins() {
        // ADMIN is a prefix of ADMIN_TOOL
        let key = MessageKey::parse("ADMIN_TOOL_INFO_UNINSTALL_DONE_4").unwrap();
        assert_eq!(key.category(), Category::AdminTool);
        assert_eq!(key.description(), "UNINSTALL_DONE");

        let key = MessageKey::parse("ADMIN_INFO_TOOL_STARTED_5").unwrap();
        assert_eq!(key.category(), Category::Admin);
        assert_eq!(key.description(), "TOOL_STARTED");
    }

    #[test]
    fn test_display_round_trips_text() {
        let text = "UTIL_MILD_ERR_LDIF_INVALID_LEADING_SPACE_5";
        assert_eq!(MessageKey::parse(text).unwrap().to_string(), text);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(reason("TOOLS_SEVERE_ERR_ENCPW"), "missing ordinal suffix");
        assert_eq!(reason("TOOLS_SEVERE_ERR_ENCPW_"), "missing ordinal suffix");
        assert_eq!(reason("TOOLS_SEVERE_ERR_ENCPW_70000"), "ordinal is out of range");
        assert_eq!(reason("NETWORK_SEVERE_ERR_DOWN_1"), "unknown category");
        assert_eq!(reason("TOOLS_CRITICAL_DOWN_1"), "unknown severity");
        assert_eq!(reason("TOOLS_SEVERE_ERR_1"), "unknown severity");
        assert!(reason("TOOLS_NOTICE_lower_case_2").starts_with("description"));
    }

    #[test]
    fn test_from_str() {
        let key: MessageKey = "PLUGIN_NOTICE_STARTED_9".parse().unwrap();
        assert_eq!(key.severity(), Severity::Notice);
    }
}
