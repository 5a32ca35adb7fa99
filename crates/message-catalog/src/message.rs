//! Formatted messages.
//!
//! [`crate::MessageRegistry::message`] returns a [`Message`]: the rendered
//! text together with the id's decoded category and severity, so callers can
//! route it (log level, exit status) without decoding the id themselves.

use std::fmt;

use serde::Serialize;

use crate::id::{Category, MessageId, Severity};

/// A rendered catalog message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub category: Category,
    pub severity: Severity,

    /// Symbolic name of the catalog entry, when it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The interpolated text
    pub text: String,

    /// True when the id was not registered and `text` is the fallback
    pub fallback: bool,
}

impl Message {
    pub(crate) fn new(id: MessageId, name: Option<String>, text: String, fallback: bool) -> Self {
        Self {
            id,
            category: id.category(),
            severity: id.severity(),
            name,
            text,
            fallback,
        }
    }

    /// Render as a single line with severity and short code.
    ///
    /// Format: `[SEVERITY] CATEGORY-ORDINAL: text`
    ///
    /// # Example
    ///
    /// ```
    /// use message_catalog::{Category, MessageId, RegistryBuilder, Severity};
    ///
    /// let id = MessageId::new(Category::Tools, Severity::SevereError, 30);
    /// let mut builder = RegistryBuilder::new();
    /// builder.register(id, "cannot encode:  %s").unwrap();
    /// let registry = builder.seal();
    ///
    /// let msg = registry.message(id, &[&"disk full"]);
    /// assert_eq!(msg.to_text(), "[SEVERE_ERROR] TOOLS-30: cannot encode:  disk full");
    /// ```
    pub fn to_text(&self) -> String {
        format!(
            "[{}] {}-{}: {}",
            self.severity,
            self.category,
            self.id.ordinal(),
            self.text
        )
    }

    /// Convert to a JSON value for machine-readable output.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut obj = json!({
            "id": self.id.raw(),
            "category": self.category.name(),
            "severity": self.severity.name(),
            "ordinal": self.id.ordinal(),
            "text": self.text,
        });

        if let Some(name) = &self.name {
            obj["name"] = json!(name);
        }

        if self.fallback {
            obj["fallback"] = json!(true);
        }

        obj
    }

    /// Emit this message as a tracing event at its severity's level.
    pub fn log(&self) {
        let id = self.id.raw();
        let category = self.category.name();
        // tracing macros need the level at compile time
        let level = self.severity.level();
        if level == tracing::Level::ERROR {
            tracing::error!(id, category, "{}", self.text);
        } else if level == tracing::Level::WARN {
            tracing::warn!(id, category, "{}", self.text);
        } else if level == tracing::Level::INFO {
            tracing::info!(id, category, "{}", self.text);
        } else {
            tracing::debug!(id, category, "{}", self.text);
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Message {
        Message::new(
            MessageId::new(Category::Plugin, Severity::MildWarning, 8),
            Some("PROFILER_CANNOT_DETERMINE_PROFILE_DIR".to_string()),
            "profile directory unavailable".to_string(),
            false,
        )
    }

    #[test]
    fn test_decodes_routing_fields() {
        let msg = sample();
        assert_eq!(msg.category, Category::Plugin);
        assert_eq!(msg.severity, Severity::MildWarning);
        assert_eq!(msg.to_string(), "profile directory unavailable");
    }

    #[test]
    fn test_to_text() {
        assert_eq!(
            sample().to_text(),
            "[MILD_WARNING] PLUGIN-8: profile directory unavailable"
        );
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(json["id"], 0x0071_0008);
        assert_eq!(json["category"], "PLUGIN");
        assert_eq!(json["severity"], "MILD_WARNING");
        assert_eq!(json["ordinal"], 8);
        assert_eq!(json["name"], "PROFILER_CANNOT_DETERMINE_PROFILE_DIR");
        assert!(json.get("fallback").is_none());
    }

    #[test]
    fn test_fallback_flag_serialized() {
        let msg = Message::new(
            MessageId::new(Category::Core, Severity::Notice, 1),
            None,
            "message not found for id 458753".to_string(),
            true,
        );
        let json = msg.to_json();
        assert_eq!(json["fallback"], true);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_log_does_not_panic_without_subscriber() {
        sample().log();
    }
}
