//! Macros for formatting catalog messages.

/// Format a message with arguments of any `Display` type.
///
/// Expands to [`MessageRegistry::format`](crate::MessageRegistry::format)
/// with the argument slice built for you. With no registry argument it
/// formats through the process-wide registry.
///
/// # Example
///
/// ```
/// use message_catalog::{Category, MessageId, RegistryBuilder, Severity, format_message};
///
/// let id = MessageId::new(Category::Util, Severity::MildError, 5);
/// let mut builder = RegistryBuilder::new();
/// builder.register(id, "Unexpected space at line %d of %s").unwrap();
/// let registry = builder.seal();
///
/// let line = 12;
/// assert_eq!(
///     format_message!(registry, id, line, "changes.ldif"),
///     "Unexpected space at line 12 of changes.ldif"
/// );
/// ```
#[macro_export]
macro_rules! format_message {
    (@installed $id:expr $(, $arg:expr)* $(,)?) => {
        $crate::registry::format($id, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($registry:expr, $id:expr $(, $arg:expr)* $(,)?) => {
        $registry.format($id, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log a catalog message at its severity's level and return it.
///
/// ```
/// use message_catalog::{Category, MessageId, RegistryBuilder, Severity, log_message};
///
/// let id = MessageId::new(Category::Plugin, Severity::SevereWarning, 3);
/// let mut builder = RegistryBuilder::new();
/// builder.register(id, "Plugin %s did not respond").unwrap();
/// let registry = builder.seal();
///
/// let msg = log_message!(registry, id, "audit");
/// assert_eq!(msg.text, "Plugin audit did not respond");
/// ```
#[macro_export]
macro_rules! log_message {
    ($registry:expr, $id:expr $(, $arg:expr)* $(,)?) => {{
        let message = $registry.message($id, &[$(&$arg as &dyn ::std::fmt::Display),*]);
        message.log();
        message
    }};
}
