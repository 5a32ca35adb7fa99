//! Format-string templates.
//!
//! Templates use printf-style placeholders, the same dialect the directory
//! server's message texts were written in:
//!
//! | Specifier | Meaning |
//! |-----------|---------|
//! | `%s` | argument text |
//! | `%S` | argument text, upper-cased |
//! | `%d` | integer argument |
//! | `%x` / `%X` / `%o` | integer argument in hex / upper hex / octal |
//! | `%2$s` | explicit (1-based) argument index |
//! | `%-10s`, `%05d`, `%.3s` | left-justify, zero-pad, width, precision |
//! | `%%` | a literal `%` |
//! | `%n` | a line break |
//!
//! A template is parsed once, when it is registered. Rendering is lenient:
//! a placeholder with no matching argument is left in the output as written,
//! and surplus arguments are ignored.

use std::fmt;

use thiserror::Error;

/// Largest width or precision a placeholder may request.
pub const MAX_FIELD_WIDTH: usize = 1024;

/// A syntax problem found while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at byte {offset}")]
pub struct TemplateError {
    /// Byte offset of the offending `%`
    pub offset: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Text,
    UpperText,
    Decimal,
    LowerHex,
    UpperHex,
    Octal,
}

impl Conversion {
    fn is_numeric(self) -> bool {
        !matches!(self, Conversion::Text | Conversion::UpperText)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    /// Zero-based argument position
    index: usize,
    conversion: Conversion,
    left_justify: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    /// The specifier as written, emitted when the argument is missing
    written: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed, immutable message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    arity: usize,
}

/// The outcome of [`Template::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholders left unfilled because too few arguments were supplied
    pub missing: usize,
    /// Supplied arguments that no placeholder referred to
    pub unused: usize,
}

impl Rendered {
    /// True when every placeholder was filled and every argument used.
    pub fn is_exact(&self) -> bool {
        self.missing == 0 && self.unused == 0
    }
}

impl Template {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for a dangling `%`, an unsupported
    /// conversion or flag, an argument index of zero, or a width or
    /// precision above [`MAX_FIELD_WIDTH`].
    pub fn parse(text: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut next_implicit = 0usize;
        let mut arity = 0usize;

        let bytes = text.as_bytes();
        let mut pos = 0usize;
        let mut literal_start = 0usize;

        while let Some(rel) = text[pos..].find('%') {
            let start = pos + rel;
            literal.push_str(&text[literal_start..start]);

            let mut cursor = start + 1;
            let err = |offset: usize, reason: String| TemplateError { offset, reason };

            // Explicit argument index: digits followed by '$'
            let mut explicit = None;
            let digits_end = scan_digits(bytes, cursor);
            if digits_end > cursor && bytes.get(digits_end) == Some(&b'$') {
                let n: usize = text[cursor..digits_end]
                    .parse()
                    .map_err(|_| err(start, "argument index too large".to_string()))?;
                if n == 0 {
                    return Err(err(start, "argument index must start at 1".to_string()));
                }
                explicit = Some(n - 1);
                cursor = digits_end + 1;
            }

            let mut left_justify = false;
            let mut zero_pad = false;
            while let Some(&flag) = bytes.get(cursor) {
                match flag {
                    b'-' => left_justify = true,
                    b'0' => zero_pad = true,
                    b'#' | b'+' | b' ' | b',' | b'(' | b'<' => {
                        return Err(err(start, format!("unsupported flag '{}'", flag as char)));
                    }
                    _ => break,
                }
                cursor += 1;
            }

            let width_end = scan_digits(bytes, cursor);
            let width = if width_end > cursor {
                let w: usize = text[cursor..width_end]
                    .parse()
                    .map_err(|_| err(start, "width too large".to_string()))?;
                if w > MAX_FIELD_WIDTH {
                    return Err(err(start, "width too large".to_string()));
                }
                cursor = width_end;
                Some(w)
            } else {
                None
            };

            let mut precision = None;
            if bytes.get(cursor) == Some(&b'.') {
                let precision_end = scan_digits(bytes, cursor + 1);
                if precision_end == cursor + 1 {
                    return Err(err(start, "precision requires digits".to_string()));
                }
                let p: usize = text[cursor + 1..precision_end]
                    .parse()
                    .map_err(|_| err(start, "precision too large".to_string()))?;
                if p > MAX_FIELD_WIDTH {
                    return Err(err(start, "precision too large".to_string()));
                }
                precision = Some(p);
                cursor = precision_end;
            }

            let Some(conv) = text[cursor..].chars().next() else {
                return Err(err(start, "dangling '%' at end of template".to_string()));
            };
            let end = cursor + conv.len_utf8();

            let conversion = match conv {
                '%' => {
                    literal.push('%');
                    pos = end;
                    literal_start = end;
                    continue;
                }
                'n' => {
                    literal.push('\n');
                    pos = end;
                    literal_start = end;
                    continue;
                }
                's' => Conversion::Text,
                'S' => Conversion::UpperText,
                'd' => Conversion::Decimal,
                'x' => Conversion::LowerHex,
                'X' => Conversion::UpperHex,
                'o' => Conversion::Octal,
                other => {
                    return Err(err(start, format!("unknown conversion '{}'", other)));
                }
            };

            let index = match explicit {
                Some(i) => i,
                None => {
                    next_implicit += 1;
                    next_implicit - 1
                }
            };
            arity = arity.max(index + 1);

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(Placeholder {
                index,
                conversion,
                left_justify,
                zero_pad,
                width,
                precision,
                written: text[start..end].to_string(),
            }));

            pos = end;
            literal_start = end;
        }

        literal.push_str(&text[literal_start..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            source: text.to_string(),
            segments,
            arity,
        })
    }

    /// The template text as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of argument positions the template refers to.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// True when every placeholder renders its argument in full: plain
    /// `%s` or `%d`, with no precision.
    pub fn renders_arguments_verbatim(&self) -> bool {
        self.segments.iter().all(|segment| match segment {
            Segment::Literal(_) => true,
            Segment::Placeholder(p) => {
                matches!(p.conversion, Conversion::Text | Conversion::Decimal)
                    && p.precision.is_none()
            }
        })
    }

    /// Substitute `args` into the template.
    ///
    /// Never fails: missing arguments leave their placeholder in place and
    /// extra arguments are ignored. The counts are reported in [`Rendered`].
    pub fn render(&self, args: &[&dyn fmt::Display]) -> Rendered {
        let mut text = String::with_capacity(self.source.len() + 16 * args.len());
        let mut missing = 0usize;
        let mut used = vec![false; args.len()];

        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => text.push_str(s),
                Segment::Placeholder(p) => match args.get(p.index) {
                    Some(arg) => {
                        used[p.index] = true;
                        text.push_str(&p.apply(&arg.to_string()));
                    }
                    None => {
                        missing += 1;
                        text.push_str(&p.written);
                    }
                },
            }
        }

        Rendered {
            text,
            missing,
            unused: used.iter().filter(|u| !**u).count(),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

impl Placeholder {
    fn apply(&self, value: &str) -> String {
        let converted = match self.conversion {
            Conversion::Text => truncate(value, self.precision).to_string(),
            Conversion::UpperText => truncate(value, self.precision).to_uppercase(),
            Conversion::Decimal => match value.trim().parse::<i128>() {
                Ok(n) => n.to_string(),
                Err(_) => value.to_string(),
            },
            Conversion::LowerHex => radix(value, |n| format!("{:x}", n)),
            Conversion::UpperHex => radix(value, |n| format!("{:X}", n)),
            Conversion::Octal => radix(value, |n| format!("{:o}", n)),
        };

        let Some(width) = self.width else {
            return converted;
        };
        let len = converted.chars().count();
        if len >= width {
            return converted;
        }
        let fill = width - len;

        if self.left_justify {
            format!("{}{}", converted, " ".repeat(fill))
        } else if self.zero_pad && self.conversion.is_numeric() {
            match converted.strip_prefix('-') {
                Some(digits) => format!("-{}{}", "0".repeat(fill), digits),
                None => format!("{}{}", "0".repeat(fill), converted),
            }
        } else {
            format!("{}{}", " ".repeat(fill), converted)
        }
    }
}

fn scan_digits(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    end
}

fn truncate(value: &str, precision: Option<usize>) -> &str {
    match precision {
        Some(p) => match value.char_indices().nth(p) {
            Some((byte, _)) => &value[..byte],
            None => value,
        },
        None => value,
    }
}

/// Non-negative integers are re-rendered in the requested radix; anything
/// else is passed through as text.
fn radix(value: &str, render: impl Fn(u128) -> String) -> String {
    match value.trim().parse::<u128>() {
        Ok(n) => render(n),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, args: &[&dyn fmt::Display]) -> Rendered {
        Template::parse(template).unwrap().render(args)
    }

    #[test]
    fn test_plain_text_has_no_placeholders() {
        let t = Template::parse("Displays this usage information.").unwrap();
        assert_eq!(t.arity(), 0);
        assert_eq!(t.render(&[]).text, "Displays this usage information.");
    }

    #[test]
    fn test_positional_substitution() {
        let r = render(
            "Unable to load class %s referenced in configuration entry %s",
            &[&"com.example.Foo", &"cn=config"],
        );
        assert_eq!(
            r.text,
            "Unable to load class com.example.Foo referenced in configuration entry cn=config"
        );
        assert!(r.is_exact());
    }

    #[test]
    fn test_mixed_string_and_integer() {
        let r = render(
            "Unable to parse line %d (\"%s\") from the LDIF source",
            &[&42, &" dn: x"],
        );
        assert_eq!(r.text, "Unable to parse line 42 (\" dn: x\") from the LDIF source");
    }

    #[test]
    fn test_missing_arguments_leave_placeholders() {
        let r = render("entry %s at line %d", &[&"cn=a"]);
        assert_eq!(r.text, "entry cn=a at line %d");
        assert_eq!(r.missing, 1);
        assert_eq!(r.unused, 0);
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let r = render("value %s", &[&"a", &"b", &3]);
        assert_eq!(r.text, "value a");
        assert_eq!(r.missing, 0);
        assert_eq!(r.unused, 2);
    }

    #[test]
    fn test_explicit_indices() {
        let t = Template::parse("%2$s then %1$s then %2$s").unwrap();
        assert_eq!(t.arity(), 2);
        assert_eq!(t.render(&[&"a", &"b"]).text, "b then a then b");
    }

    #[test]
    fn test_escapes() {
        let r = render("100%% done%nnext: %s", &[&"x"]);
        assert_eq!(r.text, "100% done\nnext: x");
    }

    #[test]
    fn test_width_precision_and_flags() {
        assert_eq!(render("[%5s]", &[&"ab"]).text, "[   ab]");
        assert_eq!(render("[%-5s]", &[&"ab"]).text, "[ab   ]");
        assert_eq!(render("[%.3s]", &[&"abcdef"]).text, "[abc]");
        assert_eq!(render("[%05d]", &[&-42]).text, "[-0042]");
        assert_eq!(render("[%S]", &[&"cn=config"]).text, "[CN=CONFIG]");
    }

    #[test]
    fn test_radix_conversions() {
        assert_eq!(render("%x %X %o", &[&255, &255, &8]).text, "ff FF 10");
        // Non-numeric values pass through unchanged
        assert_eq!(render("%d/%x", &[&"n/a", &"zz"]).text, "n/a/zz");
    }

    #[test]
    fn test_rejects_dangling_percent() {
        let err = Template::parse("disk is 100%").unwrap_err();
        assert_eq!(err.offset, 11);
        assert!(err.reason.contains("dangling"));
    }

    #[test]
    fn test_rejects_unknown_conversion() {
        let err = Template::parse("at %tH o'clock").unwrap_err();
        assert!(err.reason.contains("unknown conversion 't'"), "{}", err);
    }

    #[test]
    fn test_rejects_zero_index_and_bad_flags() {
        assert!(Template::parse("%0$s").is_err());
        assert!(Template::parse("%+d").is_err());
        assert!(Template::parse("%.s").is_err());
    }

    #[test]
    fn test_width_and_precision_are_capped() {
        assert!(Template::parse("[%1024s]").is_ok());
        assert!(Template::parse("[%.1024s]").is_ok());

        let err = Template::parse("value [%1025s]").unwrap_err();
        assert_eq!(err.offset, 7);
        assert!(err.reason.contains("width too large"), "{}", err);

        let err = Template::parse("value [%18446744073709551615s]").unwrap_err();
        assert!(err.reason.contains("width too large"), "{}", err);

        let err = Template::parse("%-1000000000000d").unwrap_err();
        assert!(err.reason.contains("width too large"), "{}", err);

        let err = Template::parse("%.99999999999999999999s").unwrap_err();
        assert!(err.reason.contains("precision too large"), "{}", err);
    }

    #[test]
    fn test_verbatim_arguments() {
        assert!(Template::parse("id %d").unwrap().renders_arguments_verbatim());
        assert!(Template::parse("id [%12s]").unwrap().renders_arguments_verbatim());
        assert!(!Template::parse("id %x").unwrap().renders_arguments_verbatim());
        assert!(!Template::parse("id %S").unwrap().renders_arguments_verbatim());
        assert!(!Template::parse("id %.2s").unwrap().renders_arguments_verbatim());
    }

    #[test]
    fn test_non_ascii_text_survives() {
        let r = render("« %s » / %.2s", &[&"données", &"éèê"]);
        assert_eq!(r.text, "« données » / éè");
    }
}
