//! Pattern compiler and renderer for log records
//!
//! A pattern is a run of literal text and `%` directives, compiled once into
//! an ordered list of [`FormatItem`]s and then applied to every record.
//!
//! | Directive   | Renders                                       |
//! |-------------|-----------------------------------------------|
//! | `%d{fmt}`   | creation time through the strftime `fmt`      |
//! | `%T`        | a tab                                         |
//! | `%t`        | thread id                                     |
//! | `%p`        | level name                                    |
//! | `%c`        | logger name                                   |
//! | `%f`        | source file                                   |
//! | `%l`        | source line                                   |
//! | `%m`        | payload                                       |
//! | `%n`        | newline                                       |
//! | `%%`        | a literal `%`                                 |
//!
//! Any directive may carry a `{...}` payload; only `%d` uses it, and a bare
//! `%d` renders as `%H:%M:%S`.

use super::error::{LoggerError, Result};
use super::log_message::LogMessage;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;
use std::str::FromStr;

/// Pattern used when a logger is built without one
pub const DEFAULT_PATTERN: &str = "%d{%H:%M:%S}%T%t%T[%p]%T[%c]%T%f:%l%T%m%n";

/// Timestamp layout for a `%d` without payload
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// One compiled formatting step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatItem {
    Literal(String),
    Timestamp(String),
    Tab,
    ThreadId,
    Level,
    LoggerName,
    File,
    Line,
    Payload,
    Newline,
}

impl FormatItem {
    fn from_directive(
        key: char,
        payload: Option<String>,
        pattern: &str,
        position: usize,
    ) -> Result<Self> {
        let item = match key {
            'd' => {
                let time_format = payload.unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string());
                if StrftimeItems::new(&time_format).any(|item| matches!(item, Item::Error)) {
                    return Err(LoggerError::pattern(
                        pattern,
                        position,
                        format!("invalid time format '{}'", time_format),
                    ));
                }
                FormatItem::Timestamp(time_format)
            }
            'T' => FormatItem::Tab,
            't' => FormatItem::ThreadId,
            'p' => FormatItem::Level,
            'c' => FormatItem::LoggerName,
            'f' => FormatItem::File,
            'l' => FormatItem::Line,
            'm' => FormatItem::Payload,
            'n' => FormatItem::Newline,
            other => {
                return Err(LoggerError::pattern(
                    pattern,
                    position,
                    format!("unknown directive '{}'", other),
                ))
            }
        };
        Ok(item)
    }

    fn render(&self, msg: &LogMessage<'_>, out: &mut String) {
        match self {
            FormatItem::Literal(text) => out.push_str(text),
            FormatItem::Timestamp(time_format) => {
                // Formats were validated at compile time
                let _ = write!(out, "{}", msg.timestamp.format(time_format));
            }
            FormatItem::Tab => out.push('\t'),
            FormatItem::ThreadId => out.push_str(&msg.thread_id),
            FormatItem::Level => out.push_str(msg.level.to_str()),
            FormatItem::LoggerName => out.push_str(msg.logger_name),
            FormatItem::File => out.push_str(msg.file),
            FormatItem::Line => {
                let _ = write!(out, "{}", msg.line);
            }
            FormatItem::Payload => out.push_str(&msg.payload),
            FormatItem::Newline => out.push('\n'),
        }
    }
}

/// A compiled pattern, immutable and shareable across threads
///
/// # Example
///
/// ```
/// use logsys::{Formatter, LogLevel, LogMessage};
///
/// let formatter = Formatter::new("[%p] %c: %m%n").unwrap();
/// let msg = LogMessage::new(LogLevel::Error, "main.rs", 7, "app", "boom".to_string());
/// assert_eq!(formatter.format(&msg), "[ERROR] app: boom\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    pattern: String,
    items: Vec<FormatItem>,
}

impl Formatter {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidPattern`] for a trailing `%`, an
    /// unterminated `{`, an unknown directive, or an invalid `%d` time format.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut items = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let Some((key_pos, key)) = chars.next() else {
                return Err(LoggerError::pattern(
                    pattern,
                    pos,
                    "'%' at end of pattern has no directive",
                ));
            };

            if key == '%' {
                literal.push('%');
                continue;
            }

            let mut payload = None;
            if let Some(&(brace_pos, '{')) = chars.peek() {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, ch)) => text.push(ch),
                        None => {
                            return Err(LoggerError::pattern(
                                pattern,
                                brace_pos,
                                "unterminated '{'",
                            ))
                        }
                    }
                }
                payload = Some(text);
            }

            if !literal.is_empty() {
                items.push(FormatItem::Literal(std::mem::take(&mut literal)));
            }
            items.push(FormatItem::from_directive(key, payload, pattern, key_pos)?);
        }

        if !literal.is_empty() {
            items.push(FormatItem::Literal(literal));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            items,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }

    /// Render `msg` by appending to `out`.
    pub fn format_into(&self, msg: &LogMessage<'_>, out: &mut String) {
        for item in &self.items {
            item.render(msg, out);
        }
    }

    pub fn format(&self, msg: &LogMessage<'_>) -> String {
        let mut out = String::with_capacity(self.pattern.len() + msg.payload.len() + 32);
        self.format_into(msg, &mut out);
        out
    }
}

impl FromStr for Formatter {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Formatter::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use chrono::{Local, TimeZone};

    fn message(level: LogLevel, payload: &str) -> LogMessage<'static> {
        let timestamp = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("valid datetime");
        LogMessage::new(level, "src/main.rs", 42, "net", payload.to_string())
            .with_timestamp(timestamp)
    }

    #[test]
    fn test_every_directive() {
        let formatter = Formatter::new("%d{%Y-%m-%d %H:%M:%S}%T%p%T%c%T%f:%l%T%m%n").unwrap();
        let msg = message(LogLevel::Warning, "disk almost full");
        assert_eq!(
            formatter.format(&msg),
            "2024-03-09 14:05:07\tWARNING\tnet\tsrc/main.rs:42\tdisk almost full\n"
        );
    }

    #[test]
    fn test_thread_directive() {
        let formatter = Formatter::new("%t").unwrap();
        let msg = message(LogLevel::Info, "");
        assert_eq!(formatter.format(&msg), msg.thread_id);
    }

    #[test]
    fn test_time_level_payload_pattern() {
        let formatter = Formatter::new("%d{%H:%M:%S} [%p] %m%n").unwrap();
        let out = formatter.format(&message(LogLevel::Error, "boom"));
        assert_eq!(out, "14:05:07 [ERROR] boom\n");
    }

    #[test]
    fn test_bare_time_directive_uses_default_layout() {
        let formatter = Formatter::new("%d").unwrap();
        assert_eq!(formatter.format(&message(LogLevel::Info, "")), "14:05:07");
    }

    #[test]
    fn test_escaped_percent_and_literals() {
        let formatter = Formatter::new("100%% {done} %m").unwrap();
        assert_eq!(formatter.format(&message(LogLevel::Info, "ok")), "100% {done} ok");
        assert_eq!(
            formatter.items(),
            &[
                FormatItem::Literal("100% {done} ".to_string()),
                FormatItem::Payload
            ]
        );
    }

    #[test]
    fn test_payload_ignored_for_other_directives() {
        let formatter = Formatter::new("%m{unused}!").unwrap();
        assert_eq!(formatter.format(&message(LogLevel::Info, "hi")), "hi!");
    }

    #[test]
    fn test_default_pattern_compiles() {
        let formatter = Formatter::new(DEFAULT_PATTERN).unwrap();
        let out = formatter.format(&message(LogLevel::Info, "started"));
        assert!(out.starts_with("14:05:07\t"));
        assert!(out.ends_with("\t[INFO]\t[net]\tsrc/main.rs:42\tstarted\n"));
    }

    #[test]
    fn test_unknown_directive_fails() {
        let err = Formatter::new("%q").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPattern { position: 1, .. }));
    }

    #[test]
    fn test_unterminated_payload_fails() {
        let err = Formatter::new("%d{abc").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPattern { position: 2, .. }));
    }

    #[test]
    fn test_trailing_percent_fails() {
        assert!(Formatter::new("%m%").is_err());
    }

    #[test]
    fn test_invalid_time_format_fails() {
        assert!(Formatter::new("%d{%H:%}").is_err());
    }

    #[test]
    fn test_from_str() {
        let formatter: Formatter = "%m".parse().unwrap();
        assert_eq!(formatter.pattern(), "%m");
    }
}
