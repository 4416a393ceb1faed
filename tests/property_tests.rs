//! Property-based tests for logsys using proptest

use logsys::core::buffer::{BUFFER_INCREMENT_SIZE, BUFFER_THRESHOLD_SIZE};
use logsys::prelude::*;
use logsys::{Buffer, FormatItem};
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
        Just(LogLevel::Off),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that LogLevel ordering follows severity
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;
        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
    }
}

// ============================================================================
// Buffer Tests
// ============================================================================

proptest! {
    /// Whatever goes in comes out in the same order, regardless of how the
    /// reads are chunked
    #[test]
    fn test_buffer_is_fifo(
        writes in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..32),
        read_chunk in 1usize..50,
        capacity in 1usize..128,
    ) {
        let mut buffer = Buffer::with_capacity(capacity);
        let mut expected = Vec::new();
        for chunk in &writes {
            buffer.write(chunk);
            expected.extend_from_slice(chunk);
        }
        prop_assert_eq!(buffer.readable_size(), expected.len());

        let mut out = Vec::new();
        let mut scratch = vec![0u8; read_chunk];
        while !buffer.is_empty() {
            let want = read_chunk.min(buffer.readable_size());
            let n = buffer.read(&mut scratch[..want]);
            out.extend_from_slice(&scratch[..n]);
        }
        prop_assert_eq!(out, expected);
        prop_assert!(buffer.is_empty());
    }

    /// Compacting consumed space never changes the readable bytes
    #[test]
    fn test_buffer_compaction_preserves_content(
        first in prop::collection::vec(any::<u8>(), 1..64),
        consumed in 0usize..64,
        second in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let consumed = consumed.min(first.len());
        let mut buffer = Buffer::with_capacity(64);
        buffer.write(&first);
        buffer.move_read_cursor(consumed);
        let capacity_before = buffer.capacity();

        buffer.write(&second);

        let mut expected = first[consumed..].to_vec();
        expected.extend_from_slice(&second);
        prop_assert_eq!(buffer.readable(), expected.as_slice());
        if first.len() - consumed + second.len() <= capacity_before {
            prop_assert_eq!(buffer.capacity(), capacity_before);
        }
    }

    /// Growth always makes room and never overshoots its step
    #[test]
    fn test_buffer_growth_bounds(initial in 1usize..4096, len in 1usize..(64 * 1024)) {
        let mut buffer = Buffer::with_capacity(initial);
        let before = buffer.capacity();
        buffer.ensure_writable(len);
        let after = buffer.capacity();

        prop_assert!(buffer.writable_size() >= len);
        if len > before {
            if before < BUFFER_THRESHOLD_SIZE {
                prop_assert_eq!(after, before * 2 + len);
            } else {
                prop_assert_eq!(after, before + BUFFER_INCREMENT_SIZE + len);
            }
        } else {
            prop_assert_eq!(after, before);
        }
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// Text without '%' compiles to at most one literal and renders verbatim
    #[test]
    fn test_literal_patterns_render_verbatim(text in "[^%]{0,64}") {
        let formatter = Formatter::new(&text).unwrap();
        let msg = LogMessage::new(LogLevel::Info, "f.rs", 1, "p", "payload".to_string());

        prop_assert_eq!(formatter.format(&msg), text.clone());
        prop_assert!(formatter.items().len() <= 1);
        if let Some(item) = formatter.items().first() {
            prop_assert_eq!(item, &FormatItem::Literal(text));
        }
    }

    /// '%%' always renders as a single '%'
    #[test]
    fn test_escaped_percent(prefix in "[a-z ]{0,16}", suffix in "[a-z ]{0,16}") {
        let pattern = format!("{}%%{}", prefix, suffix);
        let formatter = Formatter::new(&pattern).unwrap();
        let msg = LogMessage::new(LogLevel::Info, "f.rs", 1, "p", String::new());
        prop_assert_eq!(formatter.format(&msg), format!("{}%{}", prefix, suffix));
    }

    /// The payload directive reproduces any message unchanged
    #[test]
    fn test_payload_is_rendered_unchanged(payload in ".{0,128}") {
        let formatter = Formatter::new("%m").unwrap();
        let msg = LogMessage::new(LogLevel::Error, "f.rs", 1, "p", payload.clone());
        prop_assert_eq!(formatter.format(&msg), payload);
    }

    /// Unknown directive letters are always rejected
    #[test]
    fn test_unknown_directives_rejected(key in "[a-zA-Z]") {
        let known = ["d", "T", "t", "p", "c", "f", "l", "m", "n"];
        prop_assume!(!known.contains(&key.as_str()));
        let result = Formatter::new(&format!("%{}", key));
        let is_pattern_error = matches!(result, Err(LoggerError::InvalidPattern { .. }));
        prop_assert!(is_pattern_error);
    }
}
