//! Text utilities for message delivery.
//!
//! Remote command output is forwarded verbatim, but Telegram rejects
//! messages over its size limit, so long replies are split into parts that
//! preserve content and order.

use unicode_segmentation::UnicodeSegmentation;

/// Splits `message` into parts no longer than `max_length` bytes.
///
/// Splitting happens at line boundaries where possible; a single line
/// longer than the limit is split by grapheme clusters so multi-byte
/// characters are never cut in half. Concatenating the parts (with the
/// newlines they were split at) reproduces the original content in order.
#[must_use]
pub fn split_long_message(message: &str, max_length: usize) -> Vec<String> {
    if message.is_empty() {
        return Vec::new();
    }
    if message.len() <= max_length {
        return vec![message.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for line in message.lines() {
        // A single line over the limit is split by graphemes
        if line.len() > max_length {
            if !current.is_empty() {
                flush_part(&mut parts, &mut current);
            }
            let mut chunk = String::new();
            for grapheme in line.graphemes(true) {
                if chunk.len() + grapheme.len() > max_length {
                    parts.push(chunk.clone());
                    chunk.clear();
                }
                chunk.push_str(grapheme);
            }
            if !chunk.is_empty() {
                current.push_str(&chunk);
                current.push('\n');
            }
            continue;
        }

        if current.len() + line.len() + 1 > max_length && !current.is_empty() {
            flush_part(&mut parts, &mut current);
        }
        current.push_str(line);
        current.push('\n');
    }

    flush_part(&mut parts, &mut current);

    parts
}

// Accumulated whitespace can trim down to nothing; an empty part must never
// be emitted because the transport rejects empty message bodies
fn flush_part(parts: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim_end();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_one_part() {
        assert_eq!(split_long_message("hello", 100), vec!["hello"]);
    }

    #[test]
    fn empty_message_has_no_parts() {
        assert!(split_long_message("", 100).is_empty());
    }

    #[test]
    fn splits_at_line_boundaries() {
        let message = "first line\nsecond line\nthird line";
        let parts = split_long_message(message, 12);
        assert_eq!(parts, vec!["first line", "second line", "third line"]);
    }

    #[test]
    fn content_and_order_preserved() {
        let message = (0..50).map(|i| format!("row {i}")).collect::<Vec<_>>().join("\n");
        let parts = split_long_message(&message, 40);
        assert!(parts.len() > 1);
        assert_eq!(parts.join("\n"), message);
        for part in &parts {
            assert!(part.len() <= 40);
        }
    }

    #[test]
    fn blank_line_before_oversized_line_yields_no_empty_parts() {
        let message = format!("\n{}", "a".repeat(5000));
        let parts = split_long_message(&message, 4000);
        assert!(parts.iter().all(|p| !p.is_empty()));
        assert!(parts.iter().all(|p| p.len() <= 4000));
        assert_eq!(parts.concat(), "a".repeat(5000));
    }

    #[test]
    fn very_long_line_split_by_graphemes() {
        let message = "я".repeat(100); // 2 bytes per char
        let parts = split_long_message(&message, 30);
        assert!(parts.iter().all(|p| p.len() <= 30));
        assert_eq!(parts.concat(), message);
    }
}
