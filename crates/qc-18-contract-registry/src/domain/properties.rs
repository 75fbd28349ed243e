//! # Properties Text Format
//!
//! Flat `key=value` files used for the local registry configuration and the
//! address file shared between co-located nodes.
//!
//! Reading accepts `=` or `:` as separator, `#`/`!` comment lines and
//! backslash escapes. Writing emits `key=value` lines in key order.

use std::collections::BTreeMap;

/// Parses properties text into a key/value map. Later keys win.
#[must_use]
pub fn parse(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (raw_key, raw_value) = split_entry(line);
        let key = unescape(raw_key.trim_end());
        if key.is_empty() {
            continue;
        }
        entries.insert(key, unescape(raw_value.trim()));
    }

    entries
}

/// Renders a key/value map, preceded by an optional comment line.
#[must_use]
pub fn render(entries: &BTreeMap<String, String>, comment: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(comment) = comment {
        out.push_str("# ");
        out.push_str(comment);
        out.push('\n');
    }
    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

/// Splits at the first unescaped `=` or `:`.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..idx], &line[idx + ch.len_utf8()..]),
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn escape(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '=' | ':' | ' ' if is_key => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let text = "# written by node 1\n\
                    contract.registry.addr=0xabc\n\
                    \n\
                    ! other comment\n\
                    geth.url : http\\://localhost\\:8545\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["contract.registry.addr"], "0xabc");
        assert_eq!(entries["geth.url"], "http://localhost:8545");
    }

    #[test]
    fn test_parse_blank_value_and_last_wins() {
        let entries = parse("a=\nb=1\nb=2\n");
        assert_eq!(entries["a"], "");
        assert_eq!(entries["b"], "2");
    }

    #[test]
    fn test_parse_key_without_separator() {
        let entries = parse("lonely\n");
        assert_eq!(entries["lonely"], "");
    }

    #[test]
    fn test_render_then_parse_keeps_special_characters() {
        let mut entries = BTreeMap::new();
        entries.insert("odd key=x".to_string(), "C:\\data\nnext".to_string());
        let text = render(&entries, Some("registry"));
        assert!(text.starts_with("# registry\n"));
        assert_eq!(parse(&text), entries);
    }
}
