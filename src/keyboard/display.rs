//! Display names for keys that have no printable glyph of their own.
//!
//! The game compares keys as `char`s; only the UI needs these labels.

use crate::keyboard::zhuyin::{PhoneticKeyMap, TONE1_KEY};

/// Human-readable name for a key. Returns `""` for printable chars, the
/// caller uses `ch.to_string()` for those.
pub fn key_display_name(ch: char) -> &'static str {
    match ch {
        TONE1_KEY => "Space",
        '\t' => "Tab",
        '\n' => "Enter",
        _ => "",
    }
}

/// Label for a key, falling back to the character itself.
pub fn key_label(ch: char) -> String {
    match key_display_name(ch) {
        "" => ch.to_string(),
        name => name.to_string(),
    }
}

/// Key and the symbol it types, e.g. `u ㄧ`. Tone 1 shows only the key.
pub fn key_with_symbol(ch: char) -> String {
    match PhoneticKeyMap::global().symbol_for(ch) {
        Some(symbol) if !symbol.trim().is_empty() => format!("{} {symbol}", key_label(ch)),
        _ => key_label(ch),
    }
}
