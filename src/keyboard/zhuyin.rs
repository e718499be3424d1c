use std::collections::HashMap;
use std::sync::LazyLock;

/// Standard (Daqian) Zhuyin layout, in on-screen order.
///
/// Space is tone 1, which has no visible mark, so it binds to a blank symbol.
#[rustfmt::skip]
const BINDINGS: &[(char, &str)] = &[
    ('1', "ㄅ"), ('q', "ㄆ"), ('a', "ㄇ"), ('z', "ㄈ"),
    ('2', "ㄉ"), ('w', "ㄊ"), ('s', "ㄋ"), ('x', "ㄌ"),
    ('3', "ˇ"), ('e', "ㄍ"), ('d', "ㄎ"), ('c', "ㄏ"),
    ('4', "ˋ"), ('r', "ㄐ"), ('f', "ㄑ"), ('v', "ㄒ"),
    ('5', "ㄓ"), ('t', "ㄔ"), ('g', "ㄕ"), ('b', "ㄖ"),
    ('6', "ˊ"), ('y', "ㄗ"), ('h', "ㄘ"), ('n', "ㄙ"),
    ('7', "˙"), ('u', "ㄧ"), ('j', "ㄨ"), ('m', "ㄩ"),
    ('8', "ㄚ"), ('i', "ㄛ"), ('k', "ㄜ"), (',', "ㄝ"),
    ('9', "ㄞ"), ('o', "ㄟ"), ('l', "ㄠ"), ('.', "ㄡ"),
    ('0', "ㄢ"), ('p', "ㄣ"), (';', "ㄤ"), ('/', "ㄥ"),
    ('-', "ㄦ"), (' ', " "),
];

pub const TONE1_KEY: char = ' ';
pub const TONE1_SYMBOL: &str = " ";
pub const NEUTRAL_TONE_KEY: char = '7';

const TONE_KEYS: &[char] = &[TONE1_KEY, '6', '3', '4', NEUTRAL_TONE_KEY];

/// Phonetic role of a symbol, used for colouring the on-screen keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolClass {
    Initial,
    Medial,
    Final,
    Tone,
}

pub struct PhoneticKeyMap {
    by_key: HashMap<char, &'static str>,
    by_symbol: HashMap<&'static str, char>,
}

static KEY_MAP: LazyLock<PhoneticKeyMap> = LazyLock::new(PhoneticKeyMap::build);

impl PhoneticKeyMap {
    fn build() -> Self {
        let by_key = BINDINGS.iter().copied().collect();
        let by_symbol = BINDINGS.iter().map(|&(key, sym)| (sym, key)).collect();
        Self { by_key, by_symbol }
    }

    /// The process-wide map.
    pub fn global() -> &'static PhoneticKeyMap {
        &KEY_MAP
    }

    pub fn symbol_for(&self, key: char) -> Option<&'static str> {
        self.by_key.get(&key.to_ascii_lowercase()).copied()
    }

    /// Inverse lookup, for authoring and debugging word lists.
    pub fn key_for(&self, symbol: &str) -> Option<char> {
        self.by_symbol.get(symbol).copied()
    }

    pub fn is_mapped(&self, key: char) -> bool {
        self.symbol_for(key).is_some()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (char, &'static str)> {
        BINDINGS.iter().copied()
    }

    /// `symbol:key` pairs, one line per layout column, with tones described
    /// separately. Fed to the word-list supplier as a layout reference.
    pub fn reference_table(&self) -> String {
        let mut lines: Vec<String> = BINDINGS
            .chunks(4)
            .map(|column| {
                column
                    .iter()
                    .filter(|(key, _)| !is_tone_key(*key))
                    .map(|(key, sym)| format!("{sym}:{key}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|line| !line.is_empty())
            .collect();
        lines.push("Tone 1 (no mark): ' ' (space)".to_string());
        for &key in &TONE_KEYS[1..] {
            if let Some(sym) = self.symbol_for(key) {
                lines.push(format!("Tone {sym}: {key}"));
            }
        }
        lines.join("\n")
    }
}

pub fn is_tone_key(key: char) -> bool {
    TONE_KEYS.contains(&key)
}

pub fn classify(symbol: &str) -> Option<SymbolClass> {
    let key = PhoneticKeyMap::global().key_for(symbol)?;
    if is_tone_key(key) {
        return Some(SymbolClass::Tone);
    }
    let class = match symbol {
        "ㄧ" | "ㄨ" | "ㄩ" => SymbolClass::Medial,
        "ㄚ" | "ㄛ" | "ㄜ" | "ㄝ" | "ㄞ" | "ㄟ" | "ㄠ" | "ㄡ" | "ㄢ" | "ㄣ" | "ㄤ" | "ㄥ"
        | "ㄦ" => SymbolClass::Final,
        _ => SymbolClass::Initial,
    };
    Some(class)
}
