use crate::keyboard::zhuyin::TONE1_KEY;

#[derive(Clone, Debug)]
pub struct KeyboardLayout {
    pub name: String,
    pub rows: Vec<Vec<char>>,
}

impl KeyboardLayout {
    /// Physical US-ANSI rows the Daqian layout is printed on.
    pub fn daqian() -> Self {
        Self {
            name: "Daqian".to_string(),
            rows: vec![
                vec!['1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-', '='],
                vec!['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '[', ']'],
                vec!['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';', '\''],
                vec!['z', 'x', 'c', 'v', 'b', 'n', 'm', ',', '.', '/'],
                vec![TONE1_KEY],
            ],
        }
    }

    pub fn contains(&self, key: char) -> bool {
        self.rows.iter().any(|row| row.contains(&key))
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::daqian()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::zhuyin::PhoneticKeyMap;

    #[test]
    fn every_mapped_key_is_on_the_layout() {
        let layout = KeyboardLayout::daqian();
        for (key, _) in PhoneticKeyMap::global().bindings() {
            assert!(layout.contains(key), "missing key {key:?}");
        }
    }
}
