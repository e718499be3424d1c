use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

/// US-ANSI shifted characters for the non-letter keys.
#[rustfmt::skip]
const SHIFTED: &[(char, char)] = &[
    ('1', '!'), ('2', '@'), ('3', '#'), ('4', '$'), ('5', '%'), ('6', '^'),
    ('7', '&'), ('8', '*'), ('9', '('), ('0', ')'), ('-', '_'), ('=', '+'),
    ('[', '{'), (']', '}'), ('\\', '|'), (';', ':'), ('\'', '"'), (',', '<'),
    ('.', '>'), ('/', '?'), ('`', '~'),
];

/// Key identifier handed to the game for a terminal key press, in the same
/// vocabulary as browser `KeyboardEvent.key` values (lower-cased).
///
/// Returns `None` for keys the game never sees (function keys, navigation).
pub fn key_name(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::SHIFT) => {
            return Some(shifted(ch).to_string());
        }
        KeyCode::Char(ch) => return Some(ch.to_string()),
        KeyCode::Modifier(modifier) => modifier_name(modifier),
        KeyCode::Enter => "enter",
        KeyCode::Backspace => "backspace",
        KeyCode::Delete => "delete",
        KeyCode::CapsLock => "capslock",
        _ => return None,
    };
    Some(name.to_string())
}

/// Terminals reporting every key as an escape code send Shift+`,` as `,`
/// with SHIFT set; the game must see `<`, as a plain terminal would send.
fn shifted(ch: char) -> char {
    SHIFTED
        .iter()
        .find(|&&(base, _)| base == ch)
        .map_or(ch, |&(_, shifted)| shifted)
}

fn modifier_name(modifier: ModifierKeyCode) -> &'static str {
    match modifier {
        ModifierKeyCode::LeftShift
        | ModifierKeyCode::RightShift
        | ModifierKeyCode::IsoLevel3Shift
        | ModifierKeyCode::IsoLevel5Shift => "shift",
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "control",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "alt",
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftHyper
        | ModifierKeyCode::RightHyper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => "meta",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn chars_pass_through() {
        assert_eq!(key_name(&press(KeyCode::Char('v'))), Some("v".to_string()));
        assert_eq!(key_name(&press(KeyCode::Char(' '))), Some(" ".to_string()));
        assert_eq!(key_name(&press(KeyCode::Char('V'))), Some("V".to_string()));
    }

    #[test]
    fn modifiers_use_browser_names() {
        assert_eq!(
            key_name(&press(KeyCode::Modifier(ModifierKeyCode::LeftShift))),
            Some("shift".to_string())
        );
        assert_eq!(
            key_name(&press(KeyCode::Modifier(ModifierKeyCode::RightControl))),
            Some("control".to_string())
        );
        assert_eq!(
            key_name(&press(KeyCode::Modifier(ModifierKeyCode::LeftSuper))),
            Some("meta".to_string())
        );
    }

    #[test]
    fn navigation_keys_are_dropped() {
        assert_eq!(key_name(&press(KeyCode::Left)), None);
        assert_eq!(key_name(&press(KeyCode::F(5))), None);
        assert_eq!(key_name(&press(KeyCode::Enter)), Some("enter".to_string()));
    }

    #[test]
    fn shifted_punctuation_is_not_its_base_key() {
        let shift = |ch| KeyEvent::new(KeyCode::Char(ch), KeyModifiers::SHIFT);
        assert_eq!(key_name(&shift(',')), Some("<".to_string()));
        assert_eq!(key_name(&shift('3')), Some("#".to_string()));
        assert_eq!(key_name(&shift('<')), Some("<".to_string()));
        // Letters keep their identity; the game compares case-insensitively.
        assert_eq!(key_name(&shift('v')), Some("v".to_string()));
        assert_eq!(key_name(&shift('V')), Some("V".to_string()));
    }
}
