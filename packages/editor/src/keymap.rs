//! Keyboard shortcuts

use crate::commands::Command;

/// What a key chord triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortcut {
    Command(Command),
    Save,
}

/// Modifier state of a key event
///
/// `primary` is Ctrl on most platforms and Cmd on macOS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub primary: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn primary() -> Self {
        Self {
            primary: true,
            ..Self::default()
        }
    }
}

pub fn lookup(key: char, modifiers: Modifiers) -> Option<Shortcut> {
    if !modifiers.primary || modifiers.shift || modifiers.alt {
        return None;
    }
    match key.to_ascii_lowercase() {
        'b' => Some(Shortcut::Command(Command::Bold)),
        'i' => Some(Shortcut::Command(Command::Italic)),
        's' => Some(Shortcut::Save),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_chords() {
        assert_eq!(
            lookup('b', Modifiers::primary()),
            Some(Shortcut::Command(Command::Bold))
        );
        assert_eq!(
            lookup('I', Modifiers::primary()),
            Some(Shortcut::Command(Command::Italic))
        );
        assert_eq!(lookup('s', Modifiers::primary()), Some(Shortcut::Save));
    }

    #[test]
    fn test_plain_keys_are_not_shortcuts() {
        assert_eq!(lookup('b', Modifiers::default()), None);
        let shifted = Modifiers {
            shift: true,
            ..Modifiers::primary()
        };
        assert_eq!(lookup('b', shifted), None);
    }
}
