//! macOS 가상 키코드 테이블 (US 키보드 레이아웃 기준)
//! 참고: https://eastmanreference.com/complete-list-of-applescript-key-codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// 물리 키 식별자 (macOS Virtual Keycode)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const RETURN: KeyCode = KeyCode(36);
    pub const TAB: KeyCode = KeyCode(48);
    pub const SPACE: KeyCode = KeyCode(49);
    pub const GRAVE: KeyCode = KeyCode(50);
    pub const DELETE: KeyCode = KeyCode(51);
    pub const ESCAPE: KeyCode = KeyCode(53);

    pub const RIGHT_COMMAND: KeyCode = KeyCode(54);
    pub const COMMAND: KeyCode = KeyCode(55);
    pub const SHIFT: KeyCode = KeyCode(56);
    pub const CAPS_LOCK: KeyCode = KeyCode(57);
    pub const OPTION: KeyCode = KeyCode(58);
    pub const CONTROL: KeyCode = KeyCode(59);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(60);
    pub const RIGHT_OPTION: KeyCode = KeyCode(61);
    pub const RIGHT_CONTROL: KeyCode = KeyCode(62);
    pub const FUNCTION: KeyCode = KeyCode(63);

    /// 문자를 입력하는 키라면 해당 문자 (Shift 미적용)
    pub fn character(self) -> Option<char> {
        keycode_to_char(self.0)
    }

    /// Shift/Control/Option/Command/CapsLock/Fn 키 자체인지
    pub fn is_modifier_key(self) -> bool {
        (54..=63).contains(&self.0)
    }

    /// F1~F20
    pub fn is_function_key(self) -> bool {
        function_key_number(self.0).is_some()
    }

    /// 사람이 읽을 수 있는 키 이름 ("Space", "A", "F5", ...)
    pub fn name(self) -> String {
        if let Some(name) = special_key_name(self.0) {
            return name.to_string();
        }
        if let Some(n) = function_key_number(self.0) {
            return format!("F{}", n);
        }
        match self.character() {
            Some(c) => c.to_ascii_uppercase().to_string(),
            None => format!("#{}", self.0),
        }
    }

    /// 키 이름에서 키코드 찾기 (대소문자 무시)
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let lower = name.trim().to_ascii_lowercase();
        if lower.is_empty() {
            return None;
        }

        let special = match lower.as_str() {
            "return" | "enter" => Some(36),
            "tab" => Some(48),
            "space" => Some(49),
            "delete" | "backspace" => Some(51),
            "escape" | "esc" => Some(53),
            "left" => Some(123),
            "right" => Some(124),
            "down" => Some(125),
            "up" => Some(126),
            _ => None,
        };
        if let Some(code) = special {
            return Some(KeyCode(code));
        }

        if let Some(n) = lower.strip_prefix('f').and_then(|s| s.parse::<u8>().ok()) {
            return (0..=127u16)
                .find(|&code| function_key_number(code) == Some(n))
                .map(KeyCode);
        }

        let mut chars = lower.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => (0..=50u16)
                .find(|&code| keycode_to_char(code) == Some(c))
                .map(KeyCode),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// macOS 키코드 -> ASCII 문자
fn keycode_to_char(keycode: u16) -> Option<char> {
    let c = match keycode {
        0 => 'a',
        1 => 's',
        2 => 'd',
        3 => 'f',
        4 => 'h',
        5 => 'g',
        6 => 'z',
        7 => 'x',
        8 => 'c',
        9 => 'v',
        11 => 'b',
        12 => 'q',
        13 => 'w',
        14 => 'e',
        15 => 'r',
        16 => 'y',
        17 => 't',
        18 => '1',
        19 => '2',
        20 => '3',
        21 => '4',
        22 => '6',
        23 => '5',
        24 => '=',
        25 => '9',
        26 => '7',
        27 => '-',
        28 => '8',
        29 => '0',
        30 => ']',
        31 => 'o',
        32 => 'u',
        33 => '[',
        34 => 'i',
        35 => 'p',
        37 => 'l',
        38 => 'j',
        39 => '\'',
        40 => 'k',
        41 => ';',
        42 => '\\',
        43 => ',',
        44 => '/',
        45 => 'n',
        46 => 'm',
        47 => '.',
        50 => '`',
        _ => return None,
    };
    Some(c)
}

fn function_key_number(keycode: u16) -> Option<u8> {
    let n = match keycode {
        122 => 1,
        120 => 2,
        99 => 3,
        118 => 4,
        96 => 5,
        97 => 6,
        98 => 7,
        100 => 8,
        101 => 9,
        109 => 10,
        103 => 11,
        111 => 12,
        105 => 13,
        107 => 14,
        113 => 15,
        106 => 16,
        64 => 17,
        79 => 18,
        80 => 19,
        90 => 20,
        _ => return None,
    };
    Some(n)
}

fn special_key_name(keycode: u16) -> Option<&'static str> {
    let name = match keycode {
        36 => "Return",
        48 => "Tab",
        49 => "Space",
        51 => "Delete",
        53 => "Escape",
        54 => "Right Command",
        55 => "Command",
        56 => "Shift",
        57 => "Caps Lock",
        58 => "Option",
        59 => "Control",
        60 => "Right Shift",
        61 => "Right Option",
        62 => "Right Control",
        63 => "Fn",
        123 => "Left",
        124 => "Right",
        125 => "Down",
        126 => "Up",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_keys() {
        assert_eq!(KeyCode(0).character(), Some('a'));
        assert_eq!(KeyCode(15).character(), Some('r'));
        assert_eq!(KeyCode::SPACE.character(), None);
    }

    #[test]
    fn test_modifier_keys() {
        assert!(KeyCode::COMMAND.is_modifier_key());
        assert!(KeyCode::RIGHT_OPTION.is_modifier_key());
        assert!(KeyCode::FUNCTION.is_modifier_key());
        assert!(!KeyCode::SPACE.is_modifier_key());
    }

    #[test]
    fn test_names() {
        assert_eq!(KeyCode::SPACE.name(), "Space");
        assert_eq!(KeyCode(0).name(), "A");
        assert_eq!(KeyCode(96).name(), "F5");
        assert_eq!(KeyCode(200).name(), "#200");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(KeyCode::from_name("space"), Some(KeyCode::SPACE));
        assert_eq!(KeyCode::from_name("Enter"), Some(KeyCode::RETURN));
        assert_eq!(KeyCode::from_name("k"), Some(KeyCode(40)));
        assert_eq!(KeyCode::from_name("F12"), Some(KeyCode(111)));
        assert_eq!(KeyCode::from_name("hyper"), None);
        assert_eq!(KeyCode::from_name(""), None);
    }
}
