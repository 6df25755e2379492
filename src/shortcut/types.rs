//! 단축키 슬롯, 수정키 마스크, 키 바인딩

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::keycode::KeyCode;

/// 고정된 단축키 슬롯
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutSlot {
    /// 입력기 바꾸기
    ExchangeInputMode,
    /// 한자 및 이모지 검색
    Search,
    /// 로마자로 바꾸기
    SwitchToEnglish,
    /// 한글로 바꾸기
    SwitchToKorean,
}

impl ShortcutSlot {
    pub const ALL: [ShortcutSlot; 4] = [
        ShortcutSlot::ExchangeInputMode,
        ShortcutSlot::Search,
        ShortcutSlot::SwitchToEnglish,
        ShortcutSlot::SwitchToKorean,
    ];

    /// 설정 파일에 저장되는 키 이름
    pub fn config_key(self) -> &'static str {
        match self {
            ShortcutSlot::ExchangeInputMode => "input_mode_exchange_key",
            ShortcutSlot::Search => "input_mode_search_key",
            ShortcutSlot::SwitchToEnglish => "input_mode_english_key",
            ShortcutSlot::SwitchToKorean => "input_mode_korean_key",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShortcutSlot::ExchangeInputMode => "입력기 바꾸기",
            ShortcutSlot::Search => "한자 및 이모지 검색",
            ShortcutSlot::SwitchToEnglish => "로마자로 바꾸기",
            ShortcutSlot::SwitchToKorean => "한글로 바꾸기",
        }
    }

    /// CLI 등에서 쓰는 짧은 이름
    pub fn from_name(name: &str) -> Option<ShortcutSlot> {
        match name.trim().to_ascii_lowercase().as_str() {
            "exchange" | "exchange_input_mode" => Some(ShortcutSlot::ExchangeInputMode),
            "search" => Some(ShortcutSlot::Search),
            "english" | "switch_to_english" => Some(ShortcutSlot::SwitchToEnglish),
            "korean" | "switch_to_korean" => Some(ShortcutSlot::SwitchToKorean),
            _ => None,
        }
    }
}

impl fmt::Display for ShortcutSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

bitflags! {
    /// 수정키 비트마스크
    ///
    /// AppKit `NSEvent.ModifierFlags` / CoreGraphics `CGEventFlags`와 같은 비트를 사용하므로
    /// 플랫폼 값을 그대로 저장/비교할 수 있다.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(from = "u64", into = "u64")]
    pub struct ModifierMask: u64 {
        const SHIFT = 1 << 17;
        const CONTROL = 1 << 18;
        const OPTION = 1 << 19;
        const COMMAND = 1 << 20;
    }
}

impl Default for ModifierMask {
    fn default() -> Self {
        ModifierMask::empty()
    }
}

impl From<u64> for ModifierMask {
    /// 알 수 없는 비트(CapsLock, 장치 의존 비트 등)는 버림
    fn from(bits: u64) -> Self {
        ModifierMask::from_bits_truncate(bits)
    }
}

impl From<ModifierMask> for u64 {
    fn from(mask: ModifierMask) -> Self {
        mask.bits()
    }
}

impl fmt::Display for ModifierMask {
    /// macOS 메뉴 표기 순서: ⌃⌥⇧⌘
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(ModifierMask::CONTROL) {
            f.write_str("⌃")?;
        }
        if self.contains(ModifierMask::OPTION) {
            f.write_str("⌥")?;
        }
        if self.contains(ModifierMask::SHIFT) {
            f.write_str("⇧")?;
        }
        if self.contains(ModifierMask::COMMAND) {
            f.write_str("⌘")?;
        }
        Ok(())
    }
}

/// 키코드 + 수정키 조합
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key_code: KeyCode,
    pub modifiers: ModifierMask,
}

impl KeyBinding {
    pub fn new(key_code: KeyCode, modifiers: ModifierMask) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    /// "cmd+shift+space", "⌥ Return" 같은 문자열 파싱
    pub fn parse(s: &str) -> Result<Self, ShortcutParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let mut modifiers = ModifierMask::empty();
        let mut key: Option<KeyCode> = None;

        for part in s.split(['+', ' ']).filter(|p| !p.is_empty()) {
            let flag = match part.to_ascii_lowercase().as_str() {
                "cmd" | "command" | "meta" | "⌘" => Some(ModifierMask::COMMAND),
                "ctrl" | "control" | "⌃" => Some(ModifierMask::CONTROL),
                "alt" | "opt" | "option" | "⌥" => Some(ModifierMask::OPTION),
                "shift" | "⇧" => Some(ModifierMask::SHIFT),
                _ => None,
            };
            if let Some(flag) = flag {
                modifiers |= flag;
                continue;
            }

            if key.is_some() {
                return Err(ShortcutParseError::UnexpectedToken(part.to_string()));
            }
            key = Some(
                KeyCode::from_name(part)
                    .ok_or_else(|| ShortcutParseError::UnknownKey(part.to_string()))?,
            );
        }

        let key_code = key.ok_or(ShortcutParseError::MissingKey)?;
        Ok(Self::new(key_code, modifiers))
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modifiers, self.key_code)
    }
}

/// 단축키 문자열 파싱 오류
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutParseError {
    #[error("단축키 문자열이 비어 있습니다")]
    Empty,
    #[error("수정키만 있고 키가 없습니다")]
    MissingKey,
    #[error("알 수 없는 키: '{0}'")]
    UnknownKey(String),
    #[error("키가 두 번 이상 지정됨: '{0}'")]
    UnexpectedToken(String),
}
