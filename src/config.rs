//! 설정 파일 로드/저장 (JSON)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::preferences::Flag;
use crate::shortcut::ShortcutRegistry;

/// 설정 파일 읽기/쓰기 오류
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("설정 파일 입출력 실패: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파일 형식 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 우측 수정키로 언어 전환 (HID usage 값으로 저장)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(from = "u32", into = "u32")]
pub enum RightToggleKey {
    #[default]
    None,
    RightCommand,
    RightOption,
    RightControl,
}

impl RightToggleKey {
    pub const HID_RIGHT_CONTROL: u32 = 0xE4;
    pub const HID_RIGHT_ALT: u32 = 0xE6;
    pub const HID_RIGHT_GUI: u32 = 0xE7;

    pub const ALL: [RightToggleKey; 4] = [
        RightToggleKey::None,
        RightToggleKey::RightCommand,
        RightToggleKey::RightOption,
        RightToggleKey::RightControl,
    ];

    pub fn hid_usage(self) -> u32 {
        match self {
            RightToggleKey::None => 0,
            RightToggleKey::RightCommand => Self::HID_RIGHT_GUI,
            RightToggleKey::RightOption => Self::HID_RIGHT_ALT,
            RightToggleKey::RightControl => Self::HID_RIGHT_CONTROL,
        }
    }

    /// 팝업 메뉴 항목 순서 (사용 안 함, 우측 ⌘, 우측 ⌥, 우측 ⌃)
    pub fn menu_index(self) -> usize {
        match self {
            RightToggleKey::None => 0,
            RightToggleKey::RightCommand => 1,
            RightToggleKey::RightOption => 2,
            RightToggleKey::RightControl => 3,
        }
    }

    /// 범위를 벗어난 항목은 "사용 안 함"
    pub fn from_menu_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            RightToggleKey::None => "사용 안 함",
            RightToggleKey::RightCommand => "우측 ⌘",
            RightToggleKey::RightOption => "우측 ⌥",
            RightToggleKey::RightControl => "우측 ⌃",
        }
    }
}

impl From<u32> for RightToggleKey {
    fn from(usage: u32) -> Self {
        match usage {
            Self::HID_RIGHT_GUI => RightToggleKey::RightCommand,
            Self::HID_RIGHT_ALT => RightToggleKey::RightOption,
            Self::HID_RIGHT_CONTROL => RightToggleKey::RightControl,
            _ => RightToggleKey::None,
        }
    }
}

impl From<RightToggleKey> for u32 {
    fn from(key: RightToggleKey) -> Self {
        key.hid_usage()
    }
}

/// 옵션 키 동작 (콤보 박스 인덱스로 저장)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(from = "usize", into = "usize")]
pub enum OptionKeyBehavior {
    /// macOS 기본 동작 (옵션 조합 문자 입력)
    #[default]
    System,
    /// 옵션 키를 무시하고 현재 자판으로 입력
    Ignore,
}

impl OptionKeyBehavior {
    pub const ALL: [OptionKeyBehavior; 2] = [OptionKeyBehavior::System, OptionKeyBehavior::Ignore];

    pub fn index(self) -> usize {
        match self {
            OptionKeyBehavior::System => 0,
            OptionKeyBehavior::Ignore => 1,
        }
    }

    /// 항목 범위 밖이면 None
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl From<usize> for OptionKeyBehavior {
    fn from(index: usize) -> Self {
        Self::from_index(index).unwrap_or_default()
    }
}

impl From<OptionKeyBehavior> for usize {
    fn from(behavior: OptionKeyBehavior) -> Self {
        behavior.index()
    }
}

/// 구름 입력기 설정
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GureumConfig {
    /// 입력 모드 단축키 (슬롯마다 하나의 키로 저장)
    #[serde(flatten)]
    pub shortcuts: ShortcutRegistry,
    /// 완성되지 않은 낱자 자동 교정 (모아치기)
    #[serde(default)]
    pub hangul_auto_reorder: bool,
    /// 두벌식 초성 조합 중에도 종성 결합 허용 (MS윈도 호환)
    #[serde(default)]
    pub hangul_non_choseong_combination: bool,
    /// 세벌식 정석 강요
    #[serde(default)]
    pub hangul_force_strict_combination_rule: bool,
    /// 한글 입력기일 때 역따옴표(`)로 원화 기호(₩) 입력
    #[serde(default)]
    pub hangul_won_currency_symbol_for_back_quote: bool,
    /// Esc 키로 로마자 자판으로 전환 (vi 모드)
    #[serde(default)]
    pub roman_mode_by_escape_key: bool,
    #[serde(default)]
    pub right_toggle_key: RightToggleKey,
    #[serde(default)]
    pub option_key_behavior: OptionKeyBehavior,
    /// 기본 키보드 레이아웃 (입력 소스 ID)
    #[serde(default = "default_overriding_keyboard_name")]
    pub overriding_keyboard_name: String,
    /// 업데이트 알림 받기
    #[serde(default = "default_update_notification")]
    pub update_notification: bool,
    /// 실험버전 업데이트 알림 받기
    #[serde(default)]
    pub update_notification_experimental: bool,
}

fn default_overriding_keyboard_name() -> String {
    crate::input_source::ABC_LAYOUT_ID.to_string()
}

fn default_update_notification() -> bool {
    true
}

impl Default for GureumConfig {
    fn default() -> Self {
        Self {
            shortcuts: ShortcutRegistry::with_defaults(),
            hangul_auto_reorder: false,
            hangul_non_choseong_combination: false,
            hangul_force_strict_combination_rule: false,
            hangul_won_currency_symbol_for_back_quote: false,
            roman_mode_by_escape_key: false,
            right_toggle_key: RightToggleKey::None,
            option_key_behavior: OptionKeyBehavior::System,
            overriding_keyboard_name: default_overriding_keyboard_name(),
            update_notification: default_update_notification(),
            update_notification_experimental: false,
        }
    }
}

impl GureumConfig {
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::HangulAutoReorder => self.hangul_auto_reorder,
            Flag::HangulNonChoseongCombination => self.hangul_non_choseong_combination,
            Flag::HangulForceStrictCombinationRule => self.hangul_force_strict_combination_rule,
            Flag::HangulWonCurrencySymbolForBackQuote => {
                self.hangul_won_currency_symbol_for_back_quote
            }
            Flag::RomanModeByEscapeKey => self.roman_mode_by_escape_key,
            Flag::UpdateNotification => self.update_notification,
            Flag::UpdateNotificationExperimental => self.update_notification_experimental,
        }
    }

    pub(crate) fn flag_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::HangulAutoReorder => &mut self.hangul_auto_reorder,
            Flag::HangulNonChoseongCombination => &mut self.hangul_non_choseong_combination,
            Flag::HangulForceStrictCombinationRule => {
                &mut self.hangul_force_strict_combination_rule
            }
            Flag::HangulWonCurrencySymbolForBackQuote => {
                &mut self.hangul_won_currency_symbol_for_back_quote
            }
            Flag::RomanModeByEscapeKey => &mut self.roman_mode_by_escape_key,
            Flag::UpdateNotification => &mut self.update_notification,
            Flag::UpdateNotificationExperimental => &mut self.update_notification_experimental,
        }
    }
}

/// 설정 저장소
///
/// 앱은 `JsonFileStore`, 테스트는 `MemoryStore`를 사용합니다.
pub trait ConfigStore {
    fn load(&self) -> Result<GureumConfig, ConfigError>;
    fn save(&mut self, config: &GureumConfig) -> Result<(), ConfigError>;
}

/// JSON 파일 저장소
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 기본 경로(`config_path()`)를 쓰는 저장소
    pub fn at_default_path() -> Self {
        Self::new(config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    /// 파일이 없으면 기본값
    fn load(&self) -> Result<GureumConfig, ConfigError> {
        if !self.path.exists() {
            return Ok(GureumConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let mut config: GureumConfig = serde_json::from_str(&content)?;
        config.shortcuts.normalize();
        Ok(config)
    }

    fn save(&mut self, config: &GureumConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// 메모리 저장소 (테스트, 임시 세션용)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<GureumConfig>,
    save_count: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이미 저장된 설정이 있는 상태로 시작
    pub fn with_config(config: GureumConfig) -> Self {
        Self {
            saved: Some(config),
            ..Self::default()
        }
    }

    /// 저장이 항상 실패하는 저장소
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Option<&GureumConfig> {
        self.saved.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<GureumConfig, ConfigError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, config: &GureumConfig) -> Result<(), ConfigError> {
        if self.fail_saves {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "memory store is read-only",
            )));
        }
        self.saved = Some(config.clone());
        self.save_count += 1;
        Ok(())
    }
}

/// 설정 파일 경로: ~/Library/Application Support/gureum/config.json
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .filter(|p| p.is_absolute() && p.is_dir())
        .unwrap_or_else(|| {
            // HOME 미설정이거나 유효하지 않으면 /var/tmp 폴백
            PathBuf::from("/var/tmp")
        });
    home.join("Library")
        .join("Application Support")
        .join("gureum")
        .join("config.json")
}

/// 설정 파일 로드 (파일 없거나 파싱 실패 시 기본값)
pub fn load_config() -> GureumConfig {
    let store = JsonFileStore::at_default_path();
    store.load().unwrap_or_else(|e| {
        log::warn!("설정 파일을 읽지 못해 기본값 사용 ({}): {}", store.path().display(), e);
        GureumConfig::default()
    })
}

/// 설정 파일 저장
pub fn save_config(config: &GureumConfig) -> Result<(), ConfigError> {
    JsonFileStore::at_default_path().save(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcut::{KeyBinding, KeyCode, ModifierMask, ShortcutSlot};

    #[test]
    fn test_default_config() {
        let config = GureumConfig::default();
        assert!(config.update_notification);
        assert!(!config.hangul_auto_reorder);
        assert_eq!(config.overriding_keyboard_name, "com.apple.keylayout.ABC");
        assert_eq!(
            config.shortcuts.get(ShortcutSlot::ExchangeInputMode),
            Some(KeyBinding::new(KeyCode::SPACE, ModifierMask::SHIFT))
        );
    }

    #[test]
    fn test_backward_compat_missing_fields() {
        // 이전 설정 파일에 없는 필드는 기본값 사용
        let json = r#"{"hangul_auto_reorder": true}"#;
        let config: GureumConfig = serde_json::from_str(json).unwrap();
        assert!(config.hangul_auto_reorder);
        assert!(config.update_notification);
        assert_eq!(config.right_toggle_key, RightToggleKey::None);
        assert_eq!(
            config.shortcuts.get(ShortcutSlot::Search),
            Some(KeyBinding::new(KeyCode::RETURN, ModifierMask::OPTION))
        );
    }

    #[test]
    fn test_explicit_null_unbinds_slot() {
        let json = r#"{"input_mode_exchange_key": null}"#;
        let config: GureumConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.shortcuts.get(ShortcutSlot::ExchangeInputMode), None);
    }

    #[test]
    fn test_flat_shortcut_keys() {
        let json = serde_json::to_value(GureumConfig::default()).unwrap();
        assert_eq!(json["input_mode_exchange_key"]["key_code"], 49);
        assert_eq!(json["input_mode_exchange_key"]["modifiers"], 0x20000);
        assert!(json["input_mode_korean_key"].is_null());
    }

    #[test]
    fn test_right_toggle_key_hid_values() {
        let json = r#"{"right_toggle_key": 231}"#;
        let config: GureumConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.right_toggle_key, RightToggleKey::RightCommand);

        // 알 수 없는 값은 "사용 안 함"
        let json = r#"{"right_toggle_key": 5}"#;
        let config: GureumConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.right_toggle_key, RightToggleKey::None);
    }

    #[test]
    fn test_right_toggle_menu_index() {
        for key in RightToggleKey::ALL {
            assert_eq!(RightToggleKey::from_menu_index(key.menu_index()), key);
        }
        assert_eq!(RightToggleKey::from_menu_index(9), RightToggleKey::None);
    }

    #[test]
    fn test_option_key_out_of_range() {
        let json = r#"{"option_key_behavior": 7}"#;
        let config: GureumConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.option_key_behavior, OptionKeyBehavior::System);
        assert_eq!(OptionKeyBehavior::from_index(1), Some(OptionKeyBehavior::Ignore));
        assert_eq!(OptionKeyBehavior::from_index(2), None);
    }

    #[test]
    fn test_memory_store_failing() {
        let mut store = MemoryStore::failing();
        assert!(store.save(&GureumConfig::default()).is_err());
        assert_eq!(store.save_count(), 0);
    }
}
