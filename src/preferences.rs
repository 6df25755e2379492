//! 환경 설정 (세션 동안 소유되는 설정 + 저장소)
//!
//! 모든 변경은 즉시 저장소에 기록됩니다 (write-through).
//! 저장 실패는 로그만 남기고 변경 자체는 유지합니다.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigStore, GureumConfig, OptionKeyBehavior, RightToggleKey};
use crate::shortcut::{ConflictError, KeyBinding, ShortcutRegistry, ShortcutSlot};

/// 켜고 끄는 설정 항목
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    HangulAutoReorder,
    HangulNonChoseongCombination,
    HangulForceStrictCombinationRule,
    HangulWonCurrencySymbolForBackQuote,
    RomanModeByEscapeKey,
    UpdateNotification,
    UpdateNotificationExperimental,
}

impl Flag {
    pub const ALL: [Flag; 7] = [
        Flag::HangulAutoReorder,
        Flag::HangulNonChoseongCombination,
        Flag::HangulForceStrictCombinationRule,
        Flag::HangulWonCurrencySymbolForBackQuote,
        Flag::RomanModeByEscapeKey,
        Flag::UpdateNotification,
        Flag::UpdateNotificationExperimental,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Flag::HangulAutoReorder => "완성되지 않은 낱자 자동 교정 (모아치기)",
            Flag::HangulNonChoseongCombination => "두벌식 초성 조합 중에도 종성 결합 허용",
            Flag::HangulForceStrictCombinationRule => "세벌식 정석 강요",
            Flag::HangulWonCurrencySymbolForBackQuote => "역따옴표(`)로 원화 기호(₩) 입력",
            Flag::RomanModeByEscapeKey => "Esc 키로 로마자 자판으로 전환",
            Flag::UpdateNotification => "업데이트 알림 받기",
            Flag::UpdateNotificationExperimental => "실험버전 업데이트 알림 받기",
        }
    }

    /// CLI 이름 (snake_case)
    pub fn from_name(name: &str) -> Option<Flag> {
        match name.trim() {
            "hangul_auto_reorder" => Some(Flag::HangulAutoReorder),
            "hangul_non_choseong_combination" => Some(Flag::HangulNonChoseongCombination),
            "hangul_force_strict_combination_rule" => Some(Flag::HangulForceStrictCombinationRule),
            "hangul_won_currency_symbol_for_back_quote" => {
                Some(Flag::HangulWonCurrencySymbolForBackQuote)
            }
            "roman_mode_by_escape_key" => Some(Flag::RomanModeByEscapeKey),
            "update_notification" => Some(Flag::UpdateNotification),
            "update_notification_experimental" => Some(Flag::UpdateNotificationExperimental),
            _ => None,
        }
    }
}

/// 세션 동안 소유되는 환경 설정
pub struct Preferences<S: ConfigStore> {
    config: GureumConfig,
    store: S,
}

impl<S: ConfigStore> Preferences<S> {
    /// 저장소에서 설정을 읽어 시작 (실패 시 기본값)
    pub fn load(store: S) -> Self {
        let config = store.load().unwrap_or_else(|e| {
            log::warn!("설정 로드 실패, 기본값 사용: {}", e);
            GureumConfig::default()
        });
        Self { config, store }
    }

    pub fn with_config(config: GureumConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &GureumConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.config) {
            log::error!("설정 저장 실패: {}", e);
        }
    }

    // --- 단축키 ---

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.config.shortcuts
    }

    pub fn shortcut(&self, slot: ShortcutSlot) -> Option<KeyBinding> {
        self.config.shortcuts.get(slot)
    }

    /// 충돌 시 아무것도 저장하지 않음
    pub fn set_shortcut(
        &mut self,
        slot: ShortcutSlot,
        binding: KeyBinding,
    ) -> Result<(), ConflictError> {
        self.config.shortcuts.set(slot, binding)?;
        log::debug!("단축키 설정: {} = {}", slot, binding);
        self.persist();
        Ok(())
    }

    /// 다른 슬롯이 쓰던 바인딩이면 그 슬롯을 비우고 설정
    pub fn replace_shortcut(
        &mut self,
        slot: ShortcutSlot,
        binding: KeyBinding,
    ) -> Option<ShortcutSlot> {
        let evicted = self.config.shortcuts.replace(slot, binding);
        if let Some(other) = evicted {
            log::debug!("단축키 {} 이동: {} -> {}", binding, other, slot);
        }
        self.persist();
        evicted
    }

    pub fn clear_shortcut(&mut self, slot: ShortcutSlot) {
        self.config.shortcuts.clear(slot);
        log::debug!("단축키 해제: {}", slot);
        self.persist();
    }

    // --- 켜고 끄는 항목 ---

    pub fn flag(&self, flag: Flag) -> bool {
        self.config.flag(flag)
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        *self.config.flag_mut(flag) = value;
        log::debug!("설정 변경: {:?} = {}", flag, value);
        self.persist();
    }

    // --- 선택 항목 ---

    pub fn right_toggle_key(&self) -> RightToggleKey {
        self.config.right_toggle_key
    }

    pub fn set_right_toggle_key(&mut self, key: RightToggleKey) {
        self.config.right_toggle_key = key;
        self.persist();
    }

    pub fn option_key_behavior(&self) -> OptionKeyBehavior {
        self.config.option_key_behavior
    }

    pub fn set_option_key_behavior(&mut self, behavior: OptionKeyBehavior) {
        self.config.option_key_behavior = behavior;
        self.persist();
    }

    pub fn overriding_keyboard_name(&self) -> &str {
        &self.config.overriding_keyboard_name
    }

    pub fn set_overriding_keyboard_name(&mut self, identifier: impl Into<String>) {
        self.config.overriding_keyboard_name = identifier.into();
        self.persist();
    }
}
