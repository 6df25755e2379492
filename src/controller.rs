//! 환경 설정 컨트롤러
//!
//! UI는 의도(`PreferenceIntent`)만 보내고, 컨트롤러가 검증/변경/저장한 뒤
//! 확정된 상태(`PreferenceSnapshot`)를 구독자에게 알립니다.

use thiserror::Error;

use crate::config::{ConfigStore, GureumConfig, OptionKeyBehavior, RightToggleKey};
use crate::input_source::LayoutList;
use crate::preferences::{Flag, Preferences};
use crate::shortcut::{
    ConflictError, KeyBinding, ShortcutSlot, ShortcutValidator, ValidationError,
};

/// UI에서 보내는 변경 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceIntent {
    /// 충돌하면 거부
    SetShortcut(ShortcutSlot, KeyBinding),
    /// 충돌하면 기존 슬롯을 비우고 설정
    ReplaceShortcut(ShortcutSlot, KeyBinding),
    ClearShortcut(ShortcutSlot),
    SetFlag(Flag, bool),
    SetRightToggleKey(RightToggleKey),
    SetOptionKeyBehavior(OptionKeyBehavior),
    /// 입력 소스 ID
    SetOverridingKeyboard(String),
}

/// 요청 거부 사유
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error("알 수 없는 키보드 레이아웃: {0}")]
    UnknownLayout(String),
}

/// 변경이 확정된 뒤의 상태
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSnapshot {
    pub config: GureumConfig,
    /// 이번 변경으로 비워진 슬롯 (ReplaceShortcut)
    pub evicted: Option<ShortcutSlot>,
}

type Observer = Box<dyn Fn(&PreferenceSnapshot) + Send + 'static>;

pub struct PreferenceController<S: ConfigStore> {
    preferences: Preferences<S>,
    validator: ShortcutValidator,
    layouts: Option<LayoutList>,
    observers: Vec<Observer>,
}

impl<S: ConfigStore> PreferenceController<S> {
    pub fn new(preferences: Preferences<S>) -> Self {
        Self {
            preferences,
            validator: ShortcutValidator::new(),
            layouts: None,
            observers: Vec::new(),
        }
    }

    pub fn with_validator(mut self, validator: ShortcutValidator) -> Self {
        self.validator = validator;
        self
    }

    /// 선택 가능한 레이아웃 목록 (없으면 ID 검사 생략)
    pub fn with_layouts(mut self, layouts: LayoutList) -> Self {
        self.layouts = Some(layouts);
        self
    }

    pub fn preferences(&self) -> &Preferences<S> {
        &self.preferences
    }

    pub fn layouts(&self) -> Option<&LayoutList> {
        self.layouts.as_ref()
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&PreferenceSnapshot) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn snapshot(&self) -> PreferenceSnapshot {
        PreferenceSnapshot {
            config: self.preferences.config().clone(),
            evicted: None,
        }
    }

    /// 요청 처리. 거부된 요청은 상태를 바꾸지 않고 구독자에게도 알리지 않음
    pub fn dispatch(
        &mut self,
        intent: PreferenceIntent,
    ) -> Result<PreferenceSnapshot, IntentError> {
        let evicted = self.apply(intent)?;
        let snapshot = PreferenceSnapshot {
            evicted,
            ..self.snapshot()
        };
        for observer in &self.observers {
            observer(&snapshot);
        }
        Ok(snapshot)
    }

    fn apply(&mut self, intent: PreferenceIntent) -> Result<Option<ShortcutSlot>, IntentError> {
        let prefs = &mut self.preferences;
        match intent {
            PreferenceIntent::SetShortcut(slot, binding) => {
                self.validator.validate(&binding)?;
                prefs.set_shortcut(slot, binding)?;
            }
            PreferenceIntent::ReplaceShortcut(slot, binding) => {
                self.validator.validate(&binding)?;
                return Ok(prefs.replace_shortcut(slot, binding));
            }
            PreferenceIntent::ClearShortcut(slot) => prefs.clear_shortcut(slot),
            PreferenceIntent::SetFlag(flag, value) => prefs.set_flag(flag, value),
            PreferenceIntent::SetRightToggleKey(key) => prefs.set_right_toggle_key(key),
            PreferenceIntent::SetOptionKeyBehavior(behavior) => {
                prefs.set_option_key_behavior(behavior)
            }
            PreferenceIntent::SetOverridingKeyboard(identifier) => {
                if let Some(layouts) = &self.layouts {
                    if !layouts.contains(&identifier) {
                        return Err(IntentError::UnknownLayout(identifier));
                    }
                }
                prefs.set_overriding_keyboard_name(identifier);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::input_source::KeyboardLayout;
    use crate::shortcut::{KeyCode, ModifierMask};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn controller() -> PreferenceController<MemoryStore> {
        PreferenceController::new(Preferences::with_config(
            GureumConfig::default(),
            MemoryStore::new(),
        ))
    }

    fn cmd_space() -> KeyBinding {
        KeyBinding::new(KeyCode::SPACE, ModifierMask::COMMAND)
    }

    #[test]
    fn test_dispatch_notifies_with_confirmed_state() {
        let mut controller = controller();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_observer = Arc::clone(&seen);
        controller.subscribe(move |snapshot| {
            assert_eq!(
                snapshot.config.shortcuts.get(ShortcutSlot::SwitchToEnglish),
                Some(KeyBinding::new(KeyCode::SPACE, ModifierMask::COMMAND))
            );
            seen_in_observer.fetch_add(1, Ordering::SeqCst);
        });

        controller
            .dispatch(PreferenceIntent::SetShortcut(
                ShortcutSlot::SwitchToEnglish,
                cmd_space(),
            ))
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reserved_binding_rejected_before_registry() {
        let mut controller = controller();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_observer = Arc::clone(&seen);
        controller.subscribe(move |_| {
            seen_in_observer.fetch_add(1, Ordering::SeqCst);
        });

        let cmd_tab = KeyBinding::new(KeyCode::TAB, ModifierMask::COMMAND);
        let err = controller
            .dispatch(PreferenceIntent::SetShortcut(ShortcutSlot::Search, cmd_tab))
            .unwrap_err();
        assert!(matches!(
            err,
            IntentError::Invalid(ValidationError::Reserved { .. })
        ));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(controller.preferences().store().save_count(), 0);
    }

    #[test]
    fn test_conflict_surfaces_occupant() {
        let mut controller = controller();
        let shift_space = KeyBinding::new(KeyCode::SPACE, ModifierMask::SHIFT);
        let err = controller
            .dispatch(PreferenceIntent::SetShortcut(
                ShortcutSlot::SwitchToKorean,
                shift_space,
            ))
            .unwrap_err();
        assert_eq!(
            err,
            IntentError::Conflict(ConflictError {
                occupying_slot: ShortcutSlot::ExchangeInputMode,
                binding: shift_space,
            })
        );

        let snapshot = controller
            .dispatch(PreferenceIntent::ReplaceShortcut(
                ShortcutSlot::SwitchToKorean,
                shift_space,
            ))
            .unwrap();
        assert_eq!(snapshot.evicted, Some(ShortcutSlot::ExchangeInputMode));
        assert_eq!(
            snapshot.config.shortcuts.get(ShortcutSlot::SwitchToKorean),
            Some(shift_space)
        );
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let layouts = LayoutList::new(vec![KeyboardLayout::new(
            "com.apple.keylayout.ABC",
            "ABC",
            true,
        )]);
        let mut controller = controller().with_layouts(layouts);
        let err = controller
            .dispatch(PreferenceIntent::SetOverridingKeyboard(
                "com.apple.keylayout.Nope".into(),
            ))
            .unwrap_err();
        assert_eq!(
            err,
            IntentError::UnknownLayout("com.apple.keylayout.Nope".into())
        );
    }

    #[test]
    fn test_flag_and_choice_intents() {
        let mut controller = controller();
        controller
            .dispatch(PreferenceIntent::SetFlag(Flag::HangulAutoReorder, true))
            .unwrap();
        let snapshot = controller
            .dispatch(PreferenceIntent::SetRightToggleKey(
                RightToggleKey::RightControl,
            ))
            .unwrap();
        assert!(snapshot.config.hangul_auto_reorder);
        assert_eq!(snapshot.config.right_toggle_key, RightToggleKey::RightControl);
        assert_eq!(controller.preferences().store().save_count(), 2);
    }
}
