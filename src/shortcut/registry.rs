//! 단축키 레지스트리
//!
//! 네 개의 고정 슬롯에 대해 슬롯당 최대 하나의 바인딩을 보관합니다.
//! 서로 다른 두 슬롯이 같은 (키코드, 수정키) 조합을 동시에 가질 수 없습니다.
//!
//! 중복 정책: `set`은 충돌 시 거부하고 점유 슬롯을 알려줍니다.
//! 기존 슬롯을 비우고 덮어쓰려면 `replace`를 명시적으로 호출해야 합니다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::keycode::KeyCode;
use super::types::{KeyBinding, ModifierMask, ShortcutSlot};

/// 이미 다른 슬롯이 같은 바인딩을 사용 중
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{binding} 단축키는 이미 '{occupying_slot}'에서 사용 중입니다")]
pub struct ConflictError {
    pub occupying_slot: ShortcutSlot,
    pub binding: KeyBinding,
}

/// 슬롯별 단축키 바인딩
///
/// 설정 파일에는 슬롯마다 하나의 키로 평탄화되어 저장됩니다.
/// 키가 없으면 기본 단축키, `null`이면 해제된 슬롯입니다.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct ShortcutRegistry {
    #[serde(default = "default_exchange_key", rename = "input_mode_exchange_key")]
    exchange_input_mode: Option<KeyBinding>,
    #[serde(default = "default_search_key", rename = "input_mode_search_key")]
    search: Option<KeyBinding>,
    #[serde(default, rename = "input_mode_english_key")]
    switch_to_english: Option<KeyBinding>,
    #[serde(default, rename = "input_mode_korean_key")]
    switch_to_korean: Option<KeyBinding>,
}

fn default_exchange_key() -> Option<KeyBinding> {
    Some(KeyBinding::new(KeyCode::SPACE, ModifierMask::SHIFT))
}

fn default_search_key() -> Option<KeyBinding> {
    Some(KeyBinding::new(KeyCode::RETURN, ModifierMask::OPTION))
}

impl ShortcutRegistry {
    /// 모든 슬롯이 비어 있는 레지스트리
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 단축키: ⇧Space (입력기 바꾸기), ⌥Return (한자 검색)
    pub fn with_defaults() -> Self {
        Self {
            exchange_input_mode: default_exchange_key(),
            search: default_search_key(),
            switch_to_english: None,
            switch_to_korean: None,
        }
    }

    fn slot_ref(&self, slot: ShortcutSlot) -> &Option<KeyBinding> {
        match slot {
            ShortcutSlot::ExchangeInputMode => &self.exchange_input_mode,
            ShortcutSlot::Search => &self.search,
            ShortcutSlot::SwitchToEnglish => &self.switch_to_english,
            ShortcutSlot::SwitchToKorean => &self.switch_to_korean,
        }
    }

    fn slot_mut(&mut self, slot: ShortcutSlot) -> &mut Option<KeyBinding> {
        match slot {
            ShortcutSlot::ExchangeInputMode => &mut self.exchange_input_mode,
            ShortcutSlot::Search => &mut self.search,
            ShortcutSlot::SwitchToEnglish => &mut self.switch_to_english,
            ShortcutSlot::SwitchToKorean => &mut self.switch_to_korean,
        }
    }

    pub fn get(&self, slot: ShortcutSlot) -> Option<KeyBinding> {
        *self.slot_ref(slot)
    }

    /// 바인딩을 가진 슬롯 (없으면 None)
    pub fn occupant(&self, binding: &KeyBinding) -> Option<ShortcutSlot> {
        ShortcutSlot::ALL
            .into_iter()
            .find(|&slot| self.slot_ref(slot).as_ref() == Some(binding))
    }

    /// 슬롯에 바인딩 저장
    ///
    /// 다른 슬롯이 같은 바인딩을 갖고 있으면 아무것도 바꾸지 않고 `ConflictError`를 반환합니다.
    /// 같은 슬롯에 같은 바인딩을 다시 설정하는 것은 성공입니다.
    pub fn set(&mut self, slot: ShortcutSlot, binding: KeyBinding) -> Result<(), ConflictError> {
        match self.occupant(&binding) {
            Some(occupying_slot) if occupying_slot != slot => Err(ConflictError {
                occupying_slot,
                binding,
            }),
            _ => {
                *self.slot_mut(slot) = Some(binding);
                Ok(())
            }
        }
    }

    /// 점유 슬롯을 비운 뒤 바인딩 저장. 비워진 슬롯을 반환
    pub fn replace(&mut self, slot: ShortcutSlot, binding: KeyBinding) -> Option<ShortcutSlot> {
        let evicted = self
            .occupant(&binding)
            .filter(|&occupying_slot| occupying_slot != slot);
        if let Some(other) = evicted {
            *self.slot_mut(other) = None;
        }
        *self.slot_mut(slot) = Some(binding);
        evicted
    }

    pub fn clear(&mut self, slot: ShortcutSlot) {
        *self.slot_mut(slot) = None;
    }

    /// 눌린 키에 해당하는 슬롯 찾기
    ///
    /// 수정키는 Shift/Control/Option/Command 네 비트만 비교합니다.
    pub fn find(&self, key_code: KeyCode, modifiers: ModifierMask) -> Option<ShortcutSlot> {
        let pressed = KeyBinding::new(key_code, modifiers & ModifierMask::all());
        self.occupant(&pressed)
    }

    /// (슬롯, 바인딩) 순회 - 빈 슬롯 포함
    pub fn iter(&self) -> impl Iterator<Item = (ShortcutSlot, Option<KeyBinding>)> + '_ {
        ShortcutSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.get(slot)))
    }

    /// 중복 바인딩 제거 (앞 슬롯 우선). 비워진 슬롯 목록 반환
    ///
    /// 직접 편집된 설정 파일처럼 불변식을 깨는 입력을 불러올 때 사용합니다.
    pub fn normalize(&mut self) -> Vec<ShortcutSlot> {
        let mut cleared = Vec::new();
        for (i, &slot) in ShortcutSlot::ALL.iter().enumerate() {
            let Some(binding) = self.get(slot) else {
                continue;
            };
            let taken = ShortcutSlot::ALL[..i]
                .iter()
                .any(|&earlier| self.get(earlier) == Some(binding));
            if taken {
                log::warn!("중복 단축키 {} 제거: {}", binding, slot);
                self.clear(slot);
                cleared.push(slot);
            }
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd_space() -> KeyBinding {
        KeyBinding::new(KeyCode::SPACE, ModifierMask::COMMAND)
    }

    #[test]
    fn test_empty_registry() {
        let registry = ShortcutRegistry::new();
        for slot in ShortcutSlot::ALL {
            assert_eq!(registry.get(slot), None);
        }
    }

    #[test]
    fn test_set_then_get() {
        for slot in ShortcutSlot::ALL {
            let mut registry = ShortcutRegistry::new();
            registry.set(slot, cmd_space()).unwrap();
            assert_eq!(registry.get(slot), Some(cmd_space()));
        }
    }

    #[test]
    fn test_clear_then_get() {
        let mut registry = ShortcutRegistry::with_defaults();
        for slot in ShortcutSlot::ALL {
            registry.clear(slot);
            assert_eq!(registry.get(slot), None);
        }
    }

    #[test]
    fn test_conflict_names_occupant() {
        let mut registry = ShortcutRegistry::new();
        registry
            .set(ShortcutSlot::ExchangeInputMode, cmd_space())
            .unwrap();

        let err = registry.set(ShortcutSlot::Search, cmd_space()).unwrap_err();
        assert_eq!(err.occupying_slot, ShortcutSlot::ExchangeInputMode);
        assert_eq!(err.binding, cmd_space());

        // 상태는 변하지 않음
        assert_eq!(registry.get(ShortcutSlot::Search), None);
        assert_eq!(
            registry.get(ShortcutSlot::ExchangeInputMode),
            Some(cmd_space())
        );
    }

    #[test]
    fn test_conflict_policy_is_consistent() {
        let mut registry = ShortcutRegistry::new();
        registry
            .set(ShortcutSlot::SwitchToEnglish, cmd_space())
            .unwrap();
        for _ in 0..3 {
            let err = registry
                .set(ShortcutSlot::SwitchToKorean, cmd_space())
                .unwrap_err();
            assert_eq!(err.occupying_slot, ShortcutSlot::SwitchToEnglish);
        }
    }

    #[test]
    fn test_same_slot_reassign_is_ok() {
        let mut registry = ShortcutRegistry::new();
        registry.set(ShortcutSlot::Search, cmd_space()).unwrap();
        assert!(registry.set(ShortcutSlot::Search, cmd_space()).is_ok());
    }

    #[test]
    fn test_different_modifiers_do_not_conflict() {
        let mut registry = ShortcutRegistry::new();
        registry.set(ShortcutSlot::Search, cmd_space()).unwrap();
        let shifted = KeyBinding::new(KeyCode::SPACE, ModifierMask::COMMAND | ModifierMask::SHIFT);
        assert!(registry.set(ShortcutSlot::SwitchToKorean, shifted).is_ok());
    }

    #[test]
    fn test_replace_evicts_occupant() {
        let mut registry = ShortcutRegistry::new();
        registry.set(ShortcutSlot::Search, cmd_space()).unwrap();

        let evicted = registry.replace(ShortcutSlot::ExchangeInputMode, cmd_space());
        assert_eq!(evicted, Some(ShortcutSlot::Search));
        assert_eq!(registry.get(ShortcutSlot::Search), None);
        assert_eq!(
            registry.get(ShortcutSlot::ExchangeInputMode),
            Some(cmd_space())
        );

        // 자기 자신은 비우지 않음
        assert_eq!(
            registry.replace(ShortcutSlot::ExchangeInputMode, cmd_space()),
            None
        );
    }

    #[test]
    fn test_find_ignores_extra_flags() {
        let registry = ShortcutRegistry::with_defaults();
        let pressed = ModifierMask::from(ModifierMask::SHIFT.bits() | (1 << 16));
        assert_eq!(
            registry.find(KeyCode::SPACE, pressed),
            Some(ShortcutSlot::ExchangeInputMode)
        );
        assert_eq!(registry.find(KeyCode::SPACE, ModifierMask::empty()), None);
    }

    #[test]
    fn test_normalize_keeps_first_slot() {
        let json = r#"{
            "input_mode_exchange_key": {"key_code": 49, "modifiers": 1048576},
            "input_mode_search_key": null,
            "input_mode_korean_key": {"key_code": 49, "modifiers": 1048576}
        }"#;
        let mut registry: ShortcutRegistry = serde_json::from_str(json).unwrap();
        let cleared = registry.normalize();
        assert_eq!(cleared, vec![ShortcutSlot::SwitchToKorean]);
        assert_eq!(
            registry.get(ShortcutSlot::ExchangeInputMode),
            Some(cmd_space())
        );
        assert_eq!(registry.get(ShortcutSlot::SwitchToKorean), None);
    }

    #[test]
    fn test_iter_covers_all_slots() {
        let registry = ShortcutRegistry::with_defaults();
        let bound: Vec<_> = registry
            .iter()
            .filter_map(|(slot, binding)| binding.map(|_| slot))
            .collect();
        assert_eq!(
            bound,
            vec![ShortcutSlot::ExchangeInputMode, ShortcutSlot::Search]
        );
        assert_eq!(registry.iter().count(), 4);
    }
}
