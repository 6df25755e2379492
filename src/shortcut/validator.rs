//! 단축키 유효성 검사
//!
//! 사용자가 녹화한 조합이 레지스트리에 들어가기 전에 걸러냅니다.

use thiserror::Error;

use super::keycode::KeyCode;
use super::types::{KeyBinding, ModifierMask};

/// 시스템 전역으로 예약된 조합 (키코드, 수정키, 설명)
const RESERVED: &[(u16, u64, &str)] = &[
    (48, ModifierMask::COMMAND.bits(), "앱 전환"),
    (
        48,
        ModifierMask::COMMAND.bits() | ModifierMask::SHIFT.bits(),
        "앱 역방향 전환",
    ),
    (50, ModifierMask::COMMAND.bits(), "윈도우 순환"),
    (12, ModifierMask::COMMAND.bits(), "앱 종료"),
    (4, ModifierMask::COMMAND.bits(), "앱 가리기"),
    (46, ModifierMask::COMMAND.bits(), "윈도우 최소화"),
    (
        53,
        ModifierMask::COMMAND.bits() | ModifierMask::OPTION.bits(),
        "강제 종료",
    ),
    (
        12,
        ModifierMask::COMMAND.bits() | ModifierMask::CONTROL.bits(),
        "화면 잠금",
    ),
    (
        20,
        ModifierMask::COMMAND.bits() | ModifierMask::SHIFT.bits(),
        "화면 캡처",
    ),
    (
        21,
        ModifierMask::COMMAND.bits() | ModifierMask::SHIFT.bits(),
        "영역 캡처",
    ),
    (
        23,
        ModifierMask::COMMAND.bits() | ModifierMask::SHIFT.bits(),
        "스크린샷 도구",
    ),
];

/// 레지스트리에 넣을 수 없는 바인딩
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{binding} 단축키는 시스템에서 사용 중입니다 ({purpose})")]
    Reserved {
        binding: KeyBinding,
        purpose: &'static str,
    },
    #[error("수정키({0})만으로는 단축키를 만들 수 없습니다")]
    ModifierKeyOnly(KeyCode),
    #[error("{0} 단축키에는 수정키가 필요합니다")]
    MissingModifier(KeyBinding),
    #[error("{0} 단축키는 대문자 입력과 겹칩니다")]
    ShiftOnlyCharacter(KeyBinding),
}

/// 시스템 예약 조합 또는 수정키 단독 조합인지
///
/// 순수 함수: 같은 입력이면 항상 같은 결과
pub fn is_reserved(binding: &KeyBinding) -> bool {
    binding.key_code.is_modifier_key() || reserved_purpose(binding).is_some()
}

fn reserved_purpose(binding: &KeyBinding) -> Option<&'static str> {
    RESERVED
        .iter()
        .find(|&&(code, mods, _)| {
            binding.key_code.0 == code && binding.modifiers.bits() == mods
        })
        .map(|&(_, _, purpose)| purpose)
}

/// 단축키 녹화 뷰에 붙는 검사기
#[derive(Debug, Clone, Copy)]
pub struct ShortcutValidator {
    /// 수정키 없는 F키 허용 여부
    pub allow_bare_function_keys: bool,
}

impl Default for ShortcutValidator {
    fn default() -> Self {
        Self {
            allow_bare_function_keys: true,
        }
    }
}

impl ShortcutValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self, binding: &KeyBinding) -> Result<(), ValidationError> {
        if binding.key_code.is_modifier_key() {
            return Err(ValidationError::ModifierKeyOnly(binding.key_code));
        }
        if let Some(purpose) = reserved_purpose(binding) {
            return Err(ValidationError::Reserved {
                binding: *binding,
                purpose,
            });
        }
        if binding.modifiers.is_empty()
            && !(self.allow_bare_function_keys && binding.key_code.is_function_key())
        {
            return Err(ValidationError::MissingModifier(*binding));
        }
        // ⇧Space 같은 조합은 허용, ⇧A 는 대문자 입력을 막음
        if binding.modifiers == ModifierMask::SHIFT && binding.key_code.character().is_some() {
            return Err(ValidationError::ShiftOnlyCharacter(*binding));
        }
        Ok(())
    }

    pub fn is_valid(&self, binding: &KeyBinding) -> bool {
        self.validate(binding).is_ok()
    }
}
