//! CGEvent 수정키 플래그 <-> ModifierMask 변환

use core_graphics::event::{CGEvent, CGEventFlags, EventField};

use crate::shortcut::{KeyCode, ModifierMask, ShortcutRegistry, ShortcutSlot};

/// CGEventFlags에서 Shift/Control/Option/Command만 추출
pub fn modifier_mask(flags: CGEventFlags) -> ModifierMask {
    ModifierMask::from(flags.bits())
}

pub fn event_flags(mask: ModifierMask) -> CGEventFlags {
    CGEventFlags::from_bits_truncate(mask.bits())
}

/// 키 이벤트가 어느 단축키 슬롯에 해당하는지
pub fn match_event(registry: &ShortcutRegistry, event: &CGEvent) -> Option<ShortcutSlot> {
    let keycode = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE) as u16;
    registry.find(KeyCode(keycode), modifier_mask(event.get_flags()))
}
