//! 단축키 슬롯과 바인딩 관리
//!
//! 입력기 전환(입력기 바꾸기, 한자 검색, 로마자/한글로 바꾸기)에 쓰이는
//! 네 개의 고정 슬롯을 다룹니다.
//!
//! ```
//! use gureum::shortcut::{KeyBinding, ShortcutRegistry, ShortcutSlot};
//!
//! let mut registry = ShortcutRegistry::new();
//! let cmd_space = KeyBinding::parse("cmd+space").unwrap();
//! registry.set(ShortcutSlot::ExchangeInputMode, cmd_space).unwrap();
//!
//! let err = registry.set(ShortcutSlot::Search, cmd_space).unwrap_err();
//! assert_eq!(err.occupying_slot, ShortcutSlot::ExchangeInputMode);
//! ```

mod keycode;
mod registry;
mod types;
mod validator;

pub use keycode::KeyCode;
pub use registry::{ConflictError, ShortcutRegistry};
pub use types::{KeyBinding, ModifierMask, ShortcutParseError, ShortcutSlot};
pub use validator::{is_reserved, ShortcutValidator, ValidationError};
