pub mod config;
pub mod controller;
pub mod input_source;
pub mod menu;
pub mod platform;
pub mod preferences;
pub mod shortcut;
pub mod update;

pub use config::{load_config, save_config, ConfigStore, GureumConfig, JsonFileStore, MemoryStore};
pub use controller::{IntentError, PreferenceController, PreferenceIntent, PreferenceSnapshot};
pub use preferences::{Flag, Preferences};
pub use shortcut::{is_reserved, ConflictError, KeyBinding, ShortcutRegistry, ShortcutSlot};
