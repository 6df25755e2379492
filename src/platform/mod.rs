//! macOS 연동
//!
//! 시스템 설정 패널 열기와 AppleScript 문구는 모든 플랫폼에서 빌드되고,
//! 실제 AppKit/Carbon 호출은 macOS에서만 컴파일됩니다.

#[cfg(target_os = "macos")]
pub mod event_flags;
#[cfg(target_os = "macos")]
pub mod keyboard_layouts;
pub mod system_panel;
#[cfg(target_os = "macos")]
pub mod workspace;
