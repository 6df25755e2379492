//! 시스템 설정 패널 열기 (AppleScript)

/// 환경 설정 창에서 바로 열 수 있는 시스템 설정 패널
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemPanel {
    /// 키보드 > 단축키
    KeyboardShortcuts,
    /// 키보드 > 입력 소스
    KeyboardInputSources,
    /// 보안 및 개인 정보 보호 > 개인 정보
    SecurityPrivacy,
}

impl SystemPanel {
    fn pane_and_anchor(self) -> (&'static str, &'static str) {
        match self {
            SystemPanel::KeyboardShortcuts => ("com.apple.preference.keyboard", "ShortcutsTab"),
            SystemPanel::KeyboardInputSources => ("com.apple.preference.keyboard", "InputSources"),
            SystemPanel::SecurityPrivacy => ("com.apple.preference.security", "Privacy"),
        }
    }

    /// 패널을 여는 AppleScript
    pub fn script(self) -> String {
        let (pane, anchor) = self.pane_and_anchor();
        format!(
            "tell application \"System Preferences\"\n    activate\n    reveal anchor \"{}\" of pane id \"{}\"\nend tell",
            anchor, pane
        )
    }
}

/// AppleScript 실행 (NSAppleScript)
#[cfg(target_os = "macos")]
#[allow(deprecated)] // cocoa 크레이트 deprecated API 사용
pub fn run_apple_script(source: &str) -> Result<(), String> {
    use cocoa::base::{id, nil};
    use cocoa::foundation::NSString;
    use objc::{class, msg_send, sel, sel_impl};

    unsafe {
        let ns_source = NSString::alloc(nil).init_str(source);
        let script: id = msg_send![class!(NSAppleScript), alloc];
        let script: id = msg_send![script, initWithSource: ns_source];
        let _: () = msg_send![ns_source, release];
        if script == nil {
            return Err("NSAppleScript 생성 실패".to_string());
        }

        let mut error: id = nil;
        let output: id = msg_send![script, executeAndReturnError: &mut error as *mut id];
        let _: () = msg_send![script, release];

        if output == nil {
            return Err(format!("AppleScript 실행 실패: {:?}", error));
        }
    }
    Ok(())
}

/// 시스템 설정 패널 열기
#[cfg(target_os = "macos")]
pub fn reveal(panel: SystemPanel) -> Result<(), String> {
    log::debug!("시스템 설정 패널 열기: {:?}", panel);
    run_apple_script(&panel.script())
}
