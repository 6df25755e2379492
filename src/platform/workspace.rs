//! 링크 열기 (NSWorkspace)
#![allow(deprecated)] // cocoa 크레이트 deprecated API 사용

use cocoa::base::{id, nil, BOOL, NO};
use cocoa::foundation::NSString;
use objc::{class, msg_send, sel, sel_impl};

use crate::menu::UrlOpener;

/// 기본 브라우저로 URL 열기
pub fn open_url(url: &str) -> Result<(), String> {
    unsafe {
        let ns_url_string = NSString::alloc(nil).init_str(url);
        let ns_url: id = msg_send![class!(NSURL), URLWithString: ns_url_string];
        let _: () = msg_send![ns_url_string, release];
        if ns_url == nil {
            return Err(format!("잘못된 URL: {}", url));
        }

        let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
        let opened: BOOL = msg_send![workspace, openURL: ns_url];
        if opened == NO {
            return Err(format!("URL을 열 수 없습니다: {}", url));
        }
    }
    log::debug!("링크 열기: {}", url);
    Ok(())
}

/// 메뉴 동작에서 쓰는 NSWorkspace 기반 링크 열기
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceOpener;

impl UrlOpener for WorkspaceOpener {
    fn open(&mut self, url: &str) -> Result<(), String> {
        open_url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // GUI 환경에서만 테스트 가능 (브라우저가 열림)
    fn test_open_website() {
        assert!(open_url("http://gureum.io").is_ok());
    }
}
