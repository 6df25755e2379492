//! 입력기 메뉴 동작
//!
//! 메뉴 항목을 실행한 결과를 UI와 무관한 값(`MenuOutcome`)으로 돌려줍니다.
//! 알림 창, 패널 표시는 호출하는 쪽에서 처리합니다.

use crate::update::{
    ExperimentalReport, UpdateChannel, UpdateReport, UpdateSource, EXPERIMENTAL_TITLE,
    UPDATE_TITLE,
};

/// 웹 링크
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    Website,
    Help,
    Source,
    Issues,
    Donation,
}

impl Link {
    pub fn url(self) -> &'static str {
        match self {
            Link::Website => "http://gureum.io",
            Link::Help => "http://dan.gureum.io",
            Link::Source => "http://ssi.gureum.io",
            Link::Issues => "http://meok.gureum.io",
            Link::Donation => "http://donation.gureum.io",
        }
    }
}

/// 메뉴 항목
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    About,
    Preferences,
    CheckRecentVersion,
    CheckExperimentalVersion,
    Open(Link),
}

impl MenuAction {
    /// 사용 기록 이름 (환경 설정 열기는 기록하지 않음)
    pub fn log_name(self) -> Option<&'static str> {
        match self {
            MenuAction::About => Some("about"),
            MenuAction::Preferences => None,
            MenuAction::CheckRecentVersion => Some("check-version"),
            MenuAction::CheckExperimentalVersion => Some("check-experimental"),
            MenuAction::Open(Link::Website) => Some("website"),
            MenuAction::Open(Link::Help) => Some("website-help"),
            MenuAction::Open(Link::Source) => Some("website-source"),
            MenuAction::Open(Link::Issues) => Some("website-issues"),
            MenuAction::Open(Link::Donation) => Some("website-donation"),
        }
    }
}

/// 메뉴 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    ShowAbout,
    ShowPreferences,
    /// 확인 버튼 하나짜리 알림
    Alert {
        title: &'static str,
        message: String,
    },
    Opened(String),
}

/// 링크 열기 (NSWorkspace 등)
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<(), String>;
}

fn open_logged(opener: &mut dyn UrlOpener, url: &str) {
    if let Err(e) = opener.open(url) {
        log::error!("링크 열기 실패 ({}): {}", url, e);
    }
}

/// 메뉴 항목 실행
pub fn perform(
    action: MenuAction,
    updates: &dyn UpdateSource,
    opener: &mut dyn UrlOpener,
) -> MenuOutcome {
    if let Some(name) = action.log_name() {
        log::info!("menu: {}", name);
    }

    match action {
        MenuAction::About => MenuOutcome::ShowAbout,
        MenuAction::Preferences => MenuOutcome::ShowPreferences,
        MenuAction::CheckRecentVersion => {
            let report = UpdateReport::from_info(updates.fetch(UpdateChannel::Stable));
            if let Some(url) = report.url() {
                open_logged(opener, url);
            }
            MenuOutcome::Alert {
                title: UPDATE_TITLE,
                message: report.message(),
            }
        }
        MenuAction::CheckExperimentalVersion => {
            match ExperimentalReport::from_info(updates.fetch(UpdateChannel::Experimental)) {
                ExperimentalReport::Available { url } => {
                    open_logged(opener, &url);
                    MenuOutcome::Opened(url)
                }
                report @ ExperimentalReport::NotAvailable => MenuOutcome::Alert {
                    title: EXPERIMENTAL_TITLE,
                    message: report.message().unwrap_or_default().to_string(),
                },
            }
        }
        MenuAction::Open(link) => {
            open_logged(opener, link.url());
            MenuOutcome::Opened(link.url().to_string())
        }
    }
}
