//! 업데이트 확인
//!
//! 업데이트 정보를 가져오는 네트워크 호출은 `UpdateSource` 구현체가 담당하고,
//! 이 모듈은 결과를 사용자 메시지로 해석하고 백그라운드 실행만 맡습니다.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// 업데이트 채널
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateChannel {
    Stable,
    Experimental,
}

/// 최신 버전 항목
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateEntry {
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

/// 업데이트 서버 응답
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VersionInfo {
    /// 현재 설치된 버전 (알 수 없으면 None)
    #[serde(default)]
    pub current: Option<String>,
    pub update: UpdateEntry,
}

impl VersionInfo {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// 업데이트 정보 제공자 (HTTP 클라이언트 등)
pub trait UpdateSource: Send + Sync {
    /// 정보를 가져올 수 없으면 None
    fn fetch(&self, channel: UpdateChannel) -> Option<VersionInfo>;
}

/// 고정된 응답을 돌려주는 제공자
#[derive(Debug, Clone, Default)]
pub struct StaticUpdateSource {
    pub stable: Option<VersionInfo>,
    pub experimental: Option<VersionInfo>,
}

impl UpdateSource for StaticUpdateSource {
    fn fetch(&self, channel: UpdateChannel) -> Option<VersionInfo> {
        match channel {
            UpdateChannel::Stable => self.stable.clone(),
            UpdateChannel::Experimental => self.experimental.clone(),
        }
    }
}

/// http(s) 링크만 열 수 있는 URL로 취급
pub fn is_openable_url(url: &str) -> bool {
    let url = url.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

pub const UPDATE_TITLE: &str = "구름 입력기 업데이트 확인";
pub const EXPERIMENTAL_TITLE: &str = "구름 입력기 실험 버전 확인";

/// 안정 버전 확인 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateReport {
    /// 업데이트 정보에 접근할 수 없음
    Unreachable,
    UpToDate {
        current: Option<String>,
    },
    Available {
        current: Option<String>,
        latest: String,
        description: String,
        /// 열 수 있는 링크가 없으면 None
        url: Option<String>,
    },
}

impl UpdateReport {
    pub fn from_info(info: Option<VersionInfo>) -> Self {
        let Some(info) = info else {
            return UpdateReport::Unreachable;
        };
        if info.current.as_deref() == Some(info.update.version.as_str()) {
            return UpdateReport::UpToDate {
                current: info.current,
            };
        }
        let url = Some(info.update.url).filter(|u| is_openable_url(u));
        UpdateReport::Available {
            current: info.current,
            latest: info.update.version,
            description: info.update.description,
            url,
        }
    }

    /// 알림 창에 표시할 문구
    pub fn message(&self) -> String {
        match self {
            UpdateReport::Unreachable => "업데이트 정보에 접근할 수 없습니다. 인터넷에 연결되어 있지 않거나 구름 업데이트의 버그일 수 있습니다.".to_string(),
            UpdateReport::UpToDate { current } => format!(
                "현재 사용하고 있는 구름 입력기 {} 는 최신 버전입니다.",
                current.as_deref().unwrap_or("-")
            ),
            UpdateReport::Available {
                current,
                latest,
                description,
                url,
            } => {
                let mut message = format!(
                    "현재 사용하고 있는 구름 입력기는 {} 이고 최신 버전은 {} 입니다. 업데이트는 로그아웃하거나 재부팅해야 적용됩니다.",
                    current.as_deref().unwrap_or("-"),
                    latest
                );
                if !description.is_empty() {
                    message.push_str(&format!(" 업데이트 요약은 '{}' 입니다.", description));
                }
                if url.is_none() {
                    message.push_str(" 현재 업데이트 링크를 찾을 수 없습니다. 버그 리포트를 부탁드립니다.");
                }
                message
            }
        }
    }

    /// 새 버전이 있을 때 열어야 할 링크
    pub fn url(&self) -> Option<&str> {
        match self {
            UpdateReport::Available { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    pub fn is_update_available(&self) -> bool {
        matches!(self, UpdateReport::Available { .. })
    }
}

/// 실험 버전 확인 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentalReport {
    /// 운영 중인 실험 버전이 없음
    NotAvailable,
    Available { url: String },
}

impl ExperimentalReport {
    pub fn from_info(info: Option<VersionInfo>) -> Self {
        match info {
            Some(info) if is_openable_url(&info.update.url) => ExperimentalReport::Available {
                url: info.update.url,
            },
            _ => ExperimentalReport::NotAvailable,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            ExperimentalReport::NotAvailable => {
                Some("현재 운영중인 실험 버전이 없습니다. 나중에 다시 확인해 주세요.")
            }
            ExperimentalReport::Available { .. } => None,
        }
    }
}

/// 자동 업데이트 알림에 사용할 채널
///
/// 알림이 꺼져 있으면 None. 실험 빌드는 항상 실험 채널을 따라갑니다.
pub fn auto_channel(
    notification: bool,
    experimental_notification: bool,
    experimental_build: bool,
) -> Option<UpdateChannel> {
    if !notification {
        return None;
    }
    if experimental_build || experimental_notification {
        Some(UpdateChannel::Experimental)
    } else {
        Some(UpdateChannel::Stable)
    }
}

/// 업데이트 확인 (블로킹)
pub fn check(source: &dyn UpdateSource, channel: UpdateChannel) -> UpdateReport {
    UpdateReport::from_info(source.fetch(channel))
}

/// 백그라운드 스레드에서 업데이트 확인 후 콜백 호출
pub fn spawn_check<F>(
    source: Arc<dyn UpdateSource>,
    channel: UpdateChannel,
    on_done: F,
) -> JoinHandle<()>
where
    F: FnOnce(UpdateReport) + Send + 'static,
{
    thread::spawn(move || {
        let report = check(source.as_ref(), channel);
        log::debug!("업데이트 확인 완료 ({:?}): {:?}", channel, report);
        on_done(report);
    })
}
