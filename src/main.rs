//! 구름 입력기 환경 설정 도구

use clap::{Parser, Subcommand, ValueEnum};
use gureum::config::{JsonFileStore, OptionKeyBehavior, RightToggleKey};
use gureum::menu::Link;
use gureum::platform::system_panel::SystemPanel;
use gureum::{
    Flag, KeyBinding, PreferenceController, PreferenceIntent, PreferenceSnapshot, Preferences,
    ShortcutSlot,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gureum", about = "구름 입력기 환경 설정")]
struct Cli {
    /// 설정 파일 경로 (기본: ~/Library/Application Support/gureum/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 현재 설정 출력
    Show,
    /// 단축키 설정 (예: gureum set exchange cmd+space)
    Set {
        slot: String,
        shortcut: String,
        /// 다른 슬롯이 쓰고 있으면 그 슬롯을 비우고 설정
        #[arg(long)]
        replace: bool,
    },
    /// 단축키 해제
    Clear { slot: String },
    /// 켜고 끄는 설정 (예: gureum flag hangul_auto_reorder true)
    Flag {
        name: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    /// 우측 수정키로 언어 전환
    RightToggle { key: ToggleArg },
    /// 옵션 키 동작 (0: 기본, 1: 무시)
    OptionKey { index: usize },
    /// 기본 키보드 레이아웃 (입력 소스 ID)
    Keyboard { identifier: String },
    /// 시스템 설정 패널 열기
    Panel { panel: PanelArg },
    /// 구름 웹사이트 열기
    Open { link: LinkArg },
}

#[derive(Clone, Copy, ValueEnum)]
enum ToggleArg {
    None,
    Command,
    Option,
    Control,
}

#[derive(Clone, Copy, ValueEnum)]
enum PanelArg {
    Shortcuts,
    InputSources,
    Security,
}

#[derive(Clone, Copy, ValueEnum)]
enum LinkArg {
    Website,
    Help,
    Source,
    Issues,
    Donation,
}

fn print_snapshot(snapshot: &PreferenceSnapshot) {
    let config = &snapshot.config;
    for (slot, binding) in config.shortcuts.iter() {
        match binding {
            Some(binding) => println!("{:<20} {}", slot.label(), binding),
            None => println!("{:<20} -", slot.label()),
        }
    }
    if let Some(evicted) = snapshot.evicted {
        println!("('{}' 단축키가 해제되었습니다)", evicted);
    }

    for flag in Flag::ALL {
        println!("{:<20} {}", flag.label(), if config.flag(flag) { "켬" } else { "끔" });
    }
    println!("우측 키로 언어 전환    {}", config.right_toggle_key.label());
    println!("옵션 키 동작          {}", config.option_key_behavior.index());
    println!("기본 키보드 레이아웃  {}", config.overriding_keyboard_name);
}

fn parse_intent(command: Command) -> Result<Option<PreferenceIntent>, String> {
    let slot = |name: &str| {
        ShortcutSlot::from_name(name).ok_or_else(|| format!("알 수 없는 슬롯: {}", name))
    };

    let intent = match command {
        Command::Show | Command::Panel { .. } | Command::Open { .. } => return Ok(None),
        Command::Set {
            slot: name,
            shortcut,
            replace,
        } => {
            let slot = slot(&name)?;
            let binding = KeyBinding::parse(&shortcut).map_err(|e| e.to_string())?;
            if replace {
                PreferenceIntent::ReplaceShortcut(slot, binding)
            } else {
                PreferenceIntent::SetShortcut(slot, binding)
            }
        }
        Command::Clear { slot: name } => PreferenceIntent::ClearShortcut(slot(&name)?),
        Command::Flag { name, value } => {
            let flag = Flag::from_name(&name).ok_or_else(|| format!("알 수 없는 설정: {}", name))?;
            PreferenceIntent::SetFlag(flag, value)
        }
        Command::RightToggle { key } => PreferenceIntent::SetRightToggleKey(match key {
            ToggleArg::None => RightToggleKey::None,
            ToggleArg::Command => RightToggleKey::RightCommand,
            ToggleArg::Option => RightToggleKey::RightOption,
            ToggleArg::Control => RightToggleKey::RightControl,
        }),
        Command::OptionKey { index } => {
            let behavior = OptionKeyBehavior::from_index(index)
                .ok_or_else(|| format!("옵션 키 동작 범위 초과: {}", index))?;
            PreferenceIntent::SetOptionKeyBehavior(behavior)
        }
        Command::Keyboard { identifier } => PreferenceIntent::SetOverridingKeyboard(identifier),
    };
    Ok(Some(intent))
}

#[cfg(target_os = "macos")]
fn run_platform(command: &Command) -> Result<(), String> {
    use gureum::menu::{perform, MenuAction};
    use gureum::platform::{system_panel, workspace::WorkspaceOpener};
    use gureum::update::StaticUpdateSource;

    match command {
        Command::Panel { panel } => system_panel::reveal(to_panel(*panel)),
        Command::Open { link } => {
            let outcome = perform(
                MenuAction::Open(to_link(*link)),
                &StaticUpdateSource::default(),
                &mut WorkspaceOpener,
            );
            log::debug!("{:?}", outcome);
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(not(target_os = "macos"))]
fn run_platform(command: &Command) -> Result<(), String> {
    match command {
        Command::Panel { panel } => Err(format!(
            "macOS에서만 지원됩니다:\n{}",
            to_panel(*panel).script()
        )),
        Command::Open { link } => Err(format!("macOS에서만 지원됩니다: {}", to_link(*link).url())),
        _ => Ok(()),
    }
}

fn to_panel(panel: PanelArg) -> SystemPanel {
    match panel {
        PanelArg::Shortcuts => SystemPanel::KeyboardShortcuts,
        PanelArg::InputSources => SystemPanel::KeyboardInputSources,
        PanelArg::Security => SystemPanel::SecurityPrivacy,
    }
}

fn to_link(link: LinkArg) -> Link {
    match link {
        LinkArg::Website => Link::Website,
        LinkArg::Help => Link::Help,
        LinkArg::Source => Link::Source,
        LinkArg::Issues => Link::Issues,
        LinkArg::Donation => Link::Donation,
    }
}

fn main() -> ExitCode {
    // 로깅 초기화 (error/warn만 출력)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if matches!(cli.command, Command::Panel { .. } | Command::Open { .. }) {
        return match run_platform(&cli.command) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let store = match cli.config {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::at_default_path(),
    };
    let controller = PreferenceController::new(Preferences::load(store));
    #[cfg(target_os = "macos")]
    let controller = match gureum::platform::keyboard_layouts::list() {
        Ok(layouts) => controller.with_layouts(layouts),
        Err(e) => {
            log::warn!("키보드 레이아웃 목록 조회 실패: {}", e);
            controller
        }
    };
    let mut controller = controller;

    let intent = match parse_intent(cli.command) {
        Ok(intent) => intent,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let snapshot = match intent {
        Some(intent) => match controller.dispatch(intent) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => controller.snapshot(),
    };

    print_snapshot(&snapshot);
    ExitCode::SUCCESS
}
