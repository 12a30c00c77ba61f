#![cfg_attr(not(windows), allow(dead_code))]

mod app;
mod bridge;
mod core;
mod event;
mod ipc;
mod layout;
mod platform;
#[cfg(windows)]
mod win32;

use std::path::PathBuf;

use anyhow::{bail, Result};
use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use shoji_ipc::{Command, Response};

use crate::core::Config;
use crate::layout::StrategyKind;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shoji - Windows tiling window manager
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    Version(VersionCmd),
    Refresh(RefreshCmd),
    ListWindows(ListWindowsCmd),
    GetState(GetStateCmd),
    ToggleTopmost(ToggleTopmostCmd),
    Restore(RestoreCmd),
    Quit(QuitCmd),
}

/// Start the shoji daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {
    /// path to a config file (default: <config dir>/shoji/config.toml)
    #[argh(option)]
    config: Option<PathBuf>,
    /// log window state instead of tiling
    #[argh(switch)]
    debug: bool,
}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Re-scan displays and windows, then re-tile everything
#[derive(FromArgs)]
#[argh(subcommand, name = "refresh")]
struct RefreshCmd {}

/// List all tracked windows
#[derive(FromArgs)]
#[argh(subcommand, name = "list-windows")]
struct ListWindowsCmd {}

/// Get current window manager state
#[derive(FromArgs)]
#[argh(subcommand, name = "get-state")]
struct GetStateCmd {}

/// Pin a window on top of others, or unpin it
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-topmost")]
struct ToggleTopmostCmd {
    /// window id, as shown by list-windows
    #[argh(positional)]
    id: isize,
}

/// Move every tracked window back to where it was first seen
#[derive(FromArgs)]
#[argh(subcommand, name = "restore")]
struct RestoreCmd {}

/// Restore window positions and quit the shoji daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "quit")]
struct QuitCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["shoji", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(SubCommand::Start(cmd)) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();

            tracing::info!("shoji {} starting", VERSION);
            let config = Config::load(cmd.config.as_deref())?;
            let kind = if cmd.debug {
                StrategyKind::Debug
            } else {
                StrategyKind::Bsp
            };
            run_daemon(config, kind)
        }
        Some(SubCommand::Version(_)) => {
            println!("shoji {}", VERSION);
            Ok(())
        }
        Some(subcmd) => run_cli(subcmd),
    }
}

#[cfg(windows)]
fn run_daemon(config: Config, kind: StrategyKind) -> Result<()> {
    app::App::run(config, kind)
}

#[cfg(not(windows))]
fn run_daemon(_config: Config, _kind: StrategyKind) -> Result<()> {
    bail!("shoji only runs on Windows")
}

#[cfg(windows)]
fn send(cmd: &Command) -> Result<Response> {
    ipc::IpcClient::connect()?.send(cmd)
}

#[cfg(not(windows))]
fn send(_cmd: &Command) -> Result<Response> {
    bail!("shoji only runs on Windows")
}

fn run_cli(subcmd: SubCommand) -> Result<()> {
    let cmd = to_command(subcmd)?;
    let response = send(&cmd)?;

    match response {
        Response::Ok => {}
        Response::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        Response::Windows { windows } => {
            for w in windows {
                println!(
                    "{}: {} - {} [{}x{} @ ({},{}), display={}]{}{}",
                    w.id,
                    w.class_name,
                    w.title,
                    w.rect.width(),
                    w.rect.height(),
                    w.rect.left,
                    w.rect.top,
                    w.display_id
                        .map_or_else(|| "-".to_string(), |id| id.to_string()),
                    if w.is_topmost { " topmost" } else { "" },
                    if w.is_dragging { " dragging" } else { "" }
                );
            }
        }
        Response::State { state } => {
            println!("Strategy: {}", state.strategy);
            println!("Displays: {}", state.display_count);
            println!("Window count: {}", state.window_count);
            println!("Dragging window: {:?}", state.dragging_window_id);
        }
    }

    Ok(())
}

fn to_command(subcmd: SubCommand) -> Result<Command> {
    match subcmd {
        SubCommand::Start(_) | SubCommand::Version(_) => {
            bail!("start and version are not daemon commands")
        }
        SubCommand::Refresh(_) => Ok(Command::Refresh),
        SubCommand::ListWindows(_) => Ok(Command::ListWindows),
        SubCommand::GetState(_) => Ok(Command::GetState),
        SubCommand::ToggleTopmost(cmd) => Ok(Command::ToggleTopmost { window_id: cmd.id }),
        SubCommand::Restore(_) => Ok(Command::RestorePositions),
        SubCommand::Quit(_) => Ok(Command::Quit),
    }
}
