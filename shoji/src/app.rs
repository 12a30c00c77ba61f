use std::ops::ControlFlow;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use shoji_ipc::{Command, Response};

use crate::core::{WindowHandle, WindowManager};
use crate::event::Event;
use crate::platform::{WindowManipulator, WindowSystem};

pub type IpcCommandWithResponse = (Command, mpsc::Sender<Response>);

/// Everything the main thread reacts to, in arrival order.
pub enum Message {
    Event(Event),
    Command(IpcCommandWithResponse),
    HookFailed(anyhow::Error),
    ServerFailed(anyhow::Error),
}

/// Applies one message to the manager. `Break` means the daemon should exit.
pub fn handle_message<P>(manager: &mut WindowManager<P>, message: Message) -> Result<ControlFlow<()>>
where
    P: WindowSystem + WindowManipulator,
{
    match message {
        Message::Event(event) => {
            manager.on_event(event);
            Ok(ControlFlow::Continue(()))
        }
        Message::Command((cmd, resp_tx)) => {
            tracing::debug!("Received IPC command: {:?}", cmd);
            let response = handle_ipc_command(manager, &cmd);
            let _ = resp_tx.blocking_send(response);

            // Quit only after the client has its answer
            if matches!(cmd, Command::Quit) {
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        }
        Message::HookFailed(e) => Err(e).context("Window event hook could not be installed"),
        Message::ServerFailed(e) => Err(e).context("IPC server stopped"),
    }
}

pub fn handle_ipc_command<P>(manager: &mut WindowManager<P>, cmd: &Command) -> Response
where
    P: WindowSystem + WindowManipulator,
{
    match cmd {
        Command::Refresh => {
            manager.refresh();
            Response::Ok
        }
        Command::ToggleTopmost { window_id } => {
            match manager.toggle_window_topmost(WindowHandle(*window_id)) {
                Ok(_) => Response::Ok,
                Err(e) => Response::Error {
                    message: format!("{:#}", e),
                },
            }
        }
        Command::RestorePositions => {
            manager.restore_positions();
            Response::Ok
        }
        Command::ListWindows => Response::Windows {
            windows: manager.window_infos(),
        },
        Command::GetState => Response::State {
            state: manager.state_info(),
        },
        Command::Quit => {
            tracing::info!("Quit requested");
            manager.restore_positions();
            Response::Ok
        }
    }
}

#[cfg(windows)]
pub use self::daemon::App;

#[cfg(windows)]
mod daemon {
    use std::sync::mpsc as std_mpsc;

    use anyhow::{Context, Result};
    use tokio::sync::mpsc;

    use shoji_ipc::Command;

    use super::{handle_message, IpcCommandWithResponse, Message};
    use crate::bridge::EventBridge;
    use crate::core::{Config, WindowManager};
    use crate::ipc::{IpcServer, PipeListener, PIPE_NAME};
    use crate::layout::StrategyKind;
    use crate::platform::Win32Platform;
    use crate::win32::Win32HookBackend;

    pub struct App {}

    impl App {
        pub fn run(config: Config, kind: StrategyKind) -> Result<()> {
            // Channel: bridge + tokio -> main thread
            let (tx, rx) = std_mpsc::channel::<Message>();

            // Spawn tokio runtime in separate thread; it reports once the pipe exists
            let (ready_tx, ready_rx) = std_mpsc::channel::<Result<()>>();
            let relay_tx = tx.clone();
            std::thread::spawn(move || {
                let rt = match tokio::runtime::Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(e).context("Failed to start tokio runtime")));
                        return;
                    }
                };
                rt.block_on(Self::run_async(relay_tx, ready_tx));
            });
            ready_rx.recv().context("IPC thread exited before starting")??;

            let event_tx = tx.clone();
            let error_tx = tx;
            let mut bridge = EventBridge::start(
                Win32HookBackend::new(),
                move |event| {
                    let _ = event_tx.send(Message::Event(event));
                },
                move |e| {
                    let _ = error_tx.send(Message::HookFailed(e));
                },
            );

            let mut manager = WindowManager::new(Win32Platform, &config, kind);
            // Without a hook the HookFailed message ends the loop; leave windows alone
            if bridge.is_running() {
                manager.refresh();
            }

            tracing::info!("Starting main loop");
            let result = loop {
                let Ok(message) = rx.recv() else {
                    break Ok(());
                };
                match handle_message(&mut manager, message) {
                    Ok(flow) if flow.is_break() => break Ok(()),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                }
            };

            bridge.stop();
            tracing::info!("shoji stopped");
            result
        }

        async fn run_async(tx: std_mpsc::Sender<Message>, ready_tx: std_mpsc::Sender<Result<()>>) {
            tracing::info!("Tokio runtime started");

            let listener = match PipeListener::bind(PIPE_NAME) {
                Ok(listener) => listener,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));

            let (ipc_tx, mut ipc_rx) = mpsc::channel::<IpcCommandWithResponse>(256);
            let ipc_server = IpcServer::new(ipc_tx);
            let failed_tx = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = ipc_server.serve(listener).await {
                    tracing::error!("IPC server error: {:#}", e);
                    let _ = failed_tx.send(Message::ServerFailed(e));
                }
            });

            // Forward IPC commands to main thread
            let relay_tx = tx.clone();
            tokio::spawn(async move {
                while let Some(cmd) = ipc_rx.recv().await {
                    if relay_tx.send(Message::Command(cmd)).is_err() {
                        tracing::error!("Failed to forward IPC command to main thread");
                        break;
                    }
                }
            });

            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Interrupted, shutting down");
                    let (resp_tx, _resp_rx) = mpsc::channel(1);
                    let _ = tx.send(Message::Command((Command::Quit, resp_tx)));
                }
                Err(e) => {
                    tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            }

            tracing::info!("Tokio runtime exiting");
        }
    }
}
