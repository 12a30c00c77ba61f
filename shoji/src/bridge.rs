use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use anyhow::Result;

use crate::event::Event;

pub type EventSink = Box<dyn FnMut(Event) + Send>;
pub type Stopper = Box<dyn FnOnce() + Send>;

/// Source of native window notifications, driven on the bridge thread.
pub trait HookBackend: Send + 'static {
    /// Registers for notifications on the calling thread.
    fn install(&mut self, sink: EventSink) -> Result<()>;
    /// Returns a closure, callable from any thread, that makes `pump` return.
    fn stopper(&self) -> Stopper;
    /// Dispatches notifications to the sink until stopped.
    fn pump(&mut self);
    fn uninstall(&mut self);
}

/// Runs a `HookBackend` on a dedicated thread.
pub struct EventBridge {
    thread: Option<JoinHandle<()>>,
    stopper: Option<Stopper>,
}

impl EventBridge {
    /// Spawns the bridge thread and waits until the hook is installed or has
    /// failed. Installation errors go to `on_error`.
    pub fn start<B, F, E>(mut backend: B, on_event: F, on_error: E) -> Self
    where
        B: HookBackend,
        F: FnMut(Event) + Send + 'static,
        E: FnOnce(anyhow::Error) + Send + 'static,
    {
        let (ready_tx, ready_rx) = mpsc::channel::<Stopper>();

        let thread = thread::spawn(move || {
            if let Err(e) = backend.install(Box::new(on_event)) {
                tracing::error!("Failed to install event hook: {:#}", e);
                drop(ready_tx);
                on_error(e);
                return;
            }
            tracing::info!("Event hook installed");
            let _ = ready_tx.send(backend.stopper());

            backend.pump();

            backend.uninstall();
            tracing::info!("Event hook removed");
        });

        Self {
            thread: Some(thread),
            stopper: ready_rx.recv().ok(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stopper.is_some() && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signals the bridge thread to leave its loop and waits for it.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stopper.take() {
            stop();
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Event bridge thread panicked");
            }
        }
    }
}

impl Drop for EventBridge {
    fn drop(&mut self) {
        self.stop();
    }
}
