use std::cell::RefCell;

use anyhow::{bail, Context, Result};
use windows::Win32::Foundation::{HMODULE, HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent, HWINEVENTHOOK};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW, TranslateMessage, MSG,
    PM_NOREMOVE, WINEVENT_OUTOFCONTEXT, WM_QUIT,
};

use crate::bridge::{EventSink, HookBackend, Stopper};
use crate::event::{Event, EVENT_MAX, EVENT_MIN};

thread_local! {
    // The WinEvent callback carries no user data; the sink and hook live on
    // the thread that installed them.
    static SINK: RefCell<Option<EventSink>> = const { RefCell::new(None) };
    static HOOK: RefCell<Option<HWINEVENTHOOK>> = const { RefCell::new(None) };
}

unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    let Some(event) = Event::from_raw(event, hwnd.0 as isize, id_object) else {
        return;
    };
    SINK.with(|sink| {
        if let Some(sink) = sink.borrow_mut().as_mut() {
            sink(event);
        }
    });
}

/// Out-of-context WinEvent hook over the full event range.
#[derive(Debug, Default)]
pub struct Win32HookBackend {
    thread_id: u32,
}

impl Win32HookBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HookBackend for Win32HookBackend {
    fn install(&mut self, sink: EventSink) -> Result<()> {
        unsafe {
            self.thread_id = GetCurrentThreadId();

            // Make sure the thread has a message queue before anyone posts to it
            let mut msg = MSG::default();
            let _ = PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_NOREMOVE);

            let hook = SetWinEventHook(
                EVENT_MIN,
                EVENT_MAX,
                HMODULE::default(),
                Some(win_event_proc),
                0,
                0,
                WINEVENT_OUTOFCONTEXT,
            );
            if hook.is_invalid() {
                bail!("SetWinEventHook returned a null hook");
            }
            HOOK.with(|h| *h.borrow_mut() = Some(hook));
        }
        SINK.with(|s| *s.borrow_mut() = Some(sink));
        Ok(())
    }

    fn stopper(&self) -> Stopper {
        let thread_id = self.thread_id;
        Box::new(move || {
            let posted = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
                .context("PostThreadMessageW failed");
            if let Err(e) = posted {
                tracing::error!("Failed to stop event thread: {:#}", e);
            }
        })
    }

    fn pump(&mut self) {
        let mut msg = MSG::default();
        loop {
            let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
            // 0 is WM_QUIT, -1 is an error
            if ret.0 <= 0 {
                if ret.0 < 0 {
                    tracing::error!("GetMessageW failed");
                }
                break;
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }

    fn uninstall(&mut self) {
        if let Some(hook) = HOOK.with(|h| h.borrow_mut().take()) {
            if !unsafe { UnhookWinEvent(hook) }.as_bool() {
                tracing::warn!("UnhookWinEvent failed");
            }
        }
        SINK.with(|s| *s.borrow_mut() = None);
    }
}
