//! Win32 window, monitor and WinEvent bindings.

mod display;
mod hook;
mod window;

pub use display::*;
pub use hook::Win32HookBackend;
pub use window::*;
