mod client;
mod server;

pub use client::IpcClient;
#[cfg(windows)]
pub use server::PipeListener;
pub use server::IpcServer;

pub const PIPE_NAME: &str = r"\\.\pipe\shoji";
