pub mod command;
pub mod inset;
pub mod rect;

pub use command::{Command, Response, StateInfo, WindowInfo};
pub use inset::Inset;
pub use rect::Rect;
