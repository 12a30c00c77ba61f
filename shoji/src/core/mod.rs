mod config;
mod display;
mod manager;
mod topology;
mod tracker;
mod window;

pub use config::*;
pub use display::*;
pub use manager::*;
pub use topology::*;
pub use tracker::*;
pub use window::*;
