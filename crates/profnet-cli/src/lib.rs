pub mod config;
pub mod console;
pub mod menu;

pub use config::Config;
pub use console::Console;
