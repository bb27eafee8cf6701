mod command;
pub mod error;
pub mod gauge;
mod reading;

pub use command::*;
pub use reading::*;

pub static CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
