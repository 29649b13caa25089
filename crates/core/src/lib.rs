pub mod aggregates;
pub mod config;
pub mod error;
pub mod fleet;

pub use aggregates::*;
pub use config::Config;
pub use error::*;
pub use fleet::*;
