pub mod backup;
pub mod config;
pub mod engine;
pub mod error;
pub mod imports;
pub mod layout;
pub mod mover;
pub mod report;
pub mod verify;

pub use config::AppConfig;
pub use engine::{ReorgEngine, ReorgResult};
pub use error::Error;
