pub mod config;
pub mod error;

pub use config::ServiceConfig;
pub use error::{Error, Result};
