pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use config::Config;
pub use error::{RelayError, Result};
pub use services::RelayService;
