pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::ContentGateway;
pub use app::SiteSession;
pub use config::SiteConfig;
pub use crate::core::store::{Action, AppState, Store};
pub use utils::error::{Result, SiteError};
