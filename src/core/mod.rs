pub mod cache;
pub mod content;
pub mod fallback;
pub mod newsletter;
pub mod query;
pub mod rotation;
pub mod search;
pub mod store;

pub use crate::domain::model::{LoadState, SearchResult, Service, Video};
pub use crate::domain::ports::{ConfigProvider, Connectivity, ContentSource};
pub use crate::utils::error::Result;
