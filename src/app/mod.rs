pub mod session;

pub use session::SiteSession;
