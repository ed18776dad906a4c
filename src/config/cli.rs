use super::{SiteConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "site-sync")]
#[command(about = "Query and sync content for the firm website")]
pub struct CliArgs {
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List services (cached once per session)
    Services,
    /// Show one service by slug, with its content sections
    Service { slug: String },
    /// List hero videos and walk one rotation cycle
    Videos,
    /// List team members
    Team,
    /// List testimonials
    Testimonials,
    /// List clients
    Clients,
    /// Search team members and services
    Search { query: String },
    /// Subscribe an email address to the newsletter
    Subscribe { email: String },
    /// Resolve a locale-prefixed path
    Route { path: String },
}

impl CliArgs {
    pub fn site_config(&self) -> crate::Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::from_file(path)?,
            None => SiteConfig {
                base_url: self.base_url.clone(),
                timeout_seconds: self.timeout_seconds,
                ..SiteConfig::default()
            },
        };
        config.verbose |= self.verbose;
        Ok(config)
    }
}
