use clap::Parser;
use site_sync::config::cli::Command;
use site_sync::core::content::{self, content_sections, ContentItem};
use site_sync::core::newsletter::NewsletterMessage;
use site_sync::core::rotation::{slide_background, HeroRotation};
use site_sync::core::store::Resource;
use site_sync::domain::model::LoadState;
use site_sync::utils::error::ErrorSeverity;
use site_sync::utils::logger::{self, LogFormat};
use site_sync::{CliArgs, SiteSession};
use tracing::Instrument;

fn fail(e: &site_sync::SiteError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, args.verbose);

    let config = args.site_config().unwrap_or_else(|e| fail(&e));
    if config.verbose {
        tracing::debug!("Site config: {:?}", config);
    }

    let session = SiteSession::connect(config).unwrap_or_else(|e| fail(&e));
    let span = tracing::info_span!("session", backend = %session.config().base_url);
    run(&session, args.command).instrument(span).await;

    Ok(())
}

async fn run(session: &SiteSession, command: Command) {
    match command {
        Command::Services => {
            let cache = session.cache();
            if cache.ensure_loaded(Resource::Services).await == LoadState::Error {
                let reason = session
                    .store()
                    .read(|s| s.error(Resource::Services).map(str::to_string));
                tracing::warn!("Services unavailable: {}", reason.unwrap_or_default());
            }
            let state = session.store().state();
            if let Some(listing) = content::service_listing(&state) {
                if listing.is_fallback() {
                    println!("(showing fallback services)");
                }
                for service in &listing.items {
                    println!("{:<28} {}", service.slug, service.title);
                }
            }
        }
        Command::Service { slug } => match content::load_service(session.source(), &slug).await {
            Some(service) => {
                println!("{}\n", service.title);
                println!("{}\n", service.description);
                for section in content_sections(service.content.as_deref().unwrap_or_default()) {
                    println!("## {}", section.heading);
                    for item in section.items {
                        match item {
                            ContentItem::Paragraph(text) => println!("{}", text),
                            ContentItem::Bullet(text) => println!("  • {}", text),
                        }
                    }
                    println!();
                }
            }
            None => {
                eprintln!("Service '{}' not found", slug);
                std::process::exit(1);
            }
        },
        Command::Videos => {
            session.cache().ensure_loaded(Resource::Videos).await;
            let videos = session.store().state().videos.items;
            let mut rotation = HeroRotation::from_videos(&videos);
            println!("{} hero videos, {} indicator dots", videos.len(), rotation.indicator_count());

            let slides: usize = videos.iter().map(|v| v.media_count().max(1)).sum::<usize>().max(1);
            for _ in 0..slides {
                let background = slide_background(&videos, rotation.position(), |url| {
                    session.source().resolve_media_url(url)
                });
                let counter = rotation
                    .media_counter()
                    .map(|(n, total)| format!(" [{}/{}]", n, total))
                    .unwrap_or_default();
                println!("{:?}{} -> {:?}", rotation.position(), counter, background);
                rotation.advance();
            }
        }
        Command::Team => {
            let team = content::load_team_members(session.source()).await;
            for member in &team.items {
                println!("{} - {}", member.name, member.role);
            }
        }
        Command::Testimonials => {
            let testimonials = content::load_testimonials(session.source()).await;
            for t in &testimonials.items {
                println!("{} ({}, {}): {}", t.name, t.position, t.company, t.testimonial);
            }
        }
        Command::Clients => {
            let clients = content::load_clients(session.source()).await;
            for client in &clients.items {
                let logo = session.source().resolve_media_url(client.logo_url());
                println!("{} {}", client.name(), logo.unwrap_or_default());
            }
        }
        Command::Search { query } => {
            session.store().dispatch(site_sync::Action::SetQuery(query.clone()));
            session.search().run(&query).await;
            let search = session.store().state().search;
            if search.show_no_results() {
                println!("No results for \"{}\"", query);
            }
            for result in search.team_results() {
                println!("[team]    {}", result.title);
            }
            for result in search.service_results() {
                println!("[service] {}", result.title);
            }
        }
        Command::Subscribe { email } => {
            let form = session.newsletter_form();
            match form.submit_for_display(&email).await {
                Some(NewsletterMessage::Subscribed) => println!("✅ {}", NewsletterMessage::Subscribed.text()),
                Some(message) => {
                    eprintln!("❌ {}", message.text());
                    std::process::exit(1);
                }
                None => {}
            }
        }
        Command::Route { path } => match session.navigate(&path) {
            Ok(route) => println!(
                "{} (lang={}, dir={})",
                route.to_path(),
                route.locale,
                route.locale.direction().as_str()
            ),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
    }
}
