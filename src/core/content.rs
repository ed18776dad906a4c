//! Page-section loaders with declared fallbacks, and service content
//! splitting for the detail page.

use crate::core::fallback;
use crate::core::query::{fetch_list, Query};
use crate::core::store::{AppState, Resource};
use crate::domain::model::{Client, LoadState, Service, TeamMember, Testimonial};
use crate::domain::ports::ContentSource;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    Fallback,
}

/// Items for one page section together with where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub source: DataSource,
}

impl<T> Loaded<T> {
    fn remote(items: Vec<T>) -> Self {
        Self {
            items,
            source: DataSource::Remote,
        }
    }

    fn fallback(items: Vec<T>) -> Self {
        Self {
            items,
            source: DataSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// When a section swaps in its fallback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    OnError,
    OnErrorOrEmpty,
}

async fn load_section<T: serde::de::DeserializeOwned>(
    source: &dyn ContentSource,
    path: &str,
    policy: FallbackPolicy,
    fallback: fn() -> Vec<T>,
) -> Loaded<T> {
    match fetch_list::<T>(source, path, &Query::populate_all()).await {
        Ok(items) if items.is_empty() && policy == FallbackPolicy::OnErrorOrEmpty => {
            tracing::warn!("{} returned no records, using fallback data", path);
            Loaded::fallback(fallback())
        }
        Ok(items) => Loaded::remote(items),
        Err(e) => {
            tracing::error!("Error fetching {}: {}, using fallback data", path, e);
            Loaded::fallback(fallback())
        }
    }
}

pub async fn load_team_members(source: &dyn ContentSource) -> Loaded<TeamMember> {
    load_section(
        source,
        "/team-members",
        FallbackPolicy::OnErrorOrEmpty,
        fallback::team_members,
    )
    .await
}

pub async fn load_testimonials(source: &dyn ContentSource) -> Loaded<Testimonial> {
    load_section(
        source,
        "/testimonials",
        FallbackPolicy::OnErrorOrEmpty,
        fallback::testimonials,
    )
    .await
}

pub async fn load_clients(source: &dyn ContentSource) -> Loaded<Client> {
    load_section(source, "/clients", FallbackPolicy::OnError, fallback::clients).await
}

/// Services listing as rendered from the cached slice: the fallback set
/// stands in once the fetch failed or finished empty. `None` while the fetch
/// is still pending.
pub fn service_listing(state: &AppState) -> Option<Loaded<Service>> {
    match state.load_state(Resource::Services) {
        LoadState::NotLoaded | LoadState::Loading => None,
        LoadState::Loaded if !state.services.services().is_empty() => {
            Some(Loaded::remote(state.services.services().to_vec()))
        }
        LoadState::Loaded | LoadState::Error => Some(Loaded::fallback(fallback::services())),
    }
}

/// Fetches one service by slug. The first matching record wins; with no
/// match the fallback catalogue is consulted. A failed request yields `None`.
pub async fn load_service(source: &dyn ContentSource, slug: &str) -> Option<Service> {
    let query = Query::populate_all().eq("slug", slug);
    let found: Result<Vec<Service>> = fetch_list(source, "/services", &query).await;
    match found {
        Ok(services) => match services.into_iter().next() {
            Some(service) => Some(service),
            None => {
                tracing::warn!("No service for slug '{}', checking fallback data", slug);
                fallback::service_by_slug(slug)
            }
        },
        Err(e) => {
            tracing::error!("Error fetching service '{}': {}", slug, e);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Paragraph(String),
    Bullet(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    pub heading: String,
    pub items: Vec<ContentItem>,
}

/// Splits a service body into sections on blank lines. The first line of a
/// section is its heading; `- ` lines become bullets.
pub fn content_sections(content: &str) -> Vec<ContentSection> {
    let normalized = content.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .filter_map(|block| {
            let mut lines = block.lines().filter(|l| !l.trim().is_empty());
            let heading = lines.next()?.trim().to_string();
            let items = lines
                .map(|line| match line.trim_start().strip_prefix("- ") {
                    Some(item) => ContentItem::Bullet(item.trim().to_string()),
                    None => ContentItem::Paragraph(line.trim().to_string()),
                })
                .collect();
            Some(ContentSection { heading, items })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{reduce, Action};

    #[test]
    fn test_content_sections_split_headings_and_bullets() {
        let sections = content_sections(
            "General\nWe advise.\n\nOur advisory services about:\n- Contracts.\n- Disputes.\n\n\n",
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "General");
        assert_eq!(sections[0].items, vec![ContentItem::Paragraph("We advise.".to_string())]);
        assert_eq!(
            sections[1].items,
            vec![
                ContentItem::Bullet("Contracts.".to_string()),
                ContentItem::Bullet("Disputes.".to_string())
            ]
        );
    }

    #[test]
    fn test_fallback_consultation_content_parses() {
        let service = fallback::service_by_slug("legal-consultation").unwrap();
        let sections = content_sections(service.content.as_deref().unwrap_or_default());
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[3].heading, "Individual Legal Consultations");
        assert!(matches!(sections[2].items[0], ContentItem::Bullet(_)));
    }

    #[test]
    fn test_service_listing_degrades_to_fallback() {
        let mut state = AppState::default();
        assert!(service_listing(&state).is_none());

        reduce(&mut state, Action::FetchStarted(Resource::Services));
        assert!(service_listing(&state).is_none());

        reduce(&mut state, Action::FetchFailed(Resource::Services, "offline".into()));
        let listing = service_listing(&state).unwrap();
        assert!(listing.is_fallback());
        assert_eq!(listing.items.len(), fallback::services().len());
    }
}
