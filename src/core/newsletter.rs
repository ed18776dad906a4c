use crate::core::query::{fetch_list, Query};
use crate::domain::model::Subscriber;
use crate::domain::ports::{Connectivity, ContentSource};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::validate_email;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const SUBSCRIBERS: &str = "/subscribers";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Subscribed(Subscriber),
    /// Another submission from this form is still in flight.
    AlreadySubmitting,
}

/// User-facing result of a submission, shown under the email field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsletterMessage {
    Subscribed,
    Invalid(String),
    AlreadySubscribed,
    ServerError,
    NetworkError,
    Failed,
}

impl NewsletterMessage {
    pub fn text(&self) -> &str {
        match self {
            NewsletterMessage::Subscribed => "Successfully subscribed!",
            NewsletterMessage::Invalid(message) => message.as_str(),
            NewsletterMessage::AlreadySubscribed => "Email already subscribed",
            NewsletterMessage::ServerError => "Server error. Please try again later.",
            NewsletterMessage::NetworkError => "Network error. Please check your connection.",
            NewsletterMessage::Failed => "Subscription failed. Please try again.",
        }
    }

    pub fn is_field_error(&self) -> bool {
        !matches!(self, NewsletterMessage::Subscribed)
    }

    pub fn from_error(error: &SiteError, connectivity: &dyn Connectivity) -> Self {
        match error {
            SiteError::Validation { message, .. } => NewsletterMessage::Invalid(message.clone()),
            SiteError::Duplicate { .. } => NewsletterMessage::AlreadySubscribed,
            SiteError::Http { status: 400, .. } => NewsletterMessage::AlreadySubscribed,
            e if e.is_server_error() => NewsletterMessage::ServerError,
            SiteError::Network { .. } => NewsletterMessage::NetworkError,
            _ if !connectivity.is_online() => NewsletterMessage::NetworkError,
            _ => NewsletterMessage::Failed,
        }
    }
}

/// Clears the submitting flag however the submission ends.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One newsletter form instance.
pub struct NewsletterForm {
    source: Arc<dyn ContentSource>,
    connectivity: Arc<dyn Connectivity>,
    submitting: AtomicBool,
}

impl NewsletterForm {
    pub fn new(source: Arc<dyn ContentSource>, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            source,
            connectivity,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub async fn submit(&self, email: &str) -> Result<SubmitOutcome> {
        validate_email("email", email)?;

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Ignoring overlapping newsletter submission");
            return Ok(SubmitOutcome::AlreadySubmitting);
        }
        let _guard = SubmittingGuard(&self.submitting);

        let email = email.trim();
        let existing: Vec<Subscriber> = fetch_list(
            self.source.as_ref(),
            SUBSCRIBERS,
            &Query::new().eq("email", email),
        )
        .await?;
        if !existing.is_empty() {
            tracing::info!("Email already subscribed: {}", email);
            return Err(SiteError::Duplicate {
                email: email.to_string(),
            });
        }

        let subscribed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let payload = json!({
            "data": {
                "email": email,
                "subscribed_at": subscribed_at,
            }
        });
        let response = self.source.submit_record(SUBSCRIBERS, &payload).await?;

        let subscriber = response
            .get("data")
            .cloned()
            .and_then(|data| serde_json::from_value::<Subscriber>(data).ok())
            .unwrap_or_else(|| Subscriber {
                id: 0,
                email: email.to_string(),
                subscribed_at: Some(subscribed_at),
            });
        tracing::info!("New newsletter subscriber {}", subscriber.email);
        Ok(SubmitOutcome::Subscribed(subscriber))
    }

    /// Submits and maps the outcome to the message the form displays.
    pub async fn submit_for_display(&self, email: &str) -> Option<NewsletterMessage> {
        match self.submit(email).await {
            Ok(SubmitOutcome::Subscribed(_)) => Some(NewsletterMessage::Subscribed),
            Ok(SubmitOutcome::AlreadySubmitting) => None,
            Err(e) => {
                tracing::error!("Subscription error: {}", e);
                Some(NewsletterMessage::from_error(&e, self.connectivity.as_ref()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{AssumeOnline, QueryParams};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct Offline;

    impl Connectivity for Offline {
        fn is_online(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct SubscriberBackend {
        existing: Vec<String>,
        post_status: Option<u16>,
        posts: AtomicUsize,
        last_payload: Mutex<Option<serde_json::Value>>,
    }

    #[async_trait]
    impl ContentSource for SubscriberBackend {
        async fn fetch_collection(&self, _path: &str, query: &QueryParams) -> Result<serde_json::Value> {
            tokio::task::yield_now().await;
            let email = query
                .iter()
                .find(|(k, _)| k == "filters[email][$eq]")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            let data: Vec<_> = self
                .existing
                .iter()
                .filter(|e| **e == email)
                .map(|e| json!({ "id": 1, "email": e }))
                .collect();
            Ok(json!({ "data": data }))
        }

        async fn submit_record(&self, _path: &str, payload: &serde_json::Value) -> Result<serde_json::Value> {
            self.posts.fetch_add(1, Ordering::SeqCst);
            *self.last_payload.lock().unwrap() = Some(payload.clone());
            if let Some(status) = self.post_status {
                return Err(SiteError::Http {
                    status,
                    message: "rejected".to_string(),
                });
            }
            Ok(json!({ "data": { "id": 42, "email": payload["data"]["email"] } }))
        }

        fn resolve_media_url(&self, url: Option<&str>) -> Option<String> {
            url.map(str::to_string)
        }
    }

    fn form(backend: SubscriberBackend) -> (NewsletterForm, Arc<SubscriberBackend>) {
        let backend = Arc::new(backend);
        (NewsletterForm::new(backend.clone(), Arc::new(AssumeOnline)), backend)
    }

    #[tokio::test]
    async fn test_new_email_is_posted_with_timestamp() {
        let (form, backend) = form(SubscriberBackend::default());
        let outcome = form.submit(" new@firm.ae ").await.unwrap();

        match outcome {
            SubmitOutcome::Subscribed(s) => {
                assert_eq!(s.id, 42);
                assert_eq!(s.email, "new@firm.ae");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        let payload = backend.last_payload.lock().unwrap().clone().unwrap();
        assert_eq!(payload["data"]["email"], "new@firm.ae");
        let stamp = payload["data"]["subscribed_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_duplicate_email_writes_nothing() {
        let (form, backend) = form(SubscriberBackend {
            existing: vec!["old@firm.ae".to_string()],
            ..SubscriberBackend::default()
        });
        let err = form.submit("old@firm.ae").await.unwrap_err();

        assert!(matches!(err, SiteError::Duplicate { .. }));
        assert_eq!(backend.posts.load(Ordering::SeqCst), 0);
        assert_eq!(
            NewsletterMessage::from_error(&err, &AssumeOnline),
            NewsletterMessage::AlreadySubscribed
        );
    }

    #[tokio::test]
    async fn test_invalid_email_fails_locally() {
        let (form, backend) = form(SubscriberBackend::default());
        let message = form.submit_for_display("not-an-email").await.unwrap();

        assert_eq!(message, NewsletterMessage::Invalid("Invalid email address".to_string()));
        assert!(message.is_field_error());
        assert_eq!(backend.posts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_overlapping_submissions_are_ignored() {
        let (form, backend) = form(SubscriberBackend::default());
        let (first, second) = tokio::join!(form.submit("a@firm.ae"), form.submit("b@firm.ae"));

        assert!(matches!(first.unwrap(), SubmitOutcome::Subscribed(_)));
        assert_eq!(second.unwrap(), SubmitOutcome::AlreadySubmitting);
        assert_eq!(backend.posts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let server = SiteError::Http {
            status: 503,
            message: String::new(),
        };
        let bad_request = SiteError::Http {
            status: 400,
            message: String::new(),
        };
        let refused = SiteError::Network {
            message: "connection refused".to_string(),
        };
        let forbidden = SiteError::Http {
            status: 403,
            message: String::new(),
        };

        assert_eq!(NewsletterMessage::from_error(&server, &AssumeOnline), NewsletterMessage::ServerError);
        assert_eq!(
            NewsletterMessage::from_error(&bad_request, &AssumeOnline),
            NewsletterMessage::AlreadySubscribed
        );
        assert_eq!(NewsletterMessage::from_error(&refused, &AssumeOnline), NewsletterMessage::NetworkError);
        assert_eq!(NewsletterMessage::from_error(&forbidden, &AssumeOnline), NewsletterMessage::Failed);
        assert_eq!(NewsletterMessage::from_error(&forbidden, &Offline), NewsletterMessage::NetworkError);
    }

    #[tokio::test]
    async fn test_server_failure_on_post_maps_to_server_message() {
        let (form, _backend) = form(SubscriberBackend {
            post_status: Some(500),
            ..SubscriberBackend::default()
        });
        let message = form.submit_for_display("c@firm.ae").await.unwrap();
        assert_eq!(message.text(), "Server error. Please try again later.");
    }
}
