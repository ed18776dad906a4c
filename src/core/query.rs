use crate::domain::model::Envelope;
use crate::domain::ports::ContentSource;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

/// Builder for the backend's bracketed filter syntax,
/// e.g. `filters[slug][$eq]=family-law`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `populate=*`, requested by every listing so media relations come back inline.
    pub fn populate_all() -> Self {
        Self::new().param("populate", "*")
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn filter(self, field: &str, operator: &str, value: impl Into<String>) -> Self {
        self.param(format!("filters[{}][{}]", field, operator), value)
    }

    pub fn eq(self, field: &str, value: impl Into<String>) -> Self {
        self.filter(field, "$eq", value)
    }

    pub fn contains_ci(self, field: &str, value: impl Into<String>) -> Self {
        self.filter(field, "$containsi", value)
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Fetches a collection and decodes its `data` array.
pub async fn fetch_list<T: DeserializeOwned>(
    source: &dyn ContentSource,
    resource_path: &str,
    query: &Query,
) -> Result<Vec<T>> {
    let body = source.fetch_collection(resource_path, query.params()).await?;
    if body.is_null() {
        return Ok(Vec::new());
    }
    let envelope: Envelope<T> = serde_json::from_value(body)?;
    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keys_use_bracket_syntax() {
        let query = Query::populate_all()
            .eq("slug", "family-law")
            .contains_ci("name", "sara");
        assert_eq!(
            query.params(),
            &[
                ("populate".to_string(), "*".to_string()),
                ("filters[slug][$eq]".to_string(), "family-law".to_string()),
                ("filters[name][$containsi]".to_string(), "sara".to_string()),
            ]
        );
    }
}
