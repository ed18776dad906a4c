use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SUPPORTED_LOCALES: [Locale; 2] = [Locale::En, Locale::Ar];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Locale::En => TextDirection::Ltr,
            Locale::Ar => TextDirection::Rtl,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("page not found: {path}")]
    NotFound { path: String },
}

impl FromStr for Locale {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_LOCALES
            .iter()
            .copied()
            .find(|locale| locale.code() == s)
            .ok_or_else(|| RouteError::NotFound {
                path: format!("/{}", s),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Services,
    ServiceDetail { slug: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub locale: Locale,
    pub page: Page,
}

impl Route {
    /// Resolves a locale-prefixed path such as `/ar/services/family-law`.
    /// Query strings and a trailing slash are ignored.
    pub fn parse(path: &str) -> Result<Route, RouteError> {
        let not_found = || RouteError::NotFound {
            path: path.to_string(),
        };

        let path_only = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path_only.split('/').filter(|s| !s.is_empty()).collect();

        let (first, rest) = segments.split_first().ok_or_else(not_found)?;
        let locale: Locale = first.parse().map_err(|_| not_found())?;

        let page = match rest {
            [] => Page::Home,
            ["services"] => Page::Services,
            ["services", slug] => Page::ServiceDetail {
                slug: (*slug).to_string(),
            },
            _ => return Err(not_found()),
        };

        Ok(Route { locale, page })
    }

    pub fn to_path(&self) -> String {
        match &self.page {
            Page::Home => format!("/{}", self.locale),
            Page::Services => format!("/{}/services", self.locale),
            Page::ServiceDetail { slug } => format!("/{}/services/{}", self.locale, slug),
        }
    }
}
