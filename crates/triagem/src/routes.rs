//! Logical routes between the intake, results and history views.

use serde::Serialize;

/// Heading of the not-found page.
pub const NOT_FOUND_TITLE: &str = "404";

/// Message of the not-found page.
pub const NOT_FOUND_MESSAGE: &str = "Oops! Página não encontrada";

/// A view the application can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "route", content = "path", rename_all = "snake_case")]
pub enum Route {
    /// `/`, the intake form.
    Intake,
    /// `/resultado`, the results of the pending assessment.
    Results,
    /// `/historico`, the consultation history.
    History,
    /// Any other path.
    NotFound(String),
}

impl Route {
    /// Resolve a path. A trailing slash is ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };

        match normalized {
            "/" => Self::Intake,
            "/resultado" => Self::Results,
            "/historico" => Self::History,
            _ => Self::NotFound(trimmed.to_string()),
        }
    }

    /// The canonical path of this route.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Intake => "/",
            Self::Results => "/resultado",
            Self::History => "/historico",
            Self::NotFound(path) => path,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Intake);
        assert_eq!(Route::parse("/resultado"), Route::Results);
        assert_eq!(Route::parse("/historico"), Route::History);
    }

    #[test]
    fn test_parse_trailing_slash() {
        assert_eq!(Route::parse("/historico/"), Route::History);
        assert_eq!(Route::parse("//"), Route::Intake);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Route::parse("/config"),
            Route::NotFound("/config".to_string())
        );
        assert_eq!(Route::parse(""), Route::NotFound(String::new()));
    }

    #[test]
    fn test_path_round_trip() {
        for route in [Route::Intake, Route::Results, Route::History] {
            assert_eq!(Route::parse(route.path()), route);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Route::Results.to_string(), "/resultado");
        assert_eq!(Route::NotFound("/x".to_string()).to_string(), "/x");
    }
}
