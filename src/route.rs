/// Navigable locations: the list at `/` and one profile per user id.
///
/// The id segment is kept as typed. A segment that names no user still
/// routes to the profile page, which then reports the failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    User(String),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "/home" {
            return path.starts_with('/').then_some(Self::Home);
        }
        let id = trimmed.strip_prefix("/user/")?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Self::User(id.to_string()))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::User(id) => write!(f, "/user/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/home"), Some(Route::Home));
        assert_eq!(Route::parse("/user/3"), Some(Route::User("3".into())));
        assert_eq!(Route::parse("/user/3/"), Some(Route::User("3".into())));
        assert_eq!(Route::parse("/user/"), None);
        assert_eq!(Route::parse("/user/3/edit"), None);
        assert_eq!(Route::parse("/users/3"), None);
        assert_eq!(Route::parse(""), None);
        assert_eq!(Route::parse("user/3"), None);
    }

    #[test]
    fn test_non_numeric_id_still_routes() {
        assert_eq!(Route::parse("/user/abc"), Some(Route::User("abc".into())));
        let huge = "/user/99999999999999999999999";
        assert_eq!(
            Route::parse(huge),
            Some(Route::User("99999999999999999999999".into()))
        );
    }

    #[test]
    fn test_display_round_trips() {
        for route in [Route::Home, Route::User("10".into())] {
            assert_eq!(Route::parse(&route.to_string()), Some(route.clone()));
        }
    }
}
