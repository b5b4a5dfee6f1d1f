/// Path of the only screen reachable without a session.
pub const LOGIN_PATH: &str = "/login";

/// What the route guard does with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// Send the user to login, remembering where they were headed.
    RedirectToLogin { redirect: String },
    /// Hold rendering until the session has been hydrated.
    Wait,
}

pub fn requires_auth(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.trim_end_matches('/') != LOGIN_PATH
}

/// Decide a navigation to `path`.
pub fn guard_route(path: &str, hydrated: bool, authenticated: bool) -> GuardDecision {
    if !requires_auth(path) || authenticated {
        return GuardDecision::Proceed;
    }
    if !hydrated {
        return GuardDecision::Wait;
    }
    GuardDecision::RedirectToLogin {
        redirect: path.to_string(),
    }
}

/// Where to land after login: the remembered path, unless it points back at
/// login or off-site.
pub fn post_login_target(redirect: Option<&str>) -> String {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && requires_auth(path) => {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}
