//! Deep-link route gating.
//!
//! The console accepts web-style paths (from shared links and legacy
//! bookmarks) and decides what to do with them before any view renders:
//! legacy settings paths rewrite into a query parameter, retired chat API
//! paths answer Gone, and everything non-public requires an authenticated
//! operator.

/// Paths reachable without an operator session.
const PUBLIC_PATHS: &[&str] = &["/login", "/auth/callback", "/health"];

/// Default settings tab when a legacy path names none.
const DEFAULT_SETTINGS_TAB: &str = "general";

/// Outcome of routing a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Proceed to the requested path.
    Allow,
    /// Navigate somewhere else instead.
    Redirect { to: String },
    /// The path is permanently retired (HTTP 410 semantics).
    Gone { message: String },
}

/// Decides what to do with a requested path.
///
/// `query` is the raw query string without the leading `?`, empty when
/// absent.
pub fn decide_route(path: &str, query: &str, authenticated: bool) -> RouteDecision {
    let path = normalize(path);

    // Legacy settings deep links become a query parameter on the root view.
    if let Some(rest) = strip_route_prefix(&path, "/settings") {
        let tab = rest.trim_matches('/');
        let tab = if tab.is_empty() { DEFAULT_SETTINGS_TAB } else { tab };
        return RouteDecision::Redirect {
            to: format!("/?settings={tab}"),
        };
    }

    // The pre-v1 chat API is permanently retired.
    if strip_route_prefix(&path, "/api/chat").is_some() {
        return RouteDecision::Gone {
            message: "This endpoint has been retired; use /api/v1/agent instead".to_string(),
        };
    }

    if PUBLIC_PATHS.contains(&path.as_str()) {
        return RouteDecision::Allow;
    }

    if !authenticated {
        let return_url = if query.is_empty() {
            path.clone()
        } else {
            format!("{path}?{query}")
        };
        return RouteDecision::Redirect {
            to: format!("/login?returnUrl={}", urlencode(&return_url)),
        };
    }

    RouteDecision::Allow
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || !trimmed.starts_with('/') {
        format!("/{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Matches `/prefix` exactly or `/prefix/...`; rejects `/prefixother`.
fn strip_route_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Minimal percent-encoding for the returnUrl parameter.
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_rewrites_to_query_param() {
        assert_eq!(
            decide_route("/settings/appearance", "", true),
            RouteDecision::Redirect {
                to: "/?settings=appearance".to_string()
            }
        );
        assert_eq!(
            decide_route("/settings", "", true),
            RouteDecision::Redirect {
                to: "/?settings=general".to_string()
            }
        );
        // Rewrite applies before the auth gate
        assert_eq!(
            decide_route("/settings/api-keys", "", false),
            RouteDecision::Redirect {
                to: "/?settings=api-keys".to_string()
            }
        );
    }

    #[test]
    fn test_settings_prefix_requires_boundary() {
        // Not the settings page; falls through to the auth gate.
        assert_eq!(decide_route("/settingsx", "", true), RouteDecision::Allow);
    }

    #[test]
    fn test_legacy_chat_api_is_gone() {
        for path in ["/api/chat", "/api/chat/stream"] {
            match decide_route(path, "", true) {
                RouteDecision::Gone { message } => assert!(message.contains("retired")),
                other => panic!("expected gone for {path}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unauthenticated_redirects_to_login_with_return_url() {
        assert_eq!(
            decide_route("/sessions/abc", "", false),
            RouteDecision::Redirect {
                to: "/login?returnUrl=/sessions/abc".to_string()
            }
        );
        assert_eq!(
            decide_route("/", "settings=general", false),
            RouteDecision::Redirect {
                to: "/login?returnUrl=/%3Fsettings%3Dgeneral".to_string()
            }
        );
    }

    #[test]
    fn test_public_paths_always_allowed() {
        for path in ["/login", "/auth/callback", "/health"] {
            assert_eq!(decide_route(path, "", false), RouteDecision::Allow);
        }
    }

    #[test]
    fn test_authenticated_paths_allowed() {
        assert_eq!(decide_route("/", "", true), RouteDecision::Allow);
        assert_eq!(decide_route("/sessions/abc", "", true), RouteDecision::Allow);
    }
}
