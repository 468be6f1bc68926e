//! Route guard
//!
//! One authorization decision function consumed by every gated screen,
//! plus the static route table and the listing pagination arithmetic.
//!
//! The central invariant: no redirect decision is emitted while the
//! session is still loading. `Access::Wait` is never terminal; callers
//! render a neutral loading state and ask again once `check()` resolved.

use crate::models::Role;
use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Outcome of evaluating a protected route against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session still loading; render nothing observable
    Wait,
    /// Render the screen
    Grant,
    /// Not authenticated
    ToLogin,
    /// Authenticated but the role is not allowed
    ToUnauthorized,
}

/// Outcome of evaluating a public route (login/register) against the
/// session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicAccess {
    Wait,
    Render,
    /// Already logged in; bounce away from the public screen
    Redirect(String),
}

/// Decide renderability of a protected screen.
pub fn authorize(session: &Session, allowed: &[Role]) -> Access {
    match session {
        Session::Unknown => Access::Wait,
        Session::Anonymous => Access::ToLogin,
        Session::Authenticated(user) => {
            if allowed.contains(&user.role) {
                Access::Grant
            } else {
                Access::ToUnauthorized
            }
        }
    }
}

/// Decide renderability of a public screen; an authenticated user is
/// redirected to `redirect_to` instead.
pub fn public_access(session: &Session, redirect_to: &str) -> PublicAccess {
    match session {
        Session::Unknown => PublicAccess::Wait,
        Session::Anonymous => PublicAccess::Render,
        Session::Authenticated(_) => PublicAccess::Redirect(redirect_to.to_string()),
    }
}

/// A protected route and the roles that may reach it. Static, defined
/// once at startup.
#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    pub path: &'static str,
    pub allowed: &'static [Role],
}

const SELLER_OR_ADMIN: &[Role] = &[Role::Seller, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// The dashboard route table
pub const ROUTES: &[RouteRule] = &[
    RouteRule { path: "/dashboard", allowed: SELLER_OR_ADMIN },
    RouteRule { path: "/dashboard/products", allowed: SELLER_OR_ADMIN },
    RouteRule { path: "/dashboard/products/add", allowed: SELLER_OR_ADMIN },
    RouteRule { path: "/dashboard/products/edit", allowed: SELLER_OR_ADMIN },
    RouteRule { path: "/dashboard/categories", allowed: ADMIN_ONLY },
    RouteRule { path: "/dashboard/reviews", allowed: SELLER_OR_ADMIN },
];

/// Find the rule governing `path`. `/` redirects to the dashboard, so it
/// resolves to the dashboard rule; parameterized paths (`/edit/:id`)
/// match their prefix rule.
pub fn resolve(path: &str) -> Option<&'static RouteRule> {
    let path = if path == "/" { DASHBOARD_PATH } else { path };
    ROUTES
        .iter()
        .filter(|rule| {
            path == rule.path
                || (path.starts_with(rule.path) && path.as_bytes().get(rule.path.len()) == Some(&b'/'))
        })
        .max_by_key(|rule| rule.path.len())
}

/// Evaluate a path end-to-end: resolve its rule, then authorize.
/// Unknown paths fall through to the not-found screen, which is public.
pub fn route_access(session: &Session, path: &str) -> Option<Access> {
    resolve(path).map(|rule| authorize(session, rule.allowed))
}

// ---------------------------------------------------------------------------
// Pagination arithmetic
// ---------------------------------------------------------------------------

/// Number of pages for a listing of `total` items at `limit` per page,
/// never less than 1.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 1;
    }
    (total + limit - 1) / limit
}

/// The "Showing X to Y of Z" window for one page, 1-based inclusive.
/// Returns (0, 0) for an empty listing.
pub fn page_window(page: i64, limit: i64, total: i64) -> (i64, i64) {
    if total <= 0 || limit <= 0 || page <= 0 {
        return (0, 0);
    }
    let start = (page - 1) * limit + 1;
    if start > total {
        return (0, 0);
    }
    (start, (page * limit).min(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSummary;

    fn user(role: Role) -> Session {
        Session::Authenticated(UserSummary {
            id: "u1".into(),
            name: "Test".into(),
            email: "t@example.com".into(),
            role,
        })
    }

    // ========================================================================
    // authorize
    // ========================================================================

    #[test]
    fn test_loading_never_redirects() {
        for allowed in [SELLER_OR_ADMIN, ADMIN_ONLY] {
            assert_eq!(authorize(&Session::Unknown, allowed), Access::Wait);
        }
        assert_eq!(
            public_access(&Session::Unknown, DASHBOARD_PATH),
            PublicAccess::Wait
        );
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(authorize(&Session::Anonymous, SELLER_OR_ADMIN), Access::ToLogin);
    }

    #[test]
    fn test_wrong_role_goes_to_unauthorized_never_renders() {
        assert_eq!(authorize(&user(Role::Buyer), SELLER_OR_ADMIN), Access::ToUnauthorized);
        assert_eq!(authorize(&user(Role::Seller), ADMIN_ONLY), Access::ToUnauthorized);
    }

    #[test]
    fn test_allowed_role_granted() {
        assert_eq!(authorize(&user(Role::Seller), SELLER_OR_ADMIN), Access::Grant);
        assert_eq!(authorize(&user(Role::Admin), ADMIN_ONLY), Access::Grant);
    }

    #[test]
    fn test_public_gate_bounces_authenticated_user() {
        let access = public_access(&user(Role::Seller), DASHBOARD_PATH);
        assert_eq!(access, PublicAccess::Redirect(DASHBOARD_PATH.to_string()));
        assert_eq!(public_access(&Session::Anonymous, DASHBOARD_PATH), PublicAccess::Render);
    }

    // ========================================================================
    // route table
    // ========================================================================

    #[test]
    fn test_unauthenticated_dashboard_redirects_to_login() {
        assert_eq!(route_access(&Session::Anonymous, "/dashboard"), Some(Access::ToLogin));
    }

    #[test]
    fn test_seller_blocked_from_categories() {
        assert_eq!(
            route_access(&user(Role::Seller), "/dashboard/categories"),
            Some(Access::ToUnauthorized)
        );
        assert_eq!(
            route_access(&user(Role::Admin), "/dashboard/categories"),
            Some(Access::Grant)
        );
    }

    #[test]
    fn test_root_resolves_to_dashboard() {
        assert_eq!(route_access(&user(Role::Seller), "/"), Some(Access::Grant));
    }

    #[test]
    fn test_edit_path_matches_prefix_rule() {
        let rule = resolve("/dashboard/products/edit/66f0a1").unwrap();
        assert_eq!(rule.path, "/dashboard/products/edit");
    }

    #[test]
    fn test_unknown_path_has_no_rule() {
        assert!(resolve("/dashboards").is_none());
        assert!(resolve("/settings").is_none());
    }

    // ========================================================================
    // pagination
    // ========================================================================

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(9, 10), 1);
    }

    #[test]
    fn test_page_window_last_partial_page() {
        // "Showing 21 to 23 of 23"
        assert_eq!(page_window(3, 10, 23), (21, 23));
        assert_eq!(page_window(1, 10, 23), (1, 10));
        assert_eq!(page_window(1, 10, 0), (0, 0));
    }
}
