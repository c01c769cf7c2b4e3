use rusqlite::Connection;

use crate::db;
use crate::model::{Role, User};
use crate::seed;
use crate::store::SESSION_KEY;

/// Linear scan of the fixed credential table. On a match the identity is
/// persisted (minus the password) as the active session and returned; on a
/// mismatch nothing changes and None is returned.
pub fn login(conn: &Connection, email: &str, password: &str) -> anyhow::Result<Option<User>> {
    let hit = seed::credentials()
        .into_iter()
        .find(|c| c.user.email == email && c.password == password);
    let Some(cred) = hit else {
        return Ok(None);
    };
    db::value_put(conn, SESSION_KEY, &serde_json::to_string(&cred.user)?)?;
    Ok(Some(cred.user))
}

pub fn logout(conn: &Connection) -> anyhow::Result<()> {
    db::value_delete(conn, SESSION_KEY)
}

/// Reads the persisted session. Absence and an unparseable document both
/// read as no session; the latter is logged.
pub fn current_user(conn: &Connection) -> anyhow::Result<Option<User>> {
    let Some(text) = db::value_get(conn, SESSION_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str::<User>(&text) {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            eprintln!("campusd: discarding unreadable session: {}", e);
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

const ROUTES: &[(&str, Role)] = &[
    ("/admin", Role::Admin),
    ("/teacher", Role::Teacher),
    ("/parent", Role::Parent),
];

/// Access gate. Failure is corrective redirection, never outright denial:
/// anonymous sessions land on /login, a role mismatch lands on that role's
/// own section.
pub fn resolve_route(user: Option<&User>, path: &str) -> RouteDecision {
    if path == "/login" {
        return RouteDecision::Allow;
    }
    let Some(user) = user else {
        return RouteDecision::Redirect("/login".to_string());
    };
    for (prefix, role) in ROUTES {
        if path == *prefix || path.starts_with(&format!("{}/", prefix)) {
            if user.role == *role {
                return RouteDecision::Allow;
            }
            return RouteDecision::Redirect(user.role.landing_path().to_string());
        }
    }
    RouteDecision::Redirect(user.role.landing_path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "u".to_string(),
            name: "U".to_string(),
            email: "u@school.com".to_string(),
            role,
            photo: None,
        }
    }

    #[test]
    fn anonymous_is_sent_to_login() {
        assert_eq!(
            resolve_route(None, "/admin/students"),
            RouteDecision::Redirect("/login".to_string())
        );
        assert_eq!(resolve_route(None, "/login"), RouteDecision::Allow);
    }

    #[test]
    fn matching_role_is_allowed() {
        let u = user(Role::Teacher);
        assert_eq!(resolve_route(Some(&u), "/teacher"), RouteDecision::Allow);
        assert_eq!(
            resolve_route(Some(&u), "/teacher/attendance"),
            RouteDecision::Allow
        );
    }

    #[test]
    fn mismatch_redirects_to_own_landing() {
        let u = user(Role::Parent);
        assert_eq!(
            resolve_route(Some(&u), "/admin/fees"),
            RouteDecision::Redirect("/parent".to_string())
        );
        // "/teachers" is not the "/teacher" section.
        assert_eq!(
            resolve_route(Some(&u), "/teachers"),
            RouteDecision::Redirect("/parent".to_string())
        );
    }

    #[test]
    fn unknown_paths_redirect_to_landing() {
        let u = user(Role::Admin);
        assert_eq!(
            resolve_route(Some(&u), "/"),
            RouteDecision::Redirect("/admin".to_string())
        );
    }
}
