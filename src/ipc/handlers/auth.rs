use rusqlite::Connection;
use serde_json::json;

use crate::ipc::helpers::{dispatch, required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::session::{self, RouteDecision};

fn auth_login(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let email = required_str(params, "email")?;
    let password = required_str(params, "password")?;
    match session::login(conn, &email, &password).map_err(HandlerErr::from)? {
        Some(user) => Ok(json!({ "user": user })),
        None => Err(HandlerErr::new("auth_failed", "invalid email or password")),
    }
}

fn auth_logout(conn: &Connection) -> Result<serde_json::Value, HandlerErr> {
    session::logout(conn).map_err(HandlerErr::from)?;
    Ok(json!({ "ok": true }))
}

fn auth_current_user(conn: &Connection) -> Result<serde_json::Value, HandlerErr> {
    let user = session::current_user(conn).map_err(HandlerErr::from)?;
    Ok(json!({ "user": user }))
}

fn auth_resolve_route(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let path = required_str(params, "path")?;
    let user = session::current_user(conn).map_err(HandlerErr::from)?;
    Ok(match session::resolve_route(user.as_ref(), &path) {
        RouteDecision::Allow => json!({ "decision": "allow" }),
        RouteDecision::Redirect(to) => json!({ "decision": "redirect", "to": to }),
    })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(dispatch(state, req, auth_login)),
        "auth.logout" => Some(dispatch(state, req, |conn, _| auth_logout(conn))),
        "auth.currentUser" => Some(dispatch(state, req, |conn, _| auth_current_user(conn))),
        "auth.resolveRoute" => Some(dispatch(state, req, auth_resolve_route)),
        _ => None,
    }
}
