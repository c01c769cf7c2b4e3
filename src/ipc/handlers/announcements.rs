use rusqlite::Connection;
use serde_json::json;

use crate::ipc::helpers::{
    check_expected_revision, dispatch, new_id, optional_field, required_field, required_str,
    HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{Announcement, Audience, Priority};
use crate::seed;
use crate::session;
use crate::store;

fn load_announcements(conn: &Connection) -> Result<Vec<Announcement>, HandlerErr> {
    store::read_or_seed(conn, store::ANNOUNCEMENTS_KEY, &seed::initial_announcements())
        .map_err(HandlerErr::from)
}

fn announcements_list(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let announcements = load_announcements(conn)?;
    let audience: Option<Audience> = optional_field(params, "audience")?;
    // An audience filter still admits announcements addressed to everyone.
    let filtered: Vec<&Announcement> = announcements
        .iter()
        .filter(|a| {
            audience.map_or(true, |aud| {
                a.target_audience == aud || a.target_audience == Audience::All
            })
        })
        .collect();
    let revision = store::revision(conn, store::ANNOUNCEMENTS_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "announcements": filtered, "revision": revision }))
}

fn announcements_create(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let title = required_str(params, "title")?;
    let message = required_str(params, "message")?;
    let target_audience: Audience = required_field(params, "targetAudience")?;
    let priority: Priority = required_field(params, "priority")?;

    check_expected_revision(conn, store::ANNOUNCEMENTS_KEY, params)?;

    let created_by = session::current_user(conn)
        .map_err(HandlerErr::from)?
        .map(|u| u.name)
        .unwrap_or_else(|| "Unknown".to_string());

    let mut announcements = load_announcements(conn)?;
    let announcement_id = new_id();
    // Newest first.
    announcements.insert(
        0,
        Announcement {
            id: announcement_id.clone(),
            title,
            message,
            target_audience,
            created_by,
            created_at: chrono::Utc::now().to_rfc3339(),
            priority,
        },
    );
    let revision =
        store::replace(conn, store::ANNOUNCEMENTS_KEY, &announcements).map_err(HandlerErr::from)?;
    Ok(json!({ "announcementId": announcement_id, "revision": revision }))
}

fn announcements_delete(
    conn: &Connection,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let announcement_id = required_str(params, "announcementId")?;
    check_expected_revision(conn, store::ANNOUNCEMENTS_KEY, params)?;

    let announcements = load_announcements(conn)?;
    let before = announcements.len();
    let remaining: Vec<Announcement> = announcements
        .into_iter()
        .filter(|a| a.id != announcement_id)
        .collect();
    let removed = remaining.len() != before;
    let revision =
        store::replace(conn, store::ANNOUNCEMENTS_KEY, &remaining).map_err(HandlerErr::from)?;
    Ok(json!({ "removed": removed, "revision": revision }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "announcements.list" => Some(dispatch(state, req, announcements_list)),
        "announcements.create" => Some(dispatch(state, req, announcements_create)),
        "announcements.delete" => Some(dispatch(state, req, announcements_delete)),
        _ => None,
    }
}
