use rusqlite::Connection;
use serde_json::json;

use crate::ipc::helpers::{dispatch, optional_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Parent;
use crate::seed;
use crate::store;

fn parents_list(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let parents: Vec<Parent> =
        store::read_or_seed(conn, store::PARENTS_KEY, &seed::initial_parents())
            .map_err(HandlerErr::from)?;
    let students = store::read_or_seed(conn, store::STUDENTS_KEY, &seed::initial_students())
        .map_err(HandlerErr::from)?;

    let filtered: Vec<&Parent> = match optional_str(params, "search") {
        Some(term) if !term.is_empty() => {
            let t = term.to_lowercase();
            parents
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&t) || p.email.to_lowercase().contains(&t))
                .collect()
        }
        _ => parents.iter().collect(),
    };

    // Soft references: a studentId with no matching student simply yields no
    // child row.
    let rows: Vec<serde_json::Value> = filtered
        .iter()
        .map(|p| {
            let children: Vec<serde_json::Value> = students
                .iter()
                .filter(|s| p.student_ids.contains(&s.id))
                .map(|s| {
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "class": s.class,
                        "section": s.section,
                    })
                })
                .collect();
            json!({ "parent": p, "children": children })
        })
        .collect();

    let revision = store::revision(conn, store::PARENTS_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "parents": rows, "revision": revision }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "parents.list" => Some(dispatch(state, req, parents_list)),
        _ => None,
    }
}
