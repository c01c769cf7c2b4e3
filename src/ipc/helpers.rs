use rusqlite::Connection;
use serde_json::json;

use crate::ipc::error::err;
use crate::store;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<anyhow::Error> for HandlerErr {
    fn from(e: anyhow::Error) -> Self {
        Self::new("db_query_failed", e.to_string())
    }
}

pub fn required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

pub fn required_f64(params: &serde_json::Value, key: &str) -> Result<f64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Deserializes one params field into a typed value (enum variants, nested
/// records). Missing and mistyped both report the field name.
pub fn required_field<T: serde::de::DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<T, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Err(HandlerErr::bad_params(format!("missing {}", key)));
    };
    serde_json::from_value(v.clone())
        .map_err(|e| HandlerErr::bad_params(format!("invalid {}: {}", key, e)))
}

pub fn optional_field<T: serde::de::DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<T>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| HandlerErr::bad_params(format!("invalid {}: {}", key, e))),
    }
}

/// Lost-update guard: when the caller supplies `expectedRevision` for the
/// collection it read, a stale value fails the write instead of silently
/// clobbering someone else's.
pub fn check_expected_revision(
    conn: &Connection,
    key: &str,
    params: &serde_json::Value,
) -> Result<(), HandlerErr> {
    let Some(expected) = params.get("expectedRevision").and_then(|v| v.as_i64()) else {
        return Ok(());
    };
    let actual = store::revision(conn, key).map_err(HandlerErr::from)?;
    if actual != Some(expected) {
        return Err(HandlerErr {
            code: "revision_conflict",
            message: format!("collection {} was rewritten since it was read", key),
            details: Some(json!({ "expected": expected, "actual": actual })),
        });
    }
    Ok(())
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Shared wrapper for record methods: they all require a selected workspace
/// and share the ok/err envelope.
pub fn dispatch(
    state: &mut crate::ipc::types::AppState,
    req: &crate::ipc::types::Request,
    f: impl FnOnce(&Connection, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match f(conn, &req.params) {
        Ok(result) => crate::ipc::error::ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}
