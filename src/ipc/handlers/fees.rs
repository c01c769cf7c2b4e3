use rusqlite::Connection;
use serde_json::json;

use crate::calc;
use crate::ipc::helpers::{
    check_expected_revision, dispatch, new_id, optional_field, optional_str, required_f64,
    required_field, required_str, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{FeePayment, FeeStatus, PaymentMode};
use crate::seed;
use crate::store;

fn load_fees(conn: &Connection) -> Result<Vec<FeePayment>, HandlerErr> {
    store::read_or_seed(conn, store::FEES_KEY, &[]).map_err(HandlerErr::from)
}

fn fees_list(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let fees = load_fees(conn)?;
    let search = optional_str(params, "search");
    let status: Option<FeeStatus> = optional_field(params, "status")?;
    let filtered: Vec<&FeePayment> = fees
        .iter()
        .filter(|f| {
            search.as_deref().map_or(true, |term| {
                let t = term.to_lowercase();
                f.student_name.to_lowercase().contains(&t)
                    || f.receipt_number.to_lowercase().contains(&t)
            })
        })
        .filter(|f| status.map_or(true, |s| f.status == s))
        .collect();
    let revision = store::revision(conn, store::FEES_KEY).map_err(HandlerErr::from)?;
    Ok(json!({ "fees": filtered, "revision": revision }))
}

fn fees_record(conn: &Connection, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = required_str(params, "studentId")?;
    let amount = required_f64(params, "amount")?;
    let payment_mode: PaymentMode = required_field(params, "paymentMode")?;
    let status: FeeStatus = required_field(params, "status")?;
    let payment_date = optional_str(params, "paymentDate")
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    check_expected_revision(conn, store::FEES_KEY, params)?;

    let students = store::read_or_seed(conn, store::STUDENTS_KEY, &seed::initial_students())
        .map_err(HandlerErr::from)?;
    let Some(student) = students.iter().find(|s| s.id == student_id) else {
        return Err(HandlerErr::not_found("student not found"));
    };

    let mut fees = load_fees(conn)?;
    let payment_id = new_id();
    let receipt_number = optional_str(params, "receiptNumber")
        .unwrap_or_else(|| format!("RCP-{:05}", fees.len() + 1));
    fees.push(FeePayment {
        id: payment_id.clone(),
        student_id,
        student_name: student.name.clone(),
        class: format!("{}{}", student.class, student.section),
        amount,
        payment_date,
        payment_mode,
        receipt_number: receipt_number.clone(),
        status,
    });
    let revision = store::replace(conn, store::FEES_KEY, &fees).map_err(HandlerErr::from)?;
    Ok(json!({
        "paymentId": payment_id,
        "receiptNumber": receipt_number,
        "revision": revision
    }))
}

/// Collected vs outstanding totals; pending and overdue both count as
/// outstanding.
fn fees_summary(conn: &Connection, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let fees = load_fees(conn)?;
    let total_collected = calc::fee_total_where(&fees, &[FeeStatus::Paid]);
    let total_outstanding =
        calc::fee_total_where(&fees, &[FeeStatus::Pending, FeeStatus::Overdue]);
    Ok(json!({
        "totalCollected": total_collected,
        "totalOutstanding": total_outstanding,
        "paymentCount": fees.len()
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "fees.list" => Some(dispatch(state, req, fees_list)),
        "fees.record" => Some(dispatch(state, req, fees_record)),
        "fees.summary" => Some(dispatch(state, req, fees_summary)),
        _ => None,
    }
}
