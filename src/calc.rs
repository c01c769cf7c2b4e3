use serde::Serialize;

use crate::model::{AttendanceRecord, AttendanceStatus, Exam, ExamResult, FeePayment, FeeStatus, Student};

pub fn round_1_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn round_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Fixed descending band table. Total over all numeric inputs: values below
/// 40 (including negatives) band to F, values at or above 90 (including
/// over-100) band to A+.
pub fn grade_band(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A+"
    } else if percentage >= 80.0 {
        "A"
    } else if percentage >= 70.0 {
        "B+"
    } else if percentage >= 60.0 {
        "B"
    } else if percentage >= 50.0 {
        "C"
    } else if percentage >= 40.0 {
        "D"
    } else {
        "F"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub percent: f64,
    pub present_days: usize,
    pub total_days: usize,
    /// False when the log had no entries for the student and the static
    /// snapshot on the record was used instead.
    pub from_log: bool,
}

/// Attendance percent for one student: present / total * 100, one decimal.
/// With an empty log for the student, falls back to the record's static
/// `attendancePercentage` snapshot.
pub fn attendance_summary(records: &[AttendanceRecord], student: &Student) -> AttendanceSummary {
    let mine: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| r.student_id == student.id)
        .collect();
    let total = mine.len();
    if total == 0 {
        return AttendanceSummary {
            percent: student.attendance_percentage,
            present_days: 0,
            total_days: 0,
            from_log: false,
        };
    }
    let present = mine
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count();
    AttendanceSummary {
        percent: round_1_decimal(present as f64 / total as f64 * 100.0),
        present_days: present,
        total_days: total,
        from_log: true,
    }
}

/// Mean of the stored per-result percentages (not recomputed from marks),
/// two decimals; 0 for an empty list.
pub fn average_exam_percentage(results: &[ExamResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let sum: f64 = results.iter().map(|r| r.percentage).sum();
    round_2_decimals(sum / results.len() as f64)
}

pub fn fee_total_where(fees: &[FeePayment], statuses: &[FeeStatus]) -> f64 {
    fees.iter()
        .filter(|f| statuses.contains(&f.status))
        .map(|f| f.amount)
        .sum()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub exam_name: String,
    pub subject: String,
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub percentage: f64,
    pub grade: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardModel {
    pub student: Student,
    pub attendance: AttendanceSummary,
    pub average_percentage: f64,
    pub overall_grade: &'static str,
    pub exam_count: usize,
    pub rows: Vec<ReportRow>,
}

/// Joins one student's results against the exam list and attendance log.
/// Recomputed on every call; nothing here is persisted.
pub fn report_card_model(
    student: &Student,
    exams: &[Exam],
    results: &[ExamResult],
    attendance: &[AttendanceRecord],
) -> ReportCardModel {
    let mine: Vec<&ExamResult> = results
        .iter()
        .filter(|r| r.student_id == student.id)
        .collect();
    let rows: Vec<ReportRow> = mine
        .iter()
        .map(|r| {
            let exam = exams.iter().find(|e| e.id == r.exam_id);
            ReportRow {
                exam_name: exam.map(|e| e.name.clone()).unwrap_or_else(|| "N/A".to_string()),
                subject: exam.map(|e| e.subject.clone()).unwrap_or_else(|| "N/A".to_string()),
                marks_obtained: r.marks_obtained,
                total_marks: r.total_marks,
                percentage: r.percentage,
                grade: r.grade.clone(),
            }
        })
        .collect();
    let owned: Vec<ExamResult> = mine.iter().map(|r| (*r).clone()).collect();
    let average = average_exam_percentage(&owned);
    ReportCardModel {
        student: student.clone(),
        attendance: attendance_summary(attendance, student),
        average_percentage: average,
        overall_grade: grade_band(average),
        exam_count: rows.len(),
        rows,
    }
}
