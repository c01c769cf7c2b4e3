use crate::calc::ReportCardModel;

/// Builds the detached, printable report-card document from an in-memory
/// model. Pure presentation of already-derived values; nothing is read or
/// written here.
pub fn report_card_html(model: &ReportCardModel, remarks: Option<&str>) -> String {
    let mut rows = String::new();
    for row in &model.rows {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}%</td><td class=\"num\">{}</td></tr>\n",
            escape(&row.exam_name),
            escape(&row.subject),
            row.marks_obtained,
            row.total_marks,
            row.percentage,
            escape(&row.grade),
        ));
    }
    let results_section = if model.rows.is_empty() {
        "<p class=\"empty\">No exam results available yet</p>".to_string()
    } else {
        format!(
            "<table>\n<thead><tr><th>Exam</th><th>Subject</th><th>Marks Obtained</th><th>Total Marks</th><th>Percentage</th><th>Grade</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>",
            rows
        )
    };
    let remarks_section = match remarks {
        Some(text) if !text.trim().is_empty() => format!(
            "<div class=\"remarks\"><h3>Teacher's Remarks</h3><p>{}</p></div>",
            escape(text)
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>Report Card - {name}</title>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ font-family: Arial, sans-serif; padding: 40px; background: white; }}
.header {{ text-align: center; border-bottom: 3px solid #2563eb; padding-bottom: 20px; margin-bottom: 30px; }}
.header h1 {{ font-size: 28px; color: #1e40af; }}
.student-info {{ display: grid; grid-template-columns: 1fr 1fr; gap: 15px; margin-bottom: 30px; padding: 20px; background: #f8fafc; border-radius: 8px; }}
.metrics {{ display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; margin: 30px 0; }}
.metric-card {{ padding: 20px; border-radius: 8px; text-align: center; border: 2px solid #e2e8f0; }}
.metric-value {{ font-size: 32px; font-weight: 700; color: #1e40af; }}
table {{ width: 100%; border-collapse: collapse; margin-bottom: 20px; }}
th {{ background: #2563eb; color: white; padding: 12px; text-align: left; }}
td {{ padding: 12px; border-bottom: 1px solid #e2e8f0; }}
td.num {{ text-align: center; }}
.remarks {{ margin-top: 30px; padding: 20px; background: #fef3c7; border-left: 4px solid #f59e0b; }}
.empty {{ text-align: center; padding: 30px; color: #64748b; }}
@media print {{ body {{ padding: 20px; }} }}
</style>
</head>
<body>
<div class="header">
<h1>School Management System</h1>
<p>Academic Report Card</p>
</div>
<div class="student-info">
<div><strong>Student Name</strong> {name}</div>
<div><strong>Roll Number</strong> {roll}</div>
<div><strong>Class &amp; Section</strong> Class {class}{section}</div>
<div><strong>Date of Birth</strong> {dob}</div>
<div><strong>Parent Name</strong> {parent}</div>
<div><strong>Contact</strong> {contact}</div>
</div>
<div class="metrics">
<div class="metric-card"><p>Attendance</p><p class="metric-value">{attendance}%</p><p>{present}/{total} days</p></div>
<div class="metric-card"><p>Average Score</p><p class="metric-value">{average}%</p><p>{exam_count} exams</p></div>
<div class="metric-card"><p>Overall Grade</p><p class="metric-value">{grade}</p></div>
</div>
<h2>Examination Results</h2>
{results}
{remarks}
</body>
</html>
"#,
        name = escape(&model.student.name),
        roll = escape(&model.student.roll_number),
        class = escape(&model.student.class),
        section = escape(&model.student.section),
        dob = escape(&model.student.date_of_birth),
        parent = escape(&model.student.parent_name),
        contact = escape(&model.student.contact_number),
        attendance = model.attendance.percent,
        present = model.attendance.present_days,
        total = model.attendance.total_days,
        average = model.average_percentage,
        exam_count = model.exam_count,
        grade = model.overall_grade,
        results = results_section,
        remarks = remarks_section,
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
