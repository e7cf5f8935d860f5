use std::fmt::Write;

use crate::chart::Trend;
use crate::dashboard::{DashboardSummary, DashboardViewState};
use crate::models::{ChartPoint, StudentProfile};
use crate::progress::ArcGeometry;

const PLACEHOLDER: &str = "—";
const GAUGE_WIDTH: usize = 20;
const HISTORY_BAR_WIDTH: usize = 25;

pub fn build_report(state: &DashboardViewState) -> String {
    match state {
        DashboardViewState::Loading => "Loading dashboard…\n".to_string(),
        DashboardViewState::Error(message) => format!("{message}\n"),
        DashboardViewState::Ready { .. } => match state.summary() {
            Some(summary) => render_summary(&summary),
            None => String::new(),
        },
    }
}

/// A horizontal stand-in for the circular indicator at the given offset.
pub fn gauge(arc: &ArcGeometry, dash_offset: f64) -> String {
    let filled = (1.0 - dash_offset / arc.circumference).clamp(0.0, 1.0);
    let cells = (filled * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}%",
        "#".repeat(cells),
        "-".repeat(GAUGE_WIDTH - cells),
        arc.label
    )
}

fn render_summary(summary: &DashboardSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Dashboard");
    let _ = writeln!(
        output,
        "Welcome back, {}",
        summary.email.as_deref().unwrap_or("Student")
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Placement Score");
    let _ = writeln!(output, "{}", gauge(&summary.arc, summary.arc.dash_offset));
    let _ = writeln!(output);

    let _ = writeln!(output, "## Status");
    let _ = writeln!(
        output,
        "[{}] {}",
        summary.category.badge(),
        summary.label.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Profile Snapshot");
    write_profile(&mut output, &summary.profile);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Explanations");
    if summary.explanations.is_empty() {
        let _ = writeln!(output, "No explanations available.");
    } else {
        for text in &summary.explanations {
            let _ = writeln!(output, "- {text}");
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Recommendations");
    if summary.recommendations.is_empty() {
        let _ = writeln!(output, "No recommendations yet.");
    } else {
        for (index, text) in summary.recommendations.iter().enumerate() {
            let _ = writeln!(output, "{}. {text}", index + 1);
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Prediction History");
    match &summary.trend {
        Trend::Line { points } => write_history(&mut output, points),
        Trend::InsufficientHistory { .. } => {
            let _ = writeln!(
                output,
                "Not enough data to show a trend. Run more predictions!"
            );
        }
    }

    output
}

fn write_profile(output: &mut String, profile: &StudentProfile) {
    let rows = [
        ("CGPA", display(profile.cgpa)),
        ("DSA Rating", display(profile.dsa_rating)),
        ("Projects", display(profile.projects_count)),
        (
            "Internship",
            if profile.internship.unwrap_or(false) {
                "Yes".to_string()
            } else {
                "No".to_string()
            },
        ),
        ("Attendance", format!("{}%", display(profile.attendance))),
        ("Aptitude", display(profile.aptitude_score)),
    ];

    for (name, value) in rows {
        let _ = writeln!(output, "- {name}: {value}");
    }
}

fn write_history(output: &mut String, points: &[ChartPoint]) {
    for point in points {
        let cells = usize::from(point.score) * HISTORY_BAR_WIDTH / 100;
        let _ = writeln!(
            output,
            "{:>6} {:>3}% {}",
            point.date,
            point.score,
            "#".repeat(cells)
        );
    }
}

fn display<T: ToString>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
