//! Terminal rendering of the dashboard views.

use active_calls_client::coordinator::Dashboard;
use active_calls_engine::status::{Condition, StatusView};
use active_calls_models::Priority;
use active_calls_view::list::ListView;
use active_calls_view::marker::MemoryLayer;
use console::style;

/// Prints the status summary and incident list for one completed cycle.
pub fn print_cycle(dashboard: &Dashboard<MemoryLayer>, list: &ListView) {
    println!();
    print_status(dashboard.status(), dashboard.markers().marker_count());
    print_list(list);
}

fn print_status(status: &StatusView, marker_count: usize) {
    let condition = match &status.condition {
        Condition::Operational => style("operational".to_string()).green(),
        Condition::Degraded(message) => style(format!("degraded: {message}")).yellow(),
        Condition::Unavailable(message) => style(format!("unavailable: {message}")).red(),
    };
    println!(
        "{} incidents ({} mapped, {} unmapped, {} markers) · {} · {condition}",
        style(status.total_incidents).bold(),
        status.mapped_incidents,
        status.unmapped_incidents,
        marker_count,
        status.freshness,
    );
}

fn print_list(list: &ListView) {
    if let Some(placeholder) = list.placeholder() {
        println!("  {}", style(placeholder).dim());
        return;
    }
    for row in &list.rows {
        let pin = if row.mapped {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {} {:>10}  {}  {} · {} · {}",
            priority_badge(row.priority),
            pin,
            row.time_label,
            style(&row.nature_of_call).bold(),
            row.location_label,
            row.incident_number,
            row.unit_summary,
        );
    }
    if list.rendered_count() < list.total_count {
        println!(
            "  {}",
            style(format!(
                "showing {} of {} incidents",
                list.rendered_count(),
                list.total_count
            ))
            .dim()
        );
    }
}

fn priority_badge(priority: Option<Priority>) -> String {
    priority.map_or_else(
        || style("[P?]".to_string()).dim().to_string(),
        |p| {
            let badge = format!("[P{}]", p.value());
            match p {
                Priority::One => style(badge).red().bold().to_string(),
                Priority::Two => style(badge).yellow().to_string(),
                Priority::Three => style(badge).cyan().to_string(),
                Priority::Four => style(badge).blue().to_string(),
            }
        },
    )
}

/// Prints the detail popup of the marker focused by a `show` command.
pub fn print_focused(dashboard: &Dashboard<MemoryLayer>) {
    if let Some(spec) = dashboard.markers().layer().focused_spec() {
        println!();
        for line in spec.popup.lines() {
            println!("  {line}");
        }
        println!("  ({:.5}, {:.5})", spec.lat, spec.lon);
    }
}
