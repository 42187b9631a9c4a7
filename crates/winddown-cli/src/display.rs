//! Terminal rendering of plans, status lines and the live countdown.

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use winddown_core::alert::alert_text;
use winddown_core::countdown::{format_clock, format_countdown, ms_until};
use winddown_core::{Event, Plan};

/// "today" or "tomorrow" relative to `now`, for the ready status line.
pub fn day_word(plan: &Plan, now: DateTime<Local>) -> &'static str {
    if plan.ritual_start.date_naive() == now.date_naive() {
        "today"
    } else {
        "tomorrow"
    }
}

fn row(label: &str, value: String) -> String {
    format!("  {} {}", format!("{label:<13}").bold(), value)
}

/// Multi-line plan table (the setup view).
pub fn render_plan(plan: &Plan, now: DateTime<Local>) -> String {
    [
        row("Ritual start", format_clock(&plan.ritual_start)),
        row("Lights out", format_clock(&plan.lights_out)),
        row("Wake", format_clock(&plan.wake)),
        row("Status", format!("Ready ({})", day_word(plan, now))),
        format!(
            "  Will trigger at {} (ritual start) and at {} (lights out).",
            format_clock(&plan.ritual_start),
            format_clock(&plan.lights_out)
        ),
    ]
    .join("\n")
}

/// Single-line live countdown to ritual start (the monitoring view).
pub fn countdown_line(plan: &Plan, now: DateTime<Local>) -> String {
    let ms = ms_until(&plan.ritual_start, &now);
    let hint = if ms > 0 {
        format!("Ritual starts at {}.", format_clock(&plan.ritual_start))
    } else if now < plan.wake {
        format!(
            "Ritual time has passed; aim for lights out by {}.",
            format_clock(&plan.lights_out)
        )
    } else {
        String::new()
    };
    format!("{}  {}", format_countdown(ms).bold(), hint.dimmed())
}

/// Alert banner for events that present one.
pub fn alert_banner(event: &Event) -> Option<String> {
    let (title, body) = alert_text(event)?;
    Some(format!("  {}\n  {}", title.bold().red(), body))
}
