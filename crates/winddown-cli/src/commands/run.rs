//! The armed monitoring session.
//!
//! Two independent cadences drive the loop: a fast display tick that
//! refreshes the countdown, and a slower monitor tick that drives the
//! engine. An empty input line dismisses the alarm, `q` stops the
//! session; so does Ctrl-C.

use std::io::Write;
use std::time::Duration;

use chrono::Local;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use winddown_core::{AlertDispatcher, Config, Event, MonitorEngine};

use crate::audio::CpalAudio;
use crate::display;
use crate::notify::TerminalNotifier;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let input = config.plan_input()?;
    let mut engine = MonitorEngine::new(input, config.monitor.warning_lead_minutes);
    let mut dispatcher = AlertDispatcher::new(
        Box::new(CpalAudio::new()),
        Box::new(TerminalNotifier),
        config.notifications.enabled,
    );

    let started = engine.start(Local::now())?;
    emit(&started, json)?;
    if let Some(plan) = engine.plan() {
        println!("{}", display::render_plan(plan, Local::now()));
    }
    println!(
        "{}",
        "Monitoring (keep this terminal open; enter = dismiss alarm, q = stop)".dimmed()
    );

    let tick_seconds = config.monitor.tick_seconds.max(1);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(session(&mut engine, &mut dispatcher, tick_seconds, json))
}

async fn session(
    engine: &mut MonitorEngine,
    dispatcher: &mut AlertDispatcher,
    tick_seconds: u64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut display_tick = tokio::time::interval(Duration::from_secs(1));
    let mut monitor_tick = tokio::time::interval(Duration::from_secs(tick_seconds));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = display_tick.tick() => {
                let now = Local::now();
                if let Some(event) = engine.refresh_if_stale(now) {
                    emit(&event, json)?;
                }
                if let Some(plan) = engine.plan() {
                    let line = display::countdown_line(plan, now);
                    print!("\r\x1b[2K{line}");
                    std::io::stdout().flush().ok();
                }
            }
            _ = monitor_tick.tick() => {
                let now = Local::now();
                // Preference edits take effect mid-session: a changed
                // warning lead re-arms the warning, new plan inputs wait
                // for the next start. The active plan is untouched.
                let config = Config::load_or_default();
                if config.monitor.warning_lead_minutes != engine.warning_lead_minutes() {
                    engine.set_warning_lead(config.monitor.warning_lead_minutes);
                }
                if let Ok(input) = config.plan_input() {
                    engine.set_input(input);
                }
                dispatcher.set_notify_enabled(config.notifications.enabled);

                for event in engine.tick(now) {
                    println!();
                    if let Some(banner) = display::alert_banner(&event) {
                        println!("{banner}");
                    }
                    emit(&event, json)?;
                    dispatcher.handle(&event);
                }
                if !engine.is_armed() {
                    println!("{}", "Done (wake time reached)".bold());
                    return Ok(());
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line.unwrap_or(None).as_deref().map(str::trim) {
                    None => stdin_open = false,
                    Some("") => dispatcher.dismiss(),
                    Some("q") | Some("quit") | Some("stop") => {
                        return stop(engine, dispatcher, json);
                    }
                    Some(_) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                return stop(engine, dispatcher, json);
            }
        }
    }
}

fn stop(
    engine: &mut MonitorEngine,
    dispatcher: &mut AlertDispatcher,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let event = engine.stop(Local::now());
    dispatcher.handle(&event);
    emit(&event, json)?;
    println!("Not running");
    Ok(())
}

fn emit(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        tracing::debug!(?event, "monitor event");
    }
    Ok(())
}
