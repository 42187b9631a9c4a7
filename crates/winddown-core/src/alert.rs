//! Alert dispatch.
//!
//! Turns monitor events into collaborator calls: chime bursts, the
//! continuous alarm tone and titled notifications. Collaborators sit
//! behind traits so the CLI can plug in real audio while tests record
//! calls.
//!
//! Dispatch is fire-and-forget. Once the engine has emitted an event it
//! counts as fired; a collaborator failure is logged and swallowed so the
//! session keeps running.

use std::time::Duration;

use tracing::warn;

use crate::countdown::format_clock;
use crate::error::AlertError;
use crate::events::Event;

/// Number of chimes in the pre-ritual warning burst.
pub const WARNING_CHIME_REPEATS: usize = 6;
/// Spacing between warning chimes.
pub const WARNING_CHIME_SPACING: Duration = Duration::from_millis(700);

/// Tone output.
pub trait AudioSink {
    /// Play `repeats` short chimes, `spacing` apart. Returns once the
    /// burst has been scheduled; it need not block for its duration.
    fn play_chime_burst(&mut self, repeats: usize, spacing: Duration) -> Result<(), AlertError>;

    /// Start the continuous alarm tone. It keeps sounding until
    /// [`stop_alarm`](Self::stop_alarm).
    fn start_alarm(&mut self) -> Result<(), AlertError>;

    /// Silence the continuous alarm. Must be a no-op when nothing plays.
    fn stop_alarm(&mut self);
}

/// Titled message delivery (system notification, terminal banner, ...).
pub trait Notifier {
    fn notify(&mut self, title: &str, body: &str) -> Result<(), AlertError>;
}

/// Title and body for events that present an alert. Shared by the visual
/// banner and the notification path.
pub fn alert_text(event: &Event) -> Option<(String, String)> {
    match event {
        Event::WarningFired { lead_minutes, .. } => Some((
            "Bedtime routine soon".to_string(),
            format!("{lead_minutes} minutes until ritual start."),
        )),
        Event::RitualAlarmFired {
            lights_out,
            sleep_minutes,
            ..
        } => Some((
            "Start your bedtime routine.".to_string(),
            format!(
                "Goal: lights out by {} for {} minutes of sleep.",
                format_clock(lights_out),
                sleep_minutes
            ),
        )),
        Event::LightsOutAlarmFired { wake, .. } => Some((
            "Lights out.".to_string(),
            format!(
                "This is your planned sleep start time to wake at {}.",
                format_clock(wake)
            ),
        )),
        _ => None,
    }
}

/// Maps monitor events to audio and notification effects.
pub struct AlertDispatcher {
    audio: Box<dyn AudioSink>,
    notifier: Box<dyn Notifier>,
    notify_enabled: bool,
}

impl AlertDispatcher {
    pub fn new(audio: Box<dyn AudioSink>, notifier: Box<dyn Notifier>, notify_enabled: bool) -> Self {
        Self {
            audio,
            notifier,
            notify_enabled,
        }
    }

    /// Notification opt-in. Audio is unaffected.
    pub fn set_notify_enabled(&mut self, enabled: bool) {
        self.notify_enabled = enabled;
    }

    /// React to a monitor event. Never fails; collaborator errors are
    /// logged and dropped.
    pub fn handle(&mut self, event: &Event) {
        match event {
            Event::WarningFired { .. } => {
                if let Err(err) = self
                    .audio
                    .play_chime_burst(WARNING_CHIME_REPEATS, WARNING_CHIME_SPACING)
                {
                    warn!(%err, "warning chime burst failed");
                }
            }
            Event::RitualAlarmFired { .. } | Event::LightsOutAlarmFired { .. } => {
                if let Err(err) = self.audio.start_alarm() {
                    warn!(%err, "alarm tone failed to start");
                }
            }
            Event::WakeReached { .. } | Event::MonitorStopped { .. } => {
                self.audio.stop_alarm();
            }
            Event::MonitorStarted { .. } | Event::PlanRefreshed { .. } => {}
        }

        if let Some((title, body)) = alert_text(event) {
            self.post(&title, &body);
        }
    }

    /// Silence the alarm without touching the monitor: a dismissed ritual
    /// alarm still leaves the lights-out alarm armed.
    pub fn dismiss(&mut self) {
        self.audio.stop_alarm();
    }

    fn post(&mut self, title: &str, body: &str) {
        if !self.notify_enabled {
            return;
        }
        if let Err(err) = self.notifier.notify(title, body) {
            warn!(%err, "notification dropped");
        }
    }
}
