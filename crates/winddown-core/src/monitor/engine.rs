//! Monitor state machine.
//!
//! The monitor is wall-clock based and caller-driven: it performs no side
//! effects and spawns no threads. The caller invokes `tick(now)` on a
//! coarse cadence and dispatches the returned events.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed -> Idle (wake reached or stopped)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = MonitorEngine::new(input, 10);
//! let started = engine.start(Local::now())?;
//! // In a loop:
//! for event in engine.tick(Local::now()) {
//!     dispatcher.handle(&event);
//! }
//! ```

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use super::plan::{compute_plan, Plan, PlanInput};
use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    Idle,
    Armed,
}

/// One-shot markers for the current armed session.
///
/// Each flips false -> true at most once per session; arming afresh
/// clears all three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredMarkers {
    pub warning: bool,
    pub ritual_alarm: bool,
    pub lights_out_alarm: bool,
}

/// Core monitor state machine.
///
/// Owns the active plan, the fired markers and the warning lead time.
/// At most one plan is active at a time; markers are meaningful only
/// relative to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorEngine {
    input: PlanInput,
    warning_lead_minutes: i64,
    plan: Option<Plan>,
    fired: FiredMarkers,
    state: MonitorState,
}

impl MonitorEngine {
    pub fn new(input: PlanInput, warning_lead_minutes: i64) -> Self {
        Self {
            input,
            warning_lead_minutes,
            plan: None,
            fired: FiredMarkers::default(),
            state: MonitorState::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == MonitorState::Armed
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn fired(&self) -> FiredMarkers {
        self.fired
    }

    pub fn input(&self) -> &PlanInput {
        &self.input
    }

    pub fn warning_lead_minutes(&self) -> i64 {
        self.warning_lead_minutes
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the monitor. Recomputes the plan from the current inputs; on a
    /// validation error nothing changes. This is the sole entry into
    /// `Armed`, and the only operation that clears all fired markers.
    pub fn start(&mut self, now: DateTime<Local>) -> Result<Event, ValidationError> {
        let plan = compute_plan(&self.input, now)?;
        let event = Event::MonitorStarted {
            ritual_start: plan.ritual_start,
            lights_out: plan.lights_out,
            wake: plan.wake,
            at: now,
        };
        self.plan = Some(plan);
        self.fired = FiredMarkers::default();
        self.state = MonitorState::Armed;
        tracing::debug!("monitor armed");
        Ok(event)
    }

    /// Advance the state machine against the wall clock. Returns the
    /// events that fired, in order; empty when not armed.
    ///
    /// The ritual and lights-out alarms may both fire from one tick when
    /// the ritual is short relative to the tick interval; each is an
    /// independent one-shot.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<Event> {
        if self.state != MonitorState::Armed {
            return Vec::new();
        }
        let Some(plan) = self.plan.clone() else {
            return Vec::new();
        };
        let mut events = Vec::new();

        // Warning window closes at ritual start, so the check runs first.
        if self.warning_lead_minutes > 0 && !self.fired.warning {
            let warning_time = plan.ritual_start - Duration::minutes(self.warning_lead_minutes);
            if warning_time <= now && now < plan.ritual_start {
                self.fired.warning = true;
                events.push(Event::WarningFired {
                    lead_minutes: self.warning_lead_minutes,
                    ritual_start: plan.ritual_start,
                    at: now,
                });
            }
        }

        if !self.fired.ritual_alarm && now >= plan.ritual_start {
            self.fired.ritual_alarm = true;
            events.push(Event::RitualAlarmFired {
                lights_out: plan.lights_out,
                sleep_minutes: plan.sleep_minutes,
                at: now,
            });
        }

        if !self.fired.lights_out_alarm && now >= plan.lights_out {
            self.fired.lights_out_alarm = true;
            events.push(Event::LightsOutAlarmFired {
                wake: plan.wake,
                at: now,
            });
        }

        if now >= plan.wake {
            self.state = MonitorState::Idle;
            events.push(Event::WakeReached { at: now });
            tracing::debug!("wake instant reached, monitor disarmed");
        }

        events
    }

    /// Disarm the monitor. Safe to call at any time, including before
    /// `start`, and repeatedly. A fresh display-only plan replaces the
    /// session's plan so the idle view never shows the session that just
    /// ended; if the current inputs fail validation the old plan stays.
    pub fn stop(&mut self, now: DateTime<Local>) -> Event {
        self.state = MonitorState::Idle;
        match compute_plan(&self.input, now) {
            Ok(plan) => self.plan = Some(plan),
            Err(err) => tracing::warn!(%err, "plan not refreshed on stop"),
        }
        Event::MonitorStopped { at: now }
    }

    /// Recompute the display plan from the current inputs. While armed
    /// the active session keeps its plan and a copy of it is returned.
    pub fn preview(&mut self, now: DateTime<Local>) -> Result<Plan, ValidationError> {
        if self.state == MonitorState::Armed {
            if let Some(plan) = &self.plan {
                return Ok(plan.clone());
            }
        }
        let plan = compute_plan(&self.input, now)?;
        self.plan = Some(plan.clone());
        Ok(plan)
    }

    /// Outside an armed session, transparently replace a plan whose wake
    /// instant has passed. Armed sessions run their course; the wake
    /// check in [`tick`](Self::tick) terminates them.
    pub fn refresh_if_stale(&mut self, now: DateTime<Local>) -> Option<Event> {
        if self.state == MonitorState::Armed {
            return None;
        }
        if !self.plan.as_ref().is_some_and(|p| p.is_stale(now)) {
            return None;
        }
        match compute_plan(&self.input, now) {
            Ok(plan) => {
                let wake = plan.wake;
                self.plan = Some(plan);
                Some(Event::PlanRefreshed { wake, at: now })
            }
            Err(err) => {
                tracing::warn!(%err, "stale plan could not be recomputed");
                None
            }
        }
    }

    /// Replace the plan inputs. An armed session keeps the plan it
    /// started with; the new inputs take effect at the next start,
    /// preview or staleness refresh.
    pub fn set_input(&mut self, input: PlanInput) {
        self.input = input;
    }

    /// Change the warning lead time. The warning marker is re-cleared so
    /// the warning can fire under the new lead even mid-session; the
    /// alarm markers keep their one-shot state.
    pub fn set_warning_lead(&mut self, minutes: i64) {
        self.warning_lead_minutes = minutes;
        self.fired.warning = false;
    }
}
