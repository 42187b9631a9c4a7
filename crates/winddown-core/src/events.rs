use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Every observable transition in the monitor produces an Event.
/// The engine returns events; the alert dispatcher and the CLI consume them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    MonitorStarted {
        ritual_start: DateTime<Local>,
        lights_out: DateTime<Local>,
        wake: DateTime<Local>,
        at: DateTime<Local>,
    },
    /// Early reminder ahead of ritual start.
    WarningFired {
        lead_minutes: i64,
        ritual_start: DateTime<Local>,
        at: DateTime<Local>,
    },
    RitualAlarmFired {
        lights_out: DateTime<Local>,
        sleep_minutes: i64,
        at: DateTime<Local>,
    },
    LightsOutAlarmFired {
        wake: DateTime<Local>,
        at: DateTime<Local>,
    },
    /// Wake instant passed; the session ended on its own.
    WakeReached {
        at: DateTime<Local>,
    },
    MonitorStopped {
        at: DateTime<Local>,
    },
    /// A stale display plan was transparently recomputed.
    PlanRefreshed {
        wake: DateTime<Local>,
        at: DateTime<Local>,
    },
}
