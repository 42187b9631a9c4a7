//! Sleep plan computation.
//!
//! A `Plan` is an immutable snapshot computed from the current inputs; it
//! is replaced on recomputation, never mutated in place. Instants are
//! derived backward from the wake time:
//!
//! ```text
//! ritual_start <= lights_out <= wake
//! ```

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// User inputs a plan is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
    /// Desired wake-up clock time.
    pub wake_time: NaiveTime,
    /// Sleep goal in hours. May be fractional (7.5 is fine).
    pub sleep_hours: f64,
    /// Wind-down ritual length in minutes.
    pub ritual_minutes: f64,
}

/// A computed sleep plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// When to begin the wind-down ritual.
    pub ritual_start: DateTime<Local>,
    /// When sleep should begin.
    pub lights_out: DateTime<Local>,
    /// When to wake up.
    pub wake: DateTime<Local>,
    /// Sleep goal rounded to whole minutes.
    pub sleep_minutes: i64,
    /// Ritual length rounded to whole minutes.
    pub ritual_minutes: i64,
}

impl Plan {
    /// A plan whose wake instant has already passed is stale and must be
    /// recomputed before it is shown outside an armed session.
    pub fn is_stale(&self, now: DateTime<Local>) -> bool {
        self.wake <= now
    }
}

/// Compute a fresh plan from `input` as seen at `now`.
///
/// The wake instant is today at `input.wake_time`; if that has already
/// passed it moves forward by one calendar day (planning tonight's sleep
/// for tomorrow morning). Lights-out and ritual-start are derived
/// backward from it. Pure and deterministic given `(input, now)`.
pub fn compute_plan(input: &PlanInput, now: DateTime<Local>) -> Result<Plan, ValidationError> {
    if !input.sleep_hours.is_finite() || input.sleep_hours < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "sleep_hours".into(),
            message: "sleep goal must be a finite, non-negative number of hours".into(),
        });
    }
    if !input.ritual_minutes.is_finite() || input.ritual_minutes < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "ritual_minutes".into(),
            message: "ritual length must be a finite, non-negative number of minutes".into(),
        });
    }

    let mut wake_naive = now.date_naive().and_time(input.wake_time);
    let mut wake = resolve_local(wake_naive)?;
    if wake <= now {
        wake_naive = wake_naive + Duration::days(1);
        wake = resolve_local(wake_naive)?;
    }

    let sleep_minutes = (input.sleep_hours * 60.0).round() as i64;
    let ritual_ms = (input.ritual_minutes * 60_000.0).round() as i64;
    let lights_out = wake - Duration::minutes(sleep_minutes);
    let ritual_start = lights_out - Duration::milliseconds(ritual_ms);

    Ok(Plan {
        ritual_start,
        lights_out,
        wake,
        sleep_minutes,
        ritual_minutes: input.ritual_minutes.round() as i64,
    })
}

/// Resolve a naive local wall time to an instant. Ambiguous times (clocks
/// rolled back) take the earlier instant; nonexistent times (clocks rolled
/// forward) are rejected.
fn resolve_local(naive: NaiveDateTime) -> Result<DateTime<Local>, ValidationError> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier),
        LocalResult::None => Err(ValidationError::InvalidValue {
            field: "wake_time".into(),
            message: format!("{naive} does not exist in the local timezone"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn local(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 1, day, hour, minute, 0)
            .unwrap()
    }

    fn input(wake: &str, sleep_hours: f64, ritual_minutes: f64) -> PlanInput {
        PlanInput {
            wake_time: NaiveTime::parse_from_str(wake, "%H:%M").unwrap(),
            sleep_hours,
            ritual_minutes,
        }
    }

    #[test]
    fn evening_plan_rolls_wake_to_tomorrow() {
        let now = local(1, 22, 0);
        let plan = compute_plan(&input("07:00", 8.0, 30.0), now).unwrap();
        assert_eq!(plan.wake, local(2, 7, 0));
        assert_eq!(plan.lights_out, local(1, 23, 0));
        assert_eq!(plan.ritual_start, local(1, 22, 30));
        assert_eq!(plan.sleep_minutes, 480);
        assert_eq!(plan.ritual_minutes, 30);
    }

    #[test]
    fn future_wake_time_stays_today() {
        let now = local(1, 6, 0);
        let plan = compute_plan(&input("07:00", 8.0, 30.0), now).unwrap();
        assert_eq!(plan.wake, local(1, 7, 0));
    }

    #[test]
    fn wake_time_equal_to_now_rolls_over() {
        let now = local(1, 7, 0);
        let plan = compute_plan(&input("07:00", 8.0, 30.0), now).unwrap();
        assert_eq!(plan.wake, local(2, 7, 0));
    }

    #[test]
    fn fractional_sleep_hours_round_to_minutes() {
        let now = local(1, 22, 0);
        let plan = compute_plan(&input("07:00", 7.5, 0.0), now).unwrap();
        assert_eq!(plan.sleep_minutes, 450);
        assert_eq!(plan.wake - plan.lights_out, Duration::minutes(450));
    }

    #[test]
    fn zero_durations_collapse_the_plan() {
        let now = local(1, 22, 0);
        let plan = compute_plan(&input("07:00", 0.0, 0.0), now).unwrap();
        assert_eq!(plan.ritual_start, plan.lights_out);
        assert_eq!(plan.lights_out, plan.wake);
    }

    #[test]
    fn rejects_negative_sleep_hours() {
        let now = local(1, 22, 0);
        assert!(compute_plan(&input("07:00", -1.0, 30.0), now).is_err());
    }

    #[test]
    fn rejects_non_finite_inputs() {
        let now = local(1, 22, 0);
        assert!(compute_plan(&input("07:00", f64::NAN, 30.0), now).is_err());
        assert!(compute_plan(&input("07:00", 8.0, f64::INFINITY), now).is_err());
    }

    #[test]
    fn recomputation_yields_a_fresh_equal_plan() {
        let now = local(1, 22, 0);
        let goal = input("07:00", 8.0, 30.0);
        assert_eq!(
            compute_plan(&goal, now).unwrap(),
            compute_plan(&goal, now).unwrap()
        );
    }

    #[test]
    fn staleness_tracks_the_wake_instant() {
        let now = local(1, 22, 0);
        let plan = compute_plan(&input("07:00", 8.0, 30.0), now).unwrap();
        assert!(!plan.is_stale(now));
        assert!(!plan.is_stale(local(2, 6, 59)));
        assert!(plan.is_stale(local(2, 7, 0)));
        assert!(plan.is_stale(local(2, 8, 0)));
    }

    proptest! {
        #[test]
        fn plan_invariants_hold(
            hour in 0u32..24,
            minute in 0u32..60,
            sleep_hours in 0.0f64..16.0,
            ritual_minutes in 0.0f64..180.0,
        ) {
            let now = Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
            let goal = PlanInput {
                wake_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
                sleep_hours,
                ritual_minutes,
            };
            let plan = compute_plan(&goal, now).unwrap();
            prop_assert!(plan.ritual_start <= plan.lights_out);
            prop_assert!(plan.lights_out <= plan.wake);
            prop_assert!(plan.wake > now);
            prop_assert!(plan.wake - now <= Duration::days(1));
            prop_assert_eq!(
                plan.wake - plan.lights_out,
                Duration::minutes((sleep_hours * 60.0).round() as i64)
            );
            prop_assert_eq!(
                plan.lights_out - plan.ritual_start,
                Duration::milliseconds((ritual_minutes * 60_000.0).round() as i64)
            );
        }
    }
}
