//! # Winddown Core Library
//!
//! Core logic for Winddown, a reverse alarm clock: instead of waking you
//! up, it works backward from your wake time and tells you when to start
//! winding down and when to turn the lights off.
//!
//! ## Architecture
//!
//! - **Plan Calculator**: pure backward computation of the ritual-start,
//!   lights-out and wake instants, with day rollover
//! - **Monitor**: a wall-clock state machine that requires the caller to
//!   periodically invoke `tick()`; it emits one-shot events for the
//!   early warning, both alarms and the automatic stop at wake time
//! - **Alert dispatch**: trait seams for the audio and notification
//!   collaborators; their failures degrade silently
//! - **Storage**: TOML-based preference persistence
//!
//! ## Key Components
//!
//! - [`MonitorEngine`]: core monitor state machine
//! - [`compute_plan`]: plan calculator
//! - [`AlertDispatcher`]: event-to-effect mapping
//! - [`Config`]: preference management

pub mod alert;
pub mod countdown;
pub mod error;
pub mod events;
pub mod monitor;
pub mod storage;

pub use alert::{AlertDispatcher, AudioSink, Notifier};
pub use error::{AlertError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use monitor::{compute_plan, FiredMarkers, MonitorEngine, MonitorState, Plan, PlanInput};
pub use storage::Config;
