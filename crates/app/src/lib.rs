//! Fan simulator application
//!
//! The [`Engine`] owns the animation state and at most one background worker thread that
//! swaps the fan images on the LED matrix.

#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub use fansim_core as core;
pub use fansim_core::{Error as FanError, Result as FanResult};
use fansim_core::{DelayUnit, Rpm};
use serde::{Deserialize, Serialize};

pub use crate::{engine::Engine, state::AnimationState};

mod engine;
mod state;
mod worker;

/// A global application configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Configuration {
    /// Fan speed used until the first speed command arrives.
    pub speed_rpm: Rpm,
    /// Unit of the sleep between two fan images.
    pub delay_unit: DelayUnit,
}

/// Point in time snapshot of the engine state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// Whether the fan animation is turned on.
    pub enabled: bool,
    /// Last temperature reading.
    pub temperature: i32,
    /// Current fan speed.
    pub speed_rpm: Rpm,
    /// Indicates whether there is a live animation worker.
    pub running: bool,
    /// The highest temperature the gauge can represent.
    pub max_temperature: i32,
}
