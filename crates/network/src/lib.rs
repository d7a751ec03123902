//! Fan simulator command surface
//!
//! This crate exposes the [`Engine`] control operations over a tiny HTTP interface, one
//! `GET` route per operation.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::{fmt::Debug, str::FromStr};

pub use fansim_app as app;
use fansim_app::{core::RGB8, Engine};
pub use fansim_app::{FanError, FanResult};
use smart_leds::SmartLedsWrite;

pub use crate::{
    response::Response,
    server::{serve, Request},
};

mod response;
mod server;

/// Default HTTP port of the command surface.
pub const DEFAULT_PORT: u16 = 5000;

/// Short description of the control routes.
pub const USAGE: &str = "API: \
    curl http://IP:5000/fan/off \
    curl http://IP:5000/fan/on \
    curl http://IP:5000/fan/speed/<int> \
    curl http://IP:5000/temp/<int> ";

/// A single request to the fan simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Shows the control page.
    Index,
    /// Starts the animation worker and turns the animation on.
    FanOn,
    /// Turns the animation off.
    FanOff,
    /// Changes the fan speed, in rpm.
    FanSpeed(u32),
    /// Updates the temperature reading.
    Temperature(u32),
    /// Reports the engine state.
    Status,
}

impl Command {
    /// Executes this command on the given engine.
    ///
    /// Apart from [`Command::FanOn`] all commands return immediately.
    pub fn execute<D>(self, engine: &Engine<D>) -> FanResult<Response>
    where
        D: SmartLedsWrite<Color = RGB8> + Send + 'static,
        D::Error: Debug,
    {
        log::debug!("Executing {self:?}");

        let response = match self {
            Self::Index => Response::html(include_str!("../static/index.html")),
            Self::FanOn => {
                engine.start()?;
                engine.turn_on();
                Response::text("Turned FAN animation ON")
            }
            Self::FanOff => {
                engine.turn_off();
                Response::text("Turned FAN animation OFF")
            }
            Self::FanSpeed(rpm) => {
                engine.set_speed(i64::from(rpm));
                Response::text("Changed FAN speed")
            }
            Self::Temperature(temperature) => {
                engine.set_temperature(i32::try_from(temperature).unwrap_or(i32::MAX));
                Response::text("Changed temperature reading")
            }
            Self::Status => Response::json(200, &engine.status())?,
        };
        Ok(response)
    }
}

/// Parses a route path like `/fan/speed/120`.
impl FromStr for Command {
    type Err = FanError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.strip_prefix('/').ok_or(FanError::UnknownCommand)?;
        let segments: Vec<_> = path.split('/').collect();

        let command = match segments.as_slice() {
            [""] => Self::Index,
            ["fan", "on"] => Self::FanOn,
            ["fan", "off"] => Self::FanOff,
            ["fan", "speed", rpm] => Self::FanSpeed(parse_digits(rpm)?),
            ["temp", temperature] => Self::Temperature(parse_digits(temperature)?),
            ["status"] => Self::Status,
            _ => return Err(FanError::UnknownCommand),
        };
        Ok(command)
    }
}

/// Parses an unsigned route parameter, signs and spaces are not allowed.
fn parse_digits(s: &str) -> FanResult<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FanError::UnknownCommand);
    }
    s.parse().map_err(|_| FanError::UnknownCommand)
}
