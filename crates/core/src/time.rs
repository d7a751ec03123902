use core::{fmt::Display, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Fan speed used until the first speed command arrives.
pub const DEFAULT_FAN_SPEED: Rpm = Rpm(60);
/// Numerator of the phase delay formula.
pub const MINUTES_PER_HOUR: f64 = 60.0;
/// Number of phase swaps shown per simulated revolution (`+X+X+X+X`).
pub const MOVES_PER_REVOLUTION: f64 = 8.0;

/// Fan speed in revolutions per minute.
#[derive(
    Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord, Hash,
)]
pub struct Rpm(pub u32);

impl Rpm {
    /// Returns the raw delay between two phase swaps: `60 / rpm / 8`.
    ///
    /// The value is unitless on purpose, the sleep unit it is fed into is chosen by
    /// [`DelayUnit`].
    #[must_use]
    pub fn phase_delay(self) -> f64 {
        MINUTES_PER_HOUR / f64::from(self.0) / MOVES_PER_REVOLUTION
    }

    /// Returns the delay between two phase swaps in the given unit.
    #[must_use]
    pub fn phase_duration(self, unit: DelayUnit) -> Duration {
        unit.duration(self.phase_delay())
    }
}

impl Default for Rpm {
    fn default() -> Self {
        DEFAULT_FAN_SPEED
    }
}

impl From<u32> for Rpm {
    fn from(inner: u32) -> Self {
        Self(inner)
    }
}

impl FromStr for Rpm {
    type Err = <u32 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u32::from_str(s).map(Self)
    }
}

impl Display for Rpm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unit of the sleep primitive the phase delay is fed into.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    /// `60 / rpm / 8` seconds, 125ms per phase at 60 rpm.
    #[default]
    Seconds,
    /// `60 / rpm / 8` minutes, 7.5s per phase at 60 rpm.
    Minutes,
}

impl DelayUnit {
    /// Converts a raw delay value into a duration.
    ///
    /// Values that do not fit into a [`Duration`], like the infinite delay of a stopped fan,
    /// saturate to [`Duration::MAX`].
    #[must_use]
    pub fn duration(self, value: f64) -> Duration {
        let secs = match self {
            Self::Seconds => value,
            Self::Minutes => value * 60.0,
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

impl FromStr for DelayUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seconds" | "s" => Ok(Self::Seconds),
            "minutes" | "m" => Ok(Self::Minutes),
            _ => Err(Error::InvalidDelayUnit),
        }
    }
}

impl Display for DelayUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Seconds => f.write_str("seconds"),
            Self::Minutes => f.write_str("minutes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_delay_formula() {
        assert!((Rpm(60).phase_delay() - 0.125).abs() < f64::EPSILON);
        assert!((Rpm(120).phase_delay() - 0.0625).abs() < f64::EPSILON);
        assert!(Rpm(61).phase_delay() < Rpm(60).phase_delay());
    }

    #[test]
    fn test_delay_units() {
        assert_eq!(
            Rpm(60).phase_duration(DelayUnit::Seconds),
            Duration::from_millis(125)
        );
        assert_eq!(
            Rpm(60).phase_duration(DelayUnit::Minutes),
            Duration::from_millis(7_500)
        );
    }

    #[test]
    fn test_zero_speed_saturates() {
        assert_eq!(Rpm(0).phase_duration(DelayUnit::Seconds), Duration::MAX);
        assert_eq!(Rpm(0).phase_duration(DelayUnit::Minutes), Duration::MAX);
    }

    #[test]
    fn test_delay_unit_from_str() {
        assert_eq!("seconds".parse::<DelayUnit>(), Ok(DelayUnit::Seconds));
        assert_eq!("m".parse::<DelayUnit>(), Ok(DelayUnit::Minutes));
        assert_eq!("hours".parse::<DelayUnit>(), Err(Error::InvalidDelayUnit));
    }

    #[test]
    fn test_delay_unit_serde_names() {
        assert_eq!(
            serde_json::to_string(&DelayUnit::Minutes).unwrap(),
            "\"minutes\""
        );
        assert_eq!(
            serde_json::from_str::<DelayUnit>("\"seconds\"").unwrap(),
            DelayUnit::Seconds
        );
    }
}
