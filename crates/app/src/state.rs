use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use fansim_core::Rpm;

/// Animation settings shared between the control side and the worker thread.
///
/// Every field is an independent atomic: the worker reads them once per phase, so a change
/// takes effect on the next phase boundary. The stop request belongs to the worker itself,
/// see [`crate::Engine::request_stop`].
#[derive(Debug)]
pub struct AnimationState {
    enabled: AtomicBool,
    temperature: AtomicI32,
    speed: AtomicU32,
}

impl AnimationState {
    /// Creates a disabled animation state with the given fan speed.
    ///
    /// A zero speed falls back to the default one.
    #[must_use]
    pub fn new(speed: Rpm) -> Self {
        let speed = if speed.0 == 0 {
            log::warn!("Fan speed must be positive, using {} rpm", Rpm::default());
            Rpm::default()
        } else {
            speed
        };

        Self {
            enabled: AtomicBool::new(false),
            temperature: AtomicI32::new(0),
            speed: AtomicU32::new(speed.0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, value: bool) {
        self.enabled.store(value, Ordering::Relaxed);
    }

    pub fn temperature(&self) -> i32 {
        self.temperature.load(Ordering::Relaxed)
    }

    pub fn set_temperature(&self, value: i32) {
        self.temperature.store(value, Ordering::Relaxed);
    }

    pub fn speed(&self) -> Rpm {
        Rpm(self.speed.load(Ordering::Relaxed))
    }

    /// Replaces the fan speed.
    ///
    /// Zero is rejected, the previous speed is kept.
    pub fn set_speed(&self, value: Rpm) -> bool {
        if value.0 == 0 {
            return false;
        }
        self.speed.store(value.0, Ordering::Relaxed);
        true
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(Rpm::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = AnimationState::default();
        assert!(!state.is_enabled());
        assert_eq!(state.temperature(), 0);
        assert_eq!(state.speed(), Rpm(60));
    }

    #[test]
    fn test_zero_speed_is_rejected() {
        let state = AnimationState::new(Rpm(90));
        assert!(!state.set_speed(Rpm(0)));
        assert_eq!(state.speed(), Rpm(90));
        assert!(state.set_speed(Rpm(120)));
        assert_eq!(state.speed(), Rpm(120));
    }

    #[test]
    fn test_zero_initial_speed_falls_back_to_default() {
        let state = AnimationState::new(Rpm(0));
        assert_eq!(state.speed(), Rpm::default());
    }
}
