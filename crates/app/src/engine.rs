//! Fan animation controller.

use std::{
    fmt::Debug,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use fansim_core::{DelayUnit, Frame, Gauge, Phase, Rpm, MAX_TEMPERATURE, RGB8};
use smart_leds::SmartLedsWrite;

use crate::{worker::Worker, AnimationState, Configuration, FanResult, Status};

/// Display side of the engine: the LED matrix driver and the fan image painted last.
struct Screen<D> {
    display: D,
    phase: Option<Phase>,
}

/// Engine parts shared with the worker thread.
pub(crate) struct Shared<D> {
    pub(crate) state: AnimationState,
    screen: Mutex<Screen<D>>,
    delay_unit: DelayUnit,
}

impl<D> Shared<D> {
    fn screen(&self) -> MutexGuard<'_, Screen<D>> {
        // A panic while painting leaves the screen in a usable state.
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the delay between two fan images for the current speed.
    pub(crate) fn phase_duration(&self) -> Duration {
        self.state.speed().phase_duration(self.delay_unit)
    }
}

impl<D> Shared<D>
where
    D: SmartLedsWrite<Color = RGB8>,
    D::Error: Debug,
{
    fn write(screen: &mut Screen<D>, frame: &Frame) {
        log::trace!("Writing frame\n{frame:?}");
        if let Err(err) = screen.display.write(frame.pixels()) {
            log::warn!("Unable to show frame: {err:?}");
        }
    }

    /// Shows the given fan image on top of the thermometer.
    ///
    /// Does nothing if the animation has been turned off in the meantime.
    pub(crate) fn show_phase(&self, phase: Phase) {
        let mut screen = self.screen();
        if !self.state.is_enabled() {
            return;
        }

        let frame = Frame::compose(&Gauge::new(self.state.temperature()), Some(phase.bitmap()));
        Self::write(&mut screen, &frame);
        screen.phase = Some(phase);
    }

    /// Repaints the thermometer over the last shown fan image.
    pub(crate) fn repaint(&self) {
        let mut screen = self.screen();
        let fan = screen.phase.map(Phase::bitmap);
        let frame = Frame::compose(&Gauge::new(self.state.temperature()), fan);
        Self::write(&mut screen, &frame);
    }

    /// Paints the whole matrix black.
    pub(crate) fn clear(&self) {
        let mut screen = self.screen();
        Self::write(&mut screen, &Frame::clear());
        screen.phase = None;
    }
}

/// Lifecycle of the single animation worker.
enum Slot {
    Idle,
    /// The worker is animating, possibly with a pending stop request.
    Running(Worker),
    /// Somebody is waiting for the worker to exit.
    Stopping,
}

/// Fan animation engine.
///
/// Control methods take `&self` and never block, so the engine can be shared between
/// request handlers behind an [`Arc`]. The animation itself runs on a single background
/// thread started by [`Engine::start`].
pub struct Engine<D> {
    shared: Arc<Shared<D>>,
    slot: Mutex<Slot>,
    stopped: Condvar,
}

impl<D> Engine<D>
where
    D: SmartLedsWrite<Color = RGB8> + Send + 'static,
    D::Error: Debug,
{
    /// Creates a new engine painting on the given display.
    ///
    /// A zero speed in the configuration falls back to the default one.
    pub fn new(display: D, config: Configuration) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: AnimationState::new(config.speed_rpm),
                screen: Mutex::new(Screen {
                    display,
                    phase: None,
                }),
                delay_unit: config.delay_unit,
            }),
            slot: Mutex::new(Slot::Idle),
            stopped: Condvar::new(),
        }
    }

    /// Turns the fan animation on.
    ///
    /// The worker must be started separately by [`Self::start`].
    pub fn turn_on(&self) {
        log::debug!("Turning fan animation on");
        self.shared.state.set_enabled(true);
    }

    /// Turns the fan animation off and immediately clears the display.
    pub fn turn_off(&self) {
        log::debug!("Turning fan animation off");
        self.shared.state.set_enabled(false);
        self.shared.clear();
    }

    /// Changes the fan speed, non-positive values are ignored.
    ///
    /// The new speed takes effect on the next fan image.
    pub fn set_speed(&self, rpm: i64) {
        let speed = Rpm(u32::try_from(rpm.max(0)).unwrap_or(u32::MAX));
        if self.shared.state.set_speed(speed) {
            log::debug!("Fan speed set to {speed} rpm");
        } else {
            log::warn!("Fan speed must be positive, ignoring {rpm}");
        }
    }

    /// Updates the temperature reading and immediately repaints the thermometer.
    ///
    /// Readings are passed through unchecked, see [`fansim_core::gauge::color_for`].
    pub fn set_temperature(&self, temperature: i32) {
        log::debug!("Temperature set to {temperature}");
        self.shared.state.set_temperature(temperature);
        self.shared.repaint();
    }

    /// Starts the animation worker.
    ///
    /// Does nothing if the worker is already running. A worker that has been asked to stop
    /// is waited for before a fresh one is spawned, so there is never more than one loop.
    pub fn start(&self) -> FanResult<()> {
        let mut slot = self.slot();
        loop {
            match &*slot {
                Slot::Idle => break,
                Slot::Stopping => {
                    slot = self.wait_stopped(slot);
                    continue;
                }
                Slot::Running(worker) => {
                    if !worker.is_stop_requested() && !worker.is_finished() {
                        log::debug!("Fan animation worker is already running");
                        return Ok(());
                    }
                }
            }

            log::info!("Waiting for the previous fan animation worker");
            let (guard, result) = self.join_worker(slot);
            slot = guard;
            result?;
        }

        *slot = Slot::Running(Worker::spawn(self.shared.clone())?);
        Ok(())
    }

    /// Asks the worker to stop once it finishes the current fan image.
    pub fn request_stop(&self) {
        if let Slot::Running(worker) = &*self.slot() {
            log::info!("Requesting fan animation worker to stop");
            worker.request_stop();
        }
    }

    /// Blocks until the worker has cleared the display and exited.
    ///
    /// Returns immediately if there is no worker. A worker nobody asked to stop is asked
    /// to stop first.
    pub fn await_stop(&self) -> FanResult<()> {
        let slot = self.slot();
        match &*slot {
            Slot::Idle => Ok(()),
            Slot::Stopping => {
                drop(self.wait_stopped(slot));
                Ok(())
            }
            Slot::Running(_) => self.join_worker(slot).1,
        }
    }

    /// Stops the worker and waits for it, see [`Self::request_stop`] and [`Self::await_stop`].
    pub fn stop(&self) -> FanResult<()> {
        self.request_stop();
        self.await_stop()
    }

    /// Returns true if there is a live animation worker.
    pub fn is_running(&self) -> bool {
        match &*self.slot() {
            Slot::Idle => false,
            Slot::Running(worker) => !worker.is_finished(),
            Slot::Stopping => true,
        }
    }

    /// Returns the highest temperature the gauge can represent.
    pub fn max_temperature(&self) -> i32 {
        MAX_TEMPERATURE
    }

    /// Returns a snapshot of the engine state.
    pub fn status(&self) -> Status {
        let state = &self.shared.state;
        Status {
            enabled: state.is_enabled(),
            temperature: state.temperature(),
            speed_rpm: state.speed(),
            running: self.is_running(),
            max_temperature: self.max_temperature(),
        }
    }
}

impl<D> Engine<D> {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits until nobody is joining the worker anymore.
    fn wait_stopped<'a>(&self, slot: MutexGuard<'a, Slot>) -> MutexGuard<'a, Slot> {
        self.stopped
            .wait_while(slot, |slot| matches!(slot, Slot::Stopping))
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Stops and joins the running worker without holding the slot lock.
    ///
    /// Leaves the slot idle and returns it locked again.
    fn join_worker<'a>(
        &'a self,
        mut slot: MutexGuard<'a, Slot>,
    ) -> (MutexGuard<'a, Slot>, FanResult<()>) {
        let Slot::Running(worker) = std::mem::replace(&mut *slot, Slot::Stopping) else {
            *slot = Slot::Idle;
            return (slot, Ok(()));
        };
        drop(slot);

        worker.request_stop();
        let result = worker.join();

        let mut slot = self.slot();
        *slot = Slot::Idle;
        self.stopped.notify_all();
        (slot, result)
    }
}

impl<D> Drop for Engine<D> {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        let Slot::Running(worker) = std::mem::replace(slot, Slot::Idle) else {
            return;
        };

        worker.request_stop();
        if let Err(err) = worker.join() {
            log::error!("Fan animation worker finished abnormally: {err}");
        }
    }
}
