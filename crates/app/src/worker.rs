//! Fan animation worker thread.

use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
};

use fansim_core::{Phase, RGB8};
use smart_leds::SmartLedsWrite;

use crate::{engine::Shared, FanError, FanResult};

/// Handle to a running animation loop together with its own stop request.
pub(crate) struct Worker {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

impl Worker {
    /// Spawns the animation loop on a new thread.
    pub(crate) fn spawn<D>(shared: Arc<Shared<D>>) -> FanResult<Self>
    where
        D: SmartLedsWrite<Color = RGB8> + Send + 'static,
        D::Error: Debug,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = stop.clone();
            std::thread::Builder::new()
                .name("fan-animation".to_owned())
                .spawn(move || run(&shared, &stop))
                .map_err(FanError::worker_spawn)?
        };

        log::info!("Fan animation worker started");
        Ok(Self { handle, stop })
    }

    /// Asks the loop to exit once it finishes the current fan image.
    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub(crate) fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the loop to exit.
    pub(crate) fn join(self) -> FanResult<()> {
        self.handle.join().map_err(|_| {
            log::error!("Fan animation worker panicked");
            FanError::WorkerPanicked
        })?;
        log::info!("Fan animation worker joined");
        Ok(())
    }
}

/// Shows `+X+X...` until a stop is requested, then clears the display.
///
/// The stop flag is checked on every phase, even when the animation is turned off, so the
/// worker exits at most one phase delay after the request.
fn run<D>(shared: &Shared<D>, stop: &AtomicBool)
where
    D: SmartLedsWrite<Color = RGB8>,
    D::Error: Debug,
{
    let state = &shared.state;
    let is_stopped = || stop.load(Ordering::Acquire);

    let mut swaps = 0_u64;
    while !is_stopped() {
        if state.is_enabled() {
            shared.show_phase(Phase::A);
        }
        std::thread::sleep(shared.phase_duration());

        if !is_stopped() && state.is_enabled() {
            shared.show_phase(Phase::B);
            std::thread::sleep(shared.phase_duration());
            // Four `+X` pairs make one revolution.
            swaps += 1;
            if swaps % 4 == 0 {
                log::trace!("Fan made {} revolutions", swaps / 4);
            }
        }
    }

    shared.clear();
    log::info!("Fan animation worker finished");
}
