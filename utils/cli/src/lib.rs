//! Display backends, configuration loading and the demo cycle of the fan simulator binary.

use std::{
    fmt::Debug,
    io::{Stdout, Write},
    path::Path,
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use fansim_network::{
    app::{
        core::{Frame, MAX_TEMPERATURE, RGB8},
        Configuration, Engine,
    },
    FanResult,
};
use smart_leds::SmartLedsWrite;

/// Reads a JSON configuration file, missing fields take their default values.
pub fn load_configuration(path: &Path) -> anyhow::Result<Configuration> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read configuration file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Unable to parse configuration file {}", path.display()))
}

/// Raises the temperature by one on every step, the fan is on at even temperatures.
///
/// The worker is left running, stopping it is up to the caller.
pub async fn run_demo<D>(engine: &Arc<Engine<D>>, step: Duration) -> anyhow::Result<()>
where
    D: SmartLedsWrite<Color = RGB8> + Send + 'static,
    D::Error: Debug,
{
    for temperature in 0..=MAX_TEMPERATURE {
        tokio::time::sleep(step).await;

        log::info!("Temperature {temperature}");
        let engine = engine.clone();
        // Starting the worker may wait for the previous one.
        tokio::task::spawn_blocking(move || -> FanResult<()> {
            engine.set_temperature(temperature);
            engine.set_speed(60 + 5 * i64::from(temperature));
            if temperature % 2 == 0 {
                engine.start()?;
                engine.turn_on();
            } else {
                engine.turn_off();
            }
            Ok(())
        })
        .await??;
    }

    tokio::time::sleep(step).await;
    Ok(())
}

/// Simulated LED matrix drawn in a terminal with 24-bit colors.
pub struct TerminalMatrix<W> {
    out: W,
}

impl<W: Write> TerminalMatrix<W> {
    pub fn new(mut out: W) -> std::io::Result<Self> {
        // Clear the screen once, every frame is drawn over the previous one.
        write!(out, "\x1b[2J")?;
        Ok(Self { out })
    }
}

impl<W: Write> SmartLedsWrite for TerminalMatrix<W> {
    type Error = std::io::Error;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let frame = Frame::from_pixels(iterator.into_iter().map(Into::into));

        write!(self.out, "\x1b[H")?;
        for row in frame.rows() {
            for pixel in row {
                write!(self.out, "\x1b[38;2;{};{};{}m\u{25cf} ", pixel.r, pixel.g, pixel.b)?;
            }
            writeln!(self.out, "\x1b[0m")?;
        }
        self.out.flush()
    }
}

/// Headless LED matrix that prints every frame to the log.
#[derive(Debug, Default)]
pub struct LogMatrix {
    frames: u64,
}

impl SmartLedsWrite for LogMatrix {
    type Error = std::io::Error;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let frame = Frame::from_pixels(iterator.into_iter().map(Into::into));
        self.frames += 1;
        log::debug!("Frame #{}\n{frame:?}", self.frames);
        Ok(())
    }
}

/// Display selected on the command line.
pub enum MatrixDisplay {
    Terminal(TerminalMatrix<Stdout>),
    Log(LogMatrix),
}

impl SmartLedsWrite for MatrixDisplay {
    type Error = std::io::Error;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: Iterator<Item = I>,
        I: Into<Self::Color>,
    {
        match self {
            Self::Terminal(display) => display.write(iterator),
            Self::Log(display) => display.write(iterator),
        }
    }
}
