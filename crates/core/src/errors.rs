use core::fmt::Display;

use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// A specialized result type for the fan simulator.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while driving the fan animation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Debug, Serialize, Deserialize)]
pub enum Error {
    /// Unable to spawn the animation worker thread.
    WorkerSpawn,
    /// The animation worker thread panicked.
    WorkerPanicked,
    /// Network read or write error.
    Network,
    /// Malformed request.
    Decode,
    /// Data encoding error.
    Encode,
    /// Unknown command.
    UnknownCommand,
    /// Unknown delay unit, expected "seconds" or "minutes".
    InvalidDelayUnit,
}

impl Error {
    /// Creates a new worker spawn error.
    pub fn worker_spawn<E>(_: E) -> Self
    where
        E: Display,
    {
        Self::WorkerSpawn
    }

    /// Creates a new network error.
    pub fn network<E>(_: E) -> Self
    where
        E: Display,
    {
        Self::Network
    }

    /// Creates a new encode data error.
    pub fn encode<E>(_: E) -> Self
    where
        E: Display,
    {
        Self::Encode
    }

    /// Creates a new decode request error.
    pub fn decode<E>(_: E) -> Self
    where
        E: Display,
    {
        Self::Decode
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err)
    }
}
