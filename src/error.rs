// error.rs
//
// Copyright (c) 2026  Douglas Lau
//
use std::fmt;
use std::io;
use std::num::TryFromIntError;

/// Errors encountered while encoding
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// Integer out of bounds (frame dimensions too large for GIF).
    TryFromInt(TryFromIntError),
    /// Stream finished before it was started.
    StreamNotStarted,
    /// Stream already finished with a
    /// [Trailer](block/struct.Trailer.html).
    StreamFinished,
    /// No frame supplied to
    /// [add_frame_opt](struct.AnimEnc.html#method.add_frame_opt).
    MissingFrame,
    /// Screen size can not change after the first frame.
    ScreenSizeLocked,
    /// Pixel buffer too small for frame dimensions.
    InvalidFrameData,
}

/// Nqgif result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            Error::TryFromInt(err) => err.fmt(fmt),
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::TryFromInt(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}
