use core::fmt::{self, Display};

use crate::consts::{QOI_MAGIC, QOI_PIXELS_MAX};

/// Errors that can occur during encoding or decoding.
#[derive(Debug)]
pub enum Error {
    /// Channel count passed to the encoder is not 3 or 4
    InvalidChannels { channels: u8 },
    /// Image to be encoded has zero width or height
    EmptyImage { width: u32, height: u32 },
    /// Image exceeds the maximum supported number of pixels
    ImageTooLarge { width: u32, height: u32 },
    /// Raw pixel buffer length doesn't match the declared dimensions
    InvalidImageLength { size: usize, width: u32, height: u32 },
    /// Output buffer is smaller than required
    OutputBufferTooSmall { size: usize, required: usize },
    /// Stream doesn't start with `qoif`
    InvalidMagic { magic: u32 },
    /// Header declares a color space other than 0 or 1
    InvalidColorSpace { colorspace: u8 },
    /// Header declares a channel count other than 3 or 4
    InvalidHeaderChannels { channels: u8 },
    /// Header declares a zero or oversized image
    InvalidDimensions { width: u32, height: u32 },
    /// Index chunk pointing at a color cache slot that was never written
    InvalidIndex { index: u8, offset: usize },
    /// Run chunk extends past the declared number of pixels
    RunOverflow { run: usize, remaining: usize },
    /// Input ended before all pixels (or the end marker) were read
    UnexpectedBufferEnd,
    /// The 8-byte stream end marker is missing or incorrect
    InvalidPadding,
    #[cfg(feature = "std")]
    IoError(std::io::Error),
}

/// Broad classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input to the encoder.
    Validation,
    /// Malformed input to the decoder.
    Format,
    /// Failure of the underlying reader or writer.
    Io,
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::InvalidChannels { .. }
            | Self::EmptyImage { .. }
            | Self::ImageTooLarge { .. }
            | Self::InvalidImageLength { .. }
            | Self::OutputBufferTooSmall { .. } => ErrorKind::Validation,
            Self::InvalidMagic { .. }
            | Self::InvalidColorSpace { .. }
            | Self::InvalidHeaderChannels { .. }
            | Self::InvalidDimensions { .. }
            | Self::InvalidIndex { .. }
            | Self::RunOverflow { .. }
            | Self::UnexpectedBufferEnd
            | Self::InvalidPadding => ErrorKind::Format,
            #[cfg(feature = "std")]
            Self::IoError(_) => ErrorKind::Io,
        }
    }

    pub const fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }

    pub const fn is_format(&self) -> bool {
        matches!(self.kind(), ErrorKind::Format)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::InvalidChannels { channels } => {
                write!(f, "invalid number of channels: {channels}")
            }
            Self::EmptyImage { width, height } => {
                write!(f, "image contains no pixels: {width}x{height}")
            }
            Self::ImageTooLarge { width, height } => {
                let mp = QOI_PIXELS_MAX / 1_000_000;
                write!(f, "image is too large: {width}x{height} (max={mp}Mp)")
            }
            Self::InvalidImageLength { size, width, height } => {
                write!(f, "invalid image length: {size} bytes for {width}x{height}")
            }
            Self::OutputBufferTooSmall { size, required } => {
                write!(f, "output buffer size too small: {size} (minimum required: {required})")
            }
            Self::InvalidMagic { magic } => {
                write!(f, "invalid magic: expected {QOI_MAGIC:#010x}, got {magic:#010x}")
            }
            Self::InvalidColorSpace { colorspace } => {
                write!(f, "invalid color space: {colorspace} (expected 0 or 1)")
            }
            Self::InvalidHeaderChannels { channels } => {
                write!(f, "invalid number of channels in header: {channels} (expected 3 or 4)")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid image dimensions in header: {width}x{height}")
            }
            Self::InvalidIndex { index, offset } => {
                write!(f, "index chunk at offset {offset} refers to empty cache slot {index}")
            }
            Self::RunOverflow { run, remaining } => {
                write!(f, "run of {run} pixels exceeds the {remaining} pixels remaining")
            }
            Self::UnexpectedBufferEnd => {
                write!(f, "unexpected input buffer end while decoding")
            }
            Self::InvalidPadding => {
                write!(f, "invalid padding (stream end marker)")
            }
            #[cfg(feature = "std")]
            Self::IoError(ref err) => {
                write!(f, "i/o error: {err}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::UnexpectedBufferEnd
        } else {
            Self::IoError(err)
        }
    }
}
