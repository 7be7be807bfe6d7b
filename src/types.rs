use crate::error::{Error, Result};
use crate::utils::cold;

/// Color space stored in the header.
///
/// Purely descriptive: encoding and decoding never look at it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum ColorSpace {
    /// sRGB color channels, linear alpha
    #[default]
    Srgb = 0,
    /// Every channel linear
    Linear = 1,
}

impl ColorSpace {
    pub const fn is_srgb(self) -> bool {
        matches!(self, Self::Srgb)
    }

    pub const fn is_linear(self) -> bool {
        matches!(self, Self::Linear)
    }

    /// Header byte for this color space.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<ColorSpace> for u8 {
    #[inline]
    fn from(colorspace: ColorSpace) -> Self {
        colorspace.as_u8()
    }
}

impl TryFrom<u8> for ColorSpace {
    type Error = Error;

    #[inline]
    fn try_from(colorspace: u8) -> Result<Self> {
        match colorspace {
            0 => Ok(Self::Srgb),
            1 => Ok(Self::Linear),
            _ => {
                cold();
                Err(Error::InvalidColorSpace { colorspace })
            }
        }
    }
}

/// Bytes per pixel in a raw buffer: RGB or RGBA, one byte per channel.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Channels {
    #[default]
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    pub const fn is_rgb(self) -> bool {
        matches!(self, Self::Rgb)
    }

    pub const fn is_rgba(self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// Header byte for this layout (3 or 4).
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn as_usize(self) -> usize {
        self as usize
    }
}

impl From<Channels> for u8 {
    #[inline]
    fn from(channels: Channels) -> Self {
        channels.as_u8()
    }
}

impl TryFrom<u8> for Channels {
    type Error = Error;

    #[inline]
    fn try_from(channels: u8) -> Result<Self> {
        match channels {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            _ => {
                cold();
                Err(Error::InvalidChannels { channels })
            }
        }
    }
}
