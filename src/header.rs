use crate::consts::{QOI_HEADER_SIZE, QOI_MAGIC, QOI_PADDING_SIZE, QOI_PIXELS_MAX};
use crate::error::{Error, Result};
use crate::types::{Channels, ColorSpace};
use crate::utils::unlikely;

/// Image header: dimensions, channels, color space.
///
/// ### Notes
/// A valid image header must satisfy the following conditions:
/// * Both width and height must be non-zero.
/// * Maximum number of pixels is 400Mp (=4e8 pixels).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of 8-bit channels per pixel
    pub channels: Channels,
    /// Color space (informative field, doesn't affect encoding)
    pub colorspace: ColorSpace,
}

impl Default for Header {
    #[inline]
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: Channels::default(),
            colorspace: ColorSpace::default(),
        }
    }
}

impl Header {
    /// Creates a new header and validates image dimensions.
    #[inline]
    pub fn try_new(
        width: u32, height: u32, channels: Channels, colorspace: ColorSpace,
    ) -> Result<Self> {
        let header = Self { width, height, channels, colorspace };
        header.validate()?;
        Ok(header)
    }

    /// Creates a new header with modified channels.
    #[inline]
    pub const fn with_channels(mut self, channels: Channels) -> Self {
        self.channels = channels;
        self
    }

    /// Creates a new header with modified color space.
    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    /// Serializes the header into a bytes array.
    #[inline]
    pub fn encode(&self) -> [u8; QOI_HEADER_SIZE] {
        let mut out = [0; QOI_HEADER_SIZE];
        out[..4].copy_from_slice(&QOI_MAGIC.to_be_bytes());
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels.into();
        out[13] = self.colorspace.into();
        out
    }

    /// Deserializes the header from a byte array.
    ///
    /// Any trailing bytes past the first 14 are ignored.
    #[inline]
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Self> {
        let data = data.as_ref();
        if unlikely(data.len() < QOI_HEADER_SIZE) {
            return Err(Error::UnexpectedBufferEnd);
        }
        let word = |i: usize| -> Result<u32> {
            let bytes: [u8; 4] =
                data[i..i + 4].try_into().map_err(|_| Error::UnexpectedBufferEnd)?;
            Ok(u32::from_be_bytes(bytes))
        };
        let magic = word(0)?;
        let width = word(4)?;
        let height = word(8)?;
        if unlikely(magic != QOI_MAGIC) {
            return Err(Error::InvalidMagic { magic });
        }
        let channels = match data[12] {
            3 => Channels::Rgb,
            4 => Channels::Rgba,
            channels => return Err(Error::InvalidHeaderChannels { channels }),
        };
        let colorspace = ColorSpace::try_from(data[13])?;
        let header = Self { width, height, channels, colorspace };
        if unlikely(header.validate().is_err()) {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(header)
    }

    /// Returns a number of pixels in the image.
    ///
    /// Saturates instead of overflowing on 32-bit targets; such sizes are
    /// rejected by validation anyway.
    #[inline]
    pub const fn n_pixels(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Returns the total number of bytes in the raw pixel array.
    ///
    /// This may come useful when pre-allocating a buffer to decode the image into.
    #[inline]
    pub const fn n_bytes(&self) -> usize {
        self.n_pixels().saturating_mul(self.channels.as_usize())
    }

    /// The maximum number of bytes the encoded image will take.
    ///
    /// Can be used to pre-allocate the buffer to encode the image into.
    #[inline]
    pub const fn encode_max_len(&self) -> usize {
        encode_max_len(self.width, self.height, self.channels)
    }

    #[inline]
    pub(crate) fn validate(&self) -> Result<()> {
        let (width, height) = (self.width, self.height);
        if unlikely(width == 0 || height == 0) {
            return Err(Error::EmptyImage { width, height });
        } else if unlikely(self.n_pixels() > QOI_PIXELS_MAX) {
            return Err(Error::ImageTooLarge { width, height });
        }
        Ok(())
    }
}

/// The maximum number of bytes an encoded image of this size can take.
///
/// Every pixel costs at most one tag byte plus its raw channels; the first
/// pixel is always written with alpha, which costs one extra byte for RGB.
#[inline]
pub const fn encode_max_len(width: u32, height: u32, channels: Channels) -> usize {
    let n_pixels = (width as usize).saturating_mul(height as usize);
    let per_pixel = channels.as_usize() + 1;
    QOI_HEADER_SIZE
        .saturating_add(n_pixels.saturating_mul(per_pixel))
        .saturating_add(1)
        .saturating_add(QOI_PADDING_SIZE)
}
