use alloc::vec::Vec;
use core::slice::ChunksExact;

use bytemuck::cast_slice;

use crate::decode::Decoder;
use crate::encode::encode;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::Pixel;
use crate::types::{Channels, ColorSpace};
use crate::utils::unlikely;

/// An owned raster image: a validated header plus tightly packed row-major pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    header: Header,
    data: Vec<u8>,
}

impl Image {
    /// Wraps a raw pixel buffer, checking that its length is `width * height * channels`.
    ///
    /// The color space defaults to sRGB; see [`Image::with_colorspace`].
    #[inline]
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        let header = Header::try_new(width, height, channels, ColorSpace::default())?;
        Self::from_header(header, data)
    }

    /// Wraps a raw pixel buffer laid out as `header` describes.
    pub fn from_header(header: Header, data: Vec<u8>) -> Result<Self> {
        header.validate()?;
        let size = data.len();
        if unlikely(size != header.n_bytes()) {
            let (width, height) = (header.width, header.height);
            return Err(Error::InvalidImageLength { size, width, height });
        }
        Ok(Self { header, data })
    }

    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.header = self.header.with_colorspace(colorspace);
        self
    }

    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.header.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.header.height
    }

    #[inline]
    pub const fn channels(&self) -> Channels {
        self.header.channels
    }

    /// Raw channel bytes, row-major, `channels` bytes per pixel.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at column `x` of row `y` as RGBA, or `None` if out of bounds.
    ///
    /// For RGB images the alpha channel reads as 255.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.header.width || y >= self.header.height {
            return None;
        }
        let n = self.channels().as_usize();
        let offset = (y as usize * self.header.width as usize + x as usize) * n;
        let mut px = Pixel::opaque_black().rgba();
        px[..n].copy_from_slice(self.data.get(offset..offset + n)?);
        Some(px)
    }

    /// Iterates over the rows of raw channel bytes, top to bottom.
    #[inline]
    pub fn rows(&self) -> ChunksExact<'_, u8> {
        self.data.chunks_exact(self.header.width as usize * self.channels().as_usize())
    }

    /// Iterates over all pixels in row-major order, expanded to RGBA.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        let rgb: &[[u8; 3]] = if self.channels().is_rgb() { cast_slice(&self.data) } else { &[] };
        let rgba: &[[u8; 4]] = if self.channels().is_rgba() { cast_slice(&self.data) } else { &[] };
        rgb.iter().map(|px| Pixel::from_channels(px).rgba()).chain(rgba.iter().copied())
    }

    /// Encodes the image into a QOI byte stream.
    #[inline]
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(&self.data, &self.header)
    }

    /// Decodes a QOI byte stream, keeping the channel count stored in its header.
    #[inline]
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Self> {
        let mut decoder = Decoder::new(&data)?;
        let data = decoder.decode_to_vec()?;
        Ok(Self { header: *decoder.header(), data })
    }

    /// Decodes a QOI byte stream into an image with the requested channel count.
    pub fn decode_with_channels(data: impl AsRef<[u8]>, channels: Channels) -> Result<Self> {
        let mut decoder = Decoder::new(&data)?.with_channels(channels);
        let data = decoder.decode_to_vec()?;
        Ok(Self { header: decoder.header().with_channels(channels), data })
    }
}
