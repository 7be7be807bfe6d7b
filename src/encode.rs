#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};
#[cfg(feature = "std")]
use std::io::Write;

use bytemuck::cast_slice;

use crate::cache::ColorCache;
use crate::consts::{
    QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN, QOI_PADDING,
    QOI_RUN_MAX,
};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::Pixel;
#[cfg(feature = "std")]
use crate::utils::GenericWriter;
use crate::utils::{unlikely, BytesMut, Writer};
use crate::{Channels, ColorSpace};

#[inline]
fn encode_pixels<W: Writer, const N: usize>(mut buf: W, data: &[u8]) -> Result<W> {
    let pixels: &[[u8; N]] = cast_slice(data);
    let Some((first, rest)) = pixels.split_first() else {
        return Ok(buf);
    };

    let mut cache = ColorCache::new();
    let mut run = 0_u8;

    // The first pixel has no predecessor, so it is either a cache hit or a literal.
    let mut px_prev = Pixel::from_channels(first);
    if let Some(index_pos) = cache.lookup_or_insert(px_prev) {
        buf = buf.write_one(QOI_OP_INDEX | index_pos)?;
    } else {
        buf = buf.write_many(&[QOI_OP_RGBA, px_prev.r(), px_prev.g(), px_prev.b(), px_prev.a()])?;
    }

    for chunk in rest {
        let px = Pixel::from_channels(chunk);
        if px == px_prev {
            run += 1;
            if run == QOI_RUN_MAX {
                buf = buf.write_one(QOI_OP_RUN | (run - 1))?;
                run = 0;
            }
            continue;
        }
        if run != 0 {
            buf = buf.write_one(QOI_OP_RUN | (run - 1))?;
            run = 0;
        }
        if let Some(index_pos) = cache.lookup_or_insert(px) {
            buf = buf.write_one(QOI_OP_INDEX | index_pos)?;
        } else if px.a() == px_prev.a() {
            if let Some((vr_2, vg_2, vb_2)) = px.small_diff(px_prev) {
                buf = buf.write_one(QOI_OP_DIFF | vr_2 << 4 | vg_2 << 2 | vb_2)?;
            } else if let Some((vg_32, vg_r_8, vg_b_8)) = px.luma_diff(px_prev) {
                buf = buf.write_many(&[QOI_OP_LUMA | vg_32, vg_r_8 << 4 | vg_b_8])?;
            } else {
                buf = buf.write_many(&[QOI_OP_RGB, px.r(), px.g(), px.b()])?;
            }
        } else {
            buf = buf.write_many(&[QOI_OP_RGBA, px.r(), px.g(), px.b(), px.a()])?;
        }
        px_prev = px;
    }
    if run != 0 {
        buf = buf.write_one(QOI_OP_RUN | (run - 1))?;
    }

    Ok(buf)
}

#[inline]
fn encode_impl<W: Writer>(buf: W, data: &[u8], header: &Header) -> Result<W> {
    let buf = buf.write_many(&header.encode())?;
    let buf = match header.channels {
        Channels::Rgb => encode_pixels::<_, 3>(buf, data)?,
        Channels::Rgba => encode_pixels::<_, 4>(buf, data)?,
    };
    buf.write_many(&QOI_PADDING)
}

/// Encodes the image to a pre-allocated buffer and returns the number of bytes written.
///
/// The minimum size of the buffer can be found via [`encode_max_len`](crate::encode_max_len).
#[inline]
pub fn encode_to_buf(
    buf: impl AsMut<[u8]>, data: impl AsRef<[u8]>, width: u32, height: u32,
) -> Result<usize> {
    Encoder::new(&data, width, height)?.encode_to_buf(buf)
}

/// Encodes the image into a newly allocated vector.
#[cfg(feature = "alloc")]
#[inline]
pub fn encode_to_vec(data: impl AsRef<[u8]>, width: u32, height: u32) -> Result<Vec<u8>> {
    Encoder::new(&data, width, height)?.encode_to_vec()
}

/// Encodes raw pixels described by `header` into a newly allocated vector.
///
/// Unlike [`encode_to_vec`], the channel count and color space come from the
/// header rather than being inferred from the buffer length.
#[cfg(feature = "alloc")]
#[inline]
pub fn encode(data: impl AsRef<[u8]>, header: &Header) -> Result<Vec<u8>> {
    Encoder::from_header(&data, *header)?.encode_to_vec()
}

/// Encode QOI images from raw pixels.
pub struct Encoder<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> Encoder<'a> {
    /// Creates a new encoder from a given array of pixel data and image dimensions.
    ///
    /// The number of channels will be inferred automatically (the valid values
    /// are 3 or 4). The color space will be set to sRGB by default.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(data: &'a (impl AsRef<[u8]> + ?Sized), width: u32, height: u32) -> Result<Self> {
        let data = data.as_ref();
        let mut header =
            Header::try_new(width, height, Channels::default(), ColorSpace::default())?;
        let size = data.len();
        let n_channels = size / header.n_pixels();
        if unlikely(header.n_pixels() * n_channels != size) {
            return Err(Error::InvalidImageLength { size, width, height });
        }
        header.channels = Channels::try_from(n_channels.min(0xff) as u8)?;
        Ok(Self { data, header })
    }

    /// Creates a new encoder for raw pixels laid out as `header` describes.
    #[inline]
    pub fn from_header(data: &'a (impl AsRef<[u8]> + ?Sized), header: Header) -> Result<Self> {
        let data = data.as_ref();
        header.validate()?;
        let size = data.len();
        if unlikely(size != header.n_bytes()) {
            let (width, height) = (header.width, header.height);
            return Err(Error::InvalidImageLength { size, width, height });
        }
        Ok(Self { data, header })
    }

    /// Returns a new encoder with modified color space.
    ///
    /// Note: the color space doesn't affect encoding or decoding in any way, it's
    /// a purely informative field that's stored in the image header.
    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.header = self.header.with_colorspace(colorspace);
        self
    }

    /// Returns the inferred number of channels.
    #[inline]
    pub const fn channels(&self) -> Channels {
        self.header.channels
    }

    /// Returns the header that will be stored in the encoded image.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The maximum number of bytes the encoded image will take.
    ///
    /// Can be used to pre-allocate the buffer to encode the image into.
    #[inline]
    pub const fn required_buf_len(&self) -> usize {
        self.header.encode_max_len()
    }

    /// Encodes the image to a pre-allocated buffer and returns the number of bytes written.
    ///
    /// The minimum size of the buffer can be found via [`Encoder::required_buf_len`].
    #[inline]
    pub fn encode_to_buf(&self, mut buf: impl AsMut<[u8]>) -> Result<usize> {
        let buf = buf.as_mut();
        let size_required = self.required_buf_len();
        if unlikely(buf.len() < size_required) {
            return Err(Error::OutputBufferTooSmall { size: buf.len(), required: size_required });
        }
        let n_written = encode_impl(BytesMut::new(buf), self.data, &self.header)?.written();
        log::debug!(
            "encoded {}x{} {:?} image: {} -> {} bytes",
            self.header.width,
            self.header.height,
            self.header.channels,
            self.data.len(),
            n_written
        );
        Ok(n_written)
    }

    /// Encodes the image into a newly allocated vector of bytes and returns it.
    #[cfg(feature = "alloc")]
    #[inline]
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0_u8; self.required_buf_len()];
        let size = self.encode_to_buf(&mut out)?;
        out.truncate(size);
        Ok(out)
    }

    /// Encodes the image directly to a generic writer that implements [`Write`](std::io::Write).
    ///
    /// Note: while it's possible to pass a `&mut [u8]` slice here since it implements `Write`,
    /// it would more effficient to use a specialized method instead: [`Encoder::encode_to_buf`].
    #[cfg(feature = "std")]
    #[inline]
    pub fn encode_to_stream<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let n_written = encode_impl(GenericWriter::new(writer), self.data, &self.header)?.written();
        log::debug!(
            "encoded {}x{} image to stream: {} bytes",
            self.header.width,
            self.header.height,
            n_written
        );
        Ok(n_written)
    }
}
