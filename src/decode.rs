#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};
#[cfg(feature = "std")]
use std::io::Read;

use crate::cache::ColorCache;
use crate::consts::{
    QOI_HEADER_SIZE, QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA,
    QOI_PADDING, QOI_PADDING_SIZE,
};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::Pixel;
#[cfg(feature = "std")]
use crate::utils::IoReader;
use crate::utils::{cold, unlikely, Bytes, Source};
use crate::types::Channels;

/// Decodes the chunk stream into `out`, which holds exactly the image's pixels
/// with `N` channels each. Stops right after the last pixel.
fn decode_pixels<S: Source, const N: usize>(src: &mut S, out: &mut [u8]) -> Result<()> {
    let mut pixels = out.chunks_exact_mut(N);
    let mut cache = ColorCache::new();
    let mut px = Pixel::opaque_black();

    while let Some(px_out) = pixels.next() {
        let offset = src.offset();
        let b1 = src.read_u8()?;

        match b1 {
            QOI_OP_RGB => {
                let [r, g, b] = src.read_array::<3>()?;
                px = px.with_rgb(r, g, b);
            }
            QOI_OP_RGBA => {
                px = Pixel::from(src.read_array::<4>()?);
            }
            _ => match b1 & QOI_MASK_2 {
                QOI_OP_INDEX => {
                    let index = b1 & !QOI_MASK_2;
                    if unlikely(!cache.is_populated(index)) {
                        return Err(Error::InvalidIndex { index, offset });
                    }
                    px = cache.get(index);
                    debug_assert_eq!(px.hash_index(), index);
                }
                QOI_OP_DIFF => {
                    px.rgb_add(
                        (b1 >> 4 & 0x03).wrapping_sub(2),
                        (b1 >> 2 & 0x03).wrapping_sub(2),
                        (b1 & 0x03).wrapping_sub(2),
                    );
                }
                QOI_OP_LUMA => {
                    let b2 = src.read_u8()?;
                    let vg = (b1 & 0x3f).wrapping_sub(32);
                    let vg_8 = vg.wrapping_sub(8);
                    let vr = vg_8.wrapping_add(b2 >> 4);
                    let vb = vg_8.wrapping_add(b2 & 0x0f);
                    px.rgb_add(vr, vg, vb);
                }
                _ => {
                    // QOI_OP_RUN; the current pixel is emitted below, the rest here
                    let run = usize::from(b1 & 0x3f);
                    let remaining = pixels.len();
                    if unlikely(run > remaining) {
                        return Err(Error::RunOverflow { run: run + 1, remaining: remaining + 1 });
                    }
                    for px_out in pixels.by_ref().take(run) {
                        px.write_channels::<N>(as_pixel_mut(px_out)?);
                    }
                }
            },
        }

        cache.insert(px);
        px.write_channels::<N>(as_pixel_mut(px_out)?);
    }

    Ok(())
}

#[inline]
fn as_pixel_mut<const N: usize>(chunk: &mut [u8]) -> Result<&mut [u8; N]> {
    chunk.try_into().map_err(|_| {
        cold();
        Error::UnexpectedBufferEnd
    })
}

fn decode_padding<S: Source>(src: &mut S) -> Result<()> {
    let padding = src.read_array::<QOI_PADDING_SIZE>().map_err(|_| Error::InvalidPadding)?;
    if unlikely(padding != QOI_PADDING) {
        return Err(Error::InvalidPadding);
    }
    Ok(())
}

fn decode_body<S: Source>(src: &mut S, out: &mut [u8], channels: Channels) -> Result<()> {
    match channels {
        Channels::Rgb => decode_pixels::<_, 3>(src, out)?,
        Channels::Rgba => decode_pixels::<_, 4>(src, out)?,
    }
    decode_padding(src)
}

/// Source of a QOI image for [`Decoder`]: an in-memory slice or an I/O stream.
pub trait Reader: Sized {
    fn decode_header(&mut self) -> Result<Header>;
    fn decode_image(&mut self, out: &mut [u8], channels: Channels) -> Result<()>;
}

/// In-memory source: the chunk stream after the header, plus whatever
/// followed the end marker on the last successful decode.
#[derive(Copy, Clone, Debug)]
pub struct SliceReader<'a> {
    body: Bytes<'a>,
    tail: &'a [u8],
}

impl<'a> SliceReader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { body: Bytes::new(data), tail: data }
    }
}

impl<'a> Reader for SliceReader<'a> {
    #[inline]
    fn decode_header(&mut self) -> Result<Header> {
        let header = Header::decode(self.body.remaining())?;
        self.body.read_array::<QOI_HEADER_SIZE>()?;
        self.tail = self.body.remaining();
        Ok(header)
    }

    #[inline]
    fn decode_image(&mut self, out: &mut [u8], channels: Channels) -> Result<()> {
        // decode from a copy so that the same slice can be decoded again
        let mut bytes = self.body;
        decode_body(&mut bytes, out, channels)?;
        self.tail = bytes.remaining();
        if !self.tail.is_empty() {
            log::trace!("ignoring {} trailing bytes after end marker", self.tail.len());
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<R: Read> Reader for IoReader<R> {
    fn decode_header(&mut self) -> Result<Header> {
        let bytes = self.read_array::<QOI_HEADER_SIZE>()?;
        Header::decode(bytes)
    }

    fn decode_image(&mut self, out: &mut [u8], channels: Channels) -> Result<()> {
        decode_body(self, out, channels)
    }
}

/// Decode QOI images from slices or from streams.
#[derive(Clone)]
pub struct Decoder<R> {
    reader: R,
    header: Header,
    channels: Channels,
}

impl<'a> Decoder<SliceReader<'a>> {
    /// Creates a new decoder from a slice of bytes.
    ///
    /// The header will be decoded immediately upon construction.
    ///
    /// Note: this provides the most efficient decoding, but requires the source data to
    /// be loaded in memory in order to decode it. In order to decode from a generic
    /// stream, use [`Decoder::from_stream`] instead.
    #[inline]
    pub fn new(data: &'a (impl AsRef<[u8]> + ?Sized)) -> Result<Self> {
        Self::new_impl(SliceReader::new(data.as_ref()))
    }

    /// Returns the part of the input slice that hasn't been consumed.
    ///
    /// Before decoding that's everything past the header; after a successful
    /// decode, whatever follows the end marker.
    #[inline]
    pub const fn data(&self) -> &'a [u8] {
        self.reader.tail
    }
}

#[cfg(feature = "std")]
impl<R: Read> Decoder<IoReader<R>> {
    /// Creates a new decoder from a generic reader that implements [`Read`](std::io::Read).
    ///
    /// The header will be decoded immediately upon construction. Pixel data is read
    /// up to and including the end marker and no further.
    #[inline]
    pub fn from_stream(reader: R) -> Result<Self> {
        Self::new_impl(IoReader::new(reader))
    }

    /// Returns an immutable reference to the underlying reader.
    #[inline]
    pub const fn reader(&self) -> &R {
        self.reader.get_ref()
    }

    /// Consumes the decoder and returns the underlying reader back.
    #[inline]
    pub fn into_reader(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Reader> Decoder<R> {
    #[inline]
    fn new_impl(mut reader: R) -> Result<Self> {
        let header = reader.decode_header()?;
        log::debug!(
            "decoded header: {}x{} {:?} {:?}",
            header.width,
            header.height,
            header.channels,
            header.colorspace
        );
        Ok(Self { reader, header, channels: header.channels })
    }

    /// Returns a new decoder with modified number of channels.
    ///
    /// By default, the number of channels in the decoded image will be equal
    /// to whatever is specified in the header. However, it is also possible
    /// to decode RGB into RGBA (in which case the alpha channel will be set
    /// to 255), and vice versa (in which case the alpha channel will be ignored).
    #[inline]
    pub fn with_channels(mut self, channels: Channels) -> Self {
        self.channels = channels;
        self
    }

    /// Returns the number of channels in the decoded image.
    ///
    /// Note: this may differ from the number of channels specified in the header.
    #[inline]
    pub const fn channels(&self) -> Channels {
        self.channels
    }

    /// Returns the decoded image header.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The number of bytes the decoded image will take.
    ///
    /// Can be used to pre-allocate the buffer to decode the image into.
    #[inline]
    pub const fn required_buf_len(&self) -> usize {
        self.header.with_channels(self.channels).n_bytes()
    }

    /// Decodes the image to a pre-allocated buffer and returns the number of bytes written.
    ///
    /// The minimum size of the buffer can be found via [`Decoder::required_buf_len`].
    /// On error, the first `required_buf_len()` bytes of the buffer are zeroed.
    #[inline]
    pub fn decode_to_buf(&mut self, mut buf: impl AsMut<[u8]>) -> Result<usize> {
        let buf = buf.as_mut();
        let size = self.required_buf_len();
        if unlikely(buf.len() < size) {
            return Err(Error::OutputBufferTooSmall { size: buf.len(), required: size });
        }
        if let Err(err) = self.reader.decode_image(&mut buf[..size], self.channels) {
            buf[..size].fill(0);
            return Err(err);
        }
        log::debug!(
            "decoded {}x{} image into {} bytes ({:?})",
            self.header.width,
            self.header.height,
            size,
            self.channels
        );
        Ok(size)
    }

    /// Decodes the image into a newly allocated vector of bytes and returns it.
    #[cfg(feature = "alloc")]
    #[inline]
    pub fn decode_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut out = vec![0; self.required_buf_len()];
        self.decode_to_buf(&mut out)?;
        Ok(out)
    }
}

/// Decode the image header from a slice of bytes.
#[inline]
pub fn decode_header(data: impl AsRef<[u8]>) -> Result<Header> {
    Header::decode(data)
}

/// Decode the image into a pre-allocated buffer.
///
/// Note: the resulting number of channels will match the header. In order to change
/// the number of channels, use [`Decoder::with_channels`]. If decoding fails after
/// the header, the image-sized prefix of `buf` is zeroed rather than left partially
/// written.
#[inline]
pub fn decode_to_buf(buf: impl AsMut<[u8]>, data: impl AsRef<[u8]>) -> Result<Header> {
    let mut decoder = Decoder::new(&data)?;
    decoder.decode_to_buf(buf)?;
    Ok(*decoder.header())
}

/// Decode the image into a newly allocated vector.
///
/// Note: the resulting number of channels will match the header. In order to change
/// the number of channels, use [`Decoder::with_channels`].
#[cfg(feature = "alloc")]
#[inline]
pub fn decode_to_vec(data: impl AsRef<[u8]>) -> Result<(Header, Vec<u8>)> {
    let mut decoder = Decoder::new(&data)?;
    let out = decoder.decode_to_vec()?;
    Ok((*decoder.header(), out))
}

/// Decode a complete QOI byte stream into its header and raw pixels.
///
/// Nothing is returned unless the whole stream, end marker included, is valid.
#[cfg(feature = "alloc")]
#[inline]
pub fn decode(data: impl AsRef<[u8]>) -> Result<(Header, Vec<u8>)> {
    decode_to_vec(data)
}
