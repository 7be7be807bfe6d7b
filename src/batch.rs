//! Encode or decode many independent images on the rayon thread pool.
//!
//! Every image gets its own pass with its own cache and buffers. Results come
//! back in input order and a failure in one image doesn't affect the others.

use rayon::prelude::*;

use crate::error::Result;
use crate::image::Image;

/// Encodes each image into its own QOI byte stream.
pub fn encode_all(images: &[Image]) -> Vec<Result<Vec<u8>>> {
    log::debug!("encoding a batch of {} images", images.len());
    images.par_iter().map(Image::encode).collect()
}

/// Decodes each QOI byte stream into an image.
pub fn decode_all<T: AsRef<[u8]> + Sync>(streams: &[T]) -> Vec<Result<Image>> {
    log::debug!("decoding a batch of {} streams", streams.len());
    streams.par_iter().map(Image::decode).collect()
}
