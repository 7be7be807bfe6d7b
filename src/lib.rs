//! Lossless encoder and decoder for the [QOI](https://qoiformat.org) image format.
//!
//! - Encode raw RGB/RGBA buffers with [`encode_to_vec`], [`encode_to_buf`], [`encode`]
//!   or the [`Encoder`] builder.
//! - Decode with [`decode_to_vec`], [`decode_to_buf`], [`decode`] or the [`Decoder`]
//!   builder, which can also read from any [`std::io::Read`].
//! - [`Image`] bundles a header with an owned pixel buffer.
//!
//! ### Cargo features
//! - `std` (default): streaming I/O and `std::error::Error`; implies `alloc`.
//! - `alloc`: `Vec`-returning APIs in `no_std` builds.
//! - `parallel`: [`batch`] helpers that spread independent images across rayon.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(
    clippy::inline_always,
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cargo_common_metadata
)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod cache;
mod decode;
mod encode;
mod error;
mod header;
#[cfg(feature = "alloc")]
mod image;
mod pixel;
mod types;
mod utils;

#[cfg(feature = "parallel")]
pub mod batch;
#[doc(hidden)]
pub mod consts;

#[cfg(feature = "alloc")]
pub use crate::decode::{decode, decode_to_vec};
pub use crate::decode::{decode_header, decode_to_buf, Decoder, Reader, SliceReader};
#[cfg(feature = "alloc")]
pub use crate::encode::{encode, encode_to_vec};
pub use crate::encode::{encode_to_buf, Encoder};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::header::{encode_max_len, Header};
#[cfg(feature = "alloc")]
pub use crate::image::Image;
pub use crate::types::{Channels, ColorSpace};
