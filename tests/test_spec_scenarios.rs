use anyhow::Result;

use qoi::{
    consts::{QOI_HEADER_SIZE, QOI_OP_DIFF, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN, QOI_PADDING},
    decode, decode_to_vec, encode, encode_to_vec, Channels, ColorSpace, Error, Header,
};

const RED: [u8; 4] = [255, 0, 0, 255];

fn hash(px: &[u8]) -> u8 {
    let a = px.get(3).copied().unwrap_or(0xff);
    let h = px[0].wrapping_mul(3).wrapping_add(px[1].wrapping_mul(5));
    h.wrapping_add(px[2].wrapping_mul(7)).wrapping_add(a.wrapping_mul(11)) % 64
}

fn two_red_pixels() -> Vec<u8> {
    let header = Header::try_new(2, 1, Channels::Rgba, ColorSpace::Srgb).unwrap();
    encode(RED.repeat(2), &header).unwrap()
}

#[test]
fn test_two_red_pixels_exact_bytes() {
    let expected = [
        b'q', b'o', b'i', b'f', 0, 0, 0, 2, 0, 0, 0, 1, 4, 0, // header
        QOI_OP_RGBA, 255, 0, 0, 255, // first pixel
        QOI_OP_RUN, // second pixel, run of one
        0, 0, 0, 0, 0, 0, 0, 1, // end marker
    ];
    let encoded = two_red_pixels();
    assert_eq!(encoded, expected);

    let (header, pixels) = decode(&encoded).unwrap();
    assert_eq!((header.width, header.height, header.channels), (2, 1, Channels::Rgba));
    assert_eq!(pixels, RED.repeat(2));
}

#[test]
fn test_run_limit_boundary() -> Result<()> {
    let a = [10_u8, 20, 30];
    let b = [200_u8, 100, 50];

    // the first pixel has no predecessor and is a literal, so 62 repeats need 63 pixels
    let data = [a.repeat(63), b.to_vec()].concat();
    let encoded = encode_to_vec(&data, 64, 1)?;
    let body = &encoded[QOI_HEADER_SIZE..encoded.len() - QOI_PADDING.len()];
    assert_eq!(body, [QOI_OP_RGBA, 10, 20, 30, 255, 0xfd, QOI_OP_RGB, 200, 100, 50]);

    // one more repeat spills into a second run chunk
    let data = a.repeat(64);
    let encoded = encode_to_vec(&data, 64, 1)?;
    let body = &encoded[QOI_HEADER_SIZE..encoded.len() - QOI_PADDING.len()];
    assert_eq!(body, [QOI_OP_RGBA, 10, 20, 30, 255, 0xfd, QOI_OP_RUN]);

    assert_eq!(decode_to_vec(&encoded)?.1, data);
    Ok(())
}

#[test]
fn test_diff_boundary() -> Result<()> {
    let data = [100_u8, 100, 100, 255, 101, 98, 101, 255];
    let encoded = encode_to_vec(data, 2, 1)?;
    assert_eq!(encoded[QOI_HEADER_SIZE + 5], QOI_OP_DIFF | 3 << 4 | 3);
    assert_eq!(encoded.len(), QOI_HEADER_SIZE + 6 + QOI_PADDING.len());

    // +2 on red is out of range for a diff chunk and falls back to luma
    let data = [100_u8, 100, 100, 255, 102, 98, 101, 255];
    let encoded = encode_to_vec(data, 2, 1)?;
    assert_eq!(encoded.len(), QOI_HEADER_SIZE + 7 + QOI_PADDING.len());
    assert_eq!(decode_to_vec(&encoded)?.1, data);
    Ok(())
}

#[test]
fn test_index_chunks_match_decoded_pixels() -> Result<()> {
    // a small palette cycled with varying strides produces plenty of index hits
    let palette = [[0_u8, 0, 0, 0], [255, 255, 255, 255], [12, 200, 40, 128], [90, 90, 1, 255]];
    let data: Vec<u8> = (0..500_usize).flat_map(|i| palette[(i * i / 7) % palette.len()]).collect();
    let encoded = encode_to_vec(&data, 500, 1)?;
    let (_, decoded) = decode_to_vec(&encoded)?;
    assert_eq!(decoded, data);

    let pixels: Vec<&[u8]> = decoded.chunks_exact(4).collect();
    let body = &encoded[QOI_HEADER_SIZE..encoded.len() - QOI_PADDING.len()];
    let (mut pos, mut i, mut n_index) = (0, 0, 0);
    while i < body.len() {
        let tag = body[i];
        match tag {
            QOI_OP_RGB => (i, pos) = (i + 4, pos + 1),
            QOI_OP_RGBA => (i, pos) = (i + 5, pos + 1),
            _ => match tag >> 6 {
                0 => {
                    assert_eq!(hash(pixels[pos]), tag & 0x3f, "stale cache slot at pixel {pos}");
                    n_index += 1;
                    (i, pos) = (i + 1, pos + 1);
                }
                1 => (i, pos) = (i + 1, pos + 1),
                2 => (i, pos) = (i + 2, pos + 1),
                _ => (i, pos) = (i + 1, pos + usize::from(tag & 0x3f) + 1),
            },
        }
    }
    assert_eq!(pos, pixels.len());
    assert!(n_index > 0);
    Ok(())
}

#[test]
fn test_truncated_end_marker() {
    let mut encoded = two_red_pixels();
    encoded.pop();
    assert!(matches!(decode_to_vec(&encoded), Err(Error::InvalidPadding)));

    let mut encoded = two_red_pixels();
    *encoded.last_mut().unwrap() = 0;
    assert!(matches!(decode_to_vec(&encoded), Err(Error::InvalidPadding)));
}

#[test]
fn test_flipped_tag() {
    let mut encoded = two_red_pixels();
    assert_eq!(encoded[QOI_HEADER_SIZE], QOI_OP_RGBA);
    encoded[QOI_HEADER_SIZE] = 0x3f;
    let err = decode_to_vec(&encoded).unwrap_err();
    assert!(matches!(err, Error::InvalidIndex { index: 63, offset: QOI_HEADER_SIZE }));
    assert!(err.is_format());
}

#[test]
fn test_truncated_stream() {
    let encoded = two_red_pixels();
    for len in [0, 5, QOI_HEADER_SIZE, QOI_HEADER_SIZE + 3] {
        let err = decode_to_vec(&encoded[..len]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedBufferEnd), "len={len}: {err}");
    }
}

#[test]
fn test_run_past_declared_size() {
    let header = Header::try_new(2, 1, Channels::Rgb, ColorSpace::Srgb).unwrap();
    let mut data = header.encode().to_vec();
    data.extend([QOI_OP_RUN | 2]);
    data.extend(QOI_PADDING);
    let err = decode_to_vec(&data).unwrap_err();
    assert!(matches!(err, Error::RunOverflow { run: 3, remaining: 2 }));
}

#[test]
fn test_invalid_headers() {
    let encoded = two_red_pixels();

    let mut bad = encoded.clone();
    bad[4..8].copy_from_slice(&0_u32.to_be_bytes());
    assert!(matches!(decode_to_vec(&bad), Err(Error::InvalidDimensions { width: 0, height: 1 })));

    let mut bad = encoded.clone();
    bad[12] = 2;
    assert!(matches!(decode_to_vec(&bad), Err(Error::InvalidHeaderChannels { channels: 2 })));

    let mut bad = encoded;
    bad[..4].copy_from_slice(b"qoiF");
    assert!(matches!(decode_to_vec(&bad), Err(Error::InvalidMagic { .. })));
}
