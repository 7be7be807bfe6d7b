#![no_main]
use libfuzzer_sys::fuzz_target;

use qoi::{decode_header, encode, Channels, ColorSpace, Decoder, Header};

fuzz_target!(|input: (u16, u16, bool, &[u8])| {
    let (w, h, is_4, chunks) = input;
    let (w, h) = (1 + u32::from(w % 260), 1 + u32::from(h % 260));
    let channels = if is_4 { Channels::Rgba } else { Channels::Rgb };
    let header = Header::try_new(w, h, channels, ColorSpace::Srgb).unwrap();

    let mut data = header.encode().to_vec();
    data.extend_from_slice(chunks);
    data.extend_from_slice(&qoi::consts::QOI_PADDING);
    assert_eq!(decode_header(&data).unwrap(), header);

    let Ok(mut decoder) = Decoder::new(&data) else { return };
    let Ok(pixels) = decoder.decode_to_vec() else { return };
    assert_eq!(pixels.len(), header.n_bytes());

    // anything that decodes must survive a trip through the encoder
    let reencoded = encode(&pixels, &header).unwrap();
    let (_, again) = qoi::decode(&reencoded).unwrap();
    assert_eq!(again, pixels);
});
