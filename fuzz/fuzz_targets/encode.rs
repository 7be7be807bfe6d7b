#![no_main]
use libfuzzer_sys::fuzz_target;

use qoi::{decode_to_vec, encode_max_len, encode_to_vec, Channels};

fuzz_target!(|input: (bool, u8, &[u8])| {
    let (is_4, w_frac, data) = input;
    let channels: u8 = if is_4 { 4 } else { 3 };
    let n_pixels = data.len() / channels as usize;
    let (w, h) = if n_pixels == 0 {
        (0, 0)
    } else {
        let w = ((n_pixels * (1 + w_frac as usize)) / 256).max(1);
        (w, n_pixels / w)
    };
    let pixels = &data[..(w * h * channels as usize)];
    let out = encode_to_vec(pixels, w as u32, h as u32);
    if w * h == 0 {
        assert!(out.unwrap_err().is_validation());
        return;
    }
    let out = out.unwrap();
    let channels = Channels::try_from(channels).unwrap();
    assert!(out.len() <= encode_max_len(w as u32, h as u32, channels));
    let (header, decoded) = decode_to_vec(&out).unwrap();
    assert_eq!(header.n_bytes(), pixels.len());
    assert_eq!(decoded, pixels);
});
