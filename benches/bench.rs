use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use qoi::{decode_to_vec, encode_to_vec, Channels};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;

/// Smooth gradients with speckle noise and flat patches, so that every chunk kind shows up.
fn synthetic_image(channels: Channels, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = channels.as_usize();
    let mut out = Vec::with_capacity(WIDTH as usize * HEIGHT as usize * n);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let flat = (x / 64 + y / 64) % 3 == 0;
            let noise: u8 = if flat { 0 } else { rng.random_range(0..4) };
            let px = [
                (x / 2) as u8 ^ noise,
                (y / 2) as u8,
                ((x + y) / 4) as u8 ^ noise,
                if flat { 255 } else { 255 - noise },
            ];
            out.extend_from_slice(&px[..n]);
        }
    }
    out
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for channels in [Channels::Rgb, Channels::Rgba] {
        let n = channels.as_usize();
        let raw = synthetic_image(channels, 7);
        let encoded = encode_to_vec(&raw, WIDTH, HEIGHT).unwrap();

        let mut group = c.benchmark_group(format!("synthetic {WIDTH}x{HEIGHT} ({n} channels)"));
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_function("encode", |b| {
            b.iter(|| black_box(encode_to_vec(black_box(&raw), WIDTH, HEIGHT)).unwrap())
        });
        group.bench_function("decode", |b| {
            b.iter(|| black_box(decode_to_vec(black_box(&encoded))).unwrap())
        });
        group.finish();
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
