use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

use qoi::{decode_to_vec, encode_max_len, encode_to_vec, Channels, Decoder};

fn hash<const N: usize>(px: [u8; N]) -> u8 {
    let a = px.get(3).copied().unwrap_or(0xff);
    let h = px[0].wrapping_mul(3).wrapping_add(px[1].wrapping_mul(5));
    let h = h.wrapping_add(px[2].wrapping_mul(7));
    h.wrapping_add(a.wrapping_mul(11)) % 64
}

/// What the generator does next; each variant aims at one chunk kind.
#[derive(Copy, Clone)]
enum Step {
    Fresh,
    Cached,
    Repeat,
    Diff,
    Luma,
    Black,
}

const STEPS: [Step; 6] =
    [Step::Fresh, Step::Cached, Step::Repeat, Step::Diff, Step::Luma, Step::Black];

/// Random pixel stream with per-image step weights, tracking the same cache
/// the codec keeps so that `Step::Cached` actually hits it.
struct ImageGen {
    weights: [f64; 6],
}

impl ImageGen {
    pub fn new_random(rng: &mut impl Rng) -> Self {
        let weights = [0; 6].map(|_| rng.random::<f64>());
        let total = weights.iter().sum::<f64>();
        Self { weights: weights.map(|w| w / total) }
    }

    fn pick(&self, rng: &mut impl Rng) -> Step {
        let mut p = rng.random_range(0.0..1.0);
        for (step, w) in STEPS.iter().zip(self.weights) {
            if p < w {
                return *step;
            }
            p -= w;
        }
        Step::Black
    }

    pub fn generate(&self, rng: &mut impl Rng, channels: Channels, min_len: usize) -> Vec<u8> {
        match channels {
            Channels::Rgb => self.generate_const::<_, 3>(rng, min_len),
            Channels::Rgba => self.generate_const::<_, 4>(rng, min_len),
        }
    }

    fn generate_const<R: Rng, const N: usize>(&self, rng: &mut R, min_len: usize) -> Vec<u8> {
        let mut black = [0; N];
        if let Some(a) = black.get_mut(3) {
            *a = 0xff;
        }
        let mut cache = [[0_u8; N]; 64];
        let mut prev = black;
        let mut out = Vec::with_capacity(min_len * N);

        while out.len() < min_len * N {
            let (px, count) = match self.pick(rng) {
                Step::Fresh => ([0; N].map(|_| rng.random()), 1),
                Step::Cached => (cache[rng.random_range(0_usize..64)], 1),
                // long enough to cross the 62-pixel run limit now and then
                Step::Repeat => (prev, rng.random_range(1_usize..=140)),
                Step::Diff => {
                    let mut px = prev;
                    for c in &mut px[..3] {
                        *c = c.wrapping_add(rng.random_range(0_u8..4).wrapping_sub(2));
                    }
                    (px, 1)
                }
                Step::Luma => {
                    let vg = rng.random_range(0_u8..64).wrapping_sub(32);
                    let vr = rng.random_range(0_u8..16).wrapping_sub(8).wrapping_add(vg);
                    let vb = rng.random_range(0_u8..16).wrapping_sub(8).wrapping_add(vg);
                    let mut px = prev;
                    for (c, d) in px.iter_mut().zip([vr, vg, vb]) {
                        *c = c.wrapping_add(d);
                    }
                    (px, 1)
                }
                Step::Black => (black, 1),
            };
            cache[usize::from(hash(px))] = px;
            for _ in 0..count {
                out.extend_from_slice(&px);
            }
            prev = px;
        }

        out
    }
}

#[test]
fn test_generated() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0);

    let mut n_pixels = 0;
    while n_pixels < 2_000_000 {
        let min_len = rng.random_range(1..=5000);
        let channels = if rng.random() { Channels::Rgba } else { Channels::Rgb };
        let image_gen = ImageGen::new_random(&mut rng);
        let img = image_gen.generate(&mut rng, channels, min_len);
        let size = img.len() / channels.as_usize();

        let encoded = encode_to_vec(&img, size as _, 1)?;
        assert!(encoded.len() <= encode_max_len(size as _, 1, channels));

        let (header, decoded) = decode_to_vec(&encoded)?;
        assert_eq!(header.channels, channels);
        assert_eq!(&img, &decoded, "roundtrip fail");

        let reencoded = encode_to_vec(&decoded, size as _, 1)?;
        assert_eq!(encoded, reencoded, "re-encoding is not idempotent");

        n_pixels += size;
    }
    Ok(())
}

#[test]
fn test_generated_channel_conversion() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..50 {
        let min_len = rng.random_range(1..=2000);
        let img = ImageGen::new_random(&mut rng).generate(&mut rng, Channels::Rgba, min_len);
        let size = img.len() / 4;
        let encoded = encode_to_vec(&img, size as _, 1)?;

        let rgb = Decoder::new(&encoded)?.with_channels(Channels::Rgb).decode_to_vec()?;
        let expected: Vec<u8> = img.chunks_exact(4).flat_map(|px| px[..3].to_vec()).collect();
        assert_eq!(rgb, expected);

        // RGB -> RGBA restores an opaque alpha channel
        let encoded = encode_to_vec(&rgb, size as _, 1)?;
        let rgba = Decoder::new(&encoded)?.with_channels(Channels::Rgba).decode_to_vec()?;
        assert!(rgba.chunks_exact(4).all(|px| px[3] == 0xff));
        assert!(rgba.chunks_exact(4).zip(rgb.chunks_exact(3)).all(|(a, b)| a[..3] == *b));
    }
    Ok(())
}
