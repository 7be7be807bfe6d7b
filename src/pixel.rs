use crate::consts::QOI_INDEX_SIZE;

/// An RGBA pixel. Images without alpha are processed with `a = 0xff`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[repr(transparent)]
pub struct Pixel([u8; 4]);

impl Pixel {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Predictor state the decoder starts from.
    #[inline]
    pub const fn opaque_black() -> Self {
        Self([0, 0, 0, 0xff])
    }

    /// Reads the first `N` channels, filling in an opaque alpha if `N == 3`.
    #[inline]
    pub const fn from_channels<const N: usize>(s: &[u8; N]) -> Self {
        let mut out = Self::opaque_black();
        let mut i = 0;
        while i < N && i < 4 {
            out.0[i] = s[i];
            i += 1;
        }
        out
    }

    /// Writes the first `N` channels (dropping alpha if `N == 3`).
    #[inline]
    pub fn write_channels<const N: usize>(self, out: &mut [u8; N]) {
        let n = N.min(4);
        out[..n].copy_from_slice(&self.0[..n]);
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0[3]
    }

    #[inline]
    pub const fn rgba(self) -> [u8; 4] {
        self.0
    }

    #[inline]
    pub const fn with_rgb(mut self, r: u8, g: u8, b: u8) -> Self {
        self.0[0] = r;
        self.0[1] = g;
        self.0[2] = b;
        self
    }

    #[inline]
    pub const fn hash_index(self) -> u8 {
        let r = self.r().wrapping_mul(3);
        let g = self.g().wrapping_mul(5);
        let b = self.b().wrapping_mul(7);
        let a = self.a().wrapping_mul(11);
        r.wrapping_add(g).wrapping_add(b).wrapping_add(a) % (QOI_INDEX_SIZE as u8)
    }

    #[inline]
    pub fn rgb_add(&mut self, r: u8, g: u8, b: u8) {
        self.0[0] = self.0[0].wrapping_add(r);
        self.0[1] = self.0[1].wrapping_add(g);
        self.0[2] = self.0[2].wrapping_add(b);
    }

    /// Biased `(dr + 2, dg + 2, db + 2)` if every delta lies in `-2..=1`.
    #[inline]
    pub const fn small_diff(self, prev: Self) -> Option<(u8, u8, u8)> {
        let vr_2 = self.r().wrapping_sub(prev.r()).wrapping_add(2);
        let vg_2 = self.g().wrapping_sub(prev.g()).wrapping_add(2);
        let vb_2 = self.b().wrapping_sub(prev.b()).wrapping_add(2);
        if vr_2 | vg_2 | vb_2 | 3 == 3 {
            Some((vr_2, vg_2, vb_2))
        } else {
            None
        }
    }

    /// Biased `(dg + 32, dr - dg + 8, db - dg + 8)` if they fit in 6/4/4 bits.
    #[inline]
    pub const fn luma_diff(self, prev: Self) -> Option<(u8, u8, u8)> {
        let vr = self.r().wrapping_sub(prev.r());
        let vg = self.g().wrapping_sub(prev.g());
        let vb = self.b().wrapping_sub(prev.b());
        let vg_32 = vg.wrapping_add(32);
        let vg_r_8 = vr.wrapping_sub(vg).wrapping_add(8);
        let vg_b_8 = vb.wrapping_sub(vg).wrapping_add(8);
        if vg_r_8 | vg_b_8 | 15 == 15 && vg_32 | 63 == 63 {
            Some((vg_32, vg_r_8, vg_b_8))
        } else {
            None
        }
    }
}

impl From<[u8; 4]> for Pixel {
    #[inline(always)]
    fn from(px: [u8; 4]) -> Self {
        Self(px)
    }
}

impl From<Pixel> for [u8; 4] {
    #[inline(always)]
    fn from(px: Pixel) -> Self {
        px.0
    }
}
