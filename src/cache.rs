use crate::consts::QOI_INDEX_SIZE;
use crate::pixel::Pixel;

/// Direct-mapped table of recently seen colors, keyed by [`Pixel::hash_index`].
///
/// Starts out all-zero (transparent black). Collisions simply overwrite.
#[derive(Clone, Debug)]
pub struct ColorCache {
    entries: [Pixel; QOI_INDEX_SIZE],
}

impl ColorCache {
    #[inline]
    pub const fn new() -> Self {
        Self { entries: [Pixel::new(0, 0, 0, 0); QOI_INDEX_SIZE] }
    }

    #[inline]
    pub const fn get(&self, index: u8) -> Pixel {
        self.entries[(index as usize) % QOI_INDEX_SIZE]
    }

    /// Stores `px` at its own hash slot and returns that slot.
    #[inline]
    pub fn insert(&mut self, px: Pixel) -> u8 {
        let index = px.hash_index();
        self.entries[usize::from(index)] = px;
        index
    }

    /// Returns the slot of `px` if it's cached there, otherwise stores it and
    /// returns `None`.
    #[inline]
    pub fn lookup_or_insert(&mut self, px: Pixel) -> Option<u8> {
        let index = px.hash_index();
        let slot = &mut self.entries[usize::from(index)];
        if *slot == px {
            Some(index)
        } else {
            *slot = px;
            None
        }
    }

    /// True if the entry at `index` could have been produced by [`insert`].
    ///
    /// Slots that were never written hold transparent black, which hashes to 0.
    ///
    /// [`insert`]: Self::insert
    #[inline]
    pub const fn is_populated(&self, index: u8) -> bool {
        self.get(index).hash_index() == index
    }
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_or_insert() {
        let mut cache = ColorCache::new();
        let px = Pixel::new(101, 102, 103, 104);
        assert_eq!(cache.lookup_or_insert(px), None);
        assert_eq!(cache.lookup_or_insert(px), Some(54));
        assert_eq!(cache.get(54), px);
    }

    #[test]
    fn test_collision_overwrites() {
        let mut cache = ColorCache::new();
        let a = Pixel::new(1, 0, 0, 0);
        let b = Pixel::new(65, 0, 0, 0); // 65 * 3 = 195 = 3 (mod 64)
        assert_eq!(a.hash_index(), b.hash_index());
        cache.insert(a);
        assert_eq!(cache.insert(b), 3);
        assert_eq!(cache.get(3), b);
        assert_eq!(cache.lookup_or_insert(a), None);
        assert_eq!(cache.get(3), a);
    }

    #[test]
    fn test_is_populated() {
        let mut cache = ColorCache::new();
        assert!(cache.is_populated(0));
        assert!(!cache.is_populated(53));
        cache.insert(Pixel::opaque_black());
        assert!(cache.is_populated(53));
    }
}
