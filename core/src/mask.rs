use std::fmt;

use crate::constants::MASK_ALPHA_THRESHOLD;

const WORD_BITS: usize = 64;

/// Per-pixel collision shape, one bit per pixel, rows packed into u64 words.
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    pub fn empty(width: usize, height: usize) -> Self {
        let words_per_row = width.div_ceil(WORD_BITS);
        Mask {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height],
        }
    }

    pub fn filled(width: usize, height: usize) -> Self {
        let mut mask = Mask::empty(width, height);
        if width == 0 {
            return mask;
        }
        let tail = width % WORD_BITS;
        let last_word = if tail == 0 { u64::MAX } else { (1u64 << tail) - 1 };
        for row in mask.bits.chunks_mut(mask.words_per_row) {
            row.fill(u64::MAX);
            if let Some(last) = row.last_mut() {
                *last = last_word;
            }
        }
        mask
    }

    /// Build from a row-major alpha channel; pixels above the threshold are solid.
    pub fn from_alpha(width: usize, height: usize, alpha: &[u8]) -> Self {
        let mut mask = Mask::empty(width, height);
        for (i, &a) in alpha.iter().take(width * height).enumerate() {
            if a > MASK_ALPHA_THRESHOLD {
                mask.set(i % width, i / width, true);
            }
        }
        mask
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.bits[y * self.words_per_row + x / WORD_BITS];
        word & (1 << (x % WORD_BITS)) != 0
    }

    pub fn set(&mut self, x: usize, y: usize, solid: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let word = &mut self.bits[y * self.words_per_row + x / WORD_BITS];
        if solid {
            *word |= 1 << (x % WORD_BITS);
        } else {
            *word &= !(1 << (x % WORD_BITS));
        }
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if any solid pixel of `other`, placed with its top-left corner at
    /// `(offset_x, offset_y)` relative to this mask, lands on a solid pixel here.
    pub fn overlaps(&self, other: &Mask, offset_x: i32, offset_y: i32) -> bool {
        let x0 = offset_x.max(0);
        let y0 = offset_y.max(0);
        let x1 = (offset_x + other.width as i32).min(self.width as i32);
        let y1 = (offset_y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for y in y0..y1 {
            let oy = (y - offset_y) as usize;
            for x in x0..x1 {
                let ox = (x - offset_x) as usize;
                if self.get(x as usize, y as usize) && other.get(ox, oy) {
                    return true;
                }
            }
        }
        false
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("solid", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_counts_every_pixel() {
        let m = Mask::filled(70, 3);
        assert_eq!(m.count(), 210);
        assert!(m.get(69, 2));
        assert!(!m.get(70, 2));
    }

    #[test]
    fn alpha_threshold_is_exclusive() {
        let m = Mask::from_alpha(3, 1, &[127, 128, 255]);
        assert!(!m.get(0, 0));
        assert!(m.get(1, 0));
        assert!(m.get(2, 0));
    }

    #[test]
    fn overlap_respects_offsets() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(4, 4);
        assert!(a.overlaps(&b, 8, 8));
        assert!(!a.overlaps(&b, 10, 0));
        assert!(!a.overlaps(&b, -4, 0));
        assert!(a.overlaps(&b, -3, -3));
    }

    #[test]
    fn transparent_pixels_do_not_collide() {
        // L-shaped mask: only the left column and bottom row are solid.
        let mut a = Mask::empty(4, 4);
        for i in 0..4 {
            a.set(0, i, true);
            a.set(i, 3, true);
        }
        let dot = Mask::filled(1, 1);
        assert!(!a.overlaps(&dot, 2, 1));
        assert!(a.overlaps(&dot, 0, 1));
        assert!(a.overlaps(&dot, 2, 3));
    }
}
