//! Hilbert curve traversal of a rectangular region
//!
//! The curve is generated for the smallest `2^k x 2^k` tile covering the
//! region and clipped to it, so every pixel of the region is visited exactly
//! once and consecutive pixels are (mostly) neighbours.
use crate::Size;

/// Smallest order `k` such that `2^k >= max(width, height)`
pub fn hilbert_order(size: Size) -> u32 {
    let side = size.width.max(size.height).max(1);
    side.next_power_of_two().trailing_zeros()
}

/// Convert distance along the Hilbert curve of the given order to `(x, y)`
pub fn hilbert_d2xy(order: u32, d: u64) -> (usize, usize) {
    let mut x = 0usize;
    let mut y = 0usize;
    let mut d = d;
    let mut s = 1usize;
    let side = 1usize << order;
    while s < side {
        let rx = ((d / 2) & 1) as usize;
        let ry = ((d ^ rx as u64) & 1) as usize;
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        d /= 4;
        s *= 2;
    }
    (x, y)
}

/// Iterator over `(x, y)` pixels of a region in Hilbert curve order
#[derive(Debug, Clone)]
pub struct HilbertCurve {
    size: Size,
    order: u32,
    index: u64,
    total: u64,
    remaining: usize,
}

impl HilbertCurve {
    pub fn new(size: Size) -> Self {
        let order = hilbert_order(size);
        let side = 1u64 << order;
        let remaining = size.width * size.height;
        Self {
            size,
            order,
            index: 0,
            total: if remaining == 0 { 0 } else { side * side },
            remaining,
        }
    }

    /// Order of the covering tile
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Advance by a single step of the tile
    ///
    /// Returns `Some(None)` for a step outside of the region and `None` once
    /// all pixels of the region are produced. Unlike [`Iterator::next`] the
    /// amount of work per call is bounded, which matters for thin regions
    /// where most of the tile is outside.
    pub fn step(&mut self) -> Option<Option<(usize, usize)>> {
        if self.remaining == 0 || self.index >= self.total {
            return None;
        }
        let (x, y) = hilbert_d2xy(self.order, self.index);
        self.index += 1;
        if x < self.size.width && y < self.size.height {
            self.remaining -= 1;
            Some(Some((x, y)))
        } else {
            Some(None)
        }
    }
}

impl Iterator for HilbertCurve {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        // stops as soon as all region pixels are produced, the tail of the
        // tile can lie completely outside of the region
        loop {
            if let Some(point) = self.step()? {
                return Some(point);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for HilbertCurve {}
