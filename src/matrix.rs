//! Threshold matrices for ordered dithering
use crate::blue_noise::{BLUE_NOISE_16, BLUE_NOISE_SIZE};

/// Square threshold matrix, tiled over the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdMatrix {
    /// Side of the matrix
    size: usize,
    /// Number of distinct ranks
    levels: u16,
    /// Row-major ranks in `0..levels`
    ranks: &'static [u8],
}

impl ThresholdMatrix {
    pub const fn size(&self) -> usize {
        self.size
    }

    pub const fn levels(&self) -> u16 {
        self.levels
    }

    /// Rank of the cell at `(x mod size, y mod size)`
    #[inline]
    pub fn rank(&self, x: usize, y: usize) -> u8 {
        self.ranks[(y % self.size) * self.size + x % self.size]
    }

    /// Threshold of the cell normalized to `[-0.5, 0.5]`, centered so that
    /// the matrix mean is zero
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> f32 {
        (self.rank(x, y) as f32 + 0.5) / self.levels as f32 - 0.5
    }
}

#[rustfmt::skip]
pub const BAYER_2X2: ThresholdMatrix = ThresholdMatrix {
    size: 2,
    levels: 4,
    ranks: &[
        0, 2,
        3, 1,
    ],
};

#[rustfmt::skip]
pub const BAYER_4X4: ThresholdMatrix = ThresholdMatrix {
    size: 4,
    levels: 16,
    ranks: &[
         0,  8,  2, 10,
        12,  4, 14,  6,
         3, 11,  1,  9,
        15,  7, 13,  5,
    ],
};

#[rustfmt::skip]
pub const BAYER_8X8: ThresholdMatrix = ThresholdMatrix {
    size: 8,
    levels: 64,
    ranks: &[
         0, 32,  8, 40,  2, 34, 10, 42,
        48, 16, 56, 24, 50, 18, 58, 26,
        12, 44,  4, 36, 14, 46,  6, 38,
        60, 28, 52, 20, 62, 30, 54, 22,
         3, 35, 11, 43,  1, 33,  9, 41,
        51, 19, 59, 27, 49, 17, 57, 25,
        15, 47,  7, 39, 13, 45,  5, 37,
        63, 31, 55, 23, 61, 29, 53, 21,
    ],
};

/// Two level checkerboard
#[rustfmt::skip]
pub const CHECKER: ThresholdMatrix = ThresholdMatrix {
    size: 2,
    levels: 2,
    ranks: &[
        0, 1,
        1, 0,
    ],
};

/// Diagonal lines, ranks grow along the anti-diagonal
#[rustfmt::skip]
pub const DIAGONAL: ThresholdMatrix = ThresholdMatrix {
    size: 4,
    levels: 4,
    ranks: &[
        0, 1, 2, 3,
        1, 2, 3, 0,
        2, 3, 0, 1,
        3, 0, 1, 2,
    ],
};

/// Both diagonals get the lowest ranks, so dark areas turn into crossed lines
#[rustfmt::skip]
pub const CROSSHATCH: ThresholdMatrix = ThresholdMatrix {
    size: 4,
    levels: 16,
    ranks: &[
         0, 12,  8,  4,
         9,  2,  6, 13,
        14,  7,  3, 10,
         5, 11, 15,  1,
    ],
};

pub const BLUE_NOISE: ThresholdMatrix = ThresholdMatrix {
    size: BLUE_NOISE_SIZE,
    levels: 256,
    ranks: &BLUE_NOISE_16,
};

/// Ordered dithering pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum OrderedPattern {
    Bayer2,
    #[default]
    Bayer4,
    Bayer8,
    Checker,
    Diagonal,
    Crosshatch,
    BlueNoise,
}

impl OrderedPattern {
    pub const ALL: [OrderedPattern; 7] = [
        OrderedPattern::Bayer2,
        OrderedPattern::Bayer4,
        OrderedPattern::Bayer8,
        OrderedPattern::Checker,
        OrderedPattern::Diagonal,
        OrderedPattern::Crosshatch,
        OrderedPattern::BlueNoise,
    ];

    pub fn matrix(&self) -> &'static ThresholdMatrix {
        match self {
            OrderedPattern::Bayer2 => &BAYER_2X2,
            OrderedPattern::Bayer4 => &BAYER_4X4,
            OrderedPattern::Bayer8 => &BAYER_8X8,
            OrderedPattern::Checker => &CHECKER,
            OrderedPattern::Diagonal => &DIAGONAL,
            OrderedPattern::Crosshatch => &CROSSHATCH,
            OrderedPattern::BlueNoise => &BLUE_NOISE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderedPattern::Bayer2 => "bayer2",
            OrderedPattern::Bayer4 => "bayer4",
            OrderedPattern::Bayer8 => "bayer8",
            OrderedPattern::Checker => "checker",
            OrderedPattern::Diagonal => "diagonal",
            OrderedPattern::Crosshatch => "crosshatch",
            OrderedPattern::BlueNoise => "blue_noise",
        }
    }
}
