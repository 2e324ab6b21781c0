//! Blue noise threshold tile
//!
//! 16x16 rank table produced offline with the void-and-cluster method
//! (gaussian energy, sigma = 1.5, toroidal distance). Every rank `0..256`
//! appears exactly once and the tile wraps seamlessly.
//!
//! The table is data, not generated at runtime: changing it changes the
//! output of every blue noise fill, so bump [`BLUE_NOISE_VERSION`] if it is
//! ever regenerated.

/// Version of the [`BLUE_NOISE_16`] table
pub const BLUE_NOISE_VERSION: u32 = 1;

/// Side of the blue noise tile
pub const BLUE_NOISE_SIZE: usize = 16;

/// Row-major ranks of the blue noise tile
#[rustfmt::skip]
pub const BLUE_NOISE_16: [u8; BLUE_NOISE_SIZE * BLUE_NOISE_SIZE] = [
     19,  90, 218,  32, 119, 250,  57, 213, 116, 247,  28, 128, 167, 251, 139,  71,
    149,  45, 195, 165,  70, 202,  87, 171,   1,  69, 184,  48,  80, 192,  38, 222,
    103, 245, 123,   4, 106, 146,  23, 237, 101, 141, 231, 113, 215,   6, 121, 176,
     13, 186,  67, 212, 234,  42, 188,  52, 154, 205,  18,  63, 160,  95, 233,  59,
    134,  86, 153,  27, 172,  94, 129, 223,  75,  35, 178, 131, 244,  43, 145, 199,
    254,  41, 221, 120,  54, 248,  17, 162, 115, 252,  92, 201,  15, 173,  83,  29,
    159, 108, 191,  74, 144, 200,  84, 214,   7, 137,  49,  72, 111, 225, 127, 211,
     60,  22, 232,   5, 180,  31, 110,  64, 189, 169, 235, 147, 183,  55,   3,  96,
    240, 136, 163, 100, 126, 217, 152, 242,  39, 102,  21, 208,  34, 249, 166, 194,
     44,  85, 207,  40, 246,  56,  14, 132,  81, 224, 124,  66,  99, 140,  79, 122,
    179, 227,  10,  73, 170,  91, 182, 204, 161,   2, 193, 155, 228,  12, 203,  25,
    156, 105, 143, 196, 114, 236,  30,  68, 109, 255,  88,  47, 177, 112, 239,  62,
    219,  33, 253,  53,  20, 151, 125, 216,  51, 138,  26, 209,  78,  36, 148,  93,
    198,  77, 130, 168, 210,  82, 190,   9, 174, 226, 164, 118, 243, 133, 175,   0,
    117, 181,  11,  97, 230,  46, 104, 238,  76,  98,  58,   8, 187,  65, 229,  50,
    158, 241,  61, 142, 185,  16, 157, 135,  37, 197, 150, 220,  89,  24, 107, 206,
];
