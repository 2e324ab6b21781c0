//! Deterministic gradient fill and dithering engine for pixel-art canvases.
//!
//! Main features:
//!  - Linear, radial, angular and diamond multi-stop gradients
//!  - Quantization to a palette or to evenly spaced levels
//!  - Ordered (Bayer, pattern, blue noise) and error diffusion
//!    (Floyd-Steinberg, Atkinson, Riemersma) dithering
//!  - Coverage masked fill that commits to the canvas atomically
//!
#![deny(warnings)]

mod blue_noise;
mod color;
mod dither;
mod fill;
mod geometry;
mod grad;
mod hilbert;
mod image;
mod matrix;
mod palette;
#[cfg(feature = "serde")]
mod settings;
mod utils;

pub use blue_noise::{BLUE_NOISE_16, BLUE_NOISE_SIZE, BLUE_NOISE_VERSION};
pub use color::{Color, ColorError, ColorF, RGBA};
pub use dither::{
    ATKINSON, Diffusion, DitherConfig, DitherEngine, DitherFamily, DitherMethod, ErrorBuffer,
    ErrorHistory, FLOYD_STEINBERG, HISTORY_SIZE, Kernel,
};
pub use fill::{Cancel, FillError, FillResult, GradientFill, full_mask, gradient_fill};
pub use geometry::{EPSILON, PI, Point, Rect, Scalar, Size};
pub use grad::{GradShape, GradSpread, GradStop, GradStops, Gradient, GradientError, GradientField};
pub use hilbert::{HilbertCurve, hilbert_d2xy, hilbert_order};
pub use image::{Image, ImageMut, ImageMutRef, ImageOwned, ImageRef, Shape};
pub use matrix::{
    BAYER_2X2, BAYER_4X4, BAYER_8X8, BLUE_NOISE, CHECKER, CROSSHATCH, DIAGONAL, OrderedPattern,
    ThresholdMatrix,
};
pub use palette::{Palette, Quantized, Quantizer};
#[cfg(feature = "serde")]
pub use settings::{FillSettings, SettingsError};
