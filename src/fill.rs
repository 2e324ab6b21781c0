//! Dithered gradient fill of a masked canvas region
use crate::{
    DitherConfig, DitherEngine, Gradient, GradientError, Image, ImageMut, ImageOwned,
    Palette, Quantizer, RGBA, Rect, Size,
};
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// Cooperative cancellation flag, polled while the fill is in progress
pub trait Cancel {
    fn is_cancelled(&self) -> bool;
}

/// Never cancelled
impl Cancel for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancel for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<C: Cancel + ?Sized> Cancel for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<C: Cancel + ?Sized> Cancel for Arc<C> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillError {
    InvalidGradient(GradientError),
    /// Palette quantization is requested with an empty palette
    InvalidPalette,
    InvalidDither(&'static str),
    MaskDimensionMismatch { expected: Size, actual: Size },
    TargetOutOfBounds { target: Rect, canvas: Size },
    Cancelled,
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::InvalidGradient(error) => write!(f, "invalid gradient: {}", error),
            FillError::InvalidPalette => write!(f, "palette is empty"),
            FillError::InvalidDither(reason) => write!(f, "invalid dither: {}", reason),
            FillError::MaskDimensionMismatch { expected, actual } => write!(
                f,
                "mask is {}x{} but target is {}x{}",
                actual.width, actual.height, expected.width, expected.height
            ),
            FillError::TargetOutOfBounds { target, canvas } => write!(
                f,
                "target {} is outside of {}x{} canvas",
                target, canvas.width, canvas.height
            ),
            FillError::Cancelled => write!(f, "fill was cancelled"),
        }
    }
}

impl std::error::Error for FillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FillError::InvalidGradient(error) => Some(error),
            _ => None,
        }
    }
}

impl From<GradientError> for FillError {
    fn from(error: GradientError) -> Self {
        FillError::InvalidGradient(error)
    }
}

/// Outcome of a committed fill
#[derive(Debug, Clone)]
pub struct FillResult {
    /// Target region that was processed
    pub target: Rect,
    /// Bounding rectangle of pixels with non-zero coverage, `None` if
    /// nothing was written
    pub bounds: Option<Rect>,
    /// Number of pixels with non-zero coverage
    pub covered: usize,
    /// Final pixels of the target region
    pub pixels: ImageOwned<RGBA>,
}

/// Gradient fill operation
///
/// Holds everything except the canvas, so the same fill can be applied to
/// several canvases. Output is a pure function of the inputs, repeated
/// application with identical inputs produces byte-identical canvases.
#[derive(Clone, Copy)]
pub struct GradientFill<'a> {
    gradient: &'a Gradient,
    dither: DitherConfig,
    quantizer: Quantizer<'a>,
    cancel: &'a dyn Cancel,
}

impl fmt::Debug for GradientFill<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientFill")
            .field("gradient", self.gradient)
            .field("dither", &self.dither)
            .field("quantizer", &self.quantizer)
            .finish()
    }
}

impl<'a> GradientFill<'a> {
    pub fn new(gradient: &'a Gradient, dither: DitherConfig) -> Self {
        Self {
            gradient,
            dither,
            quantizer: Quantizer::PassThrough,
            cancel: &(),
        }
    }

    /// Quantize to the nearest palette entry, `None` keeps ideal colors
    pub fn with_palette(self, palette: Option<&'a Palette>) -> Self {
        self.with_quantizer(palette.into())
    }

    /// Posterize every channel to `levels` evenly spaced values
    pub fn with_levels(self, levels: u8) -> Self {
        self.with_quantizer(Quantizer::Levels(levels))
    }

    pub fn with_quantizer(self, quantizer: Quantizer<'a>) -> Self {
        Self { quantizer, ..self }
    }

    pub fn with_cancel(self, cancel: &'a dyn Cancel) -> Self {
        Self { cancel, ..self }
    }

    pub fn gradient(&self) -> &'a Gradient {
        self.gradient
    }

    pub fn dither(&self) -> &DitherConfig {
        &self.dither
    }

    pub fn quantizer(&self) -> Quantizer<'a> {
        self.quantizer
    }

    /// Check everything that does not depend on the canvas
    pub fn validate(&self) -> Result<(), FillError> {
        self.gradient.field()?;
        match self.quantizer {
            Quantizer::Palette(palette) if palette.is_empty() => {
                return Err(FillError::InvalidPalette);
            }
            Quantizer::Levels(levels) if levels < 2 => {
                return Err(FillError::InvalidDither("levels must be at least 2"));
            }
            _ => {}
        }
        self.dither.validate().map_err(FillError::InvalidDither)
    }

    /// Fill `target` region of the canvas blending by `mask` coverage
    ///
    /// The mask must have the size of the target. All pixels are rendered into
    /// a scratch buffer first and the canvas is only written once the whole
    /// region is done, so on error (including cancellation) the canvas is left
    /// untouched.
    pub fn apply<C, M>(
        &self,
        canvas: &mut C,
        target: Rect,
        mask: &M,
    ) -> Result<FillResult, FillError>
    where
        C: ImageMut<Pixel = RGBA> + ?Sized,
        M: Image<Pixel = u8> + ?Sized,
    {
        let span = tracing::debug_span!(
            "[gradient_fill]",
            target = %target,
            shape = ?self.gradient.shape,
            family = ?self.dither.method.family(),
            method = self.dither.method.name(),
            quantizer = self.quantizer.name()
        );
        span.in_scope(|| {
            let result = self.apply_inner(canvas, target, mask);
            match &result {
                Ok(result) => tracing::debug!(
                    "[gradient_fill:done] covered={} bounds={:?}",
                    result.covered,
                    result.bounds
                ),
                Err(FillError::Cancelled) => tracing::debug!("[gradient_fill:cancelled]"),
                Err(error) => tracing::warn!("[gradient_fill:invalid] {}", error),
            }
            result
        })
    }

    fn apply_inner<C, M>(
        &self,
        canvas: &mut C,
        target: Rect,
        mask: &M,
    ) -> Result<FillResult, FillError>
    where
        C: ImageMut<Pixel = RGBA> + ?Sized,
        M: Image<Pixel = u8> + ?Sized,
    {
        // validate everything before any allocation, target goes first as
        // pixel coordinates below are only computed for a contained target
        let canvas_size = canvas.size();
        let canvas_rect = Rect::new(0, 0, canvas_size.width, canvas_size.height);
        if !canvas_rect.contains_rect(target) {
            return Err(FillError::TargetOutOfBounds {
                target,
                canvas: canvas_size,
            });
        }
        self.validate()?;
        let field = self.gradient.field()?;
        if mask.size() != target.size() {
            return Err(FillError::MaskDimensionMismatch {
                expected: target.size(),
                actual: mask.size(),
            });
        }

        let mut scratch = ImageOwned::new_with(target.size(), |row, col| {
            canvas
                .get(target.y + row, target.x + col)
                .copied()
                .unwrap_or_default()
        });
        let mut bounds: Option<Rect> = None;
        let mut covered = 0;
        let engine = DitherEngine::new(self.dither, self.quantizer);
        engine.run(
            target,
            self.cancel,
            |col, row| field.evaluate_pixel(target.x + col, target.y + row).1,
            |col, row, quantized| {
                let coverage = mask.get(row, col).copied().unwrap_or(0);
                if coverage == 0 {
                    return;
                }
                if let Some(pixel) = scratch.get_mut(row, col) {
                    *pixel = pixel.blend(quantized.color, coverage);
                    covered += 1;
                    let (x, y) = (target.x + col, target.y + row);
                    bounds = Some(bounds.map_or_else(|| Rect::pixel(x, y), |b| b.extend(x, y)));
                }
            },
        )?;

        // commit
        if let Some(bounds) = bounds {
            for y in bounds.y..bounds.bottom() {
                for x in bounds.x..bounds.right() {
                    if let (Some(dst), Some(src)) =
                        (canvas.get_mut(y, x), scratch.get(y - target.y, x - target.x))
                    {
                        *dst = *src;
                    }
                }
            }
        }
        Ok(FillResult {
            target,
            bounds,
            covered,
            pixels: scratch,
        })
    }
}

/// Fill `target` region of the canvas with a dithered gradient
///
/// Shortcut for [`GradientFill`] without cancellation, palette is optional.
pub fn gradient_fill<C, M>(
    canvas: &mut C,
    target: Rect,
    mask: &M,
    gradient: &Gradient,
    dither: DitherConfig,
    palette: Option<&Palette>,
) -> Result<FillResult, FillError>
where
    C: ImageMut<Pixel = RGBA> + ?Sized,
    M: Image<Pixel = u8> + ?Sized,
{
    GradientFill::new(gradient, dither)
        .with_palette(palette)
        .apply(canvas, target, mask)
}

/// Mask that fully covers a region of the given size
pub fn full_mask(size: Size) -> ImageOwned<u8> {
    ImageOwned::new_with(size, |_, _| 255)
}
