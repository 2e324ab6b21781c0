//! Dithering of ideal colors down to a quantizer
//!
//! Two families are supported. Ordered dithering perturbs every pixel by a
//! threshold from a tiled matrix and quantizes it independently of its
//! neighbours. Error diffusion carries quantization error to pixels that are
//! not yet visited, either with a kernel in (serpentine) raster order or with
//! an exponentially decaying history along the Hilbert curve.
use crate::{
    Cancel, ColorF, FillError, HilbertCurve, OrderedPattern, Quantized, Quantizer, Rect,
};
use std::fmt;

/// Number of Hilbert curve steps between cancellation checks
const CANCEL_POLL_INTERVAL: usize = 256;

/// Length of the error history used by [`Diffusion::Riemersma`]
pub const HISTORY_SIZE: usize = 16;

/// Ratio between the weights of the newest and the oldest history entries
const HISTORY_RATIO: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DitherFamily {
    /// Stateless, every pixel depends only on its own coordinates
    Ordered,
    /// Stateful, result depends on the visiting order
    ErrorDiffusion,
}

/// Error diffusion algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Diffusion {
    #[default]
    FloydSteinberg,
    Atkinson,
    /// Error history carried along the Hilbert curve
    Riemersma,
}

impl Diffusion {
    pub const ALL: [Diffusion; 3] = [
        Diffusion::FloydSteinberg,
        Diffusion::Atkinson,
        Diffusion::Riemersma,
    ];

    /// Raster kernel, `None` for curve based diffusion
    pub fn kernel(&self) -> Option<&'static Kernel> {
        match self {
            Diffusion::FloydSteinberg => Some(&FLOYD_STEINBERG),
            Diffusion::Atkinson => Some(&ATKINSON),
            Diffusion::Riemersma => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Diffusion::FloydSteinberg => "floyd_steinberg",
            Diffusion::Atkinson => "atkinson",
            Diffusion::Riemersma => "riemersma",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DitherMethod {
    /// Plain quantization without any dithering
    None,
    Ordered(OrderedPattern),
    ErrorDiffusion(Diffusion),
}

impl DitherMethod {
    pub fn family(&self) -> DitherFamily {
        match self {
            DitherMethod::None | DitherMethod::Ordered(_) => DitherFamily::Ordered,
            DitherMethod::ErrorDiffusion(_) => DitherFamily::ErrorDiffusion,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DitherMethod::None => "none",
            DitherMethod::Ordered(pattern) => pattern.name(),
            DitherMethod::ErrorDiffusion(diffusion) => diffusion.name(),
        }
    }
}

impl Default for DitherMethod {
    fn default() -> Self {
        DitherMethod::Ordered(OrderedPattern::default())
    }
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dithering parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DitherConfig {
    pub method: DitherMethod,
    /// Scales ordered perturbation and diffused error, in `[0, 1]`
    pub strength: f32,
    /// Size of a single ordered matrix cell in pixels
    pub scale: f32,
    /// Alternate raster direction on every row of kernel diffusion
    pub serpentine: bool,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            method: DitherMethod::default(),
            strength: 1.0,
            scale: 1.0,
            serpentine: true,
        }
    }
}

impl DitherConfig {
    pub fn new(method: DitherMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn with_strength(self, strength: f32) -> Self {
        Self { strength, ..self }
    }

    pub fn with_scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    pub fn with_serpentine(self, serpentine: bool) -> Self {
        Self { serpentine, ..self }
    }

    /// Check that parameters are usable, returns description of the problem
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err("strength must be within [0, 1]");
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err("scale must be finite and positive");
        }
        Ok(())
    }
}

/// Error diffusion kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// `(dx, dy, weight)` relative to the current pixel
    pub entries: &'static [(i32, i32, u8)],
    /// Sum of weights that corresponds to the full error
    pub divisor: u8,
    /// Number of rows below the current one reached by the kernel
    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the error that is propagated (rest is dropped)
    pub fn propagated(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|(_, _, w)| *w as u32).sum();
        total as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg, propagates the whole error
///
/// ```text
///       *  7
///    3  5  1    (/16)
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// Atkinson, propagates only 6/8 of the error which favours contrast
///
/// ```text
///       *  1  1
///    1  1  1
///       1       (/8)
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)],
    divisor: 8,
    max_dy: 2,
};

/// Rolling buffer with accumulated error of the current and following rows
#[derive(Debug, Clone)]
pub struct ErrorBuffer {
    rows: Vec<Vec<ColorF>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, max_dy: usize) -> Self {
        Self {
            rows: vec![vec![ColorF::ZERO; width]; max_dy + 1],
            width,
        }
    }

    /// Accumulated error of the current row
    #[inline]
    pub fn get(&self, x: usize) -> ColorF {
        self.rows[0][x]
    }

    /// Add error to the pixel `dy` rows below the current one, out of range
    /// pixels are ignored
    #[inline]
    pub fn add(&mut self, x: isize, dy: usize, error: ColorF) {
        if x < 0 || x as usize >= self.width {
            return;
        }
        if let Some(row) = self.rows.get_mut(dy) {
            row[x as usize] += error;
        }
    }

    /// Move to the next row
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill(ColorF::ZERO);
        }
    }
}

/// Exponentially decaying history of the most recent errors
///
/// The newest entry has weight `1` and the oldest `1 / 16`.
#[derive(Debug, Clone)]
pub struct ErrorHistory {
    errors: [ColorF; HISTORY_SIZE],
    weights: [f32; HISTORY_SIZE],
    /// Index of the newest entry
    head: usize,
}

impl Default for ErrorHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHistory {
    pub fn new() -> Self {
        let ratio = HISTORY_RATIO.powf(-1.0 / (HISTORY_SIZE - 1) as f32);
        let mut weights = [1.0f32; HISTORY_SIZE];
        for index in 1..HISTORY_SIZE {
            weights[index] = weights[index - 1] * ratio;
        }
        Self {
            errors: [ColorF::ZERO; HISTORY_SIZE],
            weights,
            head: 0,
        }
    }

    /// Weight of the entry of the given age, `0` is the newest
    pub fn weight(&self, age: usize) -> f32 {
        self.weights.get(age).copied().unwrap_or(0.0)
    }

    /// Weighted sum of the recorded errors
    pub fn carried(&self) -> ColorF {
        let mut result = ColorF::ZERO;
        for (age, weight) in self.weights.iter().enumerate() {
            let error = self.errors[(self.head + HISTORY_SIZE - age) % HISTORY_SIZE];
            result += error * *weight;
        }
        result
    }

    /// Record new error evicting the oldest one
    pub fn push(&mut self, error: ColorF) {
        self.head = (self.head + 1) % HISTORY_SIZE;
        self.errors[self.head] = error;
    }
}

/// Drives quantization of a region with the configured dithering
#[derive(Debug, Clone, Copy)]
pub struct DitherEngine<'a> {
    config: DitherConfig,
    quantizer: Quantizer<'a>,
}

impl<'a> DitherEngine<'a> {
    pub fn new(config: DitherConfig, quantizer: Quantizer<'a>) -> Self {
        Self { config, quantizer }
    }

    pub fn config(&self) -> &DitherConfig {
        &self.config
    }

    pub fn quantizer(&self) -> &Quantizer<'a> {
        &self.quantizer
    }

    /// Visit every pixel of the region exactly once
    ///
    /// `source` returns the ideal color and `emit` receives the quantized
    /// result, both are called with `(col, row)` relative to the region.
    /// Ordered patterns are anchored to the absolute canvas coordinates. The
    /// `cancel` flag is polled once per row (or every few hundred visits along
    /// the Hilbert curve), nothing is emitted after it is raised.
    pub fn run<S, E>(
        &self,
        region: Rect,
        cancel: &dyn Cancel,
        source: S,
        emit: E,
    ) -> Result<(), FillError>
    where
        S: FnMut(usize, usize) -> ColorF,
        E: FnMut(usize, usize, Quantized),
    {
        if region.is_empty() {
            return Ok(());
        }
        match self.config.method {
            DitherMethod::None => self.run_ordered(region, None, cancel, source, emit),
            DitherMethod::Ordered(pattern) => {
                self.run_ordered(region, Some(pattern), cancel, source, emit)
            }
            DitherMethod::ErrorDiffusion(diffusion) => match diffusion.kernel() {
                Some(kernel) => self.run_kernel(region, kernel, cancel, source, emit),
                None => self.run_curve(region, cancel, source, emit),
            },
        }
    }

    fn run_ordered<S, E>(
        &self,
        region: Rect,
        pattern: Option<OrderedPattern>,
        cancel: &dyn Cancel,
        mut source: S,
        mut emit: E,
    ) -> Result<(), FillError>
    where
        S: FnMut(usize, usize) -> ColorF,
        E: FnMut(usize, usize, Quantized),
    {
        let amplitude = self.config.strength * self.quantizer.step();
        let matrix = pattern
            .filter(|_| amplitude > 0.0)
            .map(|pattern| pattern.matrix());
        let cell = |value: usize| (value as f32 / self.config.scale).floor() as usize;
        for row in 0..region.height {
            if cancel.is_cancelled() {
                return Err(FillError::Cancelled);
            }
            let cell_y = cell(region.y + row);
            for col in 0..region.width {
                let ideal = source(col, row);
                let input = match matrix {
                    Some(matrix) => {
                        let threshold = matrix.threshold(cell(region.x + col), cell_y);
                        ideal.offset_rgb(threshold * amplitude)
                    }
                    None => ideal,
                };
                emit(col, row, self.quantizer.quantize(input));
            }
        }
        Ok(())
    }

    fn run_kernel<S, E>(
        &self,
        region: Rect,
        kernel: &Kernel,
        cancel: &dyn Cancel,
        mut source: S,
        mut emit: E,
    ) -> Result<(), FillError>
    where
        S: FnMut(usize, usize) -> ColorF,
        E: FnMut(usize, usize, Quantized),
    {
        let width = region.width;
        let height = region.height;
        let mut buffer = ErrorBuffer::new(width, kernel.max_dy);
        let divisor = kernel.divisor as f32;
        for row in 0..height {
            if cancel.is_cancelled() {
                return Err(FillError::Cancelled);
            }
            let reverse = self.config.serpentine && row % 2 == 1;
            for step in 0..width {
                let col = if reverse { width - 1 - step } else { step };
                let input = source(col, row) + buffer.get(col);
                let quantized = self.quantizer.quantize(input);
                emit(col, row, quantized);

                let error = quantized.error * self.config.strength;
                if error == ColorF::ZERO {
                    continue;
                }
                for &(dx, dy, weight) in kernel.entries {
                    let dy = dy as usize;
                    if row + dy >= height {
                        continue;
                    }
                    let dx = if reverse { -dx } else { dx };
                    buffer.add(
                        col as isize + dx as isize,
                        dy,
                        error * (weight as f32 / divisor),
                    );
                }
            }
            buffer.advance_row();
        }
        Ok(())
    }

    fn run_curve<S, E>(
        &self,
        region: Rect,
        cancel: &dyn Cancel,
        mut source: S,
        mut emit: E,
    ) -> Result<(), FillError>
    where
        S: FnMut(usize, usize) -> ColorF,
        E: FnMut(usize, usize, Quantized),
    {
        let mut history = ErrorHistory::new();
        let mut curve = HilbertCurve::new(region.size());
        let mut steps = 0usize;
        // polled on curve steps, thin regions skip most of the tile
        while let Some(point) = curve.step() {
            if steps % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(FillError::Cancelled);
            }
            steps += 1;
            let Some((col, row)) = point else {
                continue;
            };
            let ideal = source(col, row);
            let input = ideal + history.carried() * self.config.strength;
            let quantized = self.quantizer.quantize(input);
            emit(col, row, quantized);
            // error is measured against the ideal color, which keeps the
            // history bounded
            let error = (ideal - ColorF::from(quantized.color)).with_alpha(0.0);
            history.push(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_eq, Palette, RGBA};
    use std::cell::Cell;

    fn black_white() -> Palette {
        Palette::new([RGBA::BLACK, RGBA::WHITE])
    }

    /// Run engine over a constant color, returns row-major output
    fn run_flat(engine: &DitherEngine<'_>, region: Rect, color: ColorF) -> Vec<Quantized> {
        let mut output = vec![None; region.area()];
        engine
            .run(
                region,
                &(),
                |_, _| color,
                |col, row, q| {
                    let slot = &mut output[row * region.width + col];
                    assert!(slot.is_none(), "pixel visited twice");
                    *slot = Some(q);
                },
            )
            .unwrap();
        output.into_iter().map(|q| q.unwrap()).collect()
    }

    fn white_count(output: &[Quantized]) -> usize {
        output.iter().filter(|q| q.color == RGBA::WHITE).count()
    }

    fn mean_red(output: &[Quantized]) -> f32 {
        output.iter().map(|q| q.color.red() as f32).sum::<f32>() / output.len() as f32
    }

    #[test]
    fn test_config_validate() {
        assert!(DitherConfig::default().validate().is_ok());
        assert!(DitherConfig::default().with_strength(1.5).validate().is_err());
        assert!(DitherConfig::default().with_strength(-0.1).validate().is_err());
        assert!(DitherConfig::default().with_strength(f32::NAN).validate().is_err());
        assert!(DitherConfig::default().with_scale(0.0).validate().is_err());
        assert!(DitherConfig::default().with_scale(f32::INFINITY).validate().is_err());
        assert!(DitherConfig::default().with_scale(2.5).validate().is_ok());
    }

    #[test]
    fn test_family() {
        assert_eq!(DitherMethod::None.family(), DitherFamily::Ordered);
        assert_eq!(
            DitherMethod::Ordered(OrderedPattern::BlueNoise).family(),
            DitherFamily::Ordered
        );
        for diffusion in Diffusion::ALL {
            assert_eq!(
                DitherMethod::ErrorDiffusion(diffusion).family(),
                DitherFamily::ErrorDiffusion
            );
        }
    }

    #[test]
    fn test_kernels() {
        assert_approx_eq!(FLOYD_STEINBERG.propagated(), 1.0f32, 1e-6);
        assert_approx_eq!(ATKINSON.propagated(), 0.75f32, 1e-6);
    }

    #[test]
    fn test_history_weights() {
        let history = ErrorHistory::new();
        assert_approx_eq!(history.weight(0), 1.0f32, 1e-6);
        assert_approx_eq!(history.weight(HISTORY_SIZE - 1), 1.0f32 / 16.0, 1e-5);
        assert_eq!(history.weight(HISTORY_SIZE), 0.0);
        for age in 1..HISTORY_SIZE {
            assert!(history.weight(age) < history.weight(age - 1));
        }

        let mut history = ErrorHistory::new();
        let unit = ColorF::new(1.0, 0.0, 0.0, 0.0);
        history.push(unit);
        assert_approx_eq!(history.carried().red(), 1.0f32, 1e-6);
        history.push(ColorF::ZERO);
        assert_approx_eq!(history.carried().red(), history.weight(1), 1e-6);
        for _ in 0..HISTORY_SIZE {
            history.push(ColorF::ZERO);
        }
        assert_eq!(history.carried(), ColorF::ZERO);
    }

    #[test]
    fn test_ordered_half_gray() {
        // half gray with black/white palette produces exactly 1:1 ratio
        let palette = black_white();
        let gray = ColorF::new(127.5, 127.5, 127.5, 255.0);
        for pattern in OrderedPattern::ALL {
            let engine = DitherEngine::new(
                DitherConfig::new(DitherMethod::Ordered(pattern)),
                Quantizer::Palette(&palette),
            );
            let side = pattern.matrix().size();
            let output = run_flat(&engine, Rect::new(0, 0, side, side), gray);
            assert_eq!(white_count(&output) * 2, side * side, "{}", pattern.name());
        }
    }

    #[test]
    fn test_ordered_anchored_to_canvas() {
        let palette = black_white();
        let gray = ColorF::new(100.0, 100.0, 100.0, 255.0);
        let engine = DitherEngine::new(DitherConfig::default(), Quantizer::Palette(&palette));
        let full = run_flat(&engine, Rect::new(0, 0, 8, 8), gray);
        let part = run_flat(&engine, Rect::new(3, 2, 4, 5), gray);
        for row in 0..5 {
            for col in 0..4 {
                assert_eq!(part[row * 4 + col], full[(row + 2) * 8 + col + 3]);
            }
        }
    }

    #[test]
    fn test_ordered_scale() {
        let palette = black_white();
        let gray = ColorF::new(127.5, 127.5, 127.5, 255.0);
        let config = DitherConfig::new(DitherMethod::Ordered(OrderedPattern::Checker));
        let fine = run_flat(
            &DitherEngine::new(config, Quantizer::Palette(&palette)),
            Rect::new(0, 0, 4, 4),
            gray,
        );
        let coarse = run_flat(
            &DitherEngine::new(config.with_scale(2.0), Quantizer::Palette(&palette)),
            Rect::new(0, 0, 4, 4),
            gray,
        );
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(coarse[row * 4 + col], fine[(row / 2) * 4 + col / 2]);
            }
        }
    }

    #[test]
    fn test_zero_strength_is_plain_quantization() {
        let palette = black_white();
        let gray = ColorF::new(140.0, 140.0, 140.0, 255.0);
        let methods = [
            DitherMethod::None,
            DitherMethod::Ordered(OrderedPattern::Bayer8),
            DitherMethod::ErrorDiffusion(Diffusion::FloydSteinberg),
            DitherMethod::ErrorDiffusion(Diffusion::Riemersma),
        ];
        for method in methods {
            let config = DitherConfig::new(method).with_strength(0.0);
            let engine = DitherEngine::new(config, Quantizer::Palette(&palette));
            let output = run_flat(&engine, Rect::new(0, 0, 9, 7), gray);
            assert!(output.iter().all(|q| q.color == RGBA::WHITE), "{}", method);
        }
    }

    #[test]
    fn test_pass_through_is_identity() {
        let color = ColorF::new(10.2, 100.7, 200.0, 128.0);
        for method in [
            DitherMethod::Ordered(OrderedPattern::Bayer4),
            DitherMethod::ErrorDiffusion(Diffusion::Atkinson),
        ] {
            let engine = DitherEngine::new(DitherConfig::new(method), Quantizer::PassThrough);
            let output = run_flat(&engine, Rect::new(0, 0, 5, 5), color);
            assert!(output.iter().all(|q| q.color == RGBA::new(10, 101, 200, 128)));
        }
    }

    #[test]
    fn test_floyd_steinberg_mean() {
        let palette = black_white();
        let config = DitherConfig::new(DitherMethod::ErrorDiffusion(Diffusion::FloydSteinberg));
        let engine = DitherEngine::new(config, Quantizer::Palette(&palette));
        for value in [64.0, 128.0, 200.0] {
            let gray = ColorF::new(value, value, value, 255.0);
            let output = run_flat(&engine, Rect::new(0, 0, 32, 32), gray);
            assert_approx_eq!(mean_red(&output), value, 3.0);
        }
        // checkerboard for half gray
        let gray = ColorF::new(128.0, 128.0, 128.0, 255.0);
        let output = run_flat(&engine, Rect::new(0, 0, 8, 2), gray);
        for (index, q) in output.iter().enumerate() {
            let expected = if (index % 8 + index / 8) % 2 == 0 {
                RGBA::WHITE
            } else {
                RGBA::BLACK
            };
            assert_eq!(q.color, expected);
        }
    }

    #[test]
    fn test_atkinson_drops_error() {
        // dark shade is crushed to black by atkinson but not by floyd-steinberg
        let palette = black_white();
        let dark = ColorF::new(10.0, 10.0, 10.0, 255.0);
        let region = Rect::new(0, 0, 32, 32);
        let atkinson = DitherEngine::new(
            DitherConfig::new(DitherMethod::ErrorDiffusion(Diffusion::Atkinson)),
            Quantizer::Palette(&palette),
        );
        assert_eq!(white_count(&run_flat(&atkinson, region, dark)), 0);
        let floyd = DitherEngine::new(
            DitherConfig::new(DitherMethod::ErrorDiffusion(Diffusion::FloydSteinberg)),
            Quantizer::Palette(&palette),
        );
        assert!(white_count(&run_flat(&floyd, region, dark)) > 0);
    }

    #[test]
    fn test_riemersma_mean() {
        let palette = black_white();
        let config = DitherConfig::new(DitherMethod::ErrorDiffusion(Diffusion::Riemersma));
        let engine = DitherEngine::new(config, Quantizer::Palette(&palette));
        for (width, height) in [(32, 32), (33, 17)] {
            for value in [30.0, 64.0, 128.0] {
                let gray = ColorF::new(value, value, value, 255.0);
                let output = run_flat(&engine, Rect::new(0, 0, width, height), gray);
                assert_approx_eq!(mean_red(&output), value, 3.0);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let palette: Palette = "#000000 #ff0000 #00ff00 #0000ff #ffffff".parse().unwrap();
        let source = |col: usize, row: usize| {
            ColorF::new((col * 7) as f32, (row * 5) as f32, ((col + row) * 3) as f32, 255.0)
        };
        for method in [
            DitherMethod::Ordered(OrderedPattern::BlueNoise),
            DitherMethod::ErrorDiffusion(Diffusion::FloydSteinberg),
            DitherMethod::ErrorDiffusion(Diffusion::Riemersma),
        ] {
            let engine = DitherEngine::new(DitherConfig::new(method), Quantizer::Palette(&palette));
            let collect = || {
                let mut output = Vec::new();
                engine
                    .run(Rect::new(5, 3, 23, 19), &(), source, |col, row, q| {
                        output.push((col, row, q.color))
                    })
                    .unwrap();
                output
            };
            let first = collect();
            assert_eq!(first.len(), 23 * 19);
            assert_eq!(first, collect(), "{}", method);
        }
    }

    #[test]
    fn test_serpentine_order() {
        let engine = DitherEngine::new(
            DitherConfig::new(DitherMethod::ErrorDiffusion(Diffusion::FloydSteinberg)),
            Quantizer::PassThrough,
        );
        let mut order = Vec::new();
        engine
            .run(Rect::new(0, 0, 3, 2), &(), |_, _| ColorF::ZERO, |col, row, _| {
                order.push((col, row))
            })
            .unwrap();
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)]);

        let engine = DitherEngine::new(
            engine.config().with_serpentine(false),
            *engine.quantizer(),
        );
        let mut order = Vec::new();
        engine
            .run(Rect::new(0, 0, 3, 2), &(), |_, _| ColorF::ZERO, |col, row, _| {
                order.push((col, row))
            })
            .unwrap();
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    struct CancelAfter(Cell<usize>);

    impl Cancel for CancelAfter {
        fn is_cancelled(&self) -> bool {
            let left = self.0.get();
            self.0.set(left.saturating_sub(1));
            left == 0
        }
    }

    #[test]
    fn test_cancel() {
        for method in [
            DitherMethod::None,
            DitherMethod::ErrorDiffusion(Diffusion::FloydSteinberg),
            DitherMethod::ErrorDiffusion(Diffusion::Riemersma),
        ] {
            let engine = DitherEngine::new(DitherConfig::new(method), Quantizer::PassThrough);
            let mut visited = 0;
            let result = engine.run(
                Rect::new(0, 0, 40, 40),
                &CancelAfter(Cell::new(1)),
                |_, _| ColorF::ZERO,
                |_, _, _| visited += 1,
            );
            assert_eq!(result, Err(FillError::Cancelled));
            // first poll passes, the second one stops
            let expected = match method {
                DitherMethod::ErrorDiffusion(Diffusion::Riemersma) => CANCEL_POLL_INTERVAL,
                _ => 40,
            };
            assert_eq!(visited, expected, "{}", method);
        }

        // 1x64 region walks 64x64 tile, only the first 16x16 block is
        // walked before the second poll
        let engine = DitherEngine::new(
            DitherConfig::new(DitherMethod::ErrorDiffusion(Diffusion::Riemersma)),
            Quantizer::PassThrough,
        );
        let mut visited = 0;
        let result = engine.run(
            Rect::new(0, 0, 1, 64),
            &CancelAfter(Cell::new(1)),
            |_, _| ColorF::ZERO,
            |_, _, _| visited += 1,
        );
        assert_eq!(result, Err(FillError::Cancelled));
        assert_eq!(visited, 16);
    }
}
