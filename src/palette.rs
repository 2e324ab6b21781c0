//! Palette lookup and quantization of ideal colors
use crate::{ColorError, ColorF, RGBA};
use std::{fmt, str::FromStr};

/// Ordered list of unique colors
///
/// Insertion order defines precedence: when two entries are equally close to
/// a color, the one with the lower index wins.
#[derive(Clone, PartialEq, Default)]
pub struct Palette {
    colors: Vec<RGBA>,
    // precomputed float version of `colors`
    colors_f: Vec<ColorF>,
    // characteristic distance between neighbouring entries
    step: f32,
}

impl Palette {
    /// Create palette from colors, later duplicates are dropped (alpha included)
    pub fn new(colors: impl IntoIterator<Item = RGBA>) -> Self {
        let mut unique: Vec<RGBA> = Vec::new();
        for color in colors {
            if !unique.contains(&color) {
                unique.push(color);
            }
        }
        let colors_f: Vec<ColorF> = unique.iter().copied().map(ColorF::from).collect();
        let step = palette_step(&colors_f);
        Self {
            colors: unique,
            colors_f,
            step,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RGBA> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[RGBA] {
        &self.colors
    }

    /// Mean distance (largest channel difference) from each entry to its
    /// closest other entry, zero for palettes with less than two entries.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Index of the closest entry by squared euclidean RGB distance and the
    /// distance itself, ties are resolved in favour of the lowest index.
    pub fn nearest(&self, color: ColorF) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, entry) in self.colors_f.iter().enumerate() {
            let dist = color.distance_sq(*entry);
            match best {
                // strict comparison keeps the first entry on ties
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((index, dist)),
            }
        }
        best
    }
}

/// Mean distance from each entry to the nearest other entry
fn palette_step(colors: &[ColorF]) -> f32 {
    if colors.len() < 2 {
        return 0.0;
    }
    let total: f32 = colors
        .iter()
        .enumerate()
        .map(|(i, c0)| {
            colors
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, c1)| c0.distance_max(*c1))
                .fold(f32::INFINITY, f32::min)
        })
        .sum();
    total / colors.len() as f32
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.colors.iter()).finish()
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, color) in self.colors.iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", color)?;
        }
        Ok(())
    }
}

impl FromStr for Palette {
    type Err = ColorError;

    /// Parse whitespace or comma separated list of hex colors
    fn from_str(colors: &str) -> Result<Self, Self::Err> {
        let colors = colors
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|color| !color.is_empty())
            .map(RGBA::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Palette::new(colors))
    }
}

impl From<Vec<RGBA>> for Palette {
    fn from(colors: Vec<RGBA>) -> Self {
        Palette::new(colors)
    }
}

impl FromIterator<RGBA> for Palette {
    fn from_iter<T: IntoIterator<Item = RGBA>>(iter: T) -> Self {
        Palette::new(iter)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Palette {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.colors.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Palette {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Palette::new(Vec::<RGBA>::deserialize(deserializer)?))
    }
}

/// Result of quantizing a single color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantized {
    /// Palette index of the chosen entry, `None` unless quantized by a palette
    pub index: Option<usize>,
    /// Output color
    pub color: RGBA,
    /// Signed difference `input - output` before any clamping, alpha is zero
    pub error: ColorF,
}

/// Reduces ideal colors to the constrained output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantizer<'a> {
    /// Identity, colors are only rounded and error is zero
    PassThrough,
    /// Nearest palette entry
    Palette(&'a Palette),
    /// Each channel is posterized to `n` evenly spaced levels
    Levels(u8),
}

impl Quantizer<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Quantizer::PassThrough => "pass_through",
            Quantizer::Palette(_) => "palette",
            Quantizer::Levels(_) => "levels",
        }
    }

    /// Characteristic spacing between output colors, used to scale ordered
    /// dithering perturbation.
    pub fn step(&self) -> f32 {
        match self {
            Quantizer::PassThrough => 0.0,
            Quantizer::Palette(palette) => palette.step(),
            Quantizer::Levels(levels) if *levels >= 2 => 255.0 / (*levels - 1) as f32,
            Quantizer::Levels(_) => 0.0,
        }
    }

    /// Quantize color, alpha is taken from the input color
    pub fn quantize(&self, color: ColorF) -> Quantized {
        match self {
            Quantizer::PassThrough => Quantized {
                index: None,
                color: color.into(),
                error: ColorF::ZERO,
            },
            Quantizer::Palette(palette) => match palette.nearest(color) {
                Some((index, _)) => {
                    let entry = palette.colors_f[index].with_alpha(color.alpha());
                    Quantized {
                        index: Some(index),
                        color: entry.into(),
                        error: (color - entry).with_alpha(0.0),
                    }
                }
                None => Quantizer::PassThrough.quantize(color),
            },
            Quantizer::Levels(levels) if *levels >= 2 => {
                let step = self.step();
                let [r, g, b, a] = color.0;
                let level = |c: f32| ((c / step).round() * step).clamp(0.0, 255.0);
                let output = ColorF::new(level(r), level(g), level(b), a);
                Quantized {
                    index: None,
                    color: output.into(),
                    error: (color - output).with_alpha(0.0),
                }
            }
            Quantizer::Levels(_) => Quantizer::PassThrough.quantize(color),
        }
    }
}

impl<'a> From<Option<&'a Palette>> for Quantizer<'a> {
    fn from(palette: Option<&'a Palette>) -> Self {
        match palette {
            Some(palette) => Quantizer::Palette(palette),
            None => Quantizer::PassThrough,
        }
    }
}
