use bytemuck::{Pod, Zeroable};
use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Sub},
    str::FromStr,
};

/// Common interface to all color representations
pub trait Color: Copy {
    /// Convert color to RGBA list
    fn to_rgba(self) -> [u8; 4];

    /// Convert color to RGB list (alpha is discarded)
    fn to_rgb(self) -> [u8; 3] {
        let [r, g, b, _] = self.to_rgba();
        [r, g, b]
    }

    /// Calculate LUMA of the color.
    fn luma(self) -> f32 {
        let [r, g, b] = self.to_rgb();
        0.2126 * (r as f32 / 255.0) + 0.7152 * (g as f32 / 255.0) + 0.0722 * (b as f32 / 255.0)
    }

    /// Pick color that produces the best contrast with self
    fn best_contrast(self, c0: Self, c1: Self) -> Self {
        let luma = self.luma();
        if (luma - c0.luma()).abs() < (luma - c1.luma()).abs() {
            c1
        } else {
            c0
        }
    }

    /// Linear interpolation between self and other colors, channel-wise
    /// in the native color space (no gamma conversion).
    fn lerp(self, other: Self, t: f32) -> Self;
}

/// ABGR color packed as u32 value (most of the platforms are little-endian)
///
/// Memory layout is `[r, g, b, a]` bytes, so a slice of `RGBA` can be
/// viewed as RGBA8 bytes with [`bytemuck::cast_slice`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct RGBA(u32);

impl RGBA {
    pub const BLACK: RGBA = RGBA::new(0, 0, 0, 255);
    pub const WHITE: RGBA = RGBA::new(255, 255, 255, 255);
    pub const TRANSPARENT: RGBA = RGBA::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_le_bytes([r, g, b, a])
    }

    const fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Opaque color from RGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn alpha(self) -> u8 {
        ((self.0 >> 24) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Channel by index `0..4` in `r, g, b, a` order
    pub const fn channel(self, index: usize) -> u8 {
        ((self.0 >> ((index & 3) * 8)) & 0xff) as u8
    }

    /// Move every channel (alpha included) towards `other` by `coverage / 255`
    ///
    /// Coverage `0` keeps `self` and `255` yields `other` exactly.
    pub fn blend(self, other: Self, coverage: u8) -> Self {
        match coverage {
            0 => self,
            255 => other,
            _ => {
                let c = coverage as u32;
                let [r, g, b, a] = [0, 1, 2, 3].map(|i| {
                    let value = self.channel(i) as u32 * (255 - c) + other.channel(i) as u32 * c;
                    ((value + 127) / 255) as u8
                });
                RGBA::new(r, g, b, a)
            }
        }
    }
}

impl Color for RGBA {
    fn to_rgba(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        ColorF::from(self).lerp(ColorF::from(other), t).into()
    }
}

impl From<[u8; 4]> for RGBA {
    fn from(rgba: [u8; 4]) -> Self {
        Self::from_le_bytes(rgba)
    }
}

impl From<ColorF> for RGBA {
    /// Round to the nearest representable color, channels are saturated
    fn from(color: ColorF) -> Self {
        let [r, g, b, a] = color.0.map(|c| (c + 0.5).clamp(0.0, 255.0) as u8);
        RGBA::new(r, g, b, a)
    }
}

impl fmt::Debug for RGBA {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [bg_r, bg_g, bg_b] = self.to_rgb();
        let [fg_r, fg_g, fg_b] = self.best_contrast(RGBA::WHITE, RGBA::BLACK).to_rgb();
        write!(
            fmt,
            "\x1b[38;2;{};{};{};48;2;{};{};{}m",
            fg_r, fg_g, fg_b, bg_r, bg_g, bg_b
        )?;
        write!(fmt, "{}", self)?;
        write!(fmt, "\x1b[m")
    }
}

impl fmt::Display for RGBA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)?;
        if a != 255 {
            write!(f, "{:02x}", a)?;
        }
        Ok(())
    }
}

impl FromStr for RGBA {
    type Err = ColorError;

    fn from_str(color: &str) -> Result<Self, Self::Err> {
        let color = color.trim();
        let hex = color.strip_prefix('#').unwrap_or(color);
        if !(hex.len() == 6 || hex.len() == 8) {
            return Err(ColorError::HexExpected);
        }
        // #RRGGBB(AA)
        let digit = |byte| match byte {
            b'A'..=b'F' => Ok(byte - b'A' + 10),
            b'a'..=b'f' => Ok(byte - b'a' + 10),
            b'0'..=b'9' => Ok(byte - b'0'),
            _ => Err(ColorError::HexExpected),
        };
        let mut hex = hex
            .as_bytes()
            .chunks(2)
            .map(|pair| -> Result<u8, ColorError> { Ok((digit(pair[0])? << 4) | digit(pair[1])?) });
        Ok(RGBA::new(
            hex.next().unwrap_or(Ok(0))?,
            hex.next().unwrap_or(Ok(0))?,
            hex.next().unwrap_or(Ok(0))?,
            hex.next().unwrap_or(Ok(255))?,
        ))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RGBA {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RGBA {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        std::borrow::Cow::<'de, str>::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Color with floating point channels in `[r, g, b, a]` order.
///
/// Channels use the same `0.0..=255.0` scale as [`RGBA`], but are not
/// rounded or clamped, so it can hold ideal gradient colors as well as signed
/// quantization error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorF(pub [f32; 4]);

impl ColorF {
    pub const ZERO: ColorF = ColorF([0.0; 4]);

    #[inline(always)]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    #[inline(always)]
    pub fn red(self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn green(self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn blue(self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn alpha(self) -> f32 {
        self.0[3]
    }

    /// Same color with alpha channel replaced
    #[inline(always)]
    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    /// Add the same offset to RGB channels, alpha is preserved
    #[inline(always)]
    pub fn offset_rgb(self, offset: f32) -> Self {
        let [r, g, b, a] = self.0;
        Self([r + offset, g + offset, b + offset, a])
    }

    /// Squared euclidean distance between RGB channels
    #[inline(always)]
    pub fn distance_sq(self, other: Self) -> f32 {
        let dr = self.red() - other.red();
        let dg = self.green() - other.green();
        let db = self.blue() - other.blue();
        dr * dr + dg * dg + db * db
    }

    /// Largest absolute difference between RGB channels
    pub fn distance_max(self, other: Self) -> f32 {
        (self.red() - other.red())
            .abs()
            .max((self.green() - other.green()).abs())
            .max((self.blue() - other.blue()).abs())
    }
}

impl Color for ColorF {
    fn to_rgba(self) -> [u8; 4] {
        RGBA::from(self).to_rgba()
    }

    #[inline(always)]
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl From<RGBA> for ColorF {
    fn from(color: RGBA) -> Self {
        Self(color.to_rgba().map(f32::from))
    }
}

impl From<ColorF> for [f32; 4] {
    fn from(color: ColorF) -> Self {
        color.0
    }
}

impl Add<Self> for ColorF {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: Self) -> Self::Output {
        let [r0, g0, b0, a0] = self.0;
        let [r1, g1, b1, a1] = other.0;
        Self([r0 + r1, g0 + g1, b0 + b1, a0 + a1])
    }
}

impl AddAssign<Self> for ColorF {
    #[inline(always)]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other
    }
}

impl Sub<Self> for ColorF {
    type Output = Self;

    #[inline(always)]
    fn sub(self, other: Self) -> Self::Output {
        let [r0, g0, b0, a0] = self.0;
        let [r1, g1, b1, a1] = other.0;
        Self([r0 - r1, g0 - g1, b0 - b1, a0 - a1])
    }
}

impl Mul<f32> for ColorF {
    type Output = Self;

    #[inline(always)]
    fn mul(self, scale: f32) -> Self::Output {
        Self(self.0.map(|c| c * scale))
    }
}

impl FromStr for ColorF {
    type Err = ColorError;

    fn from_str(color: &str) -> Result<Self, Self::Err> {
        Ok(RGBA::from_str(color)?.into())
    }
}

impl fmt::Display for ColorF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&RGBA::from(*self), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    HexExpected,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::HexExpected => {
                write!(f, "Color expected to be #RRGGBB(AA) in hexadecimal format")
            }
        }
    }
}

impl std::error::Error for ColorError {}
