//! Serializable gradient tool options
use crate::{ColorError, DitherConfig, Gradient, GradientFill, Palette};
use std::{
    fmt,
    io::{Read, Write},
};

/// Everything needed to configure a [`GradientFill`]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FillSettings {
    pub gradient: Gradient,
    #[serde(default)]
    pub dither: DitherConfig,
    /// Target palette, takes precedence over `levels`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,
    /// Number of levels per channel used when there is no palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<u8>,
}

impl FillSettings {
    pub fn new(gradient: Gradient, dither: DitherConfig) -> Self {
        Self {
            gradient,
            dither,
            palette: None,
            levels: None,
        }
    }

    /// Read settings from JSON document
    pub fn from_json(reader: impl Read) -> Result<Self, SettingsError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write settings as pretty printed JSON document
    pub fn to_json(&self, writer: impl Write) -> Result<(), SettingsError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Replace palette with the one parsed from list of hex colors
    pub fn with_palette_str(self, palette: &str) -> Result<Self, SettingsError> {
        Ok(Self {
            palette: Some(palette.parse()?),
            ..self
        })
    }

    /// Fill operation configured with these settings
    pub fn fill(&self) -> GradientFill<'_> {
        let fill = GradientFill::new(&self.gradient, self.dither);
        match (&self.palette, self.levels) {
            (Some(palette), _) => fill.with_palette(Some(palette)),
            (None, Some(levels)) => fill.with_levels(levels),
            (None, None) => fill,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    /// Malformed JSON document
    Json(serde_json::Error),
    /// IO error propagated while reading or writing
    Io(std::io::Error),
    /// Invalid color in a palette
    Color(ColorError),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Json(error) => write!(f, "invalid settings: {}", error),
            SettingsError::Io(error) => write!(f, "settings io error: {}", error),
            SettingsError::Color(error) => write!(f, "invalid palette: {}", error),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Json(error) => Some(error),
            SettingsError::Io(error) => Some(error),
            SettingsError::Color(error) => Some(error),
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            return Self::Io(error.into());
        }
        Self::Json(error)
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<ColorError> for SettingsError {
    fn from(error: ColorError) -> Self {
        Self::Color(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Diffusion, DitherMethod, GradShape, GradSpread, GradStop, OrderedPattern, Point, Quantizer,
        RGBA,
    };

    const SETTINGS: &str = r##"{
        "gradient": {
            "stops": [
                {"position": 0.0, "color": "#000000"},
                {"position": 1.0, "color": "#ffffff80"}
            ],
            "shape": "radial",
            "reverse": true,
            "start": [8.0, 8.0],
            "end": [16.0, 8.0]
        },
        "dither": {"method": {"error_diffusion": "riemersma"}, "strength": 0.5},
        "palette": ["#000000", "#ffffff"]
    }"##;

    #[test]
    fn test_from_json() -> Result<(), SettingsError> {
        let settings = FillSettings::from_json(SETTINGS.as_bytes())?;
        let gradient = &settings.gradient;
        assert_eq!(gradient.shape, GradShape::Radial);
        assert_eq!(gradient.spread, GradSpread::Pad);
        assert!(gradient.reverse);
        assert_eq!(gradient.start, Point::new(8.0, 8.0));
        assert_eq!(gradient.stops.len(), 2);
        assert_eq!(
            gradient.stops.iter().nth(1),
            Some(&GradStop::new(1.0, RGBA::new(255, 255, 255, 128)))
        );
        assert_eq!(
            settings.dither.method,
            DitherMethod::ErrorDiffusion(Diffusion::Riemersma)
        );
        assert_eq!(settings.dither.strength, 0.5);
        assert_eq!(settings.dither.scale, 1.0);
        assert!(settings.dither.serpentine);
        assert_eq!(
            settings.palette.as_ref().map(|p| p.colors().to_vec()),
            Some(vec![RGBA::BLACK, RGBA::WHITE])
        );
        assert_eq!(settings.levels, None);
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Result<(), SettingsError> {
        let gradient = Gradient::new(
            vec![
                GradStop::new(0.0, "#102030".parse()?),
                GradStop::new(0.25, "#405060".parse()?),
                GradStop::new(1.0, "#708090a0".parse()?),
            ],
            GradShape::Diamond,
            (0.0, 0.0),
            (3.0, 4.0),
        )
        .with_spread(GradSpread::Reflect);
        let mut settings = FillSettings::new(
            gradient,
            DitherConfig::new(DitherMethod::Ordered(OrderedPattern::BlueNoise)).with_scale(2.0),
        );
        settings.levels = Some(4);
        let mut json = Vec::new();
        settings.to_json(&mut json)?;
        let restored = FillSettings::from_json(json.as_slice())?;
        assert_eq!(settings, restored);
        Ok(())
    }

    #[test]
    fn test_errors() {
        let error = FillSettings::from_json("{\"gradient\": 1}".as_bytes());
        assert!(matches!(error, Err(SettingsError::Json(_))));

        let settings = FillSettings::from_json(SETTINGS.as_bytes()).unwrap();
        let error = settings.clone().with_palette_str("#000000 #zzzzzz");
        assert!(matches!(error, Err(SettingsError::Color(_))));
        let settings = settings.with_palette_str("#ff0000, #00ff00, #0000ff").unwrap();
        assert_eq!(settings.palette.map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_fill_quantizer() -> Result<(), SettingsError> {
        let mut settings = FillSettings::from_json(SETTINGS.as_bytes())?;
        settings.levels = Some(3);
        let palette = settings.palette.clone().unwrap_or_default();
        assert_eq!(settings.fill().quantizer(), Quantizer::Palette(&palette));
        settings.palette = None;
        assert_eq!(settings.fill().quantizer(), Quantizer::Levels(3));
        settings.levels = None;
        assert_eq!(settings.fill().quantizer(), Quantizer::PassThrough);
        assert_eq!(settings.fill().dither(), &settings.dither);
        Ok(())
    }
}
