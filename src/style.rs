use crate::error::ConvertError;

use std::fmt;

use log::{debug, warn};

pub const FALLBACK_FONT: &str = "Helvetica";

/// Color with channels normalised to `0.0..=1.0` and an opaque alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Parse `#RRGGBB`; the `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, ConvertError> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConvertError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| ConvertError::InvalidColor(hex.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// Timeline-XML form: `r g b 1`, each channel to four decimals.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.4} {:.4} {:.4} 1", self.r, self.g, self.b)
    }
}

/// Something that knows which font families are installed.
pub trait FontRegistry {
    fn has_family(&self, family: &str) -> bool;
}

/// Fonts installed on this machine.
pub struct SystemFonts {
    db: fontdb::Database,
}

impl SystemFonts {
    pub fn load() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!("Loaded {} system font faces", db.len());
        Self { db }
    }
}

impl FontRegistry for SystemFonts {
    fn has_family(&self, family: &str) -> bool {
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family)],
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        self.db.query(&query).is_some()
    }
}

/// The requested font if installed, otherwise [`FALLBACK_FONT`].
pub fn resolve_font(registry: &dyn FontRegistry, requested: &str) -> String {
    let requested = requested.trim();
    if !requested.is_empty() && registry.has_family(requested) {
        requested.to_string()
    } else {
        warn!("Font '{}' is not available, using {}", requested, FALLBACK_FONT);
        FALLBACK_FONT.to_string()
    }
}

/// Presentation settings for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub file_name: String,
    pub font_name: String,
    pub font_size: u32,
    pub font_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f64,
    /// Vertical offset of the title, in the editor's Position units.
    pub position: f64,
}

impl RenderParams {
    /// Size of the secondary line in bilingual titles: half, rounding up.
    pub fn secondary_font_size(&self) -> u32 {
        self.font_size / 2 + self.font_size % 2
    }
}

/// Output file name for a source base name: `<base>_SUB.fcpxml` or
/// `<base>_DUAL.fcpxml`.
pub fn output_file_name(base: &str, bilingual: bool) -> String {
    let suffix = if bilingual { "_DUAL" } else { "_SUB" };
    format!("{}{}.fcpxml", base, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Installed(&'static [&'static str]);

    impl FontRegistry for Installed {
        fn has_family(&self, family: &str) -> bool {
            self.0.iter().any(|f| *f == family)
        }
    }

    macro_rules! test_color {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let color = Color::from_hex(input).unwrap();

                assert_eq!(color.to_string(), expected);
            }
        )*
        }
    }

    test_color! {
        test_color_white: ("#FFFFFF", "1.0000 1.0000 1.0000 1"),
        test_color_black: ("#000000", "0.0000 0.0000 0.0000 1"),
        test_color_mixed: ("#ff8000", "1.0000 0.5020 0.0000 1"),
        test_color_no_hash: ("3b82f6", "0.2314 0.5098 0.9647 1"),
    }

    #[test]
    fn bad_colors_are_rejected() {
        for input in &["", "#FFF", "#GG0000", "#12345678", "red"] {
            match Color::from_hex(input) {
                Err(ConvertError::InvalidColor(v)) => assert_eq!(v, *input),
                other => panic!("{} gave {:?}", input, other),
            }
        }
    }

    #[test]
    fn installed_font_is_kept() {
        let fonts = Installed(&["PingFang SC", "Helvetica"]);
        assert_eq!(resolve_font(&fonts, "PingFang SC"), "PingFang SC");
    }

    #[test]
    fn missing_font_falls_back() {
        let fonts = Installed(&["Helvetica"]);
        assert_eq!(resolve_font(&fonts, "No Such Font"), "Helvetica");
        assert_eq!(resolve_font(&fonts, ""), "Helvetica");
    }

    #[test]
    fn secondary_size_rounds_half_up() {
        let mut params = RenderParams {
            file_name: "x".to_string(),
            font_name: "Helvetica".to_string(),
            font_size: 45,
            font_color: Color { r: 1.0, g: 1.0, b: 1.0 },
            stroke_color: Color { r: 0.0, g: 0.0, b: 0.0 },
            stroke_width: 2.0,
            position: -450.0,
        };
        assert_eq!(params.secondary_font_size(), 23);
        params.font_size = 50;
        assert_eq!(params.secondary_font_size(), 25);
        params.font_size = u32::MAX;
        assert_eq!(params.secondary_font_size(), 2_147_483_648);
    }

    #[test]
    fn output_names() {
        assert_eq!(output_file_name("movie", false), "movie_SUB.fcpxml");
        assert_eq!(output_file_name("movie", true), "movie_DUAL.fcpxml");
    }
}
