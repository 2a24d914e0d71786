//! Color parsing for surfaces that need numeric channels.
//!
//! The layout engine and the SVG emitter pass color strings through untouched;
//! only raster/PDF surfaces interpret them.

/// An opaque RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        if hex.len() == 6 {
            Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ))
        } else if hex.len() == 3 {
            Some(Self::rgb(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            ))
        } else {
            None
        }
    }

    /// Hex notation or one of the basic CSS color keywords.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        let hex = match s.to_ascii_lowercase().as_str() {
            "black" => "#000000",
            "white" => "#ffffff",
            "gray" | "grey" => "#808080",
            "silver" => "#c0c0c0",
            "red" => "#ff0000",
            "maroon" => "#800000",
            "orange" => "#ffa500",
            "yellow" => "#ffff00",
            "gold" => "#ffd700",
            "olive" => "#808000",
            "lime" => "#00ff00",
            "green" => "#008000",
            "lightgreen" => "#90ee90",
            "teal" => "#008080",
            "aqua" | "cyan" => "#00ffff",
            "blue" => "#0000ff",
            "lightblue" => "#add8e6",
            "navy" => "#000080",
            "purple" => "#800080",
            "fuchsia" | "magenta" => "#ff00ff",
            "pink" => "#ffc0cb",
            "lightpink" => "#ffb6c1",
            _ => return None,
        };
        Self::from_hex(hex)
    }

    /// Like [`parse`](Self::parse) but falls back to black with a warning.
    pub fn parse_or_black(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            log::warn!("Unrecognised color {s:?}, drawing in black");
            Self::BLACK
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
    }

    #[test]
    fn keywords_and_garbage() {
        assert_eq!(Color::parse("Gold"), Color::from_hex("#FFD700"));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#ééé"), None);
        assert_eq!(Color::parse_or_black("not-a-color"), Color::BLACK);
    }
}
