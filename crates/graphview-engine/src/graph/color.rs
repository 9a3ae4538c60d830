/// Straight RGB color with channels normalized to `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Parses `#rgb` or `#rrggbb`. Returns `None` for anything else.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in digits.bytes().enumerate() {
                    let v = hex_value(ch)?;
                    c[i] = v << 4 | v;
                }
                Some(Self::from_u8(c[0], c[1], c[2]))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::from_u8(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// Parses a hex color, degrading malformed input to black.
    ///
    /// A bad color is a visual glitch, not a reason to drop the graph.
    pub fn from_hex_or_black(hex: &str) -> Self {
        Self::parse_hex(hex).unwrap_or_else(|| {
            log::warn!("malformed color {hex:?}; using black");
            Self::BLACK
        })
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

fn hex_value(ch: u8) -> Option<u8> {
    (ch as char).to_digit(16).map(|v| v as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form() {
        assert_eq!(Rgb::parse_hex("#ff0000"), Some(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(Rgb::parse_hex("#00FF00"), Some(Rgb::new(0.0, 1.0, 0.0)));
        let c = Rgb::parse_hex("#336699").unwrap();
        assert!((c.r - 0.2).abs() < 1e-6);
        assert!((c.g - 0.4).abs() < 1e-6);
        assert!((c.b - 0.6).abs() < 1e-6);
    }

    #[test]
    fn short_form_expands_digits() {
        assert_eq!(Rgb::parse_hex("#fff"), Some(Rgb::new(1.0, 1.0, 1.0)));
        assert_eq!(Rgb::parse_hex("#f00"), Rgb::parse_hex("#ff0000"));
        assert_eq!(Rgb::parse_hex("#bad"), Rgb::parse_hex("#bbaadd"));
    }

    #[test]
    fn malformed_is_none() {
        for s in ["", "#", "ff0000", "#ff00", "#ff00000", "#ggg", "#12345z", "#+1+", "red", "#ÿÿÿ"] {
            assert_eq!(Rgb::parse_hex(s), None, "{s:?}");
        }
    }

    #[test]
    fn malformed_degrades_to_black() {
        assert_eq!(Rgb::from_hex_or_black("#xyz"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex_or_black("not a color"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex_or_black("#0000ff"), Rgb::new(0.0, 0.0, 1.0));
    }
}
