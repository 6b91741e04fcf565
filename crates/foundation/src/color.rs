use serde::{Deserialize, Serialize};

/// sRGB colour with `f64` channels in `0.0..=255.0`.
///
/// Channels stay fractional while easing so repeated small steps do not stall
/// on integer rounding; rounding happens only when formatting for CSS.
/// Serialises as a `#rrggbb` string.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 255.0, g: 255.0, b: 255.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);
        match hex.len() {
            6 => Some(Rgb {
                r: channel(hex.get(0..2)?)?,
                g: channel(hex.get(2..4)?)?,
                b: channel(hex.get(4..6)?)?,
            }),
            3 => {
                // Short form: each nibble is doubled (`#abc` == `#aabbcc`).
                let nib = |i: usize| channel(hex.get(i..i + 1)?).map(|v| v * 17.0);
                Some(Rgb {
                    r: nib(0)?,
                    g: nib(1)?,
                    b: nib(2)?,
                })
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CSS `rgb()` functional notation with rounded channels.
    pub fn to_css(&self) -> String {
        let [r, g, b] = self.to_u8();
        format!("rgb({r}, {g}, {b})")
    }

    pub fn to_u8(&self) -> [u8; 3] {
        let q = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Linear interpolation; `t` is not clamped.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn scale(self, k: f64) -> Rgb {
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }

    /// Largest per-channel absolute difference.
    pub fn max_channel_delta(&self, other: &Rgb) -> f64 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

impl std::ops::Add for Rgb {
    type Output = Rgb;

    fn add(self, other: Rgb) -> Rgb {
        Rgb::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s).ok_or_else(|| format!("invalid hex colour: {s:?}"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> String {
        c.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::Rgb;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb::new(255.0, 128.0, 0.0)));
        assert_eq!(Rgb::from_hex("fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("#12"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn lerp_moves_toward_target() {
        let c = Rgb::BLACK.lerp(Rgb::new(100.0, 200.0, 0.0), 0.5);
        assert_eq!(c, Rgb::new(50.0, 100.0, 0.0));
    }

    #[test]
    fn css_rounds_and_clamps() {
        assert_eq!(Rgb::new(12.4, 12.6, 300.0).to_css(), "rgb(12, 13, 255)");
        assert_eq!(Rgb::new(255.0, 0.0, 16.0).to_hex(), "#ff0010");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c: Rgb = serde_json::from_str("\"#0a0b0c\"").unwrap();
        assert_eq!(c, Rgb::new(10.0, 11.0, 12.0));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#0a0b0c\"");
    }
}
