use std::fmt;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Rgb – a colour that travels inside chart specifications
// ---------------------------------------------------------------------------

/// 8-bit sRGB colour. Serialised as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_srgb(rgb: Srgb) -> Self {
        let rgb: Srgb<u8> = rgb.into_format();
        Rgb::new(rgb.red, rgb.green, rgb.blue)
    }

    fn to_linear(self) -> LinSrgb {
        Srgb::new(self.r, self.g, self.b).into_format::<f32>().into_linear()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb::from_srgb(rgb)
        })
        .collect()
}

/// Blend `color` towards white; `amount` 0 keeps it, 1 gives white.
pub fn lighten(color: Rgb, amount: f32) -> Rgb {
    let white = LinSrgb::new(1.0, 1.0, 1.0);
    let mixed = color.to_linear().mix(white, amount.clamp(0.0, 1.0));
    Rgb::from_srgb(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Continuous scale: count → colour
// ---------------------------------------------------------------------------

/// Plasma, sampled at ten evenly spaced stops.
const PLASMA: [Rgb; 10] = [
    Rgb::new(0x0d, 0x08, 0x87),
    Rgb::new(0x46, 0x03, 0x9f),
    Rgb::new(0x72, 0x01, 0xa8),
    Rgb::new(0x9c, 0x17, 0x9e),
    Rgb::new(0xbd, 0x37, 0x86),
    Rgb::new(0xd8, 0x57, 0x6b),
    Rgb::new(0xed, 0x79, 0x53),
    Rgb::new(0xfb, 0x9f, 0x3a),
    Rgb::new(0xfd, 0xca, 0x26),
    Rgb::new(0xf0, 0xf9, 0x21),
];

/// The value domain of a continuous colour encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Domain spanning `values`; `None` when `values` is empty.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(ColorScale { min: v, max: v }),
            Some(s) => Some(ColorScale {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }

    /// Map `value` onto the gradient. A degenerate domain maps to the top stop.
    pub fn color_for(&self, value: f64) -> Rgb {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return sample_gradient(1.0);
        }
        sample_gradient(((value - self.min) / span) as f32)
    }

    /// Evenly spaced colours for drawing a legend strip.
    pub fn legend(&self, steps: usize) -> Vec<Rgb> {
        match steps {
            0 => Vec::new(),
            1 => vec![sample_gradient(1.0)],
            n => (0..n)
                .map(|i| sample_gradient(i as f32 / (n - 1) as f32))
                .collect(),
        }
    }
}

/// Interpolate the Plasma gradient at `t ∈ [0, 1]` in linear RGB.
pub fn sample_gradient(t: f32) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let last = PLASMA.len() - 1;
    let pos = t * last as f32;
    let lo = (pos.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let local = pos - lo as f32;

    let mixed = PLASMA[lo].to_linear().mix(PLASMA[hi].to_linear(), local);
    Rgb::from_srgb(Srgb::from_linear(mixed))
}
