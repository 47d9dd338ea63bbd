//! RGBA color value type.

use super::core_type::{CoreType, read_f32s, write_f32s};

/// An RGBA color with components in 0..=1, sixteen bytes in the host layout
/// (`r`, `g`, `b`, `a`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    /// The color packed as 0xRRGGBBAA.
    pub fn to_rgba32(&self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 24) | (c(self.g) << 16) | (c(self.b) << 8) | c(self.a)
    }

    pub fn linear_interpolate(&self, to: Color, t: f32) -> Color {
        Color {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::rgba(0.0, 0.0, 0.0, 1.0)
    }
}

impl CoreType for Color {
    const BYTE_LEN: usize = 16;

    fn write_raw(&self, out: &mut [u8]) {
        write_f32s(out, &[self.r, self.g, self.b, self.a]);
    }

    fn read_raw(raw: &[u8]) -> Self {
        let [r, g, b, a] = read_f32s(raw);
        Color { r, g, b, a }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
