use serde::Deserialize;

/// An sRGB color with alpha. Built from `0xRRGGBB` integers the same way
/// fill colors are usually written in game code.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "u32")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn to_hex(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Linear-space RGBA, as expected by an sRGB render target.
    pub fn to_linear(&self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a,
        ]
    }

    /// Gamma-encoded RGBA in `0.0..=1.0`, for targets that store sRGB values as is.
    pub fn to_srgb(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }

    pub fn to_rgba(&self, linear: bool) -> [f32; 4] {
        if linear {
            self.to_linear()
        } else {
            self.to_srgb()
        }
    }

    pub fn to_wgpu(&self, linear: bool) -> wgpu::Color {
        let [r, g, b, a] = self.to_rgba(linear);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Color::from_hex(hex)
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_channels() {
        let color = Color::from_hex(0x3366cc);
        assert_eq!((color.r, color.g, color.b), (0x33, 0x66, 0xcc));
        assert_eq!(color.to_hex(), 0x3366cc);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0, 1.0]);
        let white = Color::WHITE.to_linear();
        for channel in &white[..3] {
            assert!((channel - 1.0).abs() < 1e-6);
        }
        // mid grey is darker in linear space
        assert!(Color::rgb(128, 128, 128).to_linear()[0] < 0.25);
    }

    #[test]
    fn clear_color_follows_target_encoding() {
        let grey = Color::rgb(51, 51, 51);
        assert!((grey.to_wgpu(false).r - 0.2).abs() < 1e-6);
        assert!(grey.to_wgpu(true).r < 0.05);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Color::WHITE.with_alpha(2.0).a, 1.0);
        assert_eq!(Color::WHITE.with_alpha(-1.0).a, 0.0);
    }
}
