/// Straight-alpha RGBA color with `f32` components in `[0, 1]`.
///
/// Used as the clear value of render passes; no blending is performed with it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.4, 0.7, 0.0), Color::rgba(0.4, 0.7, 0.0, 1.0));
    }

    #[test]
    fn converts_to_wgpu_clear_value() {
        let c: wgpu::Color = Color::CYAN.into();
        assert_eq!((c.r, c.g, c.b, c.a), (0.0, 1.0, 1.0, 1.0));
    }
}
