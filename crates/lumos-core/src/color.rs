//! Color types and pixel-format conversion.
//!
//! Float colors (`Color3f`/`Color4f`) hold normalized channels, byte colors
//! (`Color3u8`/`Color4u8`) hold 0–255 channels, and `Rgba16f` is the
//! half-float interchange format used at the OpenEXR boundary.
//!
//! Every conversion here is pure and total: out-of-range float inputs are
//! clamped before quantization, alpha is never gamma-encoded.

use bytemuck::{Pod, Zeroable};
use half::f16;

// Smallest positive normal half; keeps pow() away from zero/denormals.
const MIN_CHANNEL: f32 = 6.10352e-5;

// ── channel formulas ──────────────────────────────────────────────────────

/// Encodes one linear channel with the sRGB transfer curve.
#[inline]
pub fn linear_to_srgb(value: f32) -> f32 {
    let v = value.max(MIN_CHANNEL);
    (v * 12.92).min(v.max(0.003_130_67).powf(1.0 / 2.4) * 1.055 - 0.055)
}

/// Decodes one sRGB-encoded channel to linear.
#[inline]
pub fn srgb_to_linear(value: f32) -> f32 {
    let v = value.max(MIN_CHANNEL);
    if v > 0.040_45 {
        (v * (1.0 / 1.055) + 0.052_132_7).powf(2.4)
    } else {
        v * (1.0 / 12.92)
    }
}

/// Quantizes a normalized channel to a byte, clamping to `[0, 1]` first.
///
/// Rounds to nearest so that `unorm_to_u8(u8_to_unorm(x)) == x` for every byte.
#[inline]
pub fn unorm_to_u8(value: f32) -> u8 {
    // NaN clamps to 0 through the max() below.
    (value.max(0.0).min(1.0) * 255.0).round() as u8
}

#[inline]
pub fn u8_to_unorm(value: u8) -> f32 {
    value as f32 / 255.0
}

// ── float colors ──────────────────────────────────────────────────────────

/// RGB color with float channels.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Color3f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// RGBA color with float channels (straight alpha).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Color4f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color3f {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn to_srgb(self) -> Self {
        Self::new(linear_to_srgb(self.r), linear_to_srgb(self.g), linear_to_srgb(self.b))
    }

    #[inline]
    pub fn to_linear_rgb(self) -> Self {
        Self::new(srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b))
    }

    #[inline]
    pub fn to_u8(self) -> Color3u8 {
        Color3u8::new(unorm_to_u8(self.r), unorm_to_u8(self.g), unorm_to_u8(self.b))
    }

    /// Adds an opaque alpha channel.
    #[inline]
    pub const fn to_color4(self) -> Color4f {
        Color4f::new(self.r, self.g, self.b, 1.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl Color4f {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// sRGB-encodes the color channels; alpha is passed through.
    #[inline]
    pub fn to_srgb(self) -> Self {
        Self::new(
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
            self.a,
        )
    }

    /// Decodes sRGB color channels to linear; alpha is passed through.
    #[inline]
    pub fn to_linear_rgb(self) -> Self {
        Self::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a,
        )
    }

    #[inline]
    pub fn to_u8(self) -> Color4u8 {
        Color4u8::new(
            unorm_to_u8(self.r),
            unorm_to_u8(self.g),
            unorm_to_u8(self.b),
            unorm_to_u8(self.a),
        )
    }

    /// Drops the alpha channel.
    #[inline]
    pub const fn to_color3(self) -> Color3f {
        Color3f::new(self.r, self.g, self.b)
    }

    #[inline]
    pub fn to_rgba16f(self) -> Rgba16f {
        Rgba16f {
            r: f16::from_f32(self.r),
            g: f16::from_f32(self.g),
            b: f16::from_f32(self.b),
            a: f16::from_f32(self.a),
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }
}

// ── byte colors ───────────────────────────────────────────────────────────

/// RGB color with 0–255 channels.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color3u8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// RGBA color with 0–255 channels. Layout matches `GL_RGBA`/`GL_UNSIGNED_BYTE`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color4u8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color3u8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_float(self) -> Color3f {
        Color3f::new(u8_to_unorm(self.r), u8_to_unorm(self.g), u8_to_unorm(self.b))
    }

    #[inline]
    pub const fn to_color4(self) -> Color4u8 {
        Color4u8::new(self.r, self.g, self.b, 255)
    }
}

impl Color4u8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub fn to_float(self) -> Color4f {
        Color4f::new(
            u8_to_unorm(self.r),
            u8_to_unorm(self.g),
            u8_to_unorm(self.b),
            u8_to_unorm(self.a),
        )
    }

    #[inline]
    pub const fn to_color3(self) -> Color3u8 {
        Color3u8::new(self.r, self.g, self.b)
    }
}

// ── half-float interchange ────────────────────────────────────────────────

/// Half-float RGBA pixel as stored in OpenEXR files.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Rgba16f {
    pub r: f16,
    pub g: f16,
    pub b: f16,
    pub a: f16,
}

impl Rgba16f {
    #[inline]
    pub const fn new(r: f16, g: f16, b: f16, a: f16) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_color4f(self) -> Color4f {
        Color4f::new(self.r.to_f32(), self.g.to_f32(), self.b.to_f32(), self.a.to_f32())
    }
}

impl From<Color4f> for Rgba16f {
    #[inline]
    fn from(c: Color4f) -> Self {
        c.to_rgba16f()
    }
}

impl From<Rgba16f> for Color4f {
    #[inline]
    fn from(c: Rgba16f) -> Self {
        c.to_color4f()
    }
}
