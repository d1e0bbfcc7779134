use crate::color::{Color3f, Color3u8, Color4f, Color4u8, Rgba16f};

/// Row-major `height × width` pixel buffer.
///
/// Row 0 is the first row in memory. For GPU uploads this is the row at
/// texture coordinate `t = 0`; for PNG/EXR files it is the top scanline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageData<P> {
    width: usize,
    height: usize,
    pixels: Vec<P>,
}

pub type ImageData3u8 = ImageData<Color3u8>;
pub type ImageData4u8 = ImageData<Color4u8>;
pub type ImageData3f = ImageData<Color3f>;
pub type ImageData4f = ImageData<Color4f>;
pub type ImageData4h = ImageData<Rgba16f>;

impl<P: Copy + Default> ImageData<P> {
    /// Creates an image filled with `P::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, P::default())
    }
}

impl<P: Copy> ImageData<P> {
    pub fn filled(width: usize, height: usize, value: P) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    /// Copies a `height × width` block starting at (`row`, `col`).
    ///
    /// # Panics
    /// Panics when the block is not inside the image.
    pub fn block(&self, row: usize, col: usize, height: usize, width: usize) -> Self {
        assert!(
            row + height <= self.height && col + width <= self.width,
            "block {height}x{width} at ({row}, {col}) exceeds image {}x{}",
            self.height,
            self.width
        );
        let mut pixels = Vec::with_capacity(width * height);
        for r in row..row + height {
            let start = r * self.width + col;
            pixels.extend_from_slice(&self.pixels[start..start + width]);
        }
        Self { width, height, pixels }
    }

    /// Applies `f` to every pixel, producing a new image of the same size.
    pub fn map<Q>(&self, f: impl FnMut(P) -> Q) -> ImageData<Q> {
        ImageData {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().copied().map(f).collect(),
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<P> {
        (row < self.height && col < self.width).then(|| self.pixels[row * self.width + col])
    }

    /// # Panics
    /// Panics when (`row`, `col`) is outside the image.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: P) {
        assert!(row < self.height && col < self.width, "pixel ({row}, {col}) out of bounds");
        self.pixels[row * self.width + col] = value;
    }
}

impl<P> ImageData<P> {
    /// Wraps an existing row-major buffer. Returns `None` on a size mismatch.
    pub fn from_vec(width: usize, height: usize, pixels: Vec<P>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[P] {
        &self.pixels[row * self.width..(row + 1) * self.width]
    }

    pub fn into_vec(self) -> Vec<P> {
        self.pixels
    }
}

impl<P: bytemuck::Pod> ImageData<P> {
    /// Raw bytes of the pixel buffer, tightly packed.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

// ── whole-image conversions ───────────────────────────────────────────────

impl ImageData4f {
    /// Gamma-encodes and quantizes for display or PNG export.
    pub fn to_srgb_u8(&self) -> ImageData4u8 {
        self.map(|c| c.to_srgb().to_u8())
    }

    pub fn to_rgba16f(&self) -> ImageData4h {
        self.map(Color4f::to_rgba16f)
    }
}

impl ImageData4h {
    pub fn to_color4f(&self) -> ImageData4f {
        self.map(Rgba16f::to_color4f)
    }
}

impl ImageData4u8 {
    /// Inverse of [`ImageData4f::to_srgb_u8`] up to quantization.
    pub fn to_linear_f32(&self) -> ImageData4f {
        self.map(|c| c.to_float().to_linear_rgb())
    }
}
