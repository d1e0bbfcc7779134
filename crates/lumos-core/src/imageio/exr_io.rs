use std::path::Path;

use anyhow::{ensure, Context, Result};
use exr::prelude::*;
use half::f16;

use crate::color::Rgba16f;
use crate::image::{ImageData4f, ImageData4h, ImageData4u8};

/// Integer pixel rectangle in EXR file coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PixelWindow {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

impl PixelWindow {
    #[inline]
    pub const fn new(x: i32, y: i32, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    fn from_bounds(bounds: IntegerBounds) -> Self {
        Self::new(
            bounds.position.x(),
            bounds.position.y(),
            bounds.size.width(),
            bounds.size.height(),
        )
    }

    fn to_bounds(self) -> IntegerBounds {
        IntegerBounds::new((self.x, self.y), (self.width, self.height))
    }
}

/// Pixels of an EXR data window plus the geometry needed to place them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExrImage {
    /// Half-float pixels of the data window, row 0 at the window's top.
    pub pixels: ImageData4h,
    pub data_window: PixelWindow,
    pub display_window: PixelWindow,
}

impl ExrImage {
    pub fn to_color4f(&self) -> ImageData4f {
        self.pixels.to_color4f()
    }

    /// Gamma-encoded 8-bit pixels, ready for PNG export or a GPU texture.
    pub fn to_srgb_u8(&self) -> ImageData4u8 {
        self.pixels.map(|c| c.to_color4f().to_srgb().to_u8())
    }
}

/// Reads the first RGBA layer of an OpenEXR file.
///
/// Missing alpha reads as `1.0`. Only the data window is stored in
/// [`ExrImage::pixels`].
pub fn read_exr(path: impl AsRef<Path>) -> Result<ExrImage> {
    let path = path.as_ref();
    log::debug!("read exr file: {}", path.display());

    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution: Vec2<usize>, _| ImageData4h::new(resolution.width(), resolution.height()),
            |pixels: &mut ImageData4h, position: Vec2<usize>, (r, g, b, a): (f16, f16, f16, f16)| {
                pixels.set(position.y(), position.x(), Rgba16f::new(r, g, b, a));
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(path)
        .with_context(|| format!("failed to read exr: {}", path.display()))?;

    let layer = image.layer_data;
    let data_window = PixelWindow::from_bounds(IntegerBounds::new(
        layer.attributes.layer_position,
        layer.size,
    ));
    let display_window = PixelWindow::from_bounds(image.attributes.display_window);

    log::debug!(
        "exr data window {:?}, display window {:?}",
        data_window,
        display_window
    );

    Ok(ExrImage {
        pixels: layer.channel_data.pixels,
        data_window,
        display_window,
    })
}

/// Writes a full image; data and display windows both cover the image.
pub fn save_exr(path: impl AsRef<Path>, pic: &ImageData4f) -> Result<()> {
    let window = PixelWindow::new(0, 0, pic.width(), pic.height());
    write_rgba(path.as_ref(), pic, window, window)
}

/// Writes `block` as a crop of a larger image.
///
/// The display window is `display_width × display_height` at the origin; the
/// data window is the block placed at (`row_offset`, `col_offset`).
pub fn save_exr_block(
    path: impl AsRef<Path>,
    display_height: usize,
    display_width: usize,
    row_offset: i32,
    col_offset: i32,
    block: &ImageData4f,
) -> Result<()> {
    let display = PixelWindow::new(0, 0, display_width, display_height);
    let data = PixelWindow::new(col_offset, row_offset, block.width(), block.height());
    write_rgba(path.as_ref(), block, data, display)
}

fn write_rgba(
    path: &Path,
    pic: &ImageData4f,
    data: PixelWindow,
    display: PixelWindow,
) -> Result<()> {
    log::debug!(
        "save exr file: {} (data window {:?}, display window {:?})",
        path.display(),
        data,
        display
    );
    ensure!(
        data.width > 0 && data.height > 0,
        "cannot save an empty exr image: {}",
        path.display()
    );

    let halfs = pic.to_rgba16f();
    let width = halfs.width();
    let channels = SpecificChannels::rgba(|pos: Vec2<usize>| {
        let px = halfs.pixels()[pos.y() * width + pos.x()];
        (px.r, px.g, px.b, px.a)
    });

    let attributes = LayerAttributes {
        layer_position: Vec2(data.x, data.y),
        ..LayerAttributes::default()
    };
    let layer = Layer::new(
        (data.width, data.height),
        attributes,
        Encoding::FAST_LOSSLESS,
        channels,
    );
    let image = Image::new(ImageAttributes::new(display.to_bounds()), layer);

    image
        .write()
        .to_file(path)
        .with_context(|| format!("failed to save exr: {}", path.display()))
}
