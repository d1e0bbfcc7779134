use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::color::Color4u8;
use crate::image::ImageData4u8;

/// Reads a PNG file as RGBA8.
///
/// Palette, grayscale and RGB inputs are expanded; 16-bit channels are
/// truncated to 8 bits. Missing alpha reads as opaque.
pub fn read_png(path: impl AsRef<Path>) -> Result<ImageData4u8> {
    let path = path.as_ref();
    log::debug!("read png file: {}", path.display());

    let file = File::open(path).with_context(|| format!("failed to open png: {}", path.display()))?;

    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .with_context(|| format!("failed to read png header: {}", path.display()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("failed to read png: {}", path.display()))?;
    let bytes = &buf[..info.buffer_size()];

    let pixels: Vec<Color4u8> = match info.color_type {
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|p| Color4u8::new(p[0], p[1], p[2], p[3]))
            .collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|p| Color4u8::opaque(p[0], p[1], p[2]))
            .collect(),
        png::ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .map(|p| Color4u8::new(p[0], p[0], p[0], p[1]))
            .collect(),
        png::ColorType::Grayscale => bytes.iter().map(|&v| Color4u8::opaque(v, v, v)).collect(),
        png::ColorType::Indexed => {
            bail!("palette png was not expanded: {}", path.display())
        }
    };

    ImageData4u8::from_vec(info.width as usize, info.height as usize, pixels)
        .with_context(|| format!("png pixel data does not match its size: {}", path.display()))
}

/// Writes an RGBA8 image as PNG.
pub fn save_png(path: impl AsRef<Path>, pic: &ImageData4u8) -> Result<()> {
    let path = path.as_ref();
    log::debug!("save png file: {} ({}x{})", path.display(), pic.width(), pic.height());

    let width = u32::try_from(pic.width()).context("png width exceeds u32")?;
    let height = u32::try_from(pic.height()).context("png height exceeds u32")?;

    let file =
        File::create(path).with_context(|| format!("failed to create png: {}", path.display()))?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("failed to save png: {}", path.display()))?;
    writer
        .write_image_data(pic.as_bytes())
        .with_context(|| format!("failed to save png: {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("failed to save png: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.png");

        let mut pic = ImageData4u8::new(5, 3);
        for row in 0..3 {
            for col in 0..5 {
                pic.set(row, col, Color4u8::new((col * 50) as u8, (row * 100) as u8, 7, 200));
            }
        }

        save_png(&path, &pic).unwrap();
        assert_eq!(read_png(&path).unwrap(), pic);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_png("/definitely/not/here.png").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.png"));
    }

    #[test]
    fn non_ascii_path_is_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("图像.png");
        let pic = ImageData4u8::filled(2, 2, Color4u8::opaque(1, 2, 3));
        save_png(&path, &pic).unwrap();
        assert_eq!(read_png(&path).unwrap(), pic);
    }
}
