use lumos_core::{ImageData4u8, Vector2i};

use crate::binding::Bound;
use crate::error::{check_gl_errors, GlResult};
use crate::handle::{FrameBufferHandle, FrameBufferTraits, RenderBufferHandle};
use crate::texture::RgbaTexture;

use super::{attach_depth, bind_for_drawing, check_complete, DepthFormat};

/// Framebuffer with an RGBA8 color texture and an optional depth buffer.
///
/// `Default` is the empty, destroyed state; `std::mem::take` moves every
/// attachment out and leaves that state behind.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    handle: FrameBufferHandle,
    color: RgbaTexture,
    depth: RenderBufferHandle,
    width: i32,
    height: i32,
    depth_format: DepthFormat,
}

impl FrameBuffer {
    pub fn new(width: i32, height: i32, depth_format: DepthFormat) -> GlResult<Self> {
        let handle = FrameBufferHandle::generate()?;
        let color = RgbaTexture::new(width, height)?;
        let depth = {
            let _bound = handle.bind();
            // SAFETY: framebuffer bound; the color texture is a live 2D texture.
            unsafe {
                gl::FramebufferTexture2D(
                    gl::FRAMEBUFFER,
                    gl::COLOR_ATTACHMENT0,
                    gl::TEXTURE_2D,
                    color.handle().raw(),
                    0,
                );
            }
            let depth = attach_depth(depth_format, width, height, None)?;
            check_complete()?;
            check_gl_errors()?;
            depth
        };

        log::debug!(
            "framebuffer [{:03}] created {}x{} (color [{:03}], depth 0x{:04X})",
            handle.raw(),
            width,
            height,
            color.handle().raw(),
            depth_format.raw()
        );
        Ok(Self {
            handle,
            color,
            depth,
            width,
            height,
            depth_format,
        })
    }

    /// Destroys every attachment and recreates them at the new size.
    ///
    /// On failure the framebuffer is left destroyed.
    pub fn resize(&mut self, width: i32, height: i32) -> GlResult<()> {
        let depth_format = self.depth_format;
        self.destroy();
        *self = Self::new(width, height, depth_format)?;
        Ok(())
    }

    /// Binds as the draw target and sets the viewport to the full size.
    pub fn bind(&self) -> Bound<'_, FrameBufferTraits> {
        bind_for_drawing(&self.handle, self.width, self.height)
    }

    /// Uploads `image` into the color texture at `offset`.
    pub fn update_color(&mut self, image: &ImageData4u8, offset: Vector2i) -> GlResult<()> {
        self.color.update(image, offset)
    }

    /// Reads the color attachment; row 0 is the bottom row.
    pub fn read_pixels(&self) -> GlResult<ImageData4u8> {
        let mut image = ImageData4u8::new(self.width.max(0) as usize, self.height.max(0) as usize);
        if image.is_empty() {
            return Ok(image);
        }

        let _bound = self.handle.bind_to(gl::READ_FRAMEBUFFER);
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(image.pixels_mut());
        // SAFETY: `bytes` holds width * height RGBA8 pixels; RGBA8 rows are
        // 4-byte aligned so the default pack alignment matches.
        unsafe {
            gl::ReadBuffer(gl::COLOR_ATTACHMENT0);
            gl::ReadPixels(
                0,
                0,
                self.width,
                self.height,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                bytes.as_mut_ptr().cast(),
            );
        }
        check_gl_errors()?;
        Ok(image)
    }

    /// Releases all attachments and zeroes the size.
    pub fn destroy(&mut self) {
        self.handle.destroy();
        self.color.destroy();
        self.depth.destroy();
        self.width = 0;
        self.height = 0;
        self.depth_format = DepthFormat::NONE;
    }

    #[inline]
    pub fn handle(&self) -> &FrameBufferHandle {
        &self.handle
    }

    #[inline]
    pub fn color_texture(&self) -> &RgbaTexture {
        &self.color
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn depth_format(&self) -> DepthFormat {
        self.depth_format
    }
}
