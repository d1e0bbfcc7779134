use std::marker::PhantomData;
use std::ptr;

use gl::types::{GLenum, GLint, GLsizei};
use lumos_core::{ImageData4u8, Vector2i};

use crate::binding::{current_binding, Bindable};
use crate::error::{check_gl_errors, GlError, GlResult};
use crate::handle::{RawHandle, TextureHandle, TextureTraits};

/// RGBA8 2D texture with nearest filtering and repeat wrapping.
///
/// `width`/`height` always describe the live allocation; both are zero once
/// the texture is destroyed.
#[derive(Debug, Default)]
pub struct RgbaTexture {
    handle: TextureHandle,
    width: i32,
    height: i32,
}

impl RgbaTexture {
    pub fn new(width: i32, height: i32) -> GlResult<Self> {
        let handle = allocate(width, height)?;
        log::debug!("texture [{:03}] allocated {}x{}", handle.raw(), width, height);
        Ok(Self {
            handle,
            width,
            height,
        })
    }

    /// Reallocates storage for a new size. Contents are undefined afterwards.
    ///
    /// Keeps the current object when the size is unchanged.
    pub fn resize(&mut self, width: i32, height: i32) -> GlResult<()> {
        if self.handle.is_valid() && width == self.width && height == self.height {
            return Ok(());
        }
        self.destroy();
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Uploads `image` with its row 0 at texel row `offset.y()`.
    pub fn update(&mut self, image: &ImageData4u8, offset: Vector2i) -> GlResult<()> {
        let (x, y) = (offset.x(), offset.y());
        let fits = x >= 0
            && y >= 0
            && x as i64 + image.width() as i64 <= self.width as i64
            && y as i64 + image.height() as i64 <= self.height as i64;
        if !fits {
            return Err(GlError::RegionOutOfBounds {
                x,
                y,
                width: image.width(),
                height: image.height(),
                texture_width: self.width,
                texture_height: self.height,
            });
        }
        if image.is_empty() {
            return Ok(());
        }

        let _bound = self.handle.bind();
        // SAFETY: the region was checked against the allocation and the
        // buffer holds exactly width * height tightly packed RGBA8 texels.
        unsafe {
            gl::TexSubImage2D(
                gl::TEXTURE_2D,
                0,
                x,
                y,
                image.width() as GLsizei,
                image.height() as GLsizei,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                image.as_bytes().as_ptr().cast(),
            );
        }
        check_gl_errors()
    }

    /// Reads level 0 back into host memory.
    pub fn read_pixels(&self) -> GlResult<ImageData4u8> {
        let mut image = ImageData4u8::new(self.width.max(0) as usize, self.height.max(0) as usize);
        if image.is_empty() {
            return Ok(image);
        }

        let _bound = self.handle.bind();
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(image.pixels_mut());
        // SAFETY: `bytes` is exactly width * height * 4 bytes.
        unsafe {
            gl::GetTexImage(
                gl::TEXTURE_2D,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                bytes.as_mut_ptr().cast(),
            );
        }
        check_gl_errors()?;
        Ok(image)
    }

    /// Binds for sampling on texture unit `unit`.
    ///
    /// The active unit is left at `unit` while the guard lives. On drop the
    /// unit gets its previous texture back and the previously active unit is
    /// reselected.
    pub fn bind_unit(&self, unit: u32) -> UnitBound<'_> {
        let previous_unit = current_binding(gl::ACTIVE_TEXTURE) as GLenum;
        // SAFETY: unit bounds are validated by the driver.
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) };
        let previous = TextureTraits::save(gl::TEXTURE_2D);
        TextureTraits::bind(gl::TEXTURE_2D, self.handle.raw());
        UnitBound {
            unit,
            previous,
            previous_unit,
            _texture: PhantomData,
        }
    }

    pub fn destroy(&mut self) {
        self.handle.destroy();
        self.width = 0;
        self.height = 0;
    }

    #[inline]
    pub fn handle(&self) -> &TextureHandle {
        &self.handle
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }
}

/// Texture bound on one sampling unit; see [`RgbaTexture::bind_unit`].
#[must_use = "the unit is restored as soon as the guard is dropped"]
pub struct UnitBound<'a> {
    unit: u32,
    previous: RawHandle,
    previous_unit: GLenum,
    _texture: PhantomData<&'a RgbaTexture>,
}

impl UnitBound<'_> {
    #[inline]
    pub fn unit(&self) -> u32 {
        self.unit
    }
}

impl Drop for UnitBound<'_> {
    fn drop(&mut self) {
        // SAFETY: both units were accepted when the guard was created.
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + self.unit) };
        TextureTraits::restore(gl::TEXTURE_2D, self.previous);
        unsafe { gl::ActiveTexture(self.previous_unit) };
    }
}

fn allocate(width: i32, height: i32) -> GlResult<TextureHandle> {
    let handle = TextureHandle::generate()?;
    {
        let _bound = handle.bind();
        // SAFETY: texture bound on TEXTURE_2D; null data only reserves storage.
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as GLint,
                width,
                height,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                ptr::null(),
            );
        }
        check_gl_errors()?;
    }
    Ok(handle)
}
