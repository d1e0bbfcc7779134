use gl::types::{GLint, GLsizei};

use crate::binding::Bound;
use crate::error::{check_gl_errors, GlResult};
use crate::handle::{FrameBufferHandle, FrameBufferTraits, RenderBufferHandle, TextureHandle};

use super::{attach_depth, bind_for_drawing, check_complete, DepthFormat, FrameBuffer};

/// Multisampled framebuffer. Draw into it, then [`resolve_into`] a
/// single-sample [`FrameBuffer`] to read or sample the result.
///
/// [`resolve_into`]: MsaaFrameBuffer::resolve_into
#[derive(Debug, Default)]
pub struct MsaaFrameBuffer {
    handle: FrameBufferHandle,
    color: TextureHandle,
    depth: RenderBufferHandle,
    width: i32,
    height: i32,
    depth_format: DepthFormat,
    samples: i32,
    max_samples: i32,
}

impl MsaaFrameBuffer {
    /// `samples` is clamped to `[1, max_samples()]`.
    pub fn new(width: i32, height: i32, depth_format: DepthFormat, samples: i32) -> GlResult<Self> {
        let max_samples = query_max_samples()?;
        let samples = clamp_samples(samples, max_samples);
        log::debug!("msaa samples {samples} (max {max_samples})");

        let (handle, color, depth) = create(width, height, depth_format, samples)?;
        Ok(Self {
            handle,
            color,
            depth,
            width,
            height,
            depth_format,
            samples,
            max_samples,
        })
    }

    /// Destroys every attachment and recreates them at the new size.
    pub fn resize(&mut self, width: i32, height: i32) -> GlResult<()> {
        self.release();
        let (handle, color, depth) = create(width, height, self.depth_format, self.samples)?;
        self.install(handle, color, depth, width, height);
        Ok(())
    }

    /// Changes the sample count, clamped to `[1, max_samples()]`. Does nothing
    /// when the clamped count equals the current one.
    pub fn set_samples(&mut self, samples: i32) -> GlResult<()> {
        let samples = clamp_samples(samples, self.max_samples);
        log::debug!("set msaa samples {} (previous {})", samples, self.samples);
        if samples == self.samples {
            return Ok(());
        }

        let (width, height) = (self.width, self.height);
        self.samples = samples;
        self.release();
        let (handle, color, depth) = create(width, height, self.depth_format, samples)?;
        self.install(handle, color, depth, width, height);
        Ok(())
    }

    /// Binds as the draw target and sets the viewport to the full size.
    pub fn bind(&self) -> Bound<'_, FrameBufferTraits> {
        bind_for_drawing(&self.handle, self.width, self.height)
    }

    /// Resolves the color samples into `target` with nearest filtering.
    pub fn resolve_into(&self, target: &FrameBuffer) -> GlResult<()> {
        let _read = self.handle.bind_to(gl::READ_FRAMEBUFFER);
        let _draw = target.handle().bind_to(gl::DRAW_FRAMEBUFFER);
        // SAFETY: both framebuffers are complete and bound.
        unsafe {
            gl::BlitFramebuffer(
                0,
                0,
                self.width,
                self.height,
                0,
                0,
                target.width(),
                target.height(),
                gl::COLOR_BUFFER_BIT,
                gl::NEAREST,
            );
        }
        check_gl_errors()
    }

    /// Releases all attachments and zeroes the size and sample counts.
    pub fn destroy(&mut self) {
        self.release();
        self.depth_format = DepthFormat::NONE;
        self.samples = 0;
        self.max_samples = 0;
    }

    #[inline]
    pub fn handle(&self) -> &FrameBufferHandle {
        &self.handle
    }

    /// Multisample color texture (`GL_TEXTURE_2D_MULTISAMPLE`).
    #[inline]
    pub fn color_texture(&self) -> &TextureHandle {
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

    #[inline]
    pub fn samples(&self) -> i32 {
        self.samples
    }

    #[inline]
    pub fn max_samples(&self) -> i32 {
        self.max_samples
    }

    fn release(&mut self) {
        self.handle.destroy();
        self.color.destroy();
        self.depth.destroy();
        self.width = 0;
        self.height = 0;
    }

    fn install(
        &mut self,
        handle: FrameBufferHandle,
        color: TextureHandle,
        depth: RenderBufferHandle,
        width: i32,
        height: i32,
    ) {
        self.handle = handle;
        self.color = color;
        self.depth = depth;
        self.width = width;
        self.height = height;
    }
}

fn create(
    width: i32,
    height: i32,
    depth_format: DepthFormat,
    samples: i32,
) -> GlResult<(FrameBufferHandle, TextureHandle, RenderBufferHandle)> {
    let handle = FrameBufferHandle::generate()?;
    let bound = handle.bind();

    let color = TextureHandle::generate()?;
    {
        let _color_bound = color.bind_to(gl::TEXTURE_2D_MULTISAMPLE);
        // SAFETY: multisample texture bound; RGBA8 is color-renderable.
        unsafe {
            gl::TexImage2DMultisample(
                gl::TEXTURE_2D_MULTISAMPLE,
                samples as GLsizei,
                gl::RGBA8,
                width,
                height,
                gl::TRUE,
            );
        }
        check_gl_errors()?;
    }
    // SAFETY: framebuffer bound; `color` is a live multisample texture.
    unsafe {
        gl::FramebufferTexture2D(
            gl::FRAMEBUFFER,
            gl::COLOR_ATTACHMENT0,
            gl::TEXTURE_2D_MULTISAMPLE,
            color.raw(),
            0,
        );
    }

    let depth = attach_depth(depth_format, width, height, Some(samples as GLsizei))?;
    check_complete()?;
    check_gl_errors()?;

    log::debug!(
        "msaa framebuffer [{:03}] created {}x{} x{} samples",
        handle.raw(),
        width,
        height,
        samples
    );
    drop(bound);
    Ok((handle, color, depth))
}

/// Largest sample count usable for both the color texture and the depth
/// renderbuffer.
fn query_max_samples() -> GlResult<i32> {
    let mut max_samples: GLint = 0;
    let mut max_color: GLint = 0;
    let mut max_depth: GLint = 0;
    // SAFETY: each query writes one integer.
    unsafe {
        gl::GetIntegerv(gl::MAX_SAMPLES, &mut max_samples);
        gl::GetIntegerv(gl::MAX_COLOR_TEXTURE_SAMPLES, &mut max_color);
        gl::GetIntegerv(gl::MAX_DEPTH_TEXTURE_SAMPLES, &mut max_depth);
    }
    check_gl_errors()?;
    log::debug!("max samples: {max_samples}, color: {max_color}, depth: {max_depth}");
    Ok(max_samples.min(max_color).min(max_depth))
}

fn clamp_samples(requested: i32, max_samples: i32) -> i32 {
    requested.clamp(1, max_samples.max(1))
}
