//! Offscreen render targets.
//!
//! [`FrameBuffer`] renders into an [`RgbaTexture`](crate::RgbaTexture) that
//! can be read back or sampled; [`MsaaFrameBuffer`] renders multisampled and
//! resolves into a `FrameBuffer`. Both optionally carry a depth renderbuffer.

mod msaa;
mod single;

pub use msaa::MsaaFrameBuffer;
pub use single::FrameBuffer;

use gl::types::{GLenum, GLsizei};

use crate::binding::Bound;
use crate::error::{check_gl_errors, GlError, GlResult};
use crate::gl_names;
use crate::handle::{FrameBufferTraits, RenderBufferHandle, ScopedHandle};

/// Internal format of the depth attachment; [`DepthFormat::NONE`] skips it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct DepthFormat(GLenum);

impl DepthFormat {
    pub const NONE: Self = Self(gl::NONE);
    pub const COMPONENT16: Self = Self(gl::DEPTH_COMPONENT16);
    pub const COMPONENT24: Self = Self(gl::DEPTH_COMPONENT24);
    pub const COMPONENT32F: Self = Self(gl::DEPTH_COMPONENT32F);
    pub const DEPTH24_STENCIL8: Self = Self(gl::DEPTH24_STENCIL8);

    /// Any renderbuffer internal format. The driver decides whether it is a
    /// valid depth attachment when the framebuffer is checked.
    #[inline]
    pub const fn from_raw(format: GLenum) -> Self {
        Self(format)
    }

    #[inline]
    pub const fn raw(self) -> GLenum {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == gl::NONE
    }

    fn attachment(self) -> GLenum {
        if self.0 == gl::DEPTH24_STENCIL8 || self.0 == gl::DEPTH32F_STENCIL8 {
            gl::DEPTH_STENCIL_ATTACHMENT
        } else {
            gl::DEPTH_ATTACHMENT
        }
    }
}

/// Binds `handle` as the draw target and sets the viewport to its size.
fn bind_for_drawing(
    handle: &ScopedHandle<FrameBufferTraits>,
    width: i32,
    height: i32,
) -> Bound<'_, FrameBufferTraits> {
    let bound = handle.bind();
    // SAFETY: plain state setter.
    unsafe { gl::Viewport(0, 0, width, height) };
    bound
}

/// Creates the depth renderbuffer (when requested) and attaches it to the
/// framebuffer currently bound on `GL_FRAMEBUFFER`.
fn attach_depth(
    format: DepthFormat,
    width: i32,
    height: i32,
    samples: Option<GLsizei>,
) -> GlResult<RenderBufferHandle> {
    if format.is_none() {
        return Ok(RenderBufferHandle::null());
    }

    let depth = RenderBufferHandle::generate()?;
    {
        let _bound = depth.bind();
        // SAFETY: renderbuffer bound; format validity is reported by the driver.
        unsafe {
            match samples {
                Some(samples) => gl::RenderbufferStorageMultisample(
                    gl::RENDERBUFFER,
                    samples,
                    format.raw(),
                    width,
                    height,
                ),
                None => gl::RenderbufferStorage(gl::RENDERBUFFER, format.raw(), width, height),
            }
        }
        check_gl_errors()?;
    }
    // SAFETY: a framebuffer is bound by the caller.
    unsafe {
        gl::FramebufferRenderbuffer(
            gl::FRAMEBUFFER,
            format.attachment(),
            gl::RENDERBUFFER,
            depth.raw(),
        );
    }
    Ok(depth)
}

/// Fails unless the framebuffer bound on `GL_FRAMEBUFFER` is complete.
fn check_complete() -> GlResult<()> {
    // SAFETY: queries the current binding only.
    let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };
    if status == gl::FRAMEBUFFER_COMPLETE {
        return Ok(());
    }
    let err = GlError::IncompleteFramebuffer {
        status,
        name: gl_names::framebuffer_status_name(status),
    };
    log::error!("{err}");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth_format_is_none() {
        assert!(DepthFormat::default().is_none());
        assert!(!DepthFormat::COMPONENT24.is_none());
    }

    #[test]
    fn stencil_formats_use_combined_attachment() {
        assert_eq!(DepthFormat::DEPTH24_STENCIL8.attachment(), gl::DEPTH_STENCIL_ATTACHMENT);
        assert_eq!(DepthFormat::COMPONENT32F.attachment(), gl::DEPTH_ATTACHMENT);
        assert_eq!(DepthFormat::from_raw(gl::RGBA8).raw(), gl::RGBA8);
    }
}
