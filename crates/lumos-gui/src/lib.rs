//! Lumos GUI crate.
//!
//! Owns the OpenGL side of the toolkit:
//! - RAII handles for native GL objects (`handle`) and scoped binds (`binding`)
//! - the RGBA texture, offscreen framebuffers and MSAA resolve
//! - vertex/fragment draw programs with uniform upload, and indexed meshes
//!
//! Every type here must be used on the thread that owns the current GL
//! context. Function pointers are loaded once through [`load_with`].

pub mod binding;
pub mod error;
pub mod framebuffer;
pub mod gl_names;
pub mod handle;
pub mod mesh;
pub mod program;
pub mod texture;
pub mod uniform;

use std::ffi::{c_void, CStr};

pub use binding::{Bindable, Bound};
pub use error::{check_gl_errors, GlError, GlResult};
pub use framebuffer::{DepthFormat, FrameBuffer, MsaaFrameBuffer};
pub use handle::{
    BufferHandle, FrameBufferHandle, GenerateHandle, HandleTraits, ProgramHandle, RawHandle,
    RenderBufferHandle, ScopedHandle, ShaderHandle, TextureHandle, VertexArrayHandle,
};
pub use mesh::{Mesh, VertexAttribute};
pub use program::{ActiveProgram, ActiveValueInfo, DrawProgram, ShaderStage};
pub use texture::{RgbaTexture, UnitBound};
pub use uniform::Uniform;

/// Loads OpenGL function pointers through the windowing layer's
/// `get_proc_address`.
pub fn load_with<F>(loader: F)
where
    F: FnMut(&'static str) -> *const c_void,
{
    gl::load_with(loader);
    log::debug!("OpenGL functions loaded");
}

/// Returns true once [`load_with`] has resolved the core entry points.
pub fn is_loaded() -> bool {
    gl::GetError::is_loaded() && gl::GenTextures::is_loaded() && gl::CreateProgram::is_loaded()
}

/// Strings identifying the current context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub glsl_version: String,
}

/// Queries vendor/renderer/version strings of the current context.
pub fn context_info() -> ContextInfo {
    let info = ContextInfo {
        vendor: gl_string(gl::VENDOR),
        renderer: gl_string(gl::RENDERER),
        version: gl_string(gl::VERSION),
        glsl_version: gl_string(gl::SHADING_LANGUAGE_VERSION),
    };
    log::debug!(
        "OpenGL context: {} / {} / {} (GLSL {})",
        info.vendor,
        info.renderer,
        info.version,
        info.glsl_version
    );
    info
}

fn gl_string(name: gl::types::GLenum) -> String {
    // SAFETY: glGetString returns null or a static nul-terminated string.
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            String::new()
        } else {
            CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned()
        }
    }
}
