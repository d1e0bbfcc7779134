//! RAII ownership of native OpenGL object names.
//!
//! A [`ScopedHandle`] owns exactly one GL name and releases it through the
//! kind's [`HandleTraits::destroy`] when dropped, destroyed explicitly, or
//! overwritten. Handles are move-only; `take` leaves a null handle behind.
//!
//! The kind is a zero-sized marker type (`TextureTraits`, `ProgramTraits`,
//! ...), so every wrapper is statically dispatched and one raw `u32` wide.

use std::fmt;
use std::marker::PhantomData;

use gl::types::GLuint;

use crate::error::{check_gl_errors, GlResult};
use crate::program::ShaderStage;

/// Raw OpenGL object name. Zero is the null handle.
pub type RawHandle = GLuint;

/// Per-kind policy for a native object.
pub trait HandleTraits {
    /// Human-readable kind used in logs.
    const KIND: &'static str;

    /// Releases a non-null object of this kind.
    fn destroy(raw: RawHandle);

    #[inline]
    fn is_valid(raw: RawHandle) -> bool {
        raw != 0
    }
}

/// Kinds created through a `glGen*` call.
pub trait GenerateHandle: HandleTraits {
    fn generate() -> RawHandle;
}

/// Owning wrapper around one native object name.
///
/// Not `Send`/`Sync`: GL names are only meaningful on the thread holding the
/// context that created them.
pub struct ScopedHandle<T: HandleTraits> {
    raw: RawHandle,
    _marker: PhantomData<(fn() -> T, *const ())>,
}

impl<T: HandleTraits> ScopedHandle<T> {
    #[inline]
    pub const fn null() -> Self {
        Self {
            raw: 0,
            _marker: PhantomData,
        }
    }

    /// Takes ownership of an existing object name.
    #[inline]
    pub const fn from_raw(raw: RawHandle) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        T::is_valid(self.raw)
    }

    /// Releases the object and resets to null. Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if T::is_valid(self.raw) {
            log::debug!("delete OpenGL {} [{:03}]", T::KIND, self.raw);
            T::destroy(self.raw);
        }
        self.raw = 0;
    }

    /// Moves the handle out, leaving `self` null.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self::from_raw(std::mem::replace(&mut self.raw, 0))
    }

    /// Gives up ownership without destroying the object.
    #[inline]
    pub fn into_raw(mut self) -> RawHandle {
        std::mem::replace(&mut self.raw, 0)
    }

    /// Destroys the current object, then owns `raw`.
    pub fn reset(&mut self, raw: RawHandle) {
        self.destroy();
        self.raw = raw;
    }
}

impl<T: GenerateHandle> ScopedHandle<T> {
    /// Generates a fresh object of a `glGen*` kind.
    pub fn generate() -> GlResult<Self> {
        let raw = T::generate();
        check_gl_errors()?;
        log::debug!("create OpenGL {} [{:03}]", T::KIND, raw);
        Ok(Self::from_raw(raw))
    }
}

impl<T: HandleTraits> Drop for ScopedHandle<T> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T: HandleTraits> Default for ScopedHandle<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: HandleTraits> PartialEq for ScopedHandle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: HandleTraits> Eq for ScopedHandle<T> {}

impl<T: HandleTraits> fmt::Debug for ScopedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:03}]", T::KIND, self.raw)
    }
}

// ── kinds ─────────────────────────────────────────────────────────────────

macro_rules! gen_kind {
    ($name:ident, $kind:literal, $gen:path, $delete:path) => {
        #[derive(Debug)]
        pub enum $name {}

        impl HandleTraits for $name {
            const KIND: &'static str = $kind;

            fn destroy(name: RawHandle) {
                // SAFETY: `name` is a live object of this kind; one name is read.
                unsafe { $delete(1, &name) }
            }
        }

        impl GenerateHandle for $name {
            fn generate() -> RawHandle {
                let mut name = 0;
                // SAFETY: writes exactly one name.
                unsafe { $gen(1, &mut name) };
                name
            }
        }
    };
}

gen_kind!(VertexArrayTraits, "vertex array", gl::GenVertexArrays, gl::DeleteVertexArrays);
gen_kind!(BufferTraits, "buffer", gl::GenBuffers, gl::DeleteBuffers);
gen_kind!(FrameBufferTraits, "framebuffer", gl::GenFramebuffers, gl::DeleteFramebuffers);
gen_kind!(RenderBufferTraits, "renderbuffer", gl::GenRenderbuffers, gl::DeleteRenderbuffers);
gen_kind!(TextureTraits, "texture", gl::GenTextures, gl::DeleteTextures);

#[derive(Debug)]
pub enum ShaderTraits {}

impl HandleTraits for ShaderTraits {
    const KIND: &'static str = "shader";

    fn destroy(raw: RawHandle) {
        // SAFETY: `raw` names a live shader object.
        unsafe { gl::DeleteShader(raw) }
    }
}

#[derive(Debug)]
pub enum ProgramTraits {}

impl HandleTraits for ProgramTraits {
    const KIND: &'static str = "program";

    fn destroy(raw: RawHandle) {
        // SAFETY: `raw` names a live program object.
        unsafe { gl::DeleteProgram(raw) }
    }
}

pub type ShaderHandle = ScopedHandle<ShaderTraits>;
pub type ProgramHandle = ScopedHandle<ProgramTraits>;
pub type VertexArrayHandle = ScopedHandle<VertexArrayTraits>;
pub type BufferHandle = ScopedHandle<BufferTraits>;
pub type FrameBufferHandle = ScopedHandle<FrameBufferTraits>;
pub type RenderBufferHandle = ScopedHandle<RenderBufferTraits>;
pub type TextureHandle = ScopedHandle<TextureTraits>;

impl ShaderHandle {
    pub fn create(stage: ShaderStage) -> GlResult<Self> {
        // SAFETY: `gl_enum` is a valid shader type.
        let raw = unsafe { gl::CreateShader(stage.gl_enum()) };
        check_gl_errors()?;
        log::debug!("create OpenGL shader [{:03}] ({stage})", raw);
        Ok(Self::from_raw(raw))
    }
}

impl ProgramHandle {
    pub fn create() -> GlResult<Self> {
        // SAFETY: no preconditions beyond a current context.
        let raw = unsafe { gl::CreateProgram() };
        check_gl_errors()?;
        log::debug!("create OpenGL program [{:03}]", raw);
        Ok(Self::from_raw(raw))
    }
}
