//! Scoped bind guards.
//!
//! `handle.bind()` makes the object current on its target and returns a
//! [`Bound`] guard. The guard remembers what was bound there before and puts
//! it back on drop, so guards nest: a library call that binds internally
//! leaves the caller's binding in place. The guard borrows the handle, so
//! the object cannot be destroyed while it is bound through the guard.

use std::marker::PhantomData;

use gl::types::{GLboolean, GLenum, GLint};

use crate::handle::{
    BufferTraits, FrameBufferTraits, HandleTraits, ProgramTraits, RawHandle, RenderBufferTraits,
    ScopedHandle, TextureTraits, VertexArrayTraits,
};

/// Kinds that can be bound to a target.
pub trait Bindable: HandleTraits {
    const DEFAULT_TARGET: GLenum;

    /// Binding state that `bind` on a target replaces.
    type Saved: Copy;

    /// Binds `raw` (or 0) on `target`. Kinds without targets ignore it.
    fn bind(target: GLenum, raw: RawHandle);

    /// Captures the current binding of `target`.
    fn save(target: GLenum) -> Self::Saved;

    /// Rebinds what [`save`](Bindable::save) captured. Names deleted in the
    /// meantime are restored as 0.
    fn restore(target: GLenum, saved: Self::Saved);
}

/// Active binding of a handle; restores the previous binding on drop.
#[must_use = "the previous binding is restored as soon as the guard is dropped"]
pub struct Bound<'a, T: Bindable> {
    target: GLenum,
    previous: T::Saved,
    _handle: PhantomData<&'a ScopedHandle<T>>,
}

impl<T: Bindable> Bound<'_, T> {
    #[inline]
    pub fn target(&self) -> GLenum {
        self.target
    }
}

impl<T: Bindable> Drop for Bound<'_, T> {
    fn drop(&mut self) {
        T::restore(self.target, self.previous);
    }
}

impl<T: Bindable> ScopedHandle<T> {
    /// Binds on the kind's default target.
    #[inline]
    pub fn bind(&self) -> Bound<'_, T> {
        self.bind_to(T::DEFAULT_TARGET)
    }

    pub fn bind_to(&self, target: GLenum) -> Bound<'_, T> {
        let previous = T::save(target);
        T::bind(target, self.raw());
        Bound {
            target,
            previous,
            _handle: PhantomData,
        }
    }
}

/// Reads one integer binding query.
pub(crate) fn current_binding(pname: GLenum) -> RawHandle {
    let mut raw: GLint = 0;
    // SAFETY: binding queries write one integer.
    unsafe { gl::GetIntegerv(pname, &mut raw) };
    raw.max(0) as RawHandle
}

type IsObject = unsafe fn(RawHandle) -> GLboolean;

fn live_or_zero(raw: RawHandle, is_object: IsObject) -> RawHandle {
    // SAFETY: glIs* accepts any name.
    if raw != 0 && unsafe { is_object(raw) } == gl::TRUE {
        raw
    } else {
        0
    }
}

fn texture_binding_query(target: GLenum) -> Option<GLenum> {
    Some(match target {
        gl::TEXTURE_1D => gl::TEXTURE_BINDING_1D,
        gl::TEXTURE_2D => gl::TEXTURE_BINDING_2D,
        gl::TEXTURE_3D => gl::TEXTURE_BINDING_3D,
        gl::TEXTURE_2D_ARRAY => gl::TEXTURE_BINDING_2D_ARRAY,
        gl::TEXTURE_2D_MULTISAMPLE => gl::TEXTURE_BINDING_2D_MULTISAMPLE,
        gl::TEXTURE_CUBE_MAP => gl::TEXTURE_BINDING_CUBE_MAP,
        gl::TEXTURE_RECTANGLE => gl::TEXTURE_BINDING_RECTANGLE,
        _ => return None,
    })
}

fn buffer_binding_query(target: GLenum) -> Option<GLenum> {
    Some(match target {
        gl::ARRAY_BUFFER => gl::ARRAY_BUFFER_BINDING,
        gl::ELEMENT_ARRAY_BUFFER => gl::ELEMENT_ARRAY_BUFFER_BINDING,
        gl::UNIFORM_BUFFER => gl::UNIFORM_BUFFER_BINDING,
        gl::PIXEL_PACK_BUFFER => gl::PIXEL_PACK_BUFFER_BINDING,
        gl::PIXEL_UNPACK_BUFFER => gl::PIXEL_UNPACK_BUFFER_BINDING,
        _ => return None,
    })
}

impl Bindable for TextureTraits {
    const DEFAULT_TARGET: GLenum = gl::TEXTURE_2D;
    type Saved = RawHandle;

    fn bind(target: GLenum, raw: RawHandle) {
        unsafe { gl::BindTexture(target, raw) }
    }

    fn save(target: GLenum) -> RawHandle {
        texture_binding_query(target).map_or(0, current_binding)
    }

    fn restore(target: GLenum, saved: RawHandle) {
        Self::bind(target, live_or_zero(saved, gl::IsTexture));
    }
}

/// `FRAMEBUFFER` sets both the draw and the read binding, so both are saved
/// as `(draw, read)`.
impl Bindable for FrameBufferTraits {
    const DEFAULT_TARGET: GLenum = gl::FRAMEBUFFER;
    type Saved = (RawHandle, RawHandle);

    fn bind(target: GLenum, raw: RawHandle) {
        unsafe { gl::BindFramebuffer(target, raw) }
    }

    fn save(target: GLenum) -> (RawHandle, RawHandle) {
        let draw = match target {
            gl::READ_FRAMEBUFFER => 0,
            _ => current_binding(gl::DRAW_FRAMEBUFFER_BINDING),
        };
        let read = match target {
            gl::DRAW_FRAMEBUFFER => 0,
            _ => current_binding(gl::READ_FRAMEBUFFER_BINDING),
        };
        (draw, read)
    }

    fn restore(target: GLenum, (draw, read): (RawHandle, RawHandle)) {
        if target != gl::READ_FRAMEBUFFER {
            Self::bind(gl::DRAW_FRAMEBUFFER, live_or_zero(draw, gl::IsFramebuffer));
        }
        if target != gl::DRAW_FRAMEBUFFER {
            Self::bind(gl::READ_FRAMEBUFFER, live_or_zero(read, gl::IsFramebuffer));
        }
    }
}

impl Bindable for RenderBufferTraits {
    const DEFAULT_TARGET: GLenum = gl::RENDERBUFFER;
    type Saved = RawHandle;

    fn bind(target: GLenum, raw: RawHandle) {
        unsafe { gl::BindRenderbuffer(target, raw) }
    }

    fn save(_target: GLenum) -> RawHandle {
        current_binding(gl::RENDERBUFFER_BINDING)
    }

    fn restore(target: GLenum, saved: RawHandle) {
        Self::bind(target, live_or_zero(saved, gl::IsRenderbuffer));
    }
}

impl Bindable for BufferTraits {
    const DEFAULT_TARGET: GLenum = gl::ARRAY_BUFFER;
    type Saved = RawHandle;

    fn bind(target: GLenum, raw: RawHandle) {
        unsafe { gl::BindBuffer(target, raw) }
    }

    fn save(target: GLenum) -> RawHandle {
        buffer_binding_query(target).map_or(0, current_binding)
    }

    fn restore(target: GLenum, saved: RawHandle) {
        Self::bind(target, live_or_zero(saved, gl::IsBuffer));
    }
}

impl Bindable for VertexArrayTraits {
    const DEFAULT_TARGET: GLenum = 0;
    type Saved = RawHandle;

    fn bind(_target: GLenum, raw: RawHandle) {
        unsafe { gl::BindVertexArray(raw) }
    }

    fn save(_target: GLenum) -> RawHandle {
        current_binding(gl::VERTEX_ARRAY_BINDING)
    }

    fn restore(target: GLenum, saved: RawHandle) {
        Self::bind(target, live_or_zero(saved, gl::IsVertexArray));
    }
}

impl Bindable for ProgramTraits {
    const DEFAULT_TARGET: GLenum = 0;
    type Saved = RawHandle;

    fn bind(_target: GLenum, raw: RawHandle) {
        unsafe { gl::UseProgram(raw) }
    }

    fn save(_target: GLenum) -> RawHandle {
        current_binding(gl::CURRENT_PROGRAM)
    }

    fn restore(target: GLenum, saved: RawHandle) {
        Self::bind(target, live_or_zero(saved, gl::IsProgram));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        static BOUND: RefCell<HashMap<GLenum, RawHandle>> = RefCell::new(HashMap::new());
    }

    const TARGET_A: GLenum = 1;
    const TARGET_B: GLenum = 2;

    enum TrackingTraits {}

    impl HandleTraits for TrackingTraits {
        const KIND: &'static str = "tracking";

        fn destroy(_raw: RawHandle) {}
    }

    impl Bindable for TrackingTraits {
        const DEFAULT_TARGET: GLenum = TARGET_A;
        type Saved = RawHandle;

        fn bind(target: GLenum, raw: RawHandle) {
            BOUND.with(|b| b.borrow_mut().insert(target, raw));
        }

        fn save(target: GLenum) -> RawHandle {
            bound_on(target)
        }

        fn restore(target: GLenum, saved: RawHandle) {
            Self::bind(target, saved);
        }
    }

    type TrackingHandle = ScopedHandle<TrackingTraits>;

    fn bound_on(target: GLenum) -> RawHandle {
        BOUND.with(|b| b.borrow().get(&target).copied().unwrap_or(0))
    }

    // ── nesting ───────────────────────────────────────────────────────────

    #[test]
    fn inner_guard_restores_outer_binding() {
        let outer = TrackingHandle::from_raw(3);
        let inner = TrackingHandle::from_raw(8);

        let g = outer.bind();
        assert_eq!(bound_on(TARGET_A), 3);
        {
            let _i = inner.bind();
            assert_eq!(bound_on(TARGET_A), 8);
        }
        assert_eq!(bound_on(TARGET_A), 3);
        drop(g);
        assert_eq!(bound_on(TARGET_A), 0);
    }

    #[test]
    fn guards_only_touch_their_own_target() {
        let a = TrackingHandle::from_raw(4);
        let b = TrackingHandle::from_raw(5);

        let ga = a.bind();
        let gb = b.bind_to(TARGET_B);
        assert_eq!(gb.target(), TARGET_B);
        drop(gb);
        assert_eq!(bound_on(TARGET_A), 4);
        assert_eq!(bound_on(TARGET_B), 0);
        drop(ga);
        assert_eq!(bound_on(TARGET_A), 0);
    }

    #[test]
    fn rebinding_the_same_handle_keeps_it_bound() {
        let a = TrackingHandle::from_raw(6);
        let _outer = a.bind();
        drop(a.bind());
        assert_eq!(bound_on(TARGET_A), 6);
    }

    #[test]
    fn unknown_targets_have_no_binding_query() {
        assert_eq!(texture_binding_query(gl::TEXTURE_2D), Some(gl::TEXTURE_BINDING_2D));
        assert_eq!(
            buffer_binding_query(gl::ELEMENT_ARRAY_BUFFER),
            Some(gl::ELEMENT_ARRAY_BUFFER_BINDING)
        );
        assert_eq!(texture_binding_query(gl::ARRAY_BUFFER), None);
    }
}
