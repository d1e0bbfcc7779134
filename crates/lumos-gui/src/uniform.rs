//! Values that can be uploaded to a program uniform.
//!
//! The set is closed: each shape maps to exactly one `glUniform*` call.

use gl::types::GLint;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use lumos_core::{Color3f, Color4f};

mod sealed {
    pub trait Sealed {}
}

pub trait Uniform: sealed::Sealed {
    /// Uploads to `location` of the currently bound program.
    fn upload(&self, location: GLint);
}

macro_rules! uniform {
    ($ty:ty, |$v:ident, $loc:ident| $body:expr) => {
        impl sealed::Sealed for $ty {}

        impl Uniform for $ty {
            #[inline]
            fn upload(&self, $loc: GLint) {
                let $v = self;
                // SAFETY: pointers reference `self`, which outlives the call.
                unsafe { $body }
            }
        }
    };
}

uniform!(f32, |v, loc| gl::Uniform1f(loc, *v));
uniform!(i32, |v, loc| gl::Uniform1i(loc, *v));
uniform!(u32, |v, loc| gl::Uniform1ui(loc, *v));
uniform!(bool, |v, loc| gl::Uniform1i(loc, *v as GLint));

uniform!([f32; 2], |v, loc| gl::Uniform2fv(loc, 1, v.as_ptr()));
uniform!([f32; 3], |v, loc| gl::Uniform3fv(loc, 1, v.as_ptr()));
uniform!([f32; 4], |v, loc| gl::Uniform4fv(loc, 1, v.as_ptr()));

uniform!(Vec2, |v, loc| gl::Uniform2f(loc, v.x, v.y));
uniform!(Vec3, |v, loc| gl::Uniform3f(loc, v.x, v.y, v.z));
uniform!(Vec4, |v, loc| gl::Uniform4f(loc, v.x, v.y, v.z, v.w));

uniform!(Mat3, |v, loc| gl::UniformMatrix3fv(
    loc,
    1,
    gl::FALSE,
    v.to_cols_array().as_ptr()
));
uniform!(Mat4, |v, loc| gl::UniformMatrix4fv(
    loc,
    1,
    gl::FALSE,
    v.to_cols_array().as_ptr()
));

uniform!(Color3f, |v, loc| gl::Uniform3f(loc, v.r, v.g, v.b));
uniform!(Color4f, |v, loc| gl::Uniform4f(loc, v.r, v.g, v.b, v.a));
