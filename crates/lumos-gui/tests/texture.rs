#[macro_use]
mod common;

use gl::types::{GLenum, GLint};
use lumos_core::{Color4u8, ImageData4u8, Vector2i};
use lumos_gui::{GlError, RgbaTexture};

fn integer(pname: GLenum) -> GLint {
    let mut value = 0;
    unsafe { gl::GetIntegerv(pname, &mut value) };
    value
}

fn bound_on_unit(unit: u32) -> GLint {
    let active = integer(gl::ACTIVE_TEXTURE);
    unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) };
    let bound = integer(gl::TEXTURE_BINDING_2D);
    unsafe { gl::ActiveTexture(active as GLenum) };
    bound
}

#[test]
fn headless_context_is_current() {
    let _gl = gl_or_skip!();
    assert!(lumos_gui::is_loaded());
    let info = lumos_gui::context_info();
    assert!(info.version.starts_with(|c: char| c.is_ascii_digit()), "{info:?}");
}

#[test]
fn new_texture_reports_size() {
    let _gl = gl_or_skip!();
    let tex = RgbaTexture::new(64, 32).unwrap();
    assert!(tex.handle().is_valid());
    assert_eq!((tex.width(), tex.height()), (64, 32));
}

#[test]
fn resize_to_same_size_keeps_handle() {
    let _gl = gl_or_skip!();
    let mut tex = RgbaTexture::new(16, 16).unwrap();
    let before = tex.handle().raw();
    tex.resize(16, 16).unwrap();
    assert_eq!(tex.handle().raw(), before);
}

#[test]
fn resize_reallocates_with_new_size() {
    let _gl = gl_or_skip!();
    let mut tex = RgbaTexture::new(16, 16).unwrap();
    tex.resize(40, 8).unwrap();
    assert!(tex.handle().is_valid());
    assert_eq!((tex.width(), tex.height()), (40, 8));
    assert_eq!(tex.read_pixels().unwrap().width(), 40);
}

#[test]
fn update_then_read_back_subregion() {
    let _gl = gl_or_skip!();
    let mut tex = RgbaTexture::new(8, 8).unwrap();
    tex.update(&ImageData4u8::new(8, 8), Vector2i::new(0, 0)).unwrap();

    let patch = ImageData4u8::filled(3, 2, Color4u8::new(10, 20, 30, 40));
    tex.update(&patch, Vector2i::new(4, 5)).unwrap();

    let back = tex.read_pixels().unwrap();
    assert_eq!(back.get(5, 4), Some(Color4u8::new(10, 20, 30, 40)));
    assert_eq!(back.get(6, 6), Some(Color4u8::new(10, 20, 30, 40)));
    assert_eq!(back.get(4, 4), Some(Color4u8::default()));
    assert_eq!(back.get(5, 7), Some(Color4u8::default()));
}

#[test]
fn out_of_bounds_update_is_rejected() {
    let _gl = gl_or_skip!();
    let mut tex = RgbaTexture::new(8, 8).unwrap();
    let patch = ImageData4u8::new(4, 4);

    let err = tex.update(&patch, Vector2i::new(6, 0)).unwrap_err();
    assert!(matches!(err, GlError::RegionOutOfBounds { x: 6, .. }), "{err}");
    assert!(tex.update(&patch, Vector2i::new(-1, 0)).is_err());
    // Nothing reached the driver.
    lumos_gui::check_gl_errors().unwrap();
}

#[test]
fn destroy_zeroes_size() {
    let _gl = gl_or_skip!();
    let mut tex = RgbaTexture::new(8, 8).unwrap();
    tex.destroy();
    tex.destroy();
    assert!(!tex.handle().is_valid());
    assert_eq!((tex.width(), tex.height()), (0, 0));
}

// ── bindings ──────────────────────────────────────────────────────────────

#[test]
fn update_inside_unit_binding_keeps_outer_binding() {
    let _gl = gl_or_skip!();
    let a = RgbaTexture::new(4, 4).unwrap();
    let mut b = RgbaTexture::new(4, 4).unwrap();
    {
        let _sampled = a.bind_unit(0);
        b.update(&ImageData4u8::new(2, 2), Vector2i::new(1, 1)).unwrap();
        assert_eq!(integer(gl::TEXTURE_BINDING_2D), a.handle().raw() as GLint);
        b.read_pixels().unwrap();
        assert_eq!(integer(gl::TEXTURE_BINDING_2D), a.handle().raw() as GLint);
    }
    assert_eq!(integer(gl::TEXTURE_BINDING_2D), 0);
}

#[test]
fn unit_guards_restore_their_own_units() {
    let _gl = gl_or_skip!();
    let t0 = RgbaTexture::new(4, 4).unwrap();
    let t1 = RgbaTexture::new(4, 4).unwrap();
    {
        let a = t0.bind_unit(0);
        let b = t1.bind_unit(1);
        assert_eq!((a.unit(), b.unit()), (0, 1));
        assert_eq!(integer(gl::ACTIVE_TEXTURE), gl::TEXTURE1 as GLint);
        assert_eq!(bound_on_unit(0), t0.handle().raw() as GLint);
        assert_eq!(bound_on_unit(1), t1.handle().raw() as GLint);

        drop(b);
        assert_eq!(integer(gl::ACTIVE_TEXTURE), gl::TEXTURE0 as GLint);
        assert_eq!(bound_on_unit(0), t0.handle().raw() as GLint);
        assert_eq!(bound_on_unit(1), 0);
    }
    assert_eq!(bound_on_unit(0), 0);
    assert_eq!(bound_on_unit(1), 0);
}
