//! Headless OpenGL 3.3 core context for integration tests.
//!
//! libEGL is loaded at runtime. The Mesa surfaceless platform is tried
//! first, so no display server is needed; the default display is the
//! fallback. When no context can be made, [`HeadlessGl::new`] prints why to
//! stderr and returns `None`, and the test returns early. Setting
//! `LUMOS_REQUIRE_GL=1` turns that skip into a failure.

#![allow(dead_code)]

use std::ffi::c_void;
use std::sync::Once;

use khronos_egl as egl;
use lumos_core::logging::{init_logging, LoggingConfig};

type Egl = egl::DynamicInstance<egl::EGL1_5>;

// EGL_MESA_platform_surfaceless.
const PLATFORM_SURFACELESS_MESA: egl::Enum = 0x31DD;

// EGL_KHR_create_context / EGL 1.5 attribute names.
const CONTEXT_MAJOR_VERSION: egl::Int = 0x3098;
const CONTEXT_MINOR_VERSION: egl::Int = 0x30FB;
const CONTEXT_OPENGL_PROFILE_MASK: egl::Int = 0x30FD;
const CONTEXT_OPENGL_CORE_PROFILE_BIT: egl::Int = 0x0001;

const REQUIRE_GL_VAR: &str = "LUMOS_REQUIRE_GL";

static LOAD_GL: Once = Once::new();

pub struct HeadlessGl {
    egl: Egl,
    display: egl::Display,
    surface: Option<egl::Surface>,
    context: egl::Context,
}

impl HeadlessGl {
    pub fn new() -> Option<Self> {
        init_logging(LoggingConfig::for_tests());

        match Self::create() {
            Ok(gl) => Some(gl),
            Err(reason) => {
                if gl_required() {
                    panic!("{REQUIRE_GL_VAR} is set but no OpenGL context is available: {reason}");
                }
                eprintln!("skipping OpenGL test: {reason}");
                None
            }
        }
    }

    fn create() -> Result<Self, String> {
        // SAFETY: loads the system libEGL; symbols are resolved by the loader.
        let egl = unsafe { Egl::load_required() }
            .map_err(|e| format!("libEGL 1.5 unavailable: {e}"))?;

        let display = open_display(&egl)?;
        egl.bind_api(egl::OPENGL_API)
            .map_err(|e| format!("desktop OpenGL API unsupported: {e}"))?;

        // Without a pbuffer the context is made current surfaceless.
        let (config, surface) = match choose_config(&egl, display, egl::PBUFFER_BIT)? {
            Some(config) => {
                let surface = egl
                    .create_pbuffer_surface(
                        display,
                        config,
                        &[egl::WIDTH, 16, egl::HEIGHT, 16, egl::NONE],
                    )
                    .ok();
                (config, surface)
            }
            None => {
                let config = choose_config(&egl, display, 0)?
                    .ok_or_else(|| "no desktop OpenGL config".to_owned())?;
                (config, None)
            }
        };

        let context_attribs = [
            CONTEXT_MAJOR_VERSION,
            3,
            CONTEXT_MINOR_VERSION,
            3,
            CONTEXT_OPENGL_PROFILE_MASK,
            CONTEXT_OPENGL_CORE_PROFILE_BIT,
            egl::NONE,
        ];
        let context = match egl.create_context(display, config, None, &context_attribs) {
            Ok(context) => context,
            Err(e) => {
                if let Some(surface) = surface {
                    let _ = egl.destroy_surface(display, surface);
                }
                return Err(format!("no OpenGL 3.3 core context: {e}"));
            }
        };

        if let Err(e) = egl.make_current(display, surface, surface, Some(context)) {
            let _ = egl.destroy_context(display, context);
            if let Some(surface) = surface {
                let _ = egl.destroy_surface(display, surface);
            }
            return Err(format!("eglMakeCurrent failed: {e}"));
        }

        LOAD_GL.call_once(|| {
            lumos_gui::load_with(|name| {
                egl.get_proc_address(name)
                    .map_or(std::ptr::null(), |f| f as *const c_void)
            });
        });
        lumos_gui::context_info();

        Ok(Self {
            egl,
            display,
            surface,
            context,
        })
    }
}

impl Drop for HeadlessGl {
    fn drop(&mut self) {
        // The display stays initialized; other test threads may share it.
        let _ = self.egl.make_current(self.display, None, None, None);
        let _ = self.egl.destroy_context(self.display, self.context);
        if let Some(surface) = self.surface {
            let _ = self.egl.destroy_surface(self.display, surface);
        }
    }
}

fn gl_required() -> bool {
    std::env::var_os(REQUIRE_GL_VAR).is_some_and(|v| !v.is_empty() && v != "0")
}

fn open_display(egl: &Egl) -> Result<egl::Display, String> {
    // SAFETY: the surfaceless platform ignores the native display; the
    // attribute list is terminated.
    let surfaceless = unsafe {
        egl.get_platform_display(
            PLATFORM_SURFACELESS_MESA,
            egl::DEFAULT_DISPLAY,
            &[egl::ATTRIB_NONE],
        )
    };
    if let Ok(display) = surfaceless {
        match egl.initialize(display) {
            Ok(_) => return Ok(display),
            Err(e) => log::debug!("surfaceless EGL platform unusable: {e}"),
        }
    }

    // SAFETY: DEFAULT_DISPLAY is always a valid native display id.
    let display = unsafe { egl.get_display(egl::DEFAULT_DISPLAY) }
        .ok_or_else(|| "no surfaceless platform and no default EGL display".to_owned())?;
    egl.initialize(display)
        .map_err(|e| format!("eglInitialize failed: {e}"))?;
    Ok(display)
}

fn choose_config(
    egl: &Egl,
    display: egl::Display,
    surface_type: egl::Int,
) -> Result<Option<egl::Config>, String> {
    let attribs = [
        egl::SURFACE_TYPE,
        surface_type,
        egl::RENDERABLE_TYPE,
        egl::OPENGL_BIT,
        egl::RED_SIZE,
        8,
        egl::GREEN_SIZE,
        8,
        egl::BLUE_SIZE,
        8,
        egl::ALPHA_SIZE,
        8,
        egl::NONE,
    ];
    egl.choose_first_config(display, &attribs)
        .map_err(|e| format!("eglChooseConfig failed: {e}"))
}

/// Creates the test context or returns from the calling test.
macro_rules! gl_or_skip {
    () => {
        match common::HeadlessGl::new() {
            Some(gl) => gl,
            None => return,
        }
    };
}
