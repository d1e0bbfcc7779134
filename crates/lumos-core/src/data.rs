//! Asset directory lookup.
//!
//! Demo tools load shaders, fonts and sample images from a shared data
//! directory. The directory is taken from `LUMOS_DATA_DIR` when set,
//! otherwise it is the `data/` directory at the workspace root.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LUMOS_DATA_DIR";

/// Returns the root of the asset directory.
pub fn data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_data_dir(),
    }
}

/// Resolves `name` relative to [`data_dir`].
///
/// `name` may contain non-ASCII components (e.g. a localized shader folder).
pub fn data_path(name: impl AsRef<Path>) -> PathBuf {
    data_dir().join(name)
}

fn default_data_dir() -> PathBuf {
    // crates/lumos-core -> workspace root
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("data"), |root| root.join("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dir_is_workspace_data() {
        let dir = default_data_dir();
        assert!(dir.ends_with("data"));
        assert!(dir.parent().is_some_and(|root| root.join("crates").is_dir()));
    }

    #[test]
    fn data_path_keeps_unicode_components() {
        let p = data_path(Path::new("中文shader").join("cube.vert"));
        assert!(p.ends_with(Path::new("中文shader").join("cube.vert")));
    }
}
