//! Shader source loading.
//!
//! Shader programs are opaque to the core; they are read by path from a
//! shader directory resolved relative to the running executable, with the
//! crate root as a fallback for `cargo run` style invocations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config;
use crate::error::InitError;

/// Resolves the directory holding the WGSL sources.
pub fn shader_directory() -> Result<PathBuf, InitError> {
    let exe = std::env::current_exe().map_err(InitError::ExecutablePath)?;
    if let Some(dir) = exe.parent() {
        let candidate = dir.join(config::SHADER_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Ok(Path::new(env!("CARGO_MANIFEST_DIR")).join(config::SHADER_DIR))
}

/// Reads one shader source from the resolved directory.
pub fn load_source(directory: &Path, name: &str) -> Result<String, InitError> {
    let path = directory.join(name);
    fs::read_to_string(&path).map_err(|source| InitError::ShaderRead { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_shader_reports_its_path() {
        let err = load_source(Path::new("/nonexistent"), "missing.wgsl").unwrap_err();
        match err {
            InitError::ShaderRead { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/missing.wgsl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bundled_shaders_are_loadable() {
        let dir = shader_directory().unwrap();
        for name in [config::UPDATE_SHADER_NAME, config::DISPLAY_SHADER_NAME] {
            let source = load_source(&dir, name).unwrap();
            assert!(!source.is_empty());
        }
    }
}
