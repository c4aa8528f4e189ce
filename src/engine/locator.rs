use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::DEFAULT_ENGINE_SCRIPT;
use crate::utils::PiError;

/// Directory holding the running `pi` executable, with symlinks resolved
pub fn exe_dir() -> Result<PathBuf, PiError> {
    let exe = std::env::current_exe()?;
    let exe = std::fs::canonicalize(&exe).unwrap_or(exe);
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        PiError::EngineError(format!("executable has no parent directory: {}", exe.display()))
    })
}

/// Resolve the engine script location against `base_dir`
///
/// Absolute configured paths are used as-is, relative ones are joined onto
/// `base_dir`, and no configured path means `<base_dir>/../dist/pi_core.py`.
pub fn resolve_script(configured: Option<&Path>, base_dir: &Path) -> PathBuf {
    let script = match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => base_dir.join(path),
        None => DEFAULT_ENGINE_SCRIPT
            .iter()
            .fold(base_dir.to_path_buf(), |acc, part| acc.join(part)),
    };
    debug!("Security engine script resolved to {}", script.display());
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_script_is_beside_bin_dir() {
        let script = resolve_script(None, Path::new("/opt/pi/bin"));
        assert_eq!(script, PathBuf::from("/opt/pi/bin/../dist/pi_core.py"));
    }

    #[test]
    fn test_relative_script_uses_exe_dir() {
        let script = resolve_script(Some(Path::new("engine/core.py")), Path::new("/opt/pi/bin"));
        assert_eq!(script, PathBuf::from("/opt/pi/bin/engine/core.py"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_script_is_untouched() {
        let script = resolve_script(Some(Path::new("/srv/engine.py")), Path::new("/opt/pi/bin"));
        assert_eq!(script, PathBuf::from("/srv/engine.py"));
    }

    #[test]
    fn test_exe_dir_exists() {
        assert!(exe_dir().unwrap().is_dir());
    }
}
