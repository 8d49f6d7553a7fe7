use std::fs;
use std::path::Path;

use anyhow::Context;
use saver_core::Preferences;
use saver_engine::AtomicFileWriter;
use saver_logging::{saver_info, saver_warn};

/// Loads preferences from a RON file. A missing or unreadable file falls
/// back to the defaults so every command still runs.
pub fn load_preferences(path: &Path) -> Preferences {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Preferences::default();
        }
        Err(err) => {
            saver_warn!("Failed to read preferences from {:?}: {}", path, err);
            return Preferences::default();
        }
    };

    match ron::from_str(&content) {
        Ok(prefs) => prefs,
        Err(err) => {
            saver_warn!("Failed to parse preferences from {:?}: {}", path, err);
            Preferences::default()
        }
    }
}

/// Writes preferences back as pretty RON, atomically.
pub fn save_preferences(path: &Path, prefs: &Preferences) -> anyhow::Result<()> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(prefs, pretty)
        .context("serialize preferences")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("preferences path has no file name")?;

    let writer = AtomicFileWriter::new(dir);
    writer
        .write(filename, content.as_bytes())
        .with_context(|| format!("write preferences to {:?}", path))?;
    saver_info!("Preferences saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use saver_core::{ImageFormat, StorageMethod, Theme};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn round_trips_preferences() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prefs.ron");
        let prefs = Preferences {
            theme: Theme::Dark,
            format: ImageFormat::Jpg,
            storage_method: StorageMethod::Prompt,
        };

        save_preferences(&path, &prefs).unwrap();
        assert_eq!(load_preferences(&path), prefs);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = load_preferences(&temp.path().join("absent.ron"));
        assert_eq!(loaded, Preferences::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prefs.ron");
        fs::write(&path, "not ron at all (").unwrap();
        assert_eq!(load_preferences(&path), Preferences::default());
    }
}
