// Saving the drawing.
// Visual: pressing S drops drawing_<YYYYmmdd_HHMMSS>.png into the export folder.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_PREFIX: &str = "drawing";

pub fn timestamped_stem(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

pub fn build_filename(stem: &str) -> String {
    format!("{EXPORT_PREFIX}_{stem}.png")
}

/// Write PNG bytes into `dir` under a timestamped name, creating `dir` if
/// needed. Returns the file written.
pub fn save_png(dir: &Path, png: &[u8], now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| Error::Export(format!("create export folder {}: {e}", dir.display())))?;
    let path = dir.join(build_filename(&timestamped_stem(now)));
    fs::write(&path, png).map_err(|e| Error::Export(format!("write {}: {e}", path.display())))?;
    info!(path = %path.display(), bytes = png.len(), "drawing saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("date time")
    }

    #[test]
    fn filename_formats_timestamp() {
        assert_eq!(build_filename(&timestamped_stem(fixed_time())), "drawing_20260102_030405.png");
    }

    #[test]
    fn save_creates_the_folder_and_writes_bytes() {
        let dir = std::env::temp_dir().join(format!("air-ink-export-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let path = save_png(&dir, b"\x89PNG fake", fixed_time()).expect("saved");
        assert!(path.ends_with("drawing_20260102_030405.png"));
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG fake");

        let _ = fs::remove_dir_all(&dir);
    }
}
