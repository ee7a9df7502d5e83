//! Append-only metadata log: one JSON array of planet records per run.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use helios_system::Planet;

use crate::error::RunError;

/// Shared by every run of a batch; appends are serialized so lines never interleave.
pub struct MetadataLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MetadataLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `planets` as a single line, creating the file and its parents if needed.
    pub fn append(&self, planets: &[Planet]) -> Result<(), RunError> {
        let mut line = serde_json::to_string(planets)?;
        line.push('\n');

        let _guard = self.lock.lock().map_err(|_| RunError::MetadataLock)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RunError::io(parent, e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RunError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| RunError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_system::{Attachment, Moon, Rgb};

    fn planet(center: f64) -> Planet {
        Planet {
            pos_orb: 120.0,
            speed: -4.0,
            size: 9.0,
            center,
            color: Rgb::new(95, 237, 223),
            attachment: Attachment::Moon(Moon {
                size: 2.0,
                orbit: 41.0,
                speed: 6.0,
            }),
            noise: None,
        }
    }

    #[test]
    fn test_appends_one_line_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetadataLog::new(dir.path().join("metadata").join("metadata.txt"));

        log.append(&[planet(400.0), planet(300.0)]).unwrap();
        log.append(&[]).unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "[]");

        let parsed: Vec<Planet> = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, vec![planet(400.0), planet(300.0)]);
    }

    #[test]
    fn test_record_fields() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetadataLog::new(dir.path().join("m.txt"));
        log.append(&[planet(400.0)]).unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        let record = &value[0];
        assert_eq!(record["center"], 400.0);
        assert_eq!(record["color"], serde_json::json!([95, 237, 223]));
        assert_eq!(record["attachment"]["moon"]["orbit"], 41.0);
        assert!(record["noise"].is_null());
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetadataLog::new(dir.path().join("m.txt"));
        let planets: Vec<Planet> = (0..9).map(|i| planet(450.0 - 40.0 * i as f64)).collect();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        log.append(&planets).unwrap();
                    }
                });
            }
        });

        let text = fs::read_to_string(log.path()).unwrap();
        assert_eq!(text.lines().count(), 80);
        for line in text.lines() {
            let parsed: Vec<Planet> = serde_json::from_str(line).unwrap();
            assert_eq!(parsed.len(), 9);
        }
    }
}
