//! File-backed report database
//!
//! Reports live in `~/.local/share/blackbox/reports/` by default, one JSON
//! file per crash named `crash-<yyyymmdd>-<id>.json`. The record is an
//! envelope of identity and timestamp around the flat annotation map.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use blackbox_core::domain::AnnotationMap;
use blackbox_core::ports::ReportTransport;

/// Entry in the local report database.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub id: String,
    pub date: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Local, file-backed crash report database.
pub struct LocalReportDatabase {
    reports_dir: PathBuf,
}

impl LocalReportDatabase {
    /// Creates a database rooted at `reports_dir`. Nothing is touched on
    /// disk until [`ReportTransport::provision`] runs.
    pub fn new(reports_dir: PathBuf) -> Self {
        Self { reports_dir }
    }

    /// Returns the default reports directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("blackbox")
            .join("reports")
    }

    /// List all report files, newest first.
    pub fn list(&self) -> anyhow::Result<Vec<ReportEntry>> {
        if !self.reports_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.reports_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().is_some_and(|e| e == "json") {
                let stem = path
                    .file_stem()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                let (date, id) = parse_report_filename(&stem);
                let metadata = entry.metadata()?;

                entries.push(ReportEntry {
                    id,
                    date,
                    size_bytes: metadata.len(),
                    path,
                });
            }
        }

        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    /// Read a report record by its ID (filename stem match).
    pub fn read(&self, id: &str) -> anyhow::Result<Option<Value>> {
        for entry in self.list()? {
            if entry.id == id {
                let content = std::fs::read_to_string(&entry.path)?;
                return Ok(Some(serde_json::from_str(&content)?));
            }
        }
        Ok(None)
    }

    /// Delete a report by its ID.
    pub fn delete(&self, id: &str) -> anyhow::Result<bool> {
        for entry in self.list()? {
            if entry.id == id {
                std::fs::remove_file(&entry.path)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns the reports directory path.
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }
}

impl ReportTransport for LocalReportDatabase {
    fn provision(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.reports_dir)?;
        Ok(())
    }

    fn submit(&self, annotations: &AnnotationMap) -> anyhow::Result<()> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        let filename = format!("crash-{}-{}.json", now.format("%Y%m%d"), id);
        let path = self.reports_dir.join(&filename);

        let record = serde_json::json!({
            "id": id,
            "timestamp": now.to_rfc3339(),
            "annotations": annotations,
        });

        std::fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        debug!(path = %path.display(), "crash report persisted");
        Ok(())
    }
}

/// Parse a report filename stem like `crash-20260830-a1b2c3d4` into
/// (date, id).
fn parse_report_filename(stem: &str) -> (String, String) {
    let parts: Vec<&str> = stem.splitn(3, '-').collect();
    match parts.len() {
        3 => (parts[1].to_string(), parts[2].to_string()),
        _ => (String::new(), stem.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_annotations() -> AnnotationMap {
        let mut map = AnnotationMap::new();
        map.insert("Crash reason", "segfault in renderer");
        map.insert("CPU usage", "12%");
        map
    }

    #[test]
    fn test_provision_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("reports");
        let db = LocalReportDatabase::new(nested.clone());

        db.provision().unwrap();
        assert!(nested.is_dir());

        // Idempotent
        db.provision().unwrap();
    }

    #[test]
    fn test_submit_writes_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalReportDatabase::new(dir.path().to_path_buf());
        db.provision().unwrap();

        db.submit(&sample_annotations()).unwrap();

        let entries = db.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.len(), 8);

        let record = db.read(&entries[0].id).unwrap().unwrap();
        assert_eq!(record["id"], entries[0].id);
        assert!(record["timestamp"].is_string());
        assert_eq!(record["annotations"]["Crash reason"], "segfault in renderer");
        assert_eq!(record["annotations"]["CPU usage"], "12%");
    }

    #[test]
    fn test_submit_without_provision_fails() {
        let db = LocalReportDatabase::new(PathBuf::from("/nonexistent/reports"));
        assert!(db.submit(&sample_annotations()).is_err());
    }

    #[test]
    fn test_list_nonexistent_dir_is_empty() {
        let db = LocalReportDatabase::new(PathBuf::from("/nonexistent/reports"));
        assert!(db.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_report() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocalReportDatabase::new(dir.path().to_path_buf());
        db.provision().unwrap();
        db.submit(&sample_annotations()).unwrap();

        let id = db.list().unwrap()[0].id.clone();
        assert!(db.delete(&id).unwrap());
        assert!(db.list().unwrap().is_empty());
        assert!(!db.delete(&id).unwrap());
    }

    #[test]
    fn test_parse_report_filename() {
        let (date, id) = parse_report_filename("crash-20260830-abc12345");
        assert_eq!(date, "20260830");
        assert_eq!(id, "abc12345");

        let (date, id) = parse_report_filename("weird");
        assert_eq!(date, "");
        assert_eq!(id, "weird");
    }
}
