//! Per-request audit output
//!
//! Each successful prediction may write the raw survey input as a
//! one-row CSV file under the predictions directory, named by request
//! identifier and date. Diagnostic only; nothing reads these back, and
//! callers treat a write failure as non-fatal.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::AuditError;
use crate::record::RawRecord;

/// Writes raw prediction inputs to per-request CSV files.
#[derive(Debug, Clone)]
pub struct AuditWriter {
    dir: PathBuf,
}

impl AuditWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one raw record, keyed by request id and date.
    ///
    /// Creates the predictions directory on demand. Returns the path of
    /// the file written.
    pub fn record(
        &self,
        user_id: &str,
        date: NaiveDate,
        raw: &RawRecord,
    ) -> Result<PathBuf, AuditError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("user_{user_id}_{date}.csv"));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record([
            "id",
            "Social_event_attendance",
            "Going_outside",
            "Friends_circle_size",
            "Post_frequency",
            "Stage_fear",
            "Drained_after_socializing",
            "Time_spent_Alone",
        ])?;
        writer.write_record([
            user_id,
            &raw.social_event_attendance.to_string(),
            &raw.going_outside.to_string(),
            &raw.friends_circle_size.to_string(),
            &raw.post_frequency.to_string(),
            raw.stage_fear.as_str(),
            raw.drained_after_socializing.as_str(),
            &raw.time_spent_alone.to_string(),
        ])?;
        writer.flush().map_err(AuditError::Io)?;
        tracing::debug!(path = %path.display(), "Wrote audit row");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Categorical;

    fn sample_raw() -> RawRecord {
        RawRecord {
            social_event_attendance: 5,
            going_outside: 3,
            friends_circle_size: 10,
            post_frequency: 2,
            stage_fear: Categorical::new("No"),
            drained_after_socializing: Categorical::new("Yes"),
            time_spent_alone: 4,
        }
    }

    #[test]
    fn test_writes_header_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AuditWriter::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let path = writer.record("abc-123", date, &sample_raw()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "user_abc-123_2025-06-01.csv"
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,Social_event_attendance,Going_outside,Friends_circle_size,\
             Post_frequency,Stage_fear,Drained_after_socializing,Time_spent_Alone"
        );
        assert_eq!(lines.next().unwrap(), "abc-123,5,3,10,2,No,Yes,4");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_creates_directory_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("predictions");
        let writer = AuditWriter::new(&nested);
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        writer.record("xyz", date, &sample_raw()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the predictions directory should be.
        let blocked = dir.path().join("predictions");
        std::fs::write(&blocked, "occupied").unwrap();

        let writer = AuditWriter::new(&blocked);
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(writer.record("xyz", date, &sample_raw()).is_err());
    }
}
