//! Run-scoped report and log accumulators, serialized to files at run end.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

pub const REPORT_FILENAME: &str = "wp_seo_optimization_report.csv";
pub const LOG_FILENAME: &str = "wp_seo_optimization_errors.log";

/// One row of the run report. Recorded once per processed post, in
/// processing order, and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub post_id: u64,
    pub post_slug: String,
    pub original_title: String,
    pub updated_title: Option<String>,
    pub meta_description_added: bool,
    pub keyword_added: bool,
}

#[derive(Debug, Clone)]
pub struct LogLine {
    pub post_id: u64,
    pub message: String,
}

/// Accumulates everything the run produces. Passed `&mut` through the
/// workflow; only the single sequential control flow appends to it.
#[derive(Default)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
    log_lines: Vec<LogLine>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a per-post log line and echoes it to the operational log.
    pub fn log(&mut self, post_id: u64, message: impl Into<String>) {
        let message = message.into();
        info!("Post {post_id}: {message}");
        self.log_lines.push(LogLine { post_id, message });
    }

    pub fn record(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn log_lines(&self) -> &[LogLine] {
        &self.log_lines
    }

    pub fn descriptions_added(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.meta_description_added)
            .count()
    }

    pub fn keywords_added(&self) -> usize {
        self.entries.iter().filter(|e| e.keyword_added).count()
    }

    pub fn titles_updated(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.updated_title.is_some())
            .count()
    }

    /// Writes the fixed-column CSV report, overwriting any prior file.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        // Automatic headers are off: the header row is written explicitly so
        // an empty run still produces it, and serialize must not add its own.
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record([
            "post_id",
            "post_slug",
            "original_title",
            "updated_title",
            "meta_description_added",
            "keyword_added",
        ])?;
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        info!("Report generated: {}", path.display());
        Ok(())
    }

    /// Writes the log file, one `Post <id>: <message>` line per event in
    /// chronological order, overwriting any prior file.
    pub fn write_log(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for line in &self.log_lines {
            writeln!(writer, "Post {}: {}", line.post_id, line.message)?;
        }
        writer.flush()?;
        info!("Error log generated: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(id: u64, updated: Option<&str>) -> ReportEntry {
        ReportEntry {
            post_id: id,
            post_slug: format!("post-{id}"),
            original_title: format!("Post {id}"),
            updated_title: updated.map(|s| s.to_string()),
            meta_description_added: id % 2 == 0,
            keyword_added: true,
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let mut report = RunReport::new();
        report.record(sample_entry(1, None));
        report.record(sample_entry(2, Some("Post 2, Improved")));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILENAME);
        report.write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        // The header row must appear exactly once
        assert_eq!(
            contents.matches("post_id,post_slug").count(),
            1,
            "header must not repeat: {contents}"
        );
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "post_id,post_slug,original_title,updated_title,meta_description_added,keyword_added"
        );
        assert_eq!(lines.next().unwrap(), "1,post-1,Post 1,,false,true");
        // Title containing a comma must be quoted
        assert_eq!(
            lines.next().unwrap(),
            "2,post-2,Post 2,\"Post 2, Improved\",true,true"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_log_lines_preserve_order() {
        let mut report = RunReport::new();
        report.log(7, "No keyword found, generating one...");
        report.log(7, "Generated keyword: vintage cameras");
        report.log(9, "Failed to update post: 500 - boom");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILENAME);
        report.write_log(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Post 7: No keyword found, generating one...",
                "Post 7: Generated keyword: vintage cameras",
                "Post 9: Failed to update post: 500 - boom",
            ]
        );
    }

    #[test]
    fn test_summary_counters() {
        let mut report = RunReport::new();
        report.record(sample_entry(1, None));
        report.record(sample_entry(2, Some("Post 2, Improved")));
        assert_eq!(report.descriptions_added(), 1);
        assert_eq!(report.keywords_added(), 2);
        assert_eq!(report.titles_updated(), 1);
        assert_eq!(report.entries().len(), 2);
    }

    #[test]
    fn test_empty_report_still_writes_header() {
        let report = RunReport::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILENAME);
        report.write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.trim_end(),
            "post_id,post_slug,original_title,updated_title,meta_description_added,keyword_added"
        );
    }
}
