
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::data_types::conversion_task::{ConversionOutcome, ConversionTask};

/// This is a wrapper for writing out per-task outcomes to a file
#[derive(Default)]
pub struct RunSummaryWriter {
    /// One row per conversion task, in batch order
    rows: Vec<SummaryRow>,
    /// Number of tasks that produced a usable VCF
    converted: u64,
    /// Number of tasks that did not
    failed: u64
}

/// Contains all the data written to each row of our summary file
#[derive(Serialize)]
struct SummaryRow {
    /// Sample label derived from the GTC file stem
    sample: String,
    /// The GTC input path
    gtc: String,
    /// The expected VCF output path
    vcf: String,
    /// Final status label for the task
    status: String,
    /// Wall time spent inside the converter process
    runtime_seconds: f64,
    /// Empty on success; stderr tail or error text on failure
    detail: String
}

impl RunSummaryWriter {
    /// Adds the outcome for one task to our collection
    /// # Arguments
    /// * `task` - the task that was run
    /// * `outcome` - whatever happened to it
    pub fn add_outcome(&mut self, task: &ConversionTask, outcome: &ConversionOutcome) {
        if outcome.is_success() {
            self.converted += 1;
        } else {
            self.failed += 1;
        }

        self.rows.push(SummaryRow {
            sample: task.sample_label().to_string(),
            gtc: task.gtc_fn().display().to_string(),
            vcf: task.vcf_fn().display().to_string(),
            status: outcome.status().to_string(),
            runtime_seconds: outcome.runtime_seconds(),
            detail: outcome.detail().to_string()
        });
    }

    /// Will write the summary out to the given file path
    /// # Arguments
    /// * `filename` - the filename for the output (tsv/csv)
    pub fn write_summary(&self, filename: &Path) -> csv::Result<()> {
        // modify the delimiter to "," if it ends with .csv
        let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
        let delimiter: u8 = if is_csv { b',' } else { b'\t' };
        let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;

        for row in self.rows.iter() {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    // getters
    pub fn converted(&self) -> u64 {
        self.converted
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::conversion_task::ConversionStatus;
    use std::path::PathBuf;

    fn build_writer() -> RunSummaryWriter {
        let mut summary_writer = RunSummaryWriter::default();

        let good_task = ConversionTask::new(
            0, PathBuf::from("/data/gtc/sample_a.gtc"), Path::new("/data/vcf")
        ).unwrap();
        let good = ConversionOutcome::new(ConversionStatus::Converted, 12.5, String::new());
        summary_writer.add_outcome(&good_task, &good);

        let bad_task = ConversionTask::new(
            1, PathBuf::from("/data/gtc/sample_b.gtc"), Path::new("/data/vcf")
        ).unwrap();
        let bad = ConversionOutcome::new(
            ConversionStatus::ConverterFailed, 0.3, "Manifest FASTA mismatch".to_string()
        );
        summary_writer.add_outcome(&bad_task, &bad);
        summary_writer
    }

    #[test]
    fn test_counts() {
        let summary_writer = build_writer();
        assert_eq!(summary_writer.converted(), 1);
        assert_eq!(summary_writer.failed(), 1);
    }

    #[test]
    fn test_write_summary_tsv() {
        let summary_writer = build_writer();
        let temp_dir = tempfile::tempdir().unwrap();
        let summary_fn = temp_dir.path().join("conversion_summary.tsv");
        summary_writer.write_summary(&summary_fn).unwrap();

        let content = std::fs::read_to_string(&summary_fn).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "sample\tgtc\tvcf\tstatus\truntime_seconds\tdetail");
        assert!(lines[1].starts_with("sample_a\t/data/gtc/sample_a.gtc\t/data/vcf/sample_a.vcf\tCONVERTED\t12.5"));
        assert!(lines[2].contains("CONVERTER_FAILED"));
        assert!(lines[2].ends_with("Manifest FASTA mismatch"));
    }

    #[test]
    fn test_write_summary_csv() {
        let summary_writer = build_writer();
        let temp_dir = tempfile::tempdir().unwrap();
        let summary_fn = temp_dir.path().join("conversion_summary.csv");
        summary_writer.write_summary(&summary_fn).unwrap();

        let content = std::fs::read_to_string(&summary_fn).unwrap();
        assert!(content.starts_with("sample,gtc,vcf,status,runtime_seconds,detail"));
    }
}
