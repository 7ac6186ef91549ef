
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors while constructing conversion tasks from discovered GTC files
#[derive(thiserror::Error, Debug)]
pub enum TaskError {
    #[error("GTC filename is not valid UTF-8: {0:?}")]
    NonUtf8Stem(PathBuf),
    #[error("GTC files {first:?} and {second:?} both map to sample label {label:?}, their outputs would collide")]
    DuplicateLabel {
        label: String,
        first: PathBuf,
        second: PathBuf
    }
}

/// A single GTC to VCF conversion unit of work
#[derive(Clone, Debug)]
pub struct ConversionTask {
    /// Index of the task in the discovered batch, used for stable output ordering
    task_id: usize,
    /// The GTC file fed to the converter
    gtc_fn: PathBuf,
    /// The VCF file we expect the converter to produce
    vcf_fn: PathBuf,
    /// Sample label, derived from the GTC file stem
    sample_label: String
}

impl ConversionTask {
    /// Creates a new task for one GTC file. The expected output filename mirrors
    /// the converter's own convention: `<gtc stem>.vcf` inside the output folder.
    /// # Arguments
    /// * `task_id` - index of this task in the batch
    /// * `gtc_fn` - path to the GTC input
    /// * `output_folder` - destination folder for the VCF files
    /// # Errors
    /// * if the GTC file stem is not valid UTF-8, since we use it as the sample label
    pub fn new(task_id: usize, gtc_fn: PathBuf, output_folder: &Path) -> Result<Self, TaskError> {
        let sample_label = gtc_fn.file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| TaskError::NonUtf8Stem(gtc_fn.clone()))?
            .to_string();
        let vcf_fn = output_folder.join(format!("{sample_label}.vcf"));

        Ok(Self {
            task_id,
            gtc_fn,
            vcf_fn,
            sample_label
        })
    }

    // getters
    pub fn task_id(&self) -> usize {
        self.task_id
    }

    pub fn gtc_fn(&self) -> &Path {
        &self.gtc_fn
    }

    pub fn vcf_fn(&self) -> &Path {
        &self.vcf_fn
    }

    pub fn sample_label(&self) -> &str {
        &self.sample_label
    }
}

/// Builds the task batch for a set of discovered GTC files. Stems must be unique
/// across the whole batch: two GTC inputs sharing a stem would map to the same
/// output VCF and the parallel converter processes would race on it.
/// # Arguments
/// * `gtc_files` - the discovered GTC files, in batch order
/// * `output_folder` - destination folder for the VCF files
/// # Errors
/// * if any GTC file stem is not valid UTF-8
/// * if two GTC files share a stem
pub fn build_conversion_tasks(gtc_files: Vec<PathBuf>, output_folder: &Path) -> Result<Vec<ConversionTask>, TaskError> {
    let mut first_seen: HashMap<String, PathBuf> = HashMap::with_capacity(gtc_files.len());
    let mut tasks: Vec<ConversionTask> = Vec::with_capacity(gtc_files.len());
    for (task_id, gtc_fn) in gtc_files.into_iter().enumerate() {
        let task = ConversionTask::new(task_id, gtc_fn, output_folder)?;
        if let Some(first) = first_seen.insert(task.sample_label().to_string(), task.gtc_fn().to_path_buf()) {
            return Err(TaskError::DuplicateLabel {
                label: task.sample_label().to_string(),
                first,
                second: task.gtc_fn().to_path_buf()
            });
        }
        tasks.push(task);
    }
    Ok(tasks)
}

/// Final status of one conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum ConversionStatus {
    /// Converter exited 0 and the output VCF passed the header check
    #[strum(serialize = "CONVERTED")]
    Converted,
    /// Converter process could not be launched at all
    #[strum(serialize = "LAUNCH_FAILED")]
    LaunchFailed,
    /// Converter exited with a nonzero status
    #[strum(serialize = "CONVERTER_FAILED")]
    ConverterFailed,
    /// Converter exited 0 but the expected VCF was never created
    #[strum(serialize = "MISSING_OUTPUT")]
    MissingOutput,
    /// Output VCF exists but failed the header check
    #[strum(serialize = "INVALID_OUTPUT")]
    InvalidOutput
}

/// Captures what happened to one task, successful or not
#[derive(Clone, Debug)]
pub struct ConversionOutcome {
    /// Final classification for the task
    status: ConversionStatus,
    /// Wall time spent inside the converter process
    runtime_seconds: f64,
    /// Empty on success; stderr tail or error text on failure
    detail: String
}

impl ConversionOutcome {
    pub fn new(status: ConversionStatus, runtime_seconds: f64, detail: String) -> Self {
        Self {
            status,
            runtime_seconds,
            detail
        }
    }

    /// Returns true if the converter ran and produced a usable VCF
    pub fn is_success(&self) -> bool {
        self.status == ConversionStatus::Converted
    }

    // getters
    pub fn status(&self) -> ConversionStatus {
        self.status
    }

    pub fn runtime_seconds(&self) -> f64 {
        self.runtime_seconds
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_naming() {
        let task = ConversionTask::new(
            3, PathBuf::from("/data/gtc_files/206890160058_R01C01.gtc"), Path::new("/data/vcf_files")
        ).unwrap();

        assert_eq!(task.task_id(), 3);
        assert_eq!(task.sample_label(), "206890160058_R01C01");
        assert_eq!(task.vcf_fn(), Path::new("/data/vcf_files/206890160058_R01C01.vcf"));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ConversionStatus::Converted.to_string(), "CONVERTED");
        assert_eq!(ConversionStatus::ConverterFailed.to_string(), "CONVERTER_FAILED");
        assert_eq!(ConversionStatus::MissingOutput.to_string(), "MISSING_OUTPUT");
    }

    #[test]
    fn test_build_batch() {
        let gtc_files = vec![
            PathBuf::from("/data/gtc/sample_a.gtc"),
            PathBuf::from("/data/gtc/sample_b.gtc")
        ];
        let tasks = build_conversion_tasks(gtc_files, Path::new("/data/vcf")).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_id(), 0);
        assert_eq!(tasks[1].task_id(), 1);
        assert_eq!(tasks[1].sample_label(), "sample_b");
    }

    #[test]
    fn test_build_batch_rejects_colliding_stems() {
        // same stem from two different folders would race on one output VCF
        let gtc_files = vec![
            PathBuf::from("/data/plate1/sample_a.gtc"),
            PathBuf::from("/data/plate2/sample_a.gtc")
        ];
        let error = build_conversion_tasks(gtc_files, Path::new("/data/vcf")).unwrap_err();

        assert!(matches!(&error, TaskError::DuplicateLabel { label, .. } if label == "sample_a"));
        let message = error.to_string();
        assert!(message.contains("/data/plate1/sample_a.gtc"));
        assert!(message.contains("/data/plate2/sample_a.gtc"));
    }

    #[test]
    fn test_outcome_success() {
        let good = ConversionOutcome::new(ConversionStatus::Converted, 1.5, String::new());
        assert!(good.is_success());

        let bad = ConversionOutcome::new(ConversionStatus::MissingOutput, 0.1, "gone".to_string());
        assert!(!bad.is_success());
    }
}
