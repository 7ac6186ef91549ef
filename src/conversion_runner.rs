
use anyhow::Context;
use derive_builder::Builder;
use log::{debug, warn};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use crate::data_types::conversion_task::{ConversionOutcome, ConversionStatus, ConversionTask};
use crate::parsing::vcf_check::check_vcf_header;

/// Number of converter stderr lines retained when a conversion fails
const STDERR_TAIL_LINES: usize = 20;

/// Controls how the external converter is launched for each task
#[derive(Builder, Clone, Debug)]
#[builder(default)]
pub struct RunnerConfig {
    /// Python interpreter used to launch the converter
    python_exe: String,
    /// Path to the converter script, either absolute or resolved from PATH
    converter_fn: PathBuf,
    /// Array manifest forwarded to every invocation
    manifest_fn: PathBuf,
    /// Reference genome FASTA forwarded to every invocation
    genome_fasta_fn: PathBuf,
    /// if True, the converter drops indel calls from its output
    skip_indels: bool,
    /// if True, the converter expands multi-assay identifiers
    expand_identifiers: bool,
    /// if True, the converter reports duplicated assays separately
    unsquash_duplicates: bool,
    /// Optional auxiliary loci definitions forwarded to the converter
    auxiliary_loci_fn: Option<PathBuf>,
    /// Optional loci exclusion list forwarded to the converter
    filter_loci_fn: Option<PathBuf>
}

impl Default for RunnerConfig {
    fn default() -> Self {
        // these settings are set to reasonable defaults for unit tests
        // main.rs will set each of them manually based on user input
        Self {
            python_exe: "python".to_string(),
            converter_fn: PathBuf::from("gtc_to_vcf.py"),
            manifest_fn: PathBuf::new(),
            genome_fasta_fn: PathBuf::new(),
            skip_indels: false,
            expand_identifiers: false,
            unsquash_duplicates: false,
            auxiliary_loci_fn: None,
            filter_loci_fn: None
        }
    }
}

impl RunnerConfig {
    /// Assembles the converter argv for one task. Flag order is fixed so that
    /// dry-run output stays stable across runs and is directly comparable.
    /// Paths are passed through verbatim, nothing here goes near a shell.
    /// # Arguments
    /// * `task` - the conversion task to build the invocation for
    pub fn converter_args(&self, task: &ConversionTask) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.converter_fn.as_os_str().to_owned(),
            "--gtc-paths".into(), task.gtc_fn().as_os_str().to_owned(),
            "--manifest-file".into(), self.manifest_fn.as_os_str().to_owned(),
            "--genome-fasta-file".into(), self.genome_fasta_fn.as_os_str().to_owned(),
            // the converter accepts either a folder or an exact output filename here;
            // passing the exact filename keeps our expected-output bookkeeping honest
            "--output-vcf-path".into(), task.vcf_fn().as_os_str().to_owned(),
        ];
        if self.skip_indels {
            args.push("--skip-indels".into());
        }
        if self.expand_identifiers {
            args.push("--expand-identifiers".into());
        }
        if self.unsquash_duplicates {
            args.push("--unsquash-duplicates".into());
        }
        if let Some(aux_fn) = self.auxiliary_loci_fn.as_ref() {
            args.push("--auxiliary-loci".into());
            args.push(aux_fn.as_os_str().to_owned());
        }
        if let Some(filter_fn) = self.filter_loci_fn.as_ref() {
            args.push("--filter-loci".into());
            args.push(filter_fn.as_os_str().to_owned());
        }
        args
    }

    /// Renders the full command line for one task in a copy-pasteable form,
    /// used by dry runs and debug logging.
    /// # Arguments
    /// * `task` - the conversion task to render
    pub fn render_command(&self, task: &ConversionTask) -> String {
        let mut rendered: Vec<String> = vec![shell_quote(&self.python_exe)];
        rendered.extend(
            self.converter_args(task).iter()
                .map(|arg| shell_quote(&arg.to_string_lossy()))
        );
        rendered.join(" ")
    }

    // getters
    pub fn python_exe(&self) -> &str {
        &self.python_exe
    }
}

/// Single-quotes an argument unless every character is shell-safe; embedded
/// single quotes use the `'\''` idiom so the rendered line stays pasteable
fn shell_quote(argument: &str) -> String {
    let is_safe = !argument.is_empty() && argument.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '=' | '+' | ',' | '@' | '%')
    });
    if is_safe {
        argument.to_string()
    } else {
        format!("'{}'", argument.replace('\'', "'\\''"))
    }
}

/// Collapses converter stderr down to its last non-empty lines on one line
fn stderr_tail(raw_stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw_stderr);
    let lines: Vec<&str> = text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("; ")
}

/// Entry point for converting a single GTC file. Launches the external converter,
/// waits for it, and classifies whatever happened into a `ConversionOutcome`.
/// Converter misbehavior is an outcome, not an error; only launch failures bubble up.
/// # Arguments
/// * `task` - the conversion task to run
/// * `runner_config` - collection of configuration items shared by the whole batch
/// # Errors
/// * if the converter process cannot be launched at all
pub fn run_conversion(task: &ConversionTask, runner_config: &RunnerConfig) -> anyhow::Result<ConversionOutcome> {
    let start_time = Instant::now();
    debug!("Launching: {}", runner_config.render_command(task));

    let converter_output = Command::new(runner_config.python_exe())
        .args(runner_config.converter_args(task))
        .output()
        .with_context(|| format!("Error while launching converter for {:?}:", task.gtc_fn()))?;
    let runtime_seconds = start_time.elapsed().as_secs_f64();

    if !converter_output.status.success() {
        let tail = stderr_tail(&converter_output.stderr);
        warn!("Converter failed for {:?} ({}): {tail}", task.gtc_fn(), converter_output.status);
        return Ok(ConversionOutcome::new(ConversionStatus::ConverterFailed, runtime_seconds, tail));
    }

    if !task.vcf_fn().exists() {
        warn!("Converter exited cleanly for {:?} but produced no output", task.gtc_fn());
        return Ok(ConversionOutcome::new(
            ConversionStatus::MissingOutput, runtime_seconds,
            format!("expected output \"{}\" was not created", task.vcf_fn().display())
        ));
    }

    match check_vcf_header(task.vcf_fn()) {
        Ok(()) => Ok(ConversionOutcome::new(ConversionStatus::Converted, runtime_seconds, String::new())),
        Err(e) => {
            warn!("Output check failed for {:?}: {e:#}", task.vcf_fn());
            Ok(ConversionOutcome::new(ConversionStatus::InvalidOutput, runtime_seconds, format!("{e:#}")))
        }
    }
}
