
use anyhow::bail;
use clap::Args;
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename, FULL_VERSION};

#[derive(Args, Clone, Debug, Default, Serialize)]
pub struct ConvertSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    gtcrunner_version: String,

    /// GTC files and/or directories containing GTC files
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "gtc-paths")]
    #[clap(value_name = "GTC|DIR")]
    #[clap(num_args = 1..)]
    #[clap(help_heading = Some("Input/Output"))]
    pub gtc_paths: Vec<PathBuf>,

    /// Array manifest describing probe-to-genome mapping (BPM)
    #[clap(required = true)]
    #[clap(short = 'm')]
    #[clap(long = "manifest-file")]
    #[clap(value_name = "BPM")]
    #[clap(help_heading = Some("Input/Output"))]
    pub manifest_fn: PathBuf,

    /// Reference genome FASTA used for coordinate and allele normalization
    #[clap(required = true)]
    #[clap(short = 'f')]
    #[clap(long = "genome-fasta-file")]
    #[clap(value_name = "FASTA")]
    #[clap(help_heading = Some("Input/Output"))]
    pub genome_fasta_fn: PathBuf,

    /// Output directory for the generated VCF files
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-vcf-path")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_folder: PathBuf,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// Exclude indel variant calls from the converter output
    #[clap(long = "skip-indels")]
    #[clap(help_heading = Some("Converter passthrough"))]
    pub skip_indels: bool,

    /// Expand multi-assay identifiers into one record per assay
    #[clap(long = "expand-identifiers")]
    #[clap(help_heading = Some("Converter passthrough"))]
    pub expand_identifiers: bool,

    /// Report duplicated assays as separate records instead of squashing them
    #[clap(long = "unsquash-duplicates")]
    #[clap(help_heading = Some("Converter passthrough"))]
    pub unsquash_duplicates: bool,

    /// Auxiliary loci definitions (VCF) forwarded to the converter
    #[clap(long = "auxiliary-loci")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Converter passthrough"))]
    pub auxiliary_loci_fn: Option<PathBuf>,

    /// Loci names to exclude, one per line, forwarded to the converter
    #[clap(long = "filter-loci")]
    #[clap(value_name = "FILE")]
    #[clap(help_heading = Some("Converter passthrough"))]
    pub filter_loci_fn: Option<PathBuf>,

    /// Path to the external gtc_to_vcf.py converter script
    #[clap(long = "converter")]
    #[clap(value_name = "PY")]
    #[clap(default_value = "gtc_to_vcf.py")]
    #[clap(help_heading = Some("Converter execution"))]
    pub converter_fn: PathBuf,

    /// Python interpreter used to launch the converter
    #[clap(long = "python")]
    #[clap(value_name = "EXE")]
    #[clap(default_value = "python")]
    #[clap(help_heading = Some("Converter execution"))]
    pub python_exe: String,

    /// Print the assembled converter commands without launching anything
    #[clap(long = "dry-run")]
    #[clap(help_heading = Some("Converter execution"))]
    pub dry_run: bool,

    /// Number of converter processes to run concurrently
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_convert_settings(mut settings: ConvertSettings) -> anyhow::Result<ConvertSettings> {
    // hard code the version in
    settings.gtcrunner_version = FULL_VERSION.clone();
    info!("Gtcrunner version: {:?}", &settings.gtcrunner_version);
    info!("Inputs:");

    // check for all the required input files; GTC paths can be files or folders, so exists() is the right check for both
    if settings.gtc_paths.is_empty() {
        bail!("At least one --gtc-paths entry is required");
    }
    for gtc_path in settings.gtc_paths.iter() {
        check_required_filename(gtc_path, "GTC path")?;
    }
    check_required_filename(&settings.manifest_fn, "Manifest file")?;
    check_required_filename(&settings.genome_fasta_fn, "Genome FASTA")?;
    check_optional_filename(settings.auxiliary_loci_fn.as_deref(), "Auxiliary loci")?;
    check_optional_filename(settings.filter_loci_fn.as_deref(), "Filter loci")?;

    // dump stuff to the logger
    for gtc_path in settings.gtc_paths.iter() {
        info!("\tGTC path: {gtc_path:?}");
    }
    info!("\tManifest file: {:?}", &settings.manifest_fn);
    info!("\tGenome FASTA: {:?}", &settings.genome_fasta_fn);
    if let Some(filename) = settings.auxiliary_loci_fn.as_deref() {
        info!("\tAuxiliary loci: {filename:?}");
    } else {
        info!("\tAuxiliary loci: None");
    }
    if let Some(filename) = settings.filter_loci_fn.as_deref() {
        info!("\tFilter loci: {filename:?}");
    } else {
        info!("\tFilter loci: None");
    }

    // the converter needs a samtools-style index next to the FASTA, flag it early instead of failing N times downstream
    let fasta_index = {
        let mut os_string = settings.genome_fasta_fn.as_os_str().to_owned();
        os_string.push(".fai");
        PathBuf::from(os_string)
    };
    if !fasta_index.exists() {
        warn!("No FASTA index found at {fasta_index:?}, the converter may fail or rebuild it on every launch.");
    }

    // converter passthrough options
    if settings.skip_indels || settings.expand_identifiers || settings.unsquash_duplicates {
        info!("Converter passthrough:");
        info!("\tSkip indels: {}", if settings.skip_indels { "ENABLED" } else { "DISABLED" });
        info!("\tExpand identifiers: {}", if settings.expand_identifiers { "ENABLED" } else { "DISABLED" });
        info!("\tUnsquash duplicates: {}", if settings.unsquash_duplicates { "ENABLED" } else { "DISABLED" });
    }

    // converter execution; a bare script name is resolved from PATH at launch time, so only paths with a parent are checked here
    info!("Converter execution:");
    if settings.converter_fn.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
        check_required_filename(&settings.converter_fn, "Converter script")?;
    }
    info!("\tConverter script: {:?}", &settings.converter_fn);
    if settings.python_exe.is_empty() {
        bail!("--python must not be empty");
    }
    info!("\tPython interpreter: {:?}", &settings.python_exe);
    if settings.dry_run {
        info!("\tDry run: ENABLED");
    }

    // outputs
    info!("Outputs:");
    info!("\tOutput folder: {:?}", &settings.output_folder);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}
