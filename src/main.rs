
use indicatif::ParallelProgressIterator;
use log::{LevelFilter, debug, error, info};
use rayon::prelude::*;
use std::time::Instant;

use gtcrunner::cli::convert::check_convert_settings;
use gtcrunner::cli::core::get_cli;
use gtcrunner::conversion_runner::{RunnerConfigBuilder, run_conversion};
use gtcrunner::data_types::conversion_task::{ConversionOutcome, ConversionStatus, ConversionTask, build_conversion_tasks};
use gtcrunner::parsing::gtc_discovery::find_gtc_files;
use gtcrunner::util::json_io::save_json;
use gtcrunner::util::progress_bar::get_progress_style;
use gtcrunner::writers::run_summary::RunSummaryWriter;

fn main() {
    // start the timer
    let start_time = Instant::now();
    let cli = get_cli();
    let settings = cli.settings;

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_convert_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // set up the number of threads for rayon; each thread supervises one converter process
    match rayon::ThreadPoolBuilder::new().num_threads(settings.threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            std::process::exit(exitcode::OSERR);
        }
    };

    // create the primary output folder
    info!("Creating output folder at {:?}...", settings.output_folder);
    match std::fs::create_dir_all(&settings.output_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // create a debug folder if specified, files might get created in sub-routines
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("Creating debug folder at {debug_folder:?}...");
        match std::fs::create_dir_all(debug_folder) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while creating debug folder: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }

        // save the CLI options
        let cli_json = debug_folder.join("cli_settings.json");
        info!("Saving CLI options to {cli_json:?}...");
        if let Err(e) = save_json(&settings, &cli_json) {
            error!("Error while saving CLI options: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // expand the user paths into the concrete batch
    info!("Searching for GTC files...");
    let gtc_files = match find_gtc_files(&settings.gtc_paths) {
        Ok(gf) => gf,
        Err(e) => {
            error!("Error while searching for GTC files: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Found {} GTC files to convert.", gtc_files.len());

    let all_tasks: Vec<ConversionTask> = match build_conversion_tasks(gtc_files, &settings.output_folder) {
        Ok(task_vec) => task_vec,
        Err(e) => {
            error!("Error while building conversion tasks: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // build our runner configuration
    let runner_config = match RunnerConfigBuilder::default()
        .python_exe(settings.python_exe.clone())
        .converter_fn(settings.converter_fn.clone())
        .manifest_fn(settings.manifest_fn.clone())
        .genome_fasta_fn(settings.genome_fasta_fn.clone())
        .skip_indels(settings.skip_indels)
        .expand_identifiers(settings.expand_identifiers)
        .unsquash_duplicates(settings.unsquash_duplicates)
        .auxiliary_loci_fn(settings.auxiliary_loci_fn.clone())
        .filter_loci_fn(settings.filter_loci_fn.clone())
        .build() {
        Ok(rc) => rc,
        Err(e) => {
            error!("Error while building runner config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    if settings.dry_run {
        info!("Dry run, printing converter commands without launching:");
        for task in all_tasks.iter() {
            println!("{}", runner_config.render_command(task));
        }
        info!("Dry run completed in {} seconds.", start_time.elapsed().as_secs_f64());
        return;
    }

    // run the parallel iterator to convert them
    let style = get_progress_style();
    info!("Converting GTC files...");
    let mut all_results: Vec<(ConversionTask, ConversionOutcome)> = all_tasks.into_par_iter()
        .map(|task| {
            debug!("task = {task:?}");
            let outcome = match run_conversion(&task, &runner_config) {
                Ok(o) => o,
                Err(e) => {
                    error!("Error while launching converter for task #{} ({:?}): {e:#}", task.task_id(), task.gtc_fn());
                    ConversionOutcome::new(ConversionStatus::LaunchFailed, 0.0, format!("{e:#}"))
                }
            };
            debug!("Outcome = {outcome:?}");
            (task, outcome)
        })
        .progress_with_style(style)
        .collect();

    // sort them by task ID
    all_results.sort_by_key(|(t, _o)| t.task_id());
    info!("Conversions complete, saving run summary...");

    let mut summary_writer = RunSummaryWriter::default();
    for (task, outcome) in all_results.iter() {
        summary_writer.add_outcome(task, outcome);
    }

    // now write things
    let summary_fn = settings.output_folder.join("conversion_summary.tsv");
    info!("Saving run summary to {summary_fn:?}...");
    if let Err(e) = summary_writer.write_summary(&summary_fn) {
        error!("Error while saving run summary file: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    let converted = summary_writer.converted();
    let failed = summary_writer.failed();
    info!("Converted:failed GTC files: {converted} : {failed}");
    info!("Conversions completed in {} seconds.", start_time.elapsed().as_secs_f64());

    if failed > 0 {
        error!("One or more conversions failed, see {summary_fn:?} for details.");
        std::process::exit(exitcode::SOFTWARE);
    }

    info!("Process finished successfully.");
}
