/*!
# Writers module
Contains the logic for writing the output files for a conversion run.
*/

/// Generates the end-of-run conversion summary table
pub mod run_summary;
