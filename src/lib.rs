
/// Command line interface functionality
pub mod cli;
/// Core logic for driving the external converter over a batch of GTC files
pub mod conversion_runner;
/// Contains various shared data types
pub mod data_types;
/// Tooling for locating and validating input/output files
pub mod parsing;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
