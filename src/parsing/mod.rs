/*!
# Parsing module
Contains the logic for locating input files and validating converter outputs.
*/

/// Expands user-provided GTC paths into the concrete batch of GTC files
pub mod gtc_discovery;
/// Header-level validation of converter-produced VCF files
pub mod vcf_check;
