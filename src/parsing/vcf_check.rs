
use anyhow::Context;
use log::debug;
use noodles::vcf;
use std::io::BufReader;
use std::path::Path;

/// Errors from validating a converter-produced VCF header
#[derive(thiserror::Error, Debug)]
pub enum VcfCheckError {
    #[error("expected exactly one sample in the VCF header, found {0}")]
    SampleCount(usize)
}

/// Wrapper function that handles both bgzip compressed and uncompressed VCF files
/// # Arguments
/// * `filename` - path to the .vcf(.gz) file to open
fn open_vcf_file(filename: &Path) -> anyhow::Result<vcf::io::Reader<BufReader<Box<dyn std::io::Read>>>> {
    let is_compressed = match filename.extension() {
        Some(extension) => {
            extension == "gz"
        },
        None => false
    };

    let raw_reader: Box<dyn std::io::Read> = if is_compressed {
        #[allow(clippy::default_constructed_unit_structs)]
        let bgzf_reader = noodles::bgzf::io::reader::Builder::default()
            .build_from_path(filename)
            .with_context(|| format!("Error while loading {filename:?}:"))?;
        Box::new(bgzf_reader)
    } else {
        let file = std::fs::File::open(filename)
            .with_context(|| format!("Error while loading {filename:?}:"))?;
        Box::new(file)
    };

    Ok(vcf::io::Reader::new(BufReader::new(raw_reader)))
}

/// Verifies that a converter-produced VCF parses at the header level and
/// describes a single-sample call set, which is all the converter ever emits.
/// # Arguments
/// * `filename` - path to the .vcf(.gz) file to verify
/// # Errors
/// * if the file does not open or the header does not parse
/// * if the header does not contain exactly one sample column
pub fn check_vcf_header(filename: &Path) -> anyhow::Result<()> {
    let mut vcf_reader = open_vcf_file(filename)?;
    let vcf_header = vcf_reader.read_header()
        .with_context(|| format!("Error while reading header of {filename:?}:"))?;

    let num_samples = vcf_header.sample_names().len();
    debug!("Found {num_samples} samples in {filename:?}");
    if num_samples != 1 {
        return Err(VcfCheckError::SampleCount(num_samples).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_SAMPLE_VCF: &str = "##fileformat=VCFv4.1\n\
        ##source=GTCtoVCF\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t206890160058_R01C01\n\
        1\t49554\trs868213491\tA\t.\t.\tPASS\t.\tGT:GQ\t0/0:3\n";

    const NO_SAMPLE_VCF: &str = "##fileformat=VCFv4.1\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

    #[test]
    fn test_single_sample_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = temp_dir.path().join("sample.vcf");
        std::fs::write(&vcf_fn, SINGLE_SAMPLE_VCF).unwrap();

        assert!(check_vcf_header(&vcf_fn).is_ok());
    }

    #[test]
    fn test_no_sample_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = temp_dir.path().join("sample.vcf");
        std::fs::write(&vcf_fn, NO_SAMPLE_VCF).unwrap();

        let error = check_vcf_header(&vcf_fn).unwrap_err();
        let check_error: VcfCheckError = error.downcast().unwrap();
        assert!(matches!(check_error, VcfCheckError::SampleCount(0)));
    }

    #[test]
    fn test_garbage_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let vcf_fn = temp_dir.path().join("sample.vcf");
        std::fs::write(&vcf_fn, "this is not a vcf\n").unwrap();

        assert!(check_vcf_header(&vcf_fn).is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(check_vcf_header(&temp_dir.path().join("absent.vcf")).is_err());
    }
}
