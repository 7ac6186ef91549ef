
use anyhow::{Context, bail};
use log::debug;
use std::path::{Path, PathBuf};

/// File extension the scanner accepts, compared case-insensitively
const GTC_EXTENSION: &str = "gtc";

/// Returns true if the path carries the GTC extension
fn is_gtc_file(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.eq_ignore_ascii_case(GTC_EXTENSION))
        .unwrap_or(false)
}

/// Expands the user-provided GTC paths into a sorted, deduplicated list of GTC files.
/// Directories are scanned one level deep; the converter itself does not recurse either.
/// # Arguments
/// * `gtc_paths` - the `--gtc-paths` entries, each a GTC file or a directory of them
/// # Errors
/// * if an entry does not exist, or is a file without the GTC extension
/// * if a directory entry contains no GTC files at all
pub fn find_gtc_files(gtc_paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = vec![];
    for gtc_path in gtc_paths {
        if gtc_path.is_dir() {
            let mut dir_hits: usize = 0;
            for entry in std::fs::read_dir(gtc_path)
                .with_context(|| format!("Error while scanning {gtc_path:?}:"))? {
                let entry_path = entry
                    .with_context(|| format!("Error while scanning {gtc_path:?}:"))?
                    .path();
                if entry_path.is_file() && is_gtc_file(&entry_path) {
                    found.push(entry_path);
                    dir_hits += 1;
                }
            }

            if dir_hits == 0 {
                bail!("No GTC files found in directory: \"{}\"", gtc_path.display());
            }
            debug!("Found {dir_hits} GTC files in {gtc_path:?}");
        } else if gtc_path.is_file() {
            if !is_gtc_file(gtc_path) {
                bail!("Not a GTC file: \"{}\"", gtc_path.display());
            }
            found.push(gtc_path.clone());
        } else {
            bail!("GTC path does not exist: \"{}\"", gtc_path.display());
        }
    }

    // a file given explicitly can also live inside a scanned directory
    found.sort();
    found.dedup();

    if found.is_empty() {
        bail!("No GTC files found.");
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a folder with a mix of GTC and non-GTC content
    fn build_gtc_folder() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("sample_b.gtc"), b"gtc").unwrap();
        std::fs::write(temp_dir.path().join("sample_a.gtc"), b"gtc").unwrap();
        std::fs::write(temp_dir.path().join("sample_c.GTC"), b"gtc").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"not a gtc").unwrap();

        // nested folders are intentionally not scanned
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
        std::fs::write(temp_dir.path().join("nested").join("sample_d.gtc"), b"gtc").unwrap();
        temp_dir
    }

    #[test]
    fn test_directory_scan() {
        let temp_dir = build_gtc_folder();
        let found = find_gtc_files(&[temp_dir.path().to_path_buf()]).unwrap();

        assert_eq!(found, vec![
            temp_dir.path().join("sample_a.gtc"),
            temp_dir.path().join("sample_b.gtc"),
            temp_dir.path().join("sample_c.GTC")
        ]);
    }

    #[test]
    fn test_file_and_directory_dedup() {
        let temp_dir = build_gtc_folder();
        let explicit = temp_dir.path().join("sample_b.gtc");
        let found = find_gtc_files(&[explicit, temp_dir.path().to_path_buf()]).unwrap();

        // sample_b must only appear once despite being listed twice
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_non_gtc_file_rejected() {
        let temp_dir = build_gtc_folder();
        let error = find_gtc_files(&[temp_dir.path().join("notes.txt")]).unwrap_err();
        assert!(error.to_string().starts_with("Not a GTC file"));
    }

    #[test]
    fn test_missing_path_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let error = find_gtc_files(&[temp_dir.path().join("absent.gtc")]).unwrap_err();
        assert!(error.to_string().starts_with("GTC path does not exist"));
    }

    #[test]
    fn test_empty_directory_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let error = find_gtc_files(&[temp_dir.path().to_path_buf()]).unwrap_err();
        assert!(error.to_string().starts_with("No GTC files found in directory"));
    }
}
