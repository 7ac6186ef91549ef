
use indicatif::{ProgressState, ProgressStyle};

/// Shared styling for the batch conversion progress bar. Converter runs take
/// seconds to minutes each, so the bar tracks files and ETA rather than rates.
pub fn get_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {bar:40.green/white} {pos}/{len} GTC files ({percent}); ETA: {eta_precise} {msg}")
        .unwrap()
        .with_key("percent", |state: &ProgressState, w: &mut dyn std::fmt::Write| write!(w, "{:.1}%", state.fraction()*100.0).unwrap())
        .progress_chars("=>-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_valid() {
        // with_template panics on a malformed template, so building is the check
        let _style = get_progress_style();
    }
}
