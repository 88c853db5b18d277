use std::path::{Path, PathBuf};

/// Expand `~` and `$VAR` / `${VAR}` in a user supplied path.
///
/// Unknown variables are left as written.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full_with_context_no_errors(
        &raw,
        || std::env::var("HOME").ok(),
        |name| std::env::var(name).ok(),
    );
    PathBuf::from(expanded.as_ref())
}
