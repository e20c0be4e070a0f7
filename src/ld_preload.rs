// LD_PRELOAD list handling.  The loader accepts entries separated by white
// spaces or `:', new entries are always added with `:'.

use std::ffi::{OsStr, OsString};
use std::path::Path;

pub const LD_PRELOAD: &str = "LD_PRELOAD";

const SEPARATOR: &str = ":";

// Returns the non-empty entries of an LD_PRELOAD value.
pub fn entries(value: &OsStr) -> Vec<String> {
    value
        .to_string_lossy()
        .split(&[':', ' ', '\t'][..])
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn contains(value: &OsStr, library: &Path) -> bool {
    entries(value)
        .iter()
        .any(|entry| Path::new(entry) == library)
}

// Place LIBRARY in front of the PRIOR value, if any.
pub fn prepend(library: &Path, prior: Option<&OsStr>) -> OsString {
    let mut r = OsString::from(library.as_os_str());
    match prior {
        Some(prior) if !prior.is_empty() => {
            r.push(SEPARATOR);
            r.push(prior);
        }
        _ => {}
    }
    r
}
