//! Thin wrappers around OS facilities the number and condition systems
//! touch at their edges: clocks, directory listings, and path
//! normalization. Kept separate from the arithmetic/condition core so
//! that core can stay free of `std::fs`/`std::time` if an embedder ever
//! needs to swap this module out.

use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CoreError;

/// A normalized `(seconds, nanoseconds)` timestamp, the representation
/// `current-second`/`current-jiffy` build on. `nanoseconds` is always in
/// `0..1_000_000_000`, matching POSIX `timespec` normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timespec {
    /// Whole seconds.
    pub seconds: i64,
    /// Nanoseconds within the second, always `0..1_000_000_000`.
    pub nanoseconds: u32,
}

impl Timespec {
    fn normalize(seconds: i64, nanoseconds: i64) -> Self {
        let extra_seconds = nanoseconds.div_euclid(1_000_000_000);
        let nanoseconds = nanoseconds.rem_euclid(1_000_000_000) as u32;
        Timespec {
            seconds: seconds + extra_seconds,
            nanoseconds,
        }
    }
}

/// `current-second`'s wall-clock reading, retried across `EINTR` as
/// `std::time::SystemTime` itself already guarantees on POSIX targets.
pub fn wall_clock_now() -> Timespec {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Timespec::normalize(duration.as_secs() as i64, duration.subsec_nanos() as i64)
}

/// `current-jiffy`'s monotonic reading, backed by `std::time::Instant`
/// relative to an arbitrary process-start epoch (monotonic clocks carry
/// no promise of wall-clock alignment).
pub fn monotonic_now() -> std::time::Instant {
    std::time::Instant::now()
}

/// List a directory's entries, sorted by name for determinism —
/// `std::fs::read_dir` makes no ordering guarantee, and a Scheme
/// `directory-files` that returns a different order per run would be a
/// portability trap.
pub fn list_directory(path: &Path) -> Result<Vec<String>, CoreError> {
    let mut names = std::fs::read_dir(path)
        .map_err(|_| CoreError::from(crate::error::ConditionTag::IoSystem))?
        .map(|entry| {
            entry
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .map_err(|_| CoreError::from(crate::error::ConditionTag::IoSystem))
        })
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names)
}

/// Expand a leading `~` to the user's home directory, then lexically
/// resolve `.`/`..` components without touching the filesystem (callers
/// needing symlink-aware resolution should use `std::fs::canonicalize`
/// themselves; this is for presenting a normalized path, not for
/// security-sensitive resolution).
pub fn normalize_path(input: &str) -> Result<PathBuf, CoreError> {
    let expanded = expand_tilde(input)?;
    Ok(lexically_normalize(&expanded))
}

fn expand_tilde(input: &str) -> Result<PathBuf, CoreError> {
    if let Some(rest) = input.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            let home = dirs::home_dir()
                .ok_or_else(|| CoreError::from(crate::error::ConditionTag::IoSystem))?;
            return Ok(home.join(rest.trim_start_matches('/')));
        }
    }
    Ok(PathBuf::from(input))
}

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Only pop a preceding normal component; `..` above the
                // root or a prefix (Windows drive letter) passes through
                // untouched rather than being discarded.
                match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    _ => out.push(".."),
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timespec_normalizes_overflowing_nanoseconds() {
        let t = Timespec::normalize(10, 1_500_000_000);
        assert_eq!(t.seconds, 11);
        assert_eq!(t.nanoseconds, 500_000_000);
    }

    #[test]
    fn timespec_normalizes_negative_nanoseconds() {
        let t = Timespec::normalize(10, -500_000_000);
        assert_eq!(t.seconds, 9);
        assert_eq!(t.nanoseconds, 500_000_000);
    }

    #[test]
    fn lexical_normalize_collapses_dot_and_dotdot() {
        let p = lexically_normalize(Path::new("/a/b/./c/../d"));
        assert_eq!(p, PathBuf::from("/a/b/d"));
    }

    #[test]
    fn lexical_normalize_keeps_leading_dotdot() {
        let p = lexically_normalize(Path::new("../a/../../b"));
        assert_eq!(p, PathBuf::from("../../b"));
    }

    #[test]
    fn wall_clock_now_is_plausible() {
        let t = wall_clock_now();
        assert!(t.seconds > 1_600_000_000);
        assert!(t.nanoseconds < 1_000_000_000);
    }
}
