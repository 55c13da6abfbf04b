use std::path::{Path, PathBuf};

/// Rewrite a POSIX-form drive path (`/c/Users/x`) for a Windows shell.
///
/// On other hosts the path is returned unchanged. On Windows the path is
/// split on `/`, a leading empty segment is dropped, the drive segment is
/// upper-cased (gaining a `:` if it is a bare letter) and the segments are
/// joined with `\`.
pub fn normalize_path(path: &str, is_windows: bool) -> String {
    if !is_windows {
        return path.to_string();
    }

    let mut segments = path.split('/');
    if path.starts_with('/') {
        segments.next();
    }

    let mut drive = segments.next().unwrap_or_default().to_uppercase();
    if drive.len() == 1 && drive.chars().all(|c| c.is_ascii_alphabetic()) {
        drive.push(':');
    }

    std::iter::once(drive)
        .chain(segments.map(str::to_string))
        .collect::<Vec<_>>()
        .join("\\")
}

/// True when the first segment of `path` names a drive: `/c/...` or `c:/...`
pub fn is_drive_path(path: &str) -> bool {
    let (first, slashed) = match path.strip_prefix('/') {
        Some(rest) => (rest.split('/').next().unwrap_or_default(), true),
        None => (path.split('/').next().unwrap_or_default(), false),
    };
    let mut chars = first.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), None, None) => slashed && letter.is_ascii_alphabetic(),
        (Some(letter), Some(':'), None) => letter.is_ascii_alphabetic(),
        _ => false,
    }
}

/// Normalize a workspace directory given on the command line.
///
/// Only drive-shaped paths are rewritten; relative and native paths pass
/// through untouched.
pub fn host_path_for(path: &Path, is_windows: bool) -> PathBuf {
    let raw = path.to_string_lossy();
    if !is_windows || !is_drive_path(&raw) {
        return path.to_path_buf();
    }
    PathBuf::from(normalize_path(&raw, true))
}

/// [`host_path_for`] on the current host
pub fn host_path(path: &Path) -> PathBuf {
    host_path_for(path, cfg!(windows))
}
