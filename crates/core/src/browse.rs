//! Sibling-image navigation.
//!
//! Backs the viewer's previous/next actions: given the currently open
//! file, find the neighboring image in the same directory, wrapping around
//! at both ends.

use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions the viewer navigates between.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "bmp", "tiff"];

/// Navigation direction relative to the current file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Returns the neighboring image file in the current file's directory.
///
/// Siblings are ordered by file name; stepping past either end wraps to
/// the other. A file that is its own only image sibling comes back
/// unchanged.
pub fn neighbor(path: &Path, direction: Direction) -> Result<PathBuf> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| AppError::browse(format!("{} has no parent directory", path.display())))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::browse(format!("{} has no file name", path.display())))?;

    let mut siblings: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| is_image(p))
        .collect();
    siblings.sort();

    let pos = siblings
        .iter()
        .position(|p| p.file_name() == Some(file_name))
        .ok_or_else(|| {
            AppError::browse(format!("{} not found among its siblings", path.display()))
        })?;

    let len = siblings.len();
    let target = match direction {
        Direction::Previous => (pos + len - 1) % len,
        Direction::Next => (pos + 1) % len,
    };
    Ok(siblings.swap_remove(target))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|x| ext.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}
