//! Finding the `.xcodeproj` and `project.pbxproj` for a user-supplied path.

use crate::error::XcnavError;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a project lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// Directory `SOURCE_ROOT` paths are relative to.
    pub root: PathBuf,
    /// The descriptor file to load.
    pub descriptor: PathBuf,
}

/// Locates a project from a directory, an `.xcodeproj` bundle, or a descriptor file.
///
/// For a directory, the first `*.xcodeproj` entry in name order is used.
pub fn locate_project(path: impl AsRef<Path>) -> Result<ProjectLocation, XcnavError> {
    let path = std::path::absolute(path.as_ref()).map_err(|e| XcnavError::io(path.as_ref(), e))?;
    let path = crate::resolve::normalize(&path);

    if path.is_file() {
        let bundle = path.parent().filter(|p| is_xcodeproj(p));
        let root = bundle
            .and_then(Path::parent)
            .or_else(|| path.parent())
            .map(Path::to_path_buf)
            .ok_or_else(|| XcnavError::ProjectNotFound(path.clone()))?;
        return Ok(ProjectLocation {
            root,
            descriptor: path,
        });
    }
    if is_xcodeproj(&path) {
        return from_bundle(&path);
    }
    if !path.is_dir() {
        return Err(XcnavError::ProjectNotFound(path));
    }

    let entries = fs::read_dir(&path).map_err(|e| XcnavError::io(&path, e))?;
    let mut bundles: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| is_xcodeproj(p) && p.is_dir())
        .collect();
    bundles.sort();
    match bundles.into_iter().next() {
        Some(bundle) => from_bundle(&bundle),
        None => Err(XcnavError::ProjectNotFound(path)),
    }
}

fn is_xcodeproj(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "xcodeproj")
}

fn from_bundle(bundle: &Path) -> Result<ProjectLocation, XcnavError> {
    let descriptor = bundle.join("project.pbxproj");
    if !descriptor.is_file() {
        return Err(XcnavError::ProjectNotFound(bundle.to_path_buf()));
    }
    let root = bundle
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| XcnavError::ProjectNotFound(bundle.to_path_buf()))?;
    Ok(ProjectLocation { root, descriptor })
}
