// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! File placements: a local source file and a repository-relative directory.
//!
//! ```text
//! FileSpec { source, target }
//!   FilePlacement::new()          source is a regular file
//!                                 target non-empty, relative, no ".."
//!                                 target split on '/' and '\', "." dropped
//!   place(root)                   root/target/basename(source)
//!                                 walked per component, symlinks resolved
//!                                 and kept under root before any mkdir
//!                                 returns "target/basename" (forward slashes)
//! ```


use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::config::types::FileSpec;
use crate::error::{FleetError, FleetResult, PlacementError};

/// A validated file placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlacement {
    source: PathBuf,
    file_name: OsString,
    target: Vec<String>,
}

impl FilePlacement {
    /// Validate and normalize a placement.
    ///
    /// # Errors
    ///
    /// Returns a `PlacementError` when the source is not a regular file, or
    /// the target is empty, absolute, or contains a `..` segment.
    pub fn new(source: impl Into<PathBuf>, target: &str) -> Result<Self, PlacementError> {
        let source = source.into();
        let display = source.display().to_string();

        let file_name = match source.file_name() {
            Some(name) if source.is_file() => name.to_os_string(),
            _ => return Err(PlacementError::SourceMissing(display)),
        };

        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(PlacementError::EmptyTarget(display));
        }
        if is_absolute(trimmed) {
            return Err(PlacementError::AbsoluteTarget(target.to_string()));
        }

        let mut components = Vec::new();
        for part in trimmed.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => return Err(PlacementError::Traversal(target.to_string())),
                normal => components.push(normal.to_string()),
            }
        }

        Ok(Self {
            source,
            file_name,
            target: components,
        })
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Normalized target directory; empty for the repository root.
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        self.target.iter().collect()
    }

    /// Repository-relative path of the written file, `/`-separated.
    #[must_use]
    pub fn relative_path(&self) -> String {
        let name = self.file_name.to_string_lossy();
        if self.target.is_empty() {
            name.into_owned()
        } else {
            format!("{}/{name}", self.target.join("/"))
        }
    }

    /// Copy the source into `root`, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::Escapes` if the resolved directory leaves the
    /// working tree (for example through a symlink in the repository),
    /// `PlacementError::SourceMissing` if the source vanished, or an I/O
    /// error if directory creation or the copy fails.
    pub fn place(&self, root: &Path) -> FleetResult<String> {
        let canonical_root = root.canonicalize()?;
        let canonical_dir = self.confined_dir(&canonical_root)?;

        let dest = canonical_dir.join(&self.file_name);
        if fs::symlink_metadata(&dest).is_ok_and(|m| m.file_type().is_symlink()) {
            fs::remove_file(&dest)?;
        }
        if !self.source.is_file() {
            return Err(PlacementError::SourceMissing(self.source.display().to_string()).into());
        }
        fs::copy(&self.source, &dest)?;

        let relative = self.relative_path();
        trace!(source = %self.source.display(), dest = %relative, "placed file");
        Ok(relative)
    }

    /// Walk the target one component at a time, creating missing directories.
    ///
    /// Nothing is created below a component until it resolves inside the tree.
    fn confined_dir(&self, canonical_root: &Path) -> FleetResult<PathBuf> {
        let mut dir = canonical_root.to_path_buf();
        for component in &self.target {
            let next = dir.join(component);
            match fs::symlink_metadata(&next) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    let resolved = next.canonicalize().map_err(|_| self.escapes())?;
                    if !resolved.starts_with(canonical_root) {
                        return Err(self.escapes());
                    }
                    dir = resolved;
                }
                Ok(_) => dir = next,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    fs::create_dir(&next)?;
                    dir = next;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(dir)
    }

    fn escapes(&self) -> FleetError {
        PlacementError::Escapes {
            path: self.relative_path(),
        }
        .into()
    }
}

fn is_absolute(target: &str) -> bool {
    let bytes = target.as_bytes();
    target.starts_with(['/', '\\'])
        || Path::new(target).is_absolute()
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Validate every configured placement, failing on the first bad one.
///
/// # Errors
///
/// Returns the first `PlacementError` encountered.
pub fn validate_all(specs: &[FileSpec]) -> FleetResult<Vec<FilePlacement>> {
    specs
        .iter()
        .map(|spec| FilePlacement::new(&spec.source, &spec.target).map_err(Into::into))
        .collect()
}
