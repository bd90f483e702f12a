// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Source locations attached to chain nodes, and trimming of their file paths.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::{OnceLock, PoisonError, RwLock},
};

/// Environment variable from which the default trim root is read.
pub const TRIM_ROOT_ENV: &str = "BHERRCHAIN_TRIM_ROOT";

static TRIM_ROOT: OnceLock<RwLock<Option<PathBuf>>> = OnceLock::new();

/// Position in the source code where an error was created.
///
/// A location with an empty `file` is considered unset, see [`Location::is_set`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// Path of the source file, relative to the trim root when one is configured.
    pub file: Cow<'static, str>,
    /// Line within the `file`.
    pub line: u32,
}

impl Location {
    /// Creates a location from its parts.
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Captures the location of the caller.
    ///
    /// Together with `#[track_caller]` on the calling function this yields the position of the
    /// outermost tracked call, i.e. the user's call site.  The file path is trimmed of the
    /// configured root, see [`set_trim_root`].
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_std(std::panic::Location::caller())
    }

    pub(crate) fn from_std(location: &'static std::panic::Location<'static>) -> Self {
        let file = match trim_root_prefix() {
            Some(root) => trim_root(location.file(), &root),
            None => location.file(),
        };

        Self {
            file: Cow::Borrowed(file),
            line: location.line(),
        }
    }

    /// Reports whether the location has been set.
    pub fn is_set(&self) -> bool {
        !self.file.is_empty()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Returns `path` relative to `root` if it lies within it, otherwise `path` unchanged.
///
/// Containment is decided per path component, so `/src/app` is not considered to contain
/// `/src/application/main.rs`.
pub fn trim_root<'a>(path: &'a str, root: &Path) -> &'a str {
    match Path::new(path).strip_prefix(root).ok().and_then(Path::to_str) {
        Some(relative) if !relative.is_empty() => relative,
        _ => path,
    }
}

/// Sets the process-wide root prefix trimmed from captured file paths.
///
/// `None` disables trimming.  Only locations captured after the call are affected.
pub fn set_trim_root(root: Option<PathBuf>) {
    let mut current = trim_root_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *current = root;
}

/// Returns the currently configured trim root.
///
/// Unless overridden with [`set_trim_root`], it is read once from the [`TRIM_ROOT_ENV`]
/// environment variable.
pub fn trim_root_prefix() -> Option<PathBuf> {
    trim_root_lock()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn trim_root_lock() -> &'static RwLock<Option<PathBuf>> {
    TRIM_ROOT.get_or_init(|| {
        let root = std::env::var_os(TRIM_ROOT_ENV)
            .filter(|root| !root.is_empty())
            .map(PathBuf::from);
        RwLock::new(root)
    })
}
