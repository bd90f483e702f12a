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

use crate::Error;

/// Trait for lifting foreign errors into the error chain.
///
/// This trait is implemented for the [`std::result::Result`] type with any [`std::error::Error`]
/// as the error, to provide functionality for converting the received error to an [`Error`]
/// while optionally annotating it.
///
/// This should only be used when propagating from an error that is outside our system,
/// i.e. foreign.  For errors which are already [`Error`]s, use the
/// [`ErrorContext`][crate::traits::ErrorContext] trait.
pub trait ForeignError<T, S>
where
    S: std::error::Error + Send + Sync + 'static,
{
    /// Maps a `Result<T, S>` to `Result<T, Error>`, logging a warning.
    ///
    /// The [Ok] variant is left untouched.  The [Err] value becomes an opaque leaf of the chain,
    /// which is also its cause.  Same as using `?`.
    fn foreign_err(self) -> crate::Result<T>;

    /// Maps a `Result<T, S>` to `Result<T, Error>`, adding the message on top of the lifted error.
    ///
    /// The message is lazily evaluated.
    fn foreign_ctx<C, F>(self, f: F) -> crate::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, S> ForeignError<T, S> for std::result::Result<T, S>
where
    S: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn foreign_err(self) -> crate::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(source) => Err(Error::from(source)),
        }
    }

    #[track_caller]
    fn foreign_ctx<C, F>(self, f: F) -> crate::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(source) => Err(crate::annotate(Error::from(source), f())),
        }
    }
}

/// Trait for lifting boxed foreign errors into the error chain.
///
/// This trait is essentially the [`ForeignError`] trait but implemented for
/// `std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>`.
pub trait ForeignBoxed<T> {
    /// Maps a `Result<T, Box<dyn std::error::Error + Send + Sync>>` to `Result<T, Error>`,
    /// logging a warning.
    ///
    /// The [Ok] variant is left untouched.
    fn foreign_boxed_err(self) -> crate::Result<T>;
}

impl<T> ForeignBoxed<T> for std::result::Result<T, Box<dyn std::error::Error + Send + Sync>> {
    #[track_caller]
    fn foreign_boxed_err(self) -> crate::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(source) => Err(Error::from_boxed(source)),
        }
    }
}
