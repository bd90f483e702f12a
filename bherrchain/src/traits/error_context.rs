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

/// Extension trait for annotating errors within [`crate::Result`].
///
/// The methods are the [`crate::Result`] counterparts of [`crate::annotate`], [`crate::trace`]
/// and [`crate::mask`], recording the location of their call.  The [Ok] variant is left
/// untouched.
pub trait ErrorContext<T> {
    /// Adds the message on top of the [Err] variant, keeping its cause.
    ///
    /// The message is lazily evaluated.
    fn ctx<C, F>(self, f: F) -> crate::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;

    /// Records the location of the call on top of the [Err] variant.
    fn trace_err(self) -> crate::Result<T>;

    /// Adds the message on top of the [Err] variant, hiding its cause.
    ///
    /// The message is lazily evaluated.
    fn mask_err<C, F>(self, f: F) -> crate::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> ErrorContext<T> for crate::Result<T> {
    #[track_caller]
    fn ctx<C, F>(self, f: F) -> crate::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(crate::annotate(error, f())),
        }
    }

    #[track_caller]
    fn trace_err(self) -> crate::Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(crate::trace(error)),
        }
    }

    #[track_caller]
    fn mask_err<C, F>(self, f: F) -> crate::Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(crate::mask(error, f())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorContext as _;

    fn non_failing_function() -> crate::Result<()> {
        Ok(())
    }

    fn failing_function() -> crate::Result<()> {
        Err(crate::new("some error"))
    }

    #[test]
    fn test_ctx() {
        assert!(non_failing_function()
            .ctx(|| -> String { unreachable!("context of a success") })
            .is_ok());

        let (result, line) = (failing_function().ctx(|| "some error context"), line!());
        let error = result.unwrap_err();

        assert_eq!(error.to_string(), "some error context: some error");
        assert_eq!(error.cause().to_string(), "some error");
        assert_eq!(error.location().map(|location| location.line), Some(line));
    }

    #[test]
    fn test_trace_err() {
        assert!(non_failing_function().trace_err().is_ok());

        let (result, line) = (failing_function().trace_err(), line!());
        let error = result.unwrap_err();

        assert_eq!(error.to_string(), "some error");
        assert_eq!(error.stack().lines().count(), 2);
        assert_eq!(error.location().map(|location| location.line), Some(line));
    }

    #[test]
    fn test_mask_err() {
        assert!(non_failing_function().mask_err(|| "masked").is_ok());

        let error = failing_function().mask_err(|| "masked").unwrap_err();

        assert_eq!(error.to_string(), "masked: some error");
        assert!(error.cause().is_same(&error));
    }
}
