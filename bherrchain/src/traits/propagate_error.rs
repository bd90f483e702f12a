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

/// Trait for substituting the cause of errors within [`crate::Result`].
///
/// The methods are the [`crate::Result`] counterparts of [`crate::wrap`]: the annotation history
/// of the received error is kept, while the cause becomes the returned error.  This lets callers
/// [check][crate::Error::check] the error against a domain-specific cause, without losing track
/// of how the original error came to be.
pub trait PropagateError<T> {
    /// Replaces the cause of the [Err] variant with the error created by `F`.
    ///
    /// The [Ok] variant is left untouched.  Foreign errors are accepted as causes as well.
    fn with_cause<C, F>(self, f: F) -> crate::Result<T>
    where
        Error: From<C>,
        F: FnOnce() -> C;

    /// Replaces the cause of the [Err] variant with the error created by applying `F` to its
    /// current [cause][crate::Error::cause].
    ///
    /// Use this method to return a different cause by matching on the received one.
    fn match_cause<C, F>(self, f: F) -> crate::Result<T>
    where
        Error: From<C>,
        F: FnOnce(&Error) -> C;
}

impl<T> PropagateError<T> for crate::Result<T> {
    #[track_caller]
    fn with_cause<C, F>(self, f: F) -> crate::Result<T>
    where
        Error: From<C>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(crate::wrap(error, Error::from(f()))),
        }
    }

    #[track_caller]
    fn match_cause<C, F>(self, f: F) -> crate::Result<T>
    where
        Error: From<C>,
        F: FnOnce(&Error) -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let cause = Error::from(f(error.cause()));
                Err(crate::wrap(error, cause))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PropagateError as _;
    use crate::Error;

    #[derive(Debug, PartialEq)]
    enum KnownError {
        SystemError,
        UsageError,
    }

    impl std::fmt::Display for KnownError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::SystemError => write!(f, "SystemError"),
                Self::UsageError => write!(f, "UsageError"),
            }
        }
    }

    impl std::error::Error for KnownError {}

    fn non_failing_function() -> crate::Result<()> {
        Ok(())
    }

    fn failing_function(message: &str) -> crate::Result<()> {
        Err(crate::new(message))
    }

    #[test]
    fn test_with_cause() {
        assert!(non_failing_function()
            .with_cause(|| KnownError::UsageError)
            .is_ok());

        let error = failing_function("disk is full")
            .with_cause(|| KnownError::SystemError)
            .unwrap_err();

        assert_eq!(error.to_string(), "SystemError");
        assert_eq!(
            error.cause().downcast_foreign_ref::<KnownError>(),
            Some(&KnownError::SystemError)
        );
        assert!(error.stack().starts_with(&format!("{}:", file!())));
        assert!(error.stack().contains(": disk is full\n"));

        let cause = crate::new("root cause");
        let error = failing_function("disk is full")
            .with_cause(|| cause.clone())
            .unwrap_err();
        assert_eq!(error.cause(), &cause);
    }

    #[test]
    fn test_match_cause() {
        let to_known = |cause: &Error| {
            if cause.to_string().contains("usage") {
                KnownError::UsageError
            } else {
                KnownError::SystemError
            }
        };

        assert!(non_failing_function().match_cause(to_known).is_ok());

        let error = failing_function("bad usage")
            .match_cause(to_known)
            .unwrap_err();
        assert_eq!(
            error.cause().downcast_foreign_ref::<KnownError>(),
            Some(&KnownError::UsageError)
        );

        let error = failing_function("disk is full")
            .match_cause(to_known)
            .unwrap_err();
        assert_eq!(
            error.cause().downcast_foreign_ref::<KnownError>(),
            Some(&KnownError::SystemError)
        );
    }
}
