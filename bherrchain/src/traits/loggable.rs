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

use crate::{Error, Location};

/// Trait making a [`crate::Result`] error variant loggable.
pub trait Loggable<T> {
    /// Logs the error if it occured.
    ///
    /// The error is logged at the error level, with the caller location as the log target.
    fn log_err(self) -> Self;
}

impl<T> Loggable<T> for crate::Result<T> {
    #[track_caller]
    fn log_err(self) -> Self {
        let location = Location::caller();

        self.map_err(|error| {
            log::error!(target: &location.to_string(), "{:?}", error);
            error
        })
    }
}

pub(crate) trait Warnable {
    /// Logs a warning about an error.
    fn log_warn(self, location: &Location) -> Self;
}

impl Warnable for Error {
    fn log_warn(self, location: &Location) -> Self {
        log::warn!(target: &location.to_string(), "{:?}", self);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Loggable as _;

    #[test]
    fn test_log_err() {
        let result: crate::Result<u8> = Ok(7);
        assert!(matches!(result.log_err(), Ok(7)));

        let err = crate::new("some error");
        let result: crate::Result<u8> = Err(err.clone());
        assert!(result.log_err().is_err_and(|logged| logged.is_same(&err)));
    }
}
