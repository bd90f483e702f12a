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

use crate::{traits::loggable::Warnable, Chained, Error, Location};

/// Boxed foreign error, as returned by many libraries.
type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Adapter for errors that are not defined by us, i.e. foreign errors.
///
/// A foreign error exposes no chain capabilities, so it always ends a chain and renders as its own
/// [`std::fmt::Display`] output.  Both [`std::fmt::Display`] and [`std::fmt::Debug`] are forwarded
/// to the foreign error.
pub struct Foreign<E>(E);

impl<E> Foreign<E> {
    /// Returns a reference to the foreign error.
    pub fn get_ref(&self) -> &E {
        &self.0
    }

    /// Consumes the adapter, returning the foreign error.
    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E> Chained for Foreign<E> where
    E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static
{
}

impl<E: std::fmt::Display> std::fmt::Display for Foreign<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for Foreign<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl Error {
    /// Lifts a boxed foreign error into the chain and logs a warning.
    #[track_caller]
    pub fn from_boxed(source: BoxedError) -> Self {
        Self::from_chained(Foreign(source)).log_warn(&Location::caller())
    }

    /// Tries downcasting a foreign error to `E`.
    ///
    /// Errors lifted both with `Error::from` and [`Error::from_boxed`] are supported.  Note that
    /// this looks at the error itself, so use it on the [cause][Error::cause] of annotated errors.
    pub fn downcast_foreign_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        if let Some(foreign) = self.downcast_ref::<Foreign<E>>() {
            return Some(foreign.get_ref());
        }
        self.downcast_ref::<Foreign<BoxedError>>()
            .and_then(|foreign| foreign.get_ref().downcast_ref())
    }
}

impl<E> From<E> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Lifts a foreign error into the chain and logs a warning.
    #[track_caller]
    fn from(source: E) -> Self {
        Self::from_chained(Foreign(source)).log_warn(&Location::caller())
    }
}

/// Exposes an [`Error`] as a [`std::error::Error`], for interoperability with other libraries.
struct StdCompat(Error);

impl std::fmt::Display for StdCompat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::fmt::Debug for StdCompat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl std::error::Error for StdCompat {}

impl From<Error> for Box<dyn std::error::Error + Send + Sync + 'static> {
    fn from(error: Error) -> Self {
        Box::new(StdCompat(error))
    }
}

impl From<Error> for Box<dyn std::error::Error + 'static> {
    fn from(error: Error) -> Self {
        Box::new(StdCompat(error))
    }
}
