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

use crate::{traits::loggable::Warnable, Causer, Chained, Error, Location, Locationer, Wrapper};

/// An annotation in an error chain, as created by this crate's constructors.
///
/// A node optionally wraps a previous error, optionally designates a cause, and carries its own
/// message and the location where it was created.  It is immutable once created; the location is
/// captured before the node is built.
pub struct Node {
    /// The own annotation of the node.  Empty means there is none.
    message: String,
    /// The diagnostic cause.  It is [`None`] for root and masked nodes.
    cause: Option<Error>,
    /// The wrapped error.  It is [`None`] only at the root of a chain.
    previous: Option<Error>,
    location: Location,
}

impl Node {
    fn new(
        message: String,
        cause: Option<Error>,
        previous: Option<Error>,
        location: Location,
    ) -> Error {
        Error::from_chained(Self {
            message,
            cause,
            previous,
            location,
        })
    }

}

/// Compares two errors as described by [`Error::is_same`].
///
/// Linked errors are compared through a work list, so the depth of the chains is not limited by
/// the call stack.
pub(crate) fn same_chain(first: &Error, second: &Error) -> bool {
    let mut pending = vec![(first, second)];
    while let Some((first, second)) = pending.pop() {
        if first.shares_allocation(second) {
            continue;
        }
        let (Some(node), Some(other)) = (first.downcast_ref::<Node>(), second.downcast_ref::<Node>())
        else {
            return false;
        };
        if node.message != other.message || node.location != other.location {
            return false;
        }
        for links in [(&node.cause, &other.cause), (&node.previous, &other.previous)] {
            match links {
                (None, None) => {}
                (Some(first), Some(second)) => pending.push((first, second)),
                _ => return false,
            }
        }
    }
    true
}

// Unlinks the chain iteratively, since dropping the links recursively would need a stack frame
// per node.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<Error> = self.previous.take().into_iter().collect();
        pending.extend(self.cause.take());
        while let Some(mut error) = pending.pop() {
            if let Some(node) = error.unique_node_mut() {
                pending.extend(node.previous.take());
                pending.extend(node.cause.take());
            }
        }
    }
}

impl Wrapper for Node {
    fn message(&self) -> &str {
        &self.message
    }

    fn previous(&self) -> Option<&Error> {
        self.previous.as_ref()
    }
}

impl Causer for Node {
    fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }
}

impl Locationer for Node {
    fn location(&self) -> Location {
        self.location.clone()
    }
}

impl Chained for Node {
    fn as_wrapper(&self) -> Option<&dyn Wrapper> {
        Some(self)
    }

    fn as_causer(&self) -> Option<&dyn Causer> {
        Some(self)
    }

    fn as_locationer(&self) -> Option<&dyn Locationer> {
        Some(self)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::display::write_message(self, f)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::display::write_debug(self, f)
    }
}

/// Creates a root error with the given message and logs a warning.
///
/// It should be used in places where an error happened for the first time.  Do *not* use it to
/// propagate another error, since the chain would be lost; use [`annotate`] or [`trace`] instead.
///
/// Use [`errorf!`][crate::errorf] to format the message.
#[track_caller]
pub fn new(message: impl Into<String>) -> Error {
    let location = Location::caller();
    Node::new(message.into(), None, None, location.clone()).log_warn(&location)
}

/// Adds the `message` on top of the `previous` error.
///
/// The cause of the `previous` error is kept, so the rendered message of the result reads
/// `"<message>: <previous message>"`.  If there is no `previous` error, the result renders as just
/// the `message`.
///
/// Use [`annotatef!`][crate::annotatef] to format the message.
#[track_caller]
pub fn annotate(previous: impl Into<Option<Error>>, message: impl Into<String>) -> Error {
    let location = Location::caller();
    let previous = previous.into();
    let cause = previous.as_ref().map(|previous| previous.cause().clone());
    Node::new(message.into(), cause, previous, location)
}

/// Records the location of the call on top of the `previous` error.
///
/// Same as [`annotate`] with an empty message, so the rendered message stays the same.
#[track_caller]
pub fn trace(previous: impl Into<Option<Error>>) -> Error {
    let location = Location::caller();
    let previous = previous.into();
    let cause = previous.as_ref().map(|previous| previous.cause().clone());
    Node::new(String::new(), cause, previous, location)
}

/// Replaces the cause of the `previous` error with the given `cause`.
///
/// The `cause` is taken as is, without resolving its own cause.  The rendered message of the
/// result is the message of the new `cause`, while the annotation history of `previous` is still
/// visible in the [stack][Error::stack].
///
/// Without a `cause`, the result only records the location and has no cause of its own, so
/// [`Error::cause`] of the result is the result itself.
#[track_caller]
pub fn wrap(previous: impl Into<Option<Error>>, cause: impl Into<Option<Error>>) -> Error {
    let location = Location::caller();
    Node::new(String::new(), cause.into(), previous.into(), location)
}

/// Adds the `message` on top of the `previous` error, hiding its cause.
///
/// The rendered message and the stack stay intact, but [`Error::cause`] of the result is the
/// result itself.
///
/// Use [`maskf!`][crate::maskf] to format the message.
#[track_caller]
pub fn mask(previous: impl Into<Option<Error>>, message: impl Into<String>) -> Error {
    let location = Location::caller();
    Node::new(message.into(), None, previous.into(), location)
}

/// Creates a root error with a formatted message, see [`new`].
///
/// ```
/// let err = bherrchain::errorf!("foo {}", 5);
/// assert_eq!(err.to_string(), "foo 5");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::new(::std::format!($($arg)+))
    };
}

/// Adds a formatted message on top of an error, see [`annotate`].
///
/// ```
/// let err = bherrchain::new("first error");
/// let err = bherrchain::annotatef!(err, "reading {}", "config.toml");
/// assert_eq!(err.to_string(), "reading config.toml: first error");
/// ```
#[macro_export]
macro_rules! annotatef {
    ($previous:expr, $($arg:tt)+) => {
        $crate::annotate($previous, ::std::format!($($arg)+))
    };
}

/// Adds a formatted message on top of an error, hiding its cause, see [`mask`].
#[macro_export]
macro_rules! maskf {
    ($previous:expr, $($arg:tt)+) => {
        $crate::mask($previous, ::std::format!($($arg)+))
    };
}
