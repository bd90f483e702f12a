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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides chains of annotated errors, used to track where an error travelled through
//! the code and what it meant along the way.
//!
//! Every call site that propagates an error may annotate it with a message and the location of
//! the call.  The annotations form a chain via the "previous" link, while the "cause" link keeps
//! pointing to the error that is diagnostically relevant, so that callers can inspect the cause
//! without having to know how many times it was annotated.
//!
//! # Details
//!
//! [`Error`] is a cheap-to-clone shared handle around any value implementing the [`Chained`]
//! trait.  The errors produced by this crate's constructors are [`Node`]s, while errors that are
//! not defined by us, i.e. plain [`std::error::Error`] types, we name "foreign errors" and wrap
//! them in [`Foreign`].  Foreign errors are lifted with `?` or `Error::from`.
//!
//! Constructing errors is done via the following functions, all of which record the location of
//! their call.
//!
//! * [`new`] and [`errorf!`] create a root error.  Root errors are logged as warnings.
//! * [`annotate`] and [`annotatef!`] add a message on top of an error, keeping its cause.
//! * [`trace`] only records the location, keeping both the message and the cause.
//! * [`wrap`] replaces the cause with a new one, while keeping the annotation history.
//! * [`mask`] and [`maskf!`] add a message and hide the cause from [`Error::cause`].
//!
//! The chain can be inspected in several ways.
//!
//! * [`std::fmt::Display`] renders a single-line message, e.g. `"read config: file not found"`.
//! * [`Error::stack`] renders one line per annotation, oldest first, with their locations.
//! * [`Error::details`] renders a compact `[{location: message} ...]` form, newest first.
//! * [`Error::cause`] and [`Error::check`] give access to the diagnostic cause.
//! * [`std::fmt::Debug`] renders a JSON array of annotations, used when logging.
//!
//! The renderers only rely on the [`Wrapper`], [`Causer`] and [`Locationer`] capabilities exposed
//! by the [`Chained`] trait, so that user-defined types can take part in a chain.
//!
//! The [`traits`] module extends [`Result`] with the same operations, and the [`adapters`] module
//! offers integration with other libraries & frameworks.
//!
//! # Examples
//!
//! ```
//! use bherrchain::traits::{ErrorContext, ForeignError};
//!
//! fn parse_port(s: &str) -> bherrchain::Result<u16> {
//!     let port = s
//!         .parse::<u16>()
//!         // Lift the foreign `ParseIntError` into the chain, adding context.
//!         .foreign_ctx(|| format!("parsing port {s:?}"))?;
//!     if port == 0 {
//!         // Create a root error.
//!         return Err(bherrchain::new("port must not be zero"));
//!     }
//!     Ok(port)
//! }
//!
//! fn load() -> bherrchain::Result<u16> {
//!     parse_port("0").ctx(|| "loading configuration")
//! }
//!
//! let err = load().unwrap_err();
//! assert_eq!(err.to_string(), "loading configuration: port must not be zero");
//! assert_eq!(err.cause().to_string(), "port must not be zero");
//! assert_eq!(err.stack().lines().count(), 2);
//!
//! let err = parse_port("http").unwrap_err();
//! assert!(err.check(|cause| cause
//!     .downcast_foreign_ref::<std::num::ParseIntError>()
//!     .is_some()));
//! ```

use std::{any::Any, sync::Arc};

pub mod adapters;
mod display;
mod foreign;
pub mod location;
mod node;
pub mod traits;

pub use display::{details, error_stack};
pub use foreign::Foreign;
pub use location::Location;
pub use node::{annotate, mask, new, trace, wrap, Node};

/// The trait every value taking part in an error chain implements.
///
/// A value exposes any combination of the [`Wrapper`], [`Causer`] and [`Locationer`]
/// capabilities by overriding the corresponding probe.  A value that exposes none of them is
/// treated as an opaque leaf, whose [`std::fmt::Display`] output is its whole message.
///
/// Chains are built from already existing errors, so they never form cycles.  Implementations of
/// [`Wrapper::previous`] must preserve that, otherwise the renderers loop forever.
pub trait Chained: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static {
    /// Returns the [`Wrapper`] capability, if any.
    fn as_wrapper(&self) -> Option<&dyn Wrapper> {
        None
    }

    /// Returns the [`Causer`] capability, if any.
    fn as_causer(&self) -> Option<&dyn Causer> {
        None
    }

    /// Returns the [`Locationer`] capability, if any.
    fn as_locationer(&self) -> Option<&dyn Locationer> {
        None
    }
}

/// Capability of an error which wraps another error.
pub trait Wrapper {
    /// The own message of this error, excluding the messages of the previous error and the cause.
    fn message(&self) -> &str;

    /// The previous error, or [`None`] at the root of the chain.
    fn previous(&self) -> Option<&Error>;
}

/// Capability of an error which designates a cause for diagnosis.
pub trait Causer {
    /// The cause, or [`None`] if there is none (e.g. because it has been masked).
    fn cause(&self) -> Option<&Error>;
}

/// Capability of an error which knows where it was created.
pub trait Locationer {
    /// The location where the error was created.  It may be unset.
    fn location(&self) -> Location;
}

/// Hacky trait to enable downcasting from trait objects of [`Chained`].
///
/// See: <https://lucumr.pocoo.org/2022/1/7/as-any-hack/>
trait ChainedAny: Chained + Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_chained(&self) -> &dyn Chained;
}

impl<C: Chained> ChainedAny for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_chained(&self) -> &dyn Chained {
        self
    }
}

/// A shared handle to an error taking part in a chain.
///
/// Cloning the handle is cheap and yields the very same error, i.e. the clones compare equal
/// through [`Error::is_same`].
#[derive(Clone)]
pub struct Error(Arc<dyn ChainedAny>);

/// The [`std::result::Result`] with the [`Error`] as its error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Makes a handle out of any [`Chained`] value.
    ///
    /// Use this for user-defined types exposing chain capabilities.  Foreign errors should be
    /// converted with `Error::from` instead.
    pub fn from_chained<C>(value: C) -> Self
    where
        C: Chained,
    {
        Self(Arc::new(value))
    }

    /// Returns the wrapped value as a [`Chained`] trait object.
    pub fn as_chained(&self) -> &dyn Chained {
        self.0.as_chained()
    }

    /// Returns the cause of the error.
    ///
    /// If the error exposes the [`Causer`] capability and has a cause, that cause is returned,
    /// otherwise the error itself.  The cause is not resolved any further, since the
    /// constructors already store the resolved cause.
    pub fn cause(&self) -> &Error {
        self.as_chained()
            .as_causer()
            .and_then(|causer| causer.cause())
            .unwrap_or(self)
    }

    /// Applies the `checker` to the [cause][Error::cause] of the error.
    pub fn check<F>(&self, checker: F) -> bool
    where
        F: FnOnce(&Error) -> bool,
    {
        checker(self.cause())
    }

    /// Returns the previous error in the chain, if the error is a [`Wrapper`] and has one.
    pub fn previous(&self) -> Option<&Error> {
        self.as_chained()
            .as_wrapper()
            .and_then(|wrapper| wrapper.previous())
    }

    /// Returns the location where the error was created, if it is known.
    pub fn location(&self) -> Option<Location> {
        display::location_of(self.as_chained())
    }

    /// Tries downcasting the wrapped value to `T`.
    ///
    /// For foreign errors, `T` is [`Foreign<E>`]; use [`Error::downcast_foreign_ref`] to get to
    /// the foreign error itself.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        // The `.as_any()` must be called on the `dyn ChainedAny`, not on the `Arc`, which would
        // compile but give `None` when downcasting.
        self.0.as_any().downcast_ref()
    }

    /// Reports whether both handles denote the same error.
    ///
    /// Handles sharing an allocation are the same.  Otherwise, only two [`Node`]s may be the same,
    /// when all of their fields are.  Separately created foreign errors are never the same, even
    /// if they hold equal values.
    pub fn is_same(&self, other: &Error) -> bool {
        node::same_chain(self, other)
    }

    /// Reports whether both handles share an allocation.
    pub(crate) fn shares_allocation(&self, other: &Error) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Returns the [`Node`] behind the handle if this is its only handle.
    pub(crate) fn unique_node_mut(&mut self) -> Option<&mut Node> {
        Arc::get_mut(&mut self.0)?.as_any_mut().downcast_mut()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_chained(), f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_chained(), f)
    }
}

/// Returns the [cause][Error::cause] of `err`, or [`None`] if there is no error.
pub fn cause(err: Option<&Error>) -> Option<&Error> {
    err.map(Error::cause)
}

/// Applies the `checker` to the [cause][Error::cause] of `err`.
///
/// If there is no error, the `checker` is applied to [`None`], the cause of no error.
pub fn check<F>(err: Option<&Error>, checker: F) -> bool
where
    F: FnOnce(Option<&Error>) -> bool,
{
    checker(cause(err))
}

/// Compares two optional errors, where two absent errors are the same.
pub(crate) fn same_error(first: Option<&Error>, second: Option<&Error>) -> bool {
    match (first, second) {
        (None, None) => true,
        (Some(first), Some(second)) => first.is_same(second),
        _ => false,
    }
}
