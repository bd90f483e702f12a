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

use crate::{same_error, Chained, Error, Location};

/// Returns the declared cause of `err` if it diverges from the cause of its `previous` error.
///
/// That is the case for a [`wrap`][crate::wrap] node, which substituted the cause, but not for
/// annotations that kept the cause of the error they wrap.
fn diverging_cause<'a>(err: &'a dyn Chained, previous: Option<&Error>) -> Option<&'a Error> {
    let cause = err.as_causer()?.cause()?;
    (!same_error(previous.map(Error::cause), Some(cause))).then_some(cause)
}

pub(crate) fn location_of(err: &dyn Chained) -> Option<Location> {
    err.as_locationer()
        .map(|locationer| locationer.location())
        .filter(Location::is_set)
}

// Writes the single-line message of the chain.  Each wrapper contributes its own message and
// delegates the rest either to its diverging cause or to its previous error.
pub(crate) fn write_message(err: &dyn Chained, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut current = err;
    let mut separate = false;
    loop {
        let Some(wrapper) = current.as_wrapper() else {
            if separate {
                f.write_str(": ")?;
            }
            return write!(f, "{current}");
        };

        let message = wrapper.message();
        let previous = wrapper.previous();
        let Some(delegate) = diverging_cause(current, previous).or(previous) else {
            if separate {
                f.write_str(": ")?;
            }
            return f.write_str(message);
        };

        if !message.is_empty() {
            if separate {
                f.write_str(": ")?;
            }
            f.write_str(message)?;
            separate = true;
        }
        current = delegate.as_chained();
    }
}

// Writes the chain as a JSON array of its annotations, newest first.
pub(crate) fn write_debug(err: &dyn Chained, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut entries = Vec::new();
    let mut current = Some(err);
    while let Some(err) = current {
        let mut entry = serde_json::Map::new();
        if let Some(location) = location_of(err) {
            entry.insert("location".to_owned(), location.to_string().into());
        }
        match err.as_wrapper() {
            Some(wrapper) => {
                let previous = wrapper.previous();
                entry.insert("message".to_owned(), wrapper.message().into());
                if let Some(cause) = diverging_cause(err, previous) {
                    entry.insert("cause".to_owned(), cause.to_string().into());
                }
                current = previous.map(Error::as_chained);
            }
            None => {
                entry.insert("error".to_owned(), format!("{err:?}").into());
                current = None;
            }
        }
        entries.push(serde_json::Value::Object(entry));
    }

    write!(f, "{}", serde_json::Value::Array(entries))
}

impl Error {
    /// Renders the annotation stack, one line per error in the chain, oldest first.
    ///
    /// Each line reads `"<location>: <message>"`, where the location is omitted if unknown.  If an
    /// error substituted the cause, the message of the new cause is appended to its line.  An
    /// error that is not a [`Wrapper`][crate::Wrapper] ends the stack with its own message.
    ///
    /// ```text
    /// src/config.rs:12: first error
    /// src/config.rs:20: detailed error
    /// src/main.rs:8: loading configuration
    /// ```
    pub fn stack(&self) -> String {
        let mut lines = Vec::new();
        let mut current = Some(self.as_chained());
        while let Some(err) = current {
            let mut line = String::new();
            if let Some(location) = location_of(err) {
                line.push_str(&format!("{location}: "));
            }
            match err.as_wrapper() {
                Some(wrapper) => {
                    let message = wrapper.message();
                    let previous = wrapper.previous();
                    line.push_str(message);
                    if let Some(cause) = diverging_cause(err, previous) {
                        if !message.is_empty() {
                            line.push_str(": ");
                        }
                        line.push_str(&cause.to_string());
                    }
                    current = previous.map(Error::as_chained);
                }
                None => {
                    line.push_str(&err.to_string());
                    current = None;
                }
            }
            lines.push(line);
        }

        lines.reverse();
        lines.join("\n")
    }

    /// Renders the annotations of the chain in the `[{location: message} ...]` form, newest
    /// first.
    ///
    /// Only the own messages are shown.  An error that is not a [`Wrapper`][crate::Wrapper] ends
    /// the list with its own message.
    ///
    /// This is the compact, human-readable diagnostic form.  [`std::fmt::Debug`] renders the same
    /// annotations as JSON instead, which is meant for log payloads.
    pub fn details(&self) -> String {
        let mut entries = Vec::new();
        let mut current = Some(self.as_chained());
        while let Some(err) = current {
            let mut entry = String::from("{");
            if let Some(location) = location_of(err) {
                entry.push_str(&format!("{location}: "));
            }
            match err.as_wrapper() {
                Some(wrapper) => {
                    entry.push_str(wrapper.message());
                    current = wrapper.previous().map(Error::as_chained);
                }
                None => {
                    entry.push_str(&err.to_string());
                    current = None;
                }
            }
            entry.push('}');
            entries.push(entry);
        }

        format!("[{}]", entries.join(" "))
    }
}

/// Renders the [stack][Error::stack] of `err`, or an empty string if there is no error.
pub fn error_stack(err: Option<&Error>) -> String {
    err.map(Error::stack).unwrap_or_default()
}

/// Renders the [details][Error::details] of `err`, or `"[]"` if there is no error.
pub fn details(err: Option<&Error>) -> String {
    err.map_or_else(|| "[]".to_owned(), Error::details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotate, annotatef, errorf, mask, new, trace, wrap};

    /// Value error with an equality, as opposed to [`NonComparableError`].
    #[derive(Debug, PartialEq)]
    struct ValueError(&'static str);

    impl std::fmt::Display for ValueError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for ValueError {}

    #[derive(Debug)]
    struct NonComparableError {
        info: &'static str,
        #[allow(dead_code)]
        callback: fn() -> bool,
    }

    impl NonComparableError {
        fn new(info: &'static str) -> Self {
            Self {
                info,
                callback: || true,
            }
        }
    }

    impl std::fmt::Display for NonComparableError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.info)
        }
    }

    impl std::error::Error for NonComparableError {}

    fn value_error(message: &'static str) -> Error {
        Error::from(ValueError(message))
    }

    fn at(line: u32) -> String {
        format!("{}:{line}", file!())
    }

    #[test]
    fn test_message() {
        assert_eq!(new("foo").to_string(), "foo");
        assert_eq!(errorf!("first {}", "error").to_string(), "first error");
        assert_eq!(annotatef!(None, "annotation").to_string(), "annotation");

        let err = annotatef!(errorf!("first error"), "annotation");
        assert_eq!(err.to_string(), "annotation: first error");

        let err = annotate(annotate(new("x"), "y"), "z");
        assert_eq!(err.to_string(), "z: y: x");
    }

    #[test]
    fn test_message_of_non_comparable() {
        let err = annotatef!(
            Error::from(NonComparableError::new("uncomparable")),
            "annotation"
        );
        let err = annotatef!(err, "another");

        assert_eq!(err.to_string(), "another: annotation: uncomparable");
    }

    #[test]
    fn test_message_of_wrapped() {
        let err = wrap(value_error("first error"), value_error("detailed error"));
        assert_eq!(err.to_string(), "detailed error");

        let err = annotatef!(errorf!("first error"), "annotated");
        let err = wrap(err, value_error("detailed error"));
        assert_eq!(err.to_string(), "detailed error");

        let err = wrap(errorf!("first error"), value_error("detailed error"));
        let err = annotatef!(err, "annotated");
        assert_eq!(err.to_string(), "annotated: detailed error");
    }

    #[test]
    fn test_message_of_traced() {
        let err = new("first error");
        let err = trace(err);
        let err = annotate(err, "some context");
        let err = trace(err);
        let err = annotate(err, "more context");
        let err = trace(err);
        assert_eq!(err.to_string(), "more context: some context: first error");

        let foreign = value_error("foreign");
        assert_eq!(trace(foreign.clone()).to_string(), foreign.to_string());
        let masked = mask(new("root"), "masked");
        assert_eq!(trace(masked.clone()).to_string(), masked.to_string());
    }

    #[test]
    fn test_message_of_empty_root() {
        assert_eq!(trace(None).to_string(), "");
        assert_eq!(annotate(trace(None), "outer").to_string(), "outer: ");
    }

    #[test]
    fn test_stack_of_nothing() {
        assert_eq!(error_stack(None), "");
    }

    #[test]
    fn test_stack_of_raw() {
        let err = value_error("raw");
        assert_eq!(err.stack(), "raw");
        assert_eq!(error_stack(Some(&err)), "raw");
    }

    #[test]
    fn test_stack_single() {
        let (err, line) = (new("first error"), line!());
        assert_eq!(err.stack(), format!("{}: first error", at(line)));
    }

    #[test]
    fn test_stack_annotated() {
        let (err, l0) = (new("first error"), line!());
        let (err, l1) = (annotate(err, "annotation"), line!());

        assert_eq!(
            err.stack(),
            format!("{}: first error\n{}: annotation", at(l0), at(l1))
        );
    }

    #[test]
    fn test_stack_wrapped() {
        let (err, l0) = (new("first error"), line!());
        let (err, l1) = (wrap(err, value_error("detailed error")), line!());

        assert_eq!(
            err.stack(),
            format!("{}: first error\n{}: detailed error", at(l0), at(l1))
        );
    }

    #[test]
    fn test_stack_annotated_wrapped() {
        let (err, l0) = (errorf!("first error"), line!());
        let (err, l1) = (wrap(err, value_error("detailed error")), line!());
        let (err, l2) = (annotatef!(err, "annotated"), line!());

        assert_eq!(
            err.stack(),
            format!(
                "{}: first error\n{}: detailed error\n{}: annotated",
                at(l0),
                at(l1),
                at(l2)
            )
        );
    }

    #[test]
    fn test_stack_masked_wrapped() {
        let (err, l0) = (new("first error"), line!());
        let (err, l1) = (mask(err, "masked"), line!());
        let (err, l2) = (wrap(err, value_error("detailed error")), line!());

        assert_eq!(err.to_string(), "detailed error");
        assert_eq!(
            err.stack(),
            format!(
                "{}: first error\n{}: masked\n{}: detailed error",
                at(l0),
                at(l1),
                at(l2)
            )
        );
    }

    #[test]
    fn test_stack_traced_and_annotated() {
        let (err, l0) = (new("first error"), line!());
        let (err, l1) = (trace(err), line!());
        let (err, l2) = (annotate(err, "some context"), line!());
        let (err, l3) = (trace(err), line!());
        let (err, l4) = (annotate(err, "more context"), line!());
        let (err, l5) = (trace(err), line!());

        let expected = [
            format!("{}: first error", at(l0)),
            format!("{}: ", at(l1)),
            format!("{}: some context", at(l2)),
            format!("{}: ", at(l3)),
            format!("{}: more context", at(l4)),
            format!("{}: ", at(l5)),
        ];
        assert_eq!(err.stack(), expected.join("\n"));
    }

    #[test]
    fn test_stack_mixed() {
        let err = Error::from(NonComparableError::new("first error"));
        let (err, l1) = (trace(err), line!());
        let (err, l2) = (wrap(err, value_error("value error")), line!());
        let (err, l3) = (trace(err), line!());
        let (err, l4) = (annotate(err, "more context"), line!());
        let (err, l5) = (trace(err), line!());

        let expected = [
            "first error".to_owned(),
            format!("{}: ", at(l1)),
            format!("{}: value error", at(l2)),
            format!("{}: ", at(l3)),
            format!("{}: more context", at(l4)),
            format!("{}: ", at(l5)),
        ];
        assert_eq!(err.stack(), expected.join("\n"));
        assert_eq!(err.to_string(), "more context: value error");
    }

    #[test]
    fn test_stack_depth() {
        let mut err = new("root");
        for depth in 0..1000 {
            err = if depth % 2 == 0 {
                trace(err)
            } else {
                annotate(err, format!("depth {depth}"))
            };
        }

        let stack = err.stack();
        assert_eq!(stack.lines().count(), 1001);
        assert!(stack.lines().next().is_some_and(|line| line.ends_with(": root")));
        assert!(err.to_string().starts_with("depth 999: depth 997: "));
        assert!(err.to_string().ends_with("depth 1: root"));
    }

    #[test]
    fn test_foreign_passthrough() {
        let (err, line) = (annotate(value_error("other"), "ctx"), line!());

        assert_eq!(err.stack(), format!("other\n{}: ctx", at(line)));
        assert_eq!(err.details(), format!("[{{{}: ctx}} {{other}}]", at(line)));
    }

    #[test]
    fn test_details() {
        assert_eq!(details(None), "[]");
        assert_eq!(details(Some(&value_error("other"))), "[{other}]");

        let (err0, l0) = (new("foo"), line!());
        assert_eq!(err0.details(), format!("[{{{}: foo}}]", at(l0)));

        let (err1, l1) = (annotate(err0, "bar"), line!());
        assert_eq!(
            err1.details(),
            format!("[{{{}: bar}} {{{}: foo}}]", at(l1), at(l0))
        );

        let (err2, l2) = (trace(err1), line!());
        assert_eq!(
            details(Some(&err2)),
            format!("[{{{}: }} {{{}: bar}} {{{}: foo}}]", at(l2), at(l1), at(l0))
        );
    }

    #[test]
    fn test_details_hide_cause() {
        let (err0, l0) = (new("first error"), line!());
        let (err1, l1) = (wrap(err0, value_error("detailed error")), line!());

        assert_eq!(err1.details(), format!("[{{{}: }} {{{}: first error}}]", at(l1), at(l0)));
    }

    #[test]
    fn test_debug() {
        let (err, l0) = (new("first"), line!());
        let (err, l1) = (annotate(err, "second"), line!());
        assert_eq!(
            format!("{err:?}"),
            format!(
                r#"[{{"location":"{}","message":"second"}},{{"location":"{}","message":"first"}}]"#,
                at(l1),
                at(l0)
            )
        );

        let (err, l0) = (wrap(value_error("raw"), value_error("detailed")), line!());
        assert_eq!(
            format!("{err:?}"),
            format!(
                r#"[{{"cause":"detailed","location":"{}","message":""}},{{"error":"ValueError(\"raw\")"}}]"#,
                at(l0)
            )
        );
    }

    #[test]
    fn test_debug_quotes() {
        let (err, line) = (new("with \"quotes\""), line!());
        assert_eq!(
            format!("{err:?}"),
            format!(
                r#"[{{"location":"{}","message":"with \"quotes\""}}]"#,
                at(line)
            )
        );

        let (err, line) = (new("{\"key\":\"value\"}"), line!());
        assert_eq!(
            format!("{err:?}"),
            format!(
                r#"[{{"location":"{}","message":"{{\"key\":\"value\"}}"}}]"#,
                at(line)
            )
        );
    }
}
