mod parse;
mod structure;

use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Severity};

/// A byte range of the assembly source, which is the input instructions joined
/// by newlines.
///
/// Spans can be combined using the `+` operator to create the smallest
/// continuous span containing both.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file: usize,
}

impl Span {
    pub fn new(file: usize, start: usize, end: usize) -> Self {
        Self { start, end, file }
    }
}

impl std::ops::Add for Span {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        assert!(self.file == rhs.file);
        Self {
            file: self.file,
            start: self.start.min(rhs.start),
            end: self.end.max(rhs.end),
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

#[derive(Debug, Default)]
pub struct Messages {
    pub msgs: Vec<Diagnostic<usize>>,
}

impl Messages {
    pub fn new() -> Self {
        Self { msgs: Vec::new() }
    }

    #[must_use]
    pub fn at(&mut self, span: Span) -> MessageAdder {
        MessageAdder {
            msgs: self,
            at: span,
        }
    }

    pub fn merge(&mut self, other: Messages) {
        self.msgs.extend(other.msgs);
    }

    pub fn has_errors(&self) -> bool {
        self.msgs
            .iter()
            .any(|msg| msg.severity >= Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.msgs.is_empty()
    }

    /// The error codes of all the messages, in order.
    pub fn codes(&self) -> Vec<&str> {
        self.msgs
            .iter()
            .filter_map(|msg| msg.code.as_deref())
            .collect()
    }
}

#[derive(Debug)]
pub struct MessageAdder<'a> {
    msgs: &'a mut Messages,
    at: Span,
}

impl<'a> MessageAdder<'a> {
    fn add(&mut self, diag: Diagnostic<usize>) {
        self.msgs.msgs.push(diag);
    }
}
