//! Error types.
//!
//! Both of these represent programming errors in the caller rather than
//! recoverable runtime conditions (see SPEC_FULL.md §4.7 / §7): there is no
//! retry, no partial state to roll back, because nothing is ever mutated
//! before the check that can fail. They are returned as ordinary `Result`
//! values, in the same plain-enum-plus-hand-written-`Display` style as this
//! codebase's other parse errors, rather than via panic or process exit.

use std::error::Error;
use std::fmt;

use crate::kind::Kind;
use crate::primitive::{Bytes, NumericClass};

/// A kind-specific accessor or builder was called on a handle whose kind
/// doesn't carry that datum (e.g. `primitive()` on an `LRef`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KindMismatch {
    pub expected: &'static str,
    pub actual: Kind,
}

impl fmt::Display for KindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected a type with {}, found {}",
            self.expected, self.actual
        )
    }
}

impl Error for KindMismatch {}

/// A `(class, bytes)` pair is outside the legal grid of primitive
/// descriptors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OutOfRange {
    pub class: NumericClass,
    pub bytes: Bytes,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}/{} is not a legal primitive descriptor",
            self.class,
            self.bytes.as_usize()
        )
    }
}

impl Error for OutOfRange {}
