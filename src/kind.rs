//! The closed set of type-value variants.

use std::fmt;

/// Discriminant tag for a [`crate::ty::Ty`] value.
///
/// This mirrors the source's `TsysType` enum (generated there from the
/// `TSYS_TYPE_LIST` macro over one subclass per kind); here it is the
/// discriminant of the `Ty` enum itself, so `Ty::kind()` is a cheap `match`
/// rather than a virtual call.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    Zero,
    Nullptr,
    Primitive,
    Decl,
    GenericArg,
    LRef,
    RRef,
    Ptr,
    Array,
    Cv,
    Member,
    Function,
    Generic,
    Expr,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Zero => "Zero",
            Kind::Nullptr => "Nullptr",
            Kind::Primitive => "Primitive",
            Kind::Decl => "Decl",
            Kind::GenericArg => "GenericArg",
            Kind::LRef => "LRef",
            Kind::RRef => "RRef",
            Kind::Ptr => "Ptr",
            Kind::Array => "Array",
            Kind::Cv => "Cv",
            Kind::Member => "Member",
            Kind::Function => "Function",
            Kind::Generic => "Generic",
            Kind::Expr => "Expr",
        };
        write!(f, "{}", name)
    }
}
