//! Built-in scalar types: numeric class, byte width, and the legal grid of
//! combinations between them.

use std::fmt;

/// A built-in numeric/character/boolean class, independent of its width.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NumericClass {
    SInt,
    UInt,
    Float,
    SChar,
    UChar,
    Char,
    WChar,
    Char16,
    Char32,
    Bool,
}

/// The byte width of a primitive. Only 1, 2, 4, and 8 bytes are representable;
/// which of these are legal for a given [`NumericClass`] is checked by
/// [`PrimitiveDesc::validate`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Bytes {
    B1 = 1,
    B2 = 2,
    B4 = 4,
    B8 = 8,
}

impl Bytes {
    /// Returns the width in bytes as a plain number.
    pub const fn as_usize(self) -> usize {
        self as usize
    }
}

/// A `(class, bytes)` pair describing a built-in scalar type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PrimitiveDesc {
    pub class: NumericClass,
    pub bytes: Bytes,
}

impl PrimitiveDesc {
    pub const fn new(class: NumericClass, bytes: Bytes) -> Self {
        PrimitiveDesc { class, bytes }
    }

    /// Checks this pair against the legal grid of (class, bytes) combinations.
    ///
    /// The grid mirrors what the original tool's frontend is ever observed to
    /// construct: booleans and characters are fixed-width, integers span the
    /// usual four widths, and floating point only comes in 4, 8, or (as
    /// `long double`) a platform-dependent extended width represented here as
    /// 8 bytes — this core does not model the x87 80-bit extended format
    /// distinctly from `double`, since nothing downstream keys on that
    /// distinction.
    pub fn validate(self) -> Result<(), crate::error::OutOfRange> {
        use NumericClass::*;
        let legal = match self.class {
            Bool | SChar | UChar | Char => self.bytes == Bytes::B1,
            WChar | Char16 => self.bytes == Bytes::B2,
            Char32 => self.bytes == Bytes::B4,
            SInt | UInt => matches!(self.bytes, Bytes::B1 | Bytes::B2 | Bytes::B4 | Bytes::B8),
            Float => matches!(self.bytes, Bytes::B4 | Bytes::B8),
        };
        if legal {
            Ok(())
        } else {
            Err(crate::error::OutOfRange {
                class: self.class,
                bytes: self.bytes,
            })
        }
    }
}

impl fmt::Display for PrimitiveDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.class, self.bytes.as_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_widths_validate() {
        assert!(PrimitiveDesc::new(NumericClass::Bool, Bytes::B1).validate().is_ok());
        assert!(PrimitiveDesc::new(NumericClass::WChar, Bytes::B2).validate().is_ok());
        assert!(PrimitiveDesc::new(NumericClass::Char32, Bytes::B4).validate().is_ok());
        assert!(PrimitiveDesc::new(NumericClass::SInt, Bytes::B8).validate().is_ok());
        assert!(PrimitiveDesc::new(NumericClass::Float, Bytes::B4).validate().is_ok());
        assert!(PrimitiveDesc::new(NumericClass::Float, Bytes::B8).validate().is_ok());
    }

    #[test]
    fn illegal_widths_are_out_of_range() {
        assert!(PrimitiveDesc::new(NumericClass::Bool, Bytes::B4).validate().is_err());
        assert!(PrimitiveDesc::new(NumericClass::WChar, Bytes::B1).validate().is_err());
        assert!(PrimitiveDesc::new(NumericClass::Float, Bytes::B1).validate().is_err());

        let err = PrimitiveDesc::new(NumericClass::Float, Bytes::B1)
            .validate()
            .unwrap_err();
        assert_eq!(err.class, NumericClass::Float);
        assert_eq!(err.bytes, Bytes::B1);
    }
}
