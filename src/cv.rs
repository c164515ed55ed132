//! `const`/`volatile` qualification.

use bitflags::bitflags;

bitflags! {
    /// A cv-qualifier set: `const` and/or `volatile`.
    ///
    /// Union (`∪` in SPEC_FULL.md §3) is exactly bitwise OR, so merging two
    /// cv sets during `cv_of` construction (§4.3) is just `a | b` — the whole
    /// reason this is a `bitflags` type and not two separate `bool` fields.
    #[derive(Default)]
    pub struct Cv: u8 {
        const CONST = 0b01;
        const VOLATILE = 0b10;
    }
}

impl Cv {
    /// The empty qualifier set, `{false, false}`.
    pub const NONE: Cv = Cv::empty();

    pub fn is_const(self) -> bool {
        self.contains(Cv::CONST)
    }

    pub fn is_volatile(self) -> bool {
        self.contains(Cv::VOLATILE)
    }
}
