//! Property-based tests for the universally-quantified identity laws of
//! SPEC_FULL.md §8. A handful of hand-picked examples (see
//! `seed_scenarios.rs`) under-tests a law like "for all handles x, for all
//! cv c, ..."; `proptest` generates many `x`/`c` combinations per run.

use proptest::prelude::*;

use tsys_core::arena::{Arena, PlatformConfig};
use tsys_core::cv::Cv;
use tsys_core::primitive::{Bytes, NumericClass, PrimitiveDesc};

/// All primitive descriptors legal per `PrimitiveDesc::validate`, used to
/// generate an arbitrary starting handle for each property run.
fn arb_primitive_desc() -> impl Strategy<Value = PrimitiveDesc> {
    prop_oneof![
        Just(PrimitiveDesc::new(NumericClass::Bool, Bytes::B1)),
        Just(PrimitiveDesc::new(NumericClass::SChar, Bytes::B1)),
        Just(PrimitiveDesc::new(NumericClass::UChar, Bytes::B1)),
        Just(PrimitiveDesc::new(NumericClass::Char, Bytes::B1)),
        Just(PrimitiveDesc::new(NumericClass::WChar, Bytes::B2)),
        Just(PrimitiveDesc::new(NumericClass::Char16, Bytes::B2)),
        Just(PrimitiveDesc::new(NumericClass::Char32, Bytes::B4)),
        Just(PrimitiveDesc::new(NumericClass::SInt, Bytes::B1)),
        Just(PrimitiveDesc::new(NumericClass::SInt, Bytes::B2)),
        Just(PrimitiveDesc::new(NumericClass::SInt, Bytes::B4)),
        Just(PrimitiveDesc::new(NumericClass::SInt, Bytes::B8)),
        Just(PrimitiveDesc::new(NumericClass::UInt, Bytes::B4)),
        Just(PrimitiveDesc::new(NumericClass::Float, Bytes::B4)),
        Just(PrimitiveDesc::new(NumericClass::Float, Bytes::B8)),
    ]
}

fn arb_cv() -> impl Strategy<Value = Cv> {
    (any::<bool>(), any::<bool>()).prop_map(|(c, v)| {
        let mut cv = Cv::NONE;
        if c {
            cv |= Cv::CONST;
        }
        if v {
            cv |= Cv::VOLATILE;
        }
        cv
    })
}

proptest! {
    #[test]
    fn lref_of_is_idempotent(desc in arb_primitive_desc()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.lref_of(&arena).lref_of(&arena), t.lref_of(&arena));
    }

    #[test]
    fn lref_of_rref_of_collapses(desc in arb_primitive_desc()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.lref_of(&arena).rref_of(&arena), t.lref_of(&arena));
    }

    #[test]
    fn rref_of_is_idempotent(desc in arb_primitive_desc()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.rref_of(&arena).rref_of(&arena), t.rref_of(&arena));
    }

    #[test]
    fn rref_of_lref_of_collapses(desc in arb_primitive_desc()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.rref_of(&arena).lref_of(&arena), t.lref_of(&arena));
    }

    #[test]
    fn cv_of_empty_is_identity(desc in arb_primitive_desc()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.cv_of(&arena, Cv::NONE), t);
    }

    #[test]
    fn cv_of_merges_by_union(desc in arb_primitive_desc(), c1 in arb_cv(), c2 in arb_cv()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.cv_of(&arena, c1).cv_of(&arena, c2), t.cv_of(&arena, c1 | c2));
    }

    #[test]
    fn cv_of_on_reference_is_absorbed(desc in arb_primitive_desc(), c in arb_cv()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        let lref = t.lref_of(&arena);
        let rref = t.rref_of(&arena);
        prop_assert_eq!(lref.cv_of(&arena, c), lref);
        prop_assert_eq!(rref.cv_of(&arena, c), rref);
    }

    #[test]
    fn zero_and_nullptr_absorb_ref_and_cv(c in arb_cv()) {
        let arena = Arena::new(PlatformConfig::default());
        let zero = arena.zero();
        let nullptr = arena.nullptr_type();
        prop_assert_eq!(zero.lref_of(&arena), zero);
        prop_assert_eq!(zero.rref_of(&arena), zero);
        prop_assert_eq!(zero.cv_of(&arena, c), zero);
        prop_assert_eq!(nullptr.lref_of(&arena), nullptr);
        prop_assert_eq!(nullptr.rref_of(&arena), nullptr);
        prop_assert_eq!(nullptr.cv_of(&arena, c), nullptr);
    }

    #[test]
    fn ptr_of_interns_on_repeated_calls(desc in arb_primitive_desc()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.ptr_of(&arena), t.ptr_of(&arena));
    }

    #[test]
    fn array_of_interns_by_equal_dimension_and_differs_otherwise(
        desc in arb_primitive_desc(),
        n in 1u32..64,
        m in 1u32..64,
    ) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        prop_assert_eq!(t.array_of(&arena, n), t.array_of(&arena, n));
        if n != m {
            prop_assert_ne!(t.array_of(&arena, n), t.array_of(&arena, m));
        }
    }

    #[test]
    fn member_of_interns_by_equal_class_and_differs_otherwise(
        desc in arb_primitive_desc(),
        sym_a in 0usize..1000,
        sym_b in 0usize..1000,
    ) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        let class_a = arena.decl_of(tsys_core::symbol::Symbol::from_raw(sym_a));
        let class_b = arena.decl_of(tsys_core::symbol::Symbol::from_raw(sym_b));
        prop_assert_eq!(t.member_of(&arena, class_a), t.member_of(&arena, class_a));
        if sym_a != sym_b {
            prop_assert_ne!(t.member_of(&arena, class_a), t.member_of(&arena, class_b));
        }
    }

    #[test]
    fn entity_of_cv_reports_outer_cv_and_no_ref(desc in arb_primitive_desc(), c in arb_cv()) {
        let arena = Arena::new(PlatformConfig::default());
        let t = arena.primitive_of(desc).unwrap();
        let (entity, cv, ref_kind) = t.cv_of(&arena, c).entity();
        prop_assert_eq!(entity, t);
        prop_assert_eq!(cv, c);
        prop_assert_eq!(ref_kind, None);
    }
}
