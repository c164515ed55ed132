//! The owning arena: one bump-allocated pool per type-kind, plus the root
//! caches (`primitive_of`, `decl_of`, `generic_arg_of`) that give every
//! distinct key exactly one handle.
//!
//! Grounded on this codebase's own `arena.rs`, which keeps one `Arena<T>`
//! pool per node type behind a handful of root accessors, and on the
//! source's `TsysAlloc`, which does the same thing with one
//! `ITsys_Allocator<T>` per subclass plus `Dictionary`-backed root caches.
//! The pools themselves are `typed_arena::Arena`, not the index-based pool
//! this codebase rolls by hand, because every node here holds `&'arena`
//! references back into its own arena; an index-based pool would need those
//! references to be indices instead, which is exactly the self-referential
//! case `typed-arena` is built for.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::OutOfRange;
use crate::primitive::{Bytes, NumericClass, PrimitiveDesc};
use crate::symbol::Symbol;
use crate::ty::{
    ArrayNode, CvNode, DeclNode, ElementNode, ExprNode, FunctionNode, GenericNode, MemberNode,
    NullptrNode, PrimitiveNode, Ty, ZeroNode,
};

/// The platform-dependent widths of `int`, `size_t`, and `intptr_t`.
///
/// The source hard-codes these (`TsysAlloc::Int`/`Size`/`IntPtr`, each
/// marked `// TODO: Platform Specific`); this core takes them from the
/// caller instead; see SPEC_FULL.md §4.6 and DESIGN.md's Open Question
/// decisions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlatformConfig {
    pub int: PrimitiveDesc,
    pub size: PrimitiveDesc,
    pub intptr: PrimitiveDesc,
}

impl Default for PlatformConfig {
    /// Reproduces the original tool's hard-wired `TODO: Platform Specific`
    /// choice verbatim: `int`/`size_t`/`intptr_t` all 4 bytes wide
    /// (SInt/4, UInt/4, SInt/4). Callers targeting a real LP64/LLP64 ABI
    /// should build their own `PlatformConfig` instead of relying on this.
    fn default() -> Self {
        PlatformConfig {
            int: PrimitiveDesc::new(NumericClass::SInt, Bytes::B4),
            size: PrimitiveDesc::new(NumericClass::UInt, Bytes::B4),
            intptr: PrimitiveDesc::new(NumericClass::SInt, Bytes::B4),
        }
    }
}

/// Owns every interned type handle produced through it. Handles borrow from
/// the arena for as long as the arena lives; there is no way to free a
/// single handle short of dropping the whole arena.
pub struct Arena<'arena> {
    platform: PlatformConfig,

    zero: ZeroNode<'arena>,
    nullptr: NullptrNode<'arena>,

    primitives: typed_arena::Arena<PrimitiveNode<'arena>>,
    primitive_table: RefCell<HashMap<PrimitiveDesc, Ty<'arena>>>,

    decls: typed_arena::Arena<DeclNode<'arena>>,
    decl_table: RefCell<HashMap<Symbol, Ty<'arena>>>,

    generic_args: typed_arena::Arena<DeclNode<'arena>>,
    generic_arg_table: RefCell<HashMap<Symbol, Ty<'arena>>>,

    pub(crate) lrefs: typed_arena::Arena<ElementNode<'arena>>,
    pub(crate) rrefs: typed_arena::Arena<ElementNode<'arena>>,
    pub(crate) ptrs: typed_arena::Arena<ElementNode<'arena>>,
    pub(crate) arrays: typed_arena::Arena<ArrayNode<'arena>>,
    pub(crate) cvs: typed_arena::Arena<CvNode<'arena>>,
    pub(crate) members: typed_arena::Arena<MemberNode<'arena>>,
    pub(crate) functions: typed_arena::Arena<FunctionNode<'arena>>,
    pub(crate) generics: typed_arena::Arena<GenericNode<'arena>>,
    exprs: typed_arena::Arena<ExprNode<'arena>>,
}

impl<'arena> Arena<'arena> {
    pub fn new(platform: PlatformConfig) -> Self {
        Arena {
            platform,
            zero: ZeroNode { cache: Default::default() },
            nullptr: NullptrNode { cache: Default::default() },
            primitives: typed_arena::Arena::new(),
            primitive_table: RefCell::new(HashMap::new()),
            decls: typed_arena::Arena::new(),
            decl_table: RefCell::new(HashMap::new()),
            generic_args: typed_arena::Arena::new(),
            generic_arg_table: RefCell::new(HashMap::new()),
            lrefs: typed_arena::Arena::new(),
            rrefs: typed_arena::Arena::new(),
            ptrs: typed_arena::Arena::new(),
            arrays: typed_arena::Arena::new(),
            cvs: typed_arena::Arena::new(),
            members: typed_arena::Arena::new(),
            functions: typed_arena::Arena::new(),
            generics: typed_arena::Arena::new(),
            exprs: typed_arena::Arena::new(),
        }
    }

    /// The platform widths this arena was built with.
    pub fn platform(&self) -> PlatformConfig {
        self.platform
    }

    /// The single `Zero` handle (C++ `void`). Every arena has exactly one.
    pub fn zero(&'arena self) -> Ty<'arena> {
        Ty::Zero(&self.zero)
    }

    /// The single `Nullptr` handle (`std::nullptr_t`). Every arena has
    /// exactly one.
    pub fn nullptr_type(&'arena self) -> Ty<'arena> {
        Ty::Nullptr(&self.nullptr)
    }

    /// The handle for a `(class, bytes)` primitive, validating the pair
    /// first. Two calls with an equal descriptor return the same handle.
    pub fn primitive_of(&'arena self, desc: PrimitiveDesc) -> Result<Ty<'arena>, OutOfRange> {
        desc.validate()?;
        if let Some(ty) = self.primitive_table.borrow().get(&desc) {
            return Ok(*ty);
        }
        let node = self
            .primitives
            .alloc(PrimitiveNode { desc, cache: Default::default() });
        let ty = Ty::Primitive(node);
        self.primitive_table.borrow_mut().insert(desc, ty);
        Ok(ty)
    }

    /// This arena's `int`, per its [`PlatformConfig`].
    pub fn int_type(&'arena self) -> Ty<'arena> {
        self.primitive_of(self.platform.int)
            .expect("PlatformConfig::int must be a legal primitive descriptor")
    }

    /// This arena's `size_t`, per its [`PlatformConfig`].
    pub fn size_type(&'arena self) -> Ty<'arena> {
        self.primitive_of(self.platform.size)
            .expect("PlatformConfig::size must be a legal primitive descriptor")
    }

    /// This arena's `intptr_t`, per its [`PlatformConfig`].
    pub fn intptr_type(&'arena self) -> Ty<'arena> {
        self.primitive_of(self.platform.intptr)
            .expect("PlatformConfig::intptr must be a legal primitive descriptor")
    }

    /// The handle naming a declared entity (class, enum, typedef, ...)
    /// identified by `symbol`. Two calls with an equal symbol return the
    /// same handle.
    pub fn decl_of(&'arena self, symbol: Symbol) -> Ty<'arena> {
        if let Some(ty) = self.decl_table.borrow().get(&symbol) {
            return *ty;
        }
        let node = self.decls.alloc(DeclNode { symbol, cache: Default::default() });
        let ty = Ty::Decl(node);
        self.decl_table.borrow_mut().insert(symbol, ty);
        ty
    }

    /// The handle naming a template parameter identified by `symbol`.
    /// Distinct from `decl_of` even given the same symbol value: a
    /// `Decl` and a `GenericArg` never compare equal.
    pub fn generic_arg_of(&'arena self, symbol: Symbol) -> Ty<'arena> {
        if let Some(ty) = self.generic_arg_table.borrow().get(&symbol) {
            return *ty;
        }
        let node = self
            .generic_args
            .alloc(DeclNode { symbol, cache: Default::default() });
        let ty = Ty::GenericArg(node);
        self.generic_arg_table.borrow_mut().insert(symbol, ty);
        ty
    }

    /// A fresh handle standing in for an unevaluated expression's type. Each
    /// call allocates a new node; `Expr` handles are never interned (see
    /// DESIGN.md's Open Question decisions).
    pub fn expr_of(&'arena self) -> Ty<'arena> {
        let node = self.exprs.alloc(ExprNode { cache: Default::default() });
        Ty::Expr(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_of_interns_by_descriptor() {
        let arena = Arena::new(PlatformConfig::default());
        let desc = PrimitiveDesc::new(NumericClass::SInt, Bytes::B4);
        assert_eq!(
            arena.primitive_of(desc).unwrap(),
            arena.primitive_of(desc).unwrap()
        );
    }

    #[test]
    fn primitive_of_rejects_illegal_pair() {
        let arena = Arena::new(PlatformConfig::default());
        let err = arena
            .primitive_of(PrimitiveDesc::new(NumericClass::Bool, Bytes::B4))
            .unwrap_err();
        assert_eq!(err.class, NumericClass::Bool);
        assert_eq!(err.bytes, Bytes::B4);
    }

    #[test]
    fn zero_and_nullptr_are_singletons() {
        let arena = Arena::new(PlatformConfig::default());
        assert_eq!(arena.zero(), arena.zero());
        assert_eq!(arena.nullptr_type(), arena.nullptr_type());
        assert_ne!(arena.zero(), arena.nullptr_type());
    }

    #[test]
    fn decl_of_and_generic_arg_of_are_distinct_maps() {
        let arena = Arena::new(PlatformConfig::default());
        let sym = Symbol::from_raw(42);
        assert_eq!(arena.decl_of(sym), arena.decl_of(sym));
        assert_eq!(arena.generic_arg_of(sym), arena.generic_arg_of(sym));
        assert_ne!(arena.decl_of(sym), arena.generic_arg_of(sym));
    }

    #[test]
    fn platform_config_drives_int_size_intptr() {
        let platform = PlatformConfig {
            int: PrimitiveDesc::new(NumericClass::SInt, Bytes::B2),
            size: PrimitiveDesc::new(NumericClass::UInt, Bytes::B4),
            intptr: PrimitiveDesc::new(NumericClass::SInt, Bytes::B8),
        };
        let arena = Arena::new(platform);
        assert_eq!(
            arena.int_type(),
            arena
                .primitive_of(PrimitiveDesc::new(NumericClass::SInt, Bytes::B2))
                .unwrap()
        );
        assert_eq!(
            arena.size_type(),
            arena
                .primitive_of(PrimitiveDesc::new(NumericClass::UInt, Bytes::B4))
                .unwrap()
        );
        assert_eq!(
            arena.intptr_type(),
            arena
                .primitive_of(PrimitiveDesc::new(NumericClass::SInt, Bytes::B8))
                .unwrap()
        );
    }

    #[test]
    fn default_platform_config_matches_historical_widths() {
        let platform = PlatformConfig::default();
        assert_eq!(platform.int, PrimitiveDesc::new(NumericClass::SInt, Bytes::B4));
        assert_eq!(platform.size, PrimitiveDesc::new(NumericClass::UInt, Bytes::B4));
        assert_eq!(platform.intptr, PrimitiveDesc::new(NumericClass::SInt, Bytes::B4));

        let arena = Arena::new(platform);
        assert_eq!(
            arena.int_type(),
            arena
                .primitive_of(PrimitiveDesc::new(NumericClass::SInt, Bytes::B4))
                .unwrap()
        );
        assert_eq!(
            arena.size_type(),
            arena
                .primitive_of(PrimitiveDesc::new(NumericClass::UInt, Bytes::B4))
                .unwrap()
        );
        assert_eq!(
            arena.intptr_type(),
            arena
                .primitive_of(PrimitiveDesc::new(NumericClass::SInt, Bytes::B4))
                .unwrap()
        );
    }
}
