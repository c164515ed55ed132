//! The interned type handle and the per-kind data it can carry.
//!
//! `Ty<'arena>` is `Copy` and carries no identity beyond the address of the
//! node it points to: two handles compare equal iff they point at the same
//! arena slot (SPEC_FULL.md §2, §5). Every builder method below either
//! returns an existing handle from a node's cache or allocates exactly once
//! and populates the cache before returning, which is what makes repeated
//! calls with the same arguments produce the same handle.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::arena::Arena;
use crate::cv::Cv;
use crate::error::KindMismatch;
use crate::func::{FuncData, GenericData};
use crate::kind::Kind;
use crate::primitive::PrimitiveDesc;
use crate::symbol::Symbol;

/// The caches every node carries for the handles that can be built *around*
/// it: `T&`, `T&&`, `T*`, `T[n]`, cv-qualified `T`, `C::*` member pointers,
/// and function/generic instantiations with `T` as the return/template.
///
/// Mirrors the source's `TsysBase` fields (`lrefOf`, `rrefOf`, `ptrOf`,
/// `arrayOf`, `cvOf[3]`, `memberOf`, `functionOf`, `genericOf`), kept here as
/// a plain struct embedded by composition in every per-kind node instead of
/// inherited from a base class, per SPEC_FULL.md's tagged-variant design.
pub(crate) struct ChildCache<'arena> {
    lref: Cell<Option<Ty<'arena>>>,
    rref: Cell<Option<Ty<'arena>>>,
    ptr: Cell<Option<Ty<'arena>>>,
    array: RefCell<HashMap<u32, Ty<'arena>>>,
    cv: [Cell<Option<Ty<'arena>>>; 3],
    member: RefCell<HashMap<Ty<'arena>, Ty<'arena>>>,
    // Bucketed by the (small, `Copy`) func/generic data; within a bucket,
    // entries are found by comparing *slice contents*, not by owning a
    // second copy of the parameter list. The `&'arena [Ty<'arena>]` here
    // borrows from the `params` field of the `FunctionNode`/`GenericNode`
    // this cache itself entered into its map only after that node was
    // allocated — the node owns the parameter vector, the cache only a
    // slice view into it (SPEC_FULL.md §4.3: "ownership of the parameter
    // vector lives on the node, not in the cache map").
    function: RefCell<HashMap<FuncData, Vec<(&'arena [Ty<'arena>], Ty<'arena>)>>>,
    generic: RefCell<HashMap<GenericData, Vec<(&'arena [Ty<'arena>], Ty<'arena>)>>>,
}

impl<'arena> Default for ChildCache<'arena> {
    fn default() -> Self {
        ChildCache {
            lref: Cell::new(None),
            rref: Cell::new(None),
            ptr: Cell::new(None),
            array: RefCell::new(HashMap::new()),
            cv: [Cell::new(None), Cell::new(None), Cell::new(None)],
            member: RefCell::new(HashMap::new()),
            function: RefCell::new(HashMap::new()),
            generic: RefCell::new(HashMap::new()),
        }
    }
}

/// `cv`'s bit pattern is never `0` here (that case returns `self` without
/// touching the cache), so `bits() - 1` packs the three nonempty qualifier
/// sets into slots `0..3`.
fn cv_slot(cv: Cv) -> usize {
    debug_assert!(!cv.is_empty());
    (cv.bits() - 1) as usize
}

pub(crate) struct ZeroNode<'arena> {
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct NullptrNode<'arena> {
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct ExprNode<'arena> {
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct PrimitiveNode<'arena> {
    pub(crate) desc: PrimitiveDesc,
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct DeclNode<'arena> {
    pub(crate) symbol: Symbol,
    pub(crate) cache: ChildCache<'arena>,
}

/// Shared shape for `LRef`, `RRef`, and `Ptr`, which all carry nothing but
/// the element they wrap.
pub(crate) struct ElementNode<'arena> {
    pub(crate) element: Ty<'arena>,
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct ArrayNode<'arena> {
    pub(crate) element: Ty<'arena>,
    pub(crate) dimensions: u32,
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct CvNode<'arena> {
    pub(crate) element: Ty<'arena>,
    pub(crate) cv: Cv,
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct MemberNode<'arena> {
    pub(crate) element: Ty<'arena>,
    pub(crate) class: Ty<'arena>,
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct FunctionNode<'arena> {
    pub(crate) element: Ty<'arena>,
    pub(crate) params: Vec<Ty<'arena>>,
    pub(crate) data: FuncData,
    pub(crate) cache: ChildCache<'arena>,
}

pub(crate) struct GenericNode<'arena> {
    pub(crate) element: Ty<'arena>,
    pub(crate) params: Vec<Ty<'arena>>,
    pub(crate) data: GenericData,
    pub(crate) cache: ChildCache<'arena>,
}

/// The ref-ness stripped off by [`Ty::entity`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RefKind {
    LRef,
    RRef,
}

/// A hash-consed C++ type, valid for as long as the [`Arena`] that produced
/// it.
///
/// `Ty` is `Copy` and compares by the address of the node it wraps, never by
/// structural comparison of the node's contents — see the `PartialEq`/`Hash`
/// impls below. Each variant corresponds to one [`Kind`].
#[derive(Clone, Copy)]
pub enum Ty<'arena> {
    Zero(&'arena ZeroNode<'arena>),
    Nullptr(&'arena NullptrNode<'arena>),
    Primitive(&'arena PrimitiveNode<'arena>),
    Decl(&'arena DeclNode<'arena>),
    GenericArg(&'arena DeclNode<'arena>),
    LRef(&'arena ElementNode<'arena>),
    RRef(&'arena ElementNode<'arena>),
    Ptr(&'arena ElementNode<'arena>),
    Array(&'arena ArrayNode<'arena>),
    Cv(&'arena CvNode<'arena>),
    Member(&'arena MemberNode<'arena>),
    Function(&'arena FunctionNode<'arena>),
    Generic(&'arena GenericNode<'arena>),
    Expr(&'arena ExprNode<'arena>),
}

impl<'arena> PartialEq for Ty<'arena> {
    fn eq(&self, other: &Self) -> bool {
        use Ty::*;
        match (self, other) {
            (Zero(a), Zero(b)) => std::ptr::eq(*a, *b),
            (Nullptr(a), Nullptr(b)) => std::ptr::eq(*a, *b),
            (Primitive(a), Primitive(b)) => std::ptr::eq(*a, *b),
            (Decl(a), Decl(b)) => std::ptr::eq(*a, *b),
            (GenericArg(a), GenericArg(b)) => std::ptr::eq(*a, *b),
            (LRef(a), LRef(b)) => std::ptr::eq(*a, *b),
            (RRef(a), RRef(b)) => std::ptr::eq(*a, *b),
            (Ptr(a), Ptr(b)) => std::ptr::eq(*a, *b),
            (Array(a), Array(b)) => std::ptr::eq(*a, *b),
            (Cv(a), Cv(b)) => std::ptr::eq(*a, *b),
            (Member(a), Member(b)) => std::ptr::eq(*a, *b),
            (Function(a), Function(b)) => std::ptr::eq(*a, *b),
            (Generic(a), Generic(b)) => std::ptr::eq(*a, *b),
            (Expr(a), Expr(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl<'arena> Eq for Ty<'arena> {}

impl<'arena> Hash for Ty<'arena> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.addr().hash(state);
    }
}

impl<'arena> std::fmt::Debug for Ty<'arena> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ty::{}(0x{:x})", self.kind(), self.addr())
    }
}

impl<'arena> Ty<'arena> {
    fn addr(&self) -> usize {
        use Ty::*;
        match self {
            Zero(n) => *n as *const _ as usize,
            Nullptr(n) => *n as *const _ as usize,
            Primitive(n) => *n as *const _ as usize,
            Decl(n) => *n as *const _ as usize,
            GenericArg(n) => *n as *const _ as usize,
            LRef(n) => *n as *const _ as usize,
            RRef(n) => *n as *const _ as usize,
            Ptr(n) => *n as *const _ as usize,
            Array(n) => *n as *const _ as usize,
            Cv(n) => *n as *const _ as usize,
            Member(n) => *n as *const _ as usize,
            Function(n) => *n as *const _ as usize,
            Generic(n) => *n as *const _ as usize,
            Expr(n) => *n as *const _ as usize,
        }
    }

    fn cache(&self) -> &ChildCache<'arena> {
        use Ty::*;
        match self {
            Zero(n) => &n.cache,
            Nullptr(n) => &n.cache,
            Primitive(n) => &n.cache,
            Decl(n) => &n.cache,
            GenericArg(n) => &n.cache,
            LRef(n) => &n.cache,
            RRef(n) => &n.cache,
            Ptr(n) => &n.cache,
            Array(n) => &n.cache,
            Cv(n) => &n.cache,
            Member(n) => &n.cache,
            Function(n) => &n.cache,
            Generic(n) => &n.cache,
            Expr(n) => &n.cache,
        }
    }

    /// The variant tag, without the payload.
    pub fn kind(&self) -> Kind {
        use Ty::*;
        match self {
            Zero(_) => Kind::Zero,
            Nullptr(_) => Kind::Nullptr,
            Primitive(_) => Kind::Primitive,
            Decl(_) => Kind::Decl,
            GenericArg(_) => Kind::GenericArg,
            LRef(_) => Kind::LRef,
            RRef(_) => Kind::RRef,
            Ptr(_) => Kind::Ptr,
            Array(_) => Kind::Array,
            Cv(_) => Kind::Cv,
            Member(_) => Kind::Member,
            Function(_) => Kind::Function,
            Generic(_) => Kind::Generic,
            Expr(_) => Kind::Expr,
        }
    }

    /// `T&`. `Zero`/`Nullptr` are reference-immune and return themselves;
    /// `LRef` is idempotent; `RRef(e).lref_of()` collapses to `e.lref_of()`
    /// (reference collapsing), matching `ITsys_RRef::LRefOf` in the source.
    pub fn lref_of(self, arena: &'arena Arena<'arena>) -> Ty<'arena> {
        match self {
            Ty::Zero(_) | Ty::Nullptr(_) | Ty::LRef(_) => self,
            Ty::RRef(n) => n.element.lref_of(arena),
            _ => {
                if let Some(cached) = self.cache().lref.get() {
                    return cached;
                }
                let node = arena
                    .lrefs
                    .alloc(ElementNode { element: self, cache: ChildCache::default() });
                let ty = Ty::LRef(node);
                self.cache().lref.set(Some(ty));
                ty
            }
        }
    }

    /// `T&&`. `Zero`/`Nullptr`/`LRef`/`RRef` all return themselves: an rvalue
    /// reference to an lvalue-reference-or-narrower thing collapses to that
    /// thing, matching `ITsys_LRef::RRefOf`/`ITsys_RRef::RRefOf`.
    pub fn rref_of(self, arena: &'arena Arena<'arena>) -> Ty<'arena> {
        match self {
            Ty::Zero(_) | Ty::Nullptr(_) | Ty::LRef(_) | Ty::RRef(_) => self,
            _ => {
                if let Some(cached) = self.cache().rref.get() {
                    return cached;
                }
                let node = arena
                    .rrefs
                    .alloc(ElementNode { element: self, cache: ChildCache::default() });
                let ty = Ty::RRef(node);
                self.cache().rref.set(Some(ty));
                ty
            }
        }
    }

    /// `T*`. No kind overrides this one — even `void*` and `int&*`-shaped
    /// nonsense (rejected upstream, not here) share the same single-slot
    /// cache as everything else.
    pub fn ptr_of(self, arena: &'arena Arena<'arena>) -> Ty<'arena> {
        if let Some(cached) = self.cache().ptr.get() {
            return cached;
        }
        let node = arena
            .ptrs
            .alloc(ElementNode { element: self, cache: ChildCache::default() });
        let ty = Ty::Ptr(node);
        self.cache().ptr.set(Some(ty));
        ty
    }

    /// `T[dimensions]`. `dimensions` is the array's extent, not a rank; a
    /// multi-dimensional array is `array_of` applied repeatedly.
    pub fn array_of(self, arena: &'arena Arena<'arena>, dimensions: u32) -> Ty<'arena> {
        debug_assert!(dimensions >= 1);
        if let Some(ty) = self.cache().array.borrow().get(&dimensions) {
            return *ty;
        }
        let node = arena.arrays.alloc(ArrayNode {
            element: self,
            dimensions,
            cache: ChildCache::default(),
        });
        let ty = Ty::Array(node);
        self.cache().array.borrow_mut().insert(dimensions, ty);
        ty
    }

    /// Applies a cv-qualifier set. `Zero`/`Nullptr`/`LRef`/`RRef` are
    /// cv-immune and return themselves (references aren't cv-qualified in
    /// C++, only what they refer to is); `Cv(e, cv0).cv_of(cv1)` merges by
    /// union and requalifies the underlying element, it never stacks one
    /// `Cv` node on another, matching `TsysBase::CVOf`.
    pub fn cv_of(self, arena: &'arena Arena<'arena>, cv: Cv) -> Ty<'arena> {
        match self {
            Ty::Zero(_) | Ty::Nullptr(_) | Ty::LRef(_) | Ty::RRef(_) => self,
            Ty::Cv(n) => n.element.cv_of(arena, n.cv | cv),
            _ => {
                if cv.is_empty() {
                    return self;
                }
                let slot = cv_slot(cv);
                if let Some(ty) = self.cache().cv[slot].get() {
                    return ty;
                }
                let node =
                    arena.cvs.alloc(CvNode { element: self, cv, cache: ChildCache::default() });
                let ty = Ty::Cv(node);
                self.cache().cv[slot].set(Some(ty));
                ty
            }
        }
    }

    /// `T C::*`, a pointer-to-member of class `class`. No kind overrides
    /// this; it is keyed by the member-pointer's class in a map rather than
    /// a single slot, since one handle can be a member of many classes.
    pub fn member_of(self, arena: &'arena Arena<'arena>, class: Ty<'arena>) -> Ty<'arena> {
        if let Some(ty) = self.cache().member.borrow().get(&class) {
            return *ty;
        }
        let node = arena.members.alloc(MemberNode {
            element: self,
            class,
            cache: ChildCache::default(),
        });
        let ty = Ty::Member(node);
        self.cache().member.borrow_mut().insert(class, ty);
        ty
    }

    /// A function type returning `self`, with the given parameter list and
    /// calling data. Keyed on `(data, params)` in full: two functions with
    /// the same return type and parameters but different calling
    /// conventions or `noexcept` are distinct handles.
    pub fn function_of(
        self,
        arena: &'arena Arena<'arena>,
        params: Vec<Ty<'arena>>,
        data: FuncData,
    ) -> Ty<'arena> {
        if let Some(bucket) = self.cache().function.borrow().get(&data) {
            if let Some((_, ty)) = bucket.iter().find(|entry| entry.0 == &params[..]) {
                return *ty;
            }
        }
        let node = arena.functions.alloc(FunctionNode {
            element: self,
            params,
            data,
            cache: ChildCache::default(),
        });
        let ty = Ty::Function(node);
        self.cache()
            .function
            .borrow_mut()
            .entry(data)
            .or_default()
            .push((&node.params, ty));
        ty
    }

    /// A generic instantiation of `self` as the template with the given
    /// argument list.
    pub fn generic_of(
        self,
        arena: &'arena Arena<'arena>,
        params: Vec<Ty<'arena>>,
        data: GenericData,
    ) -> Ty<'arena> {
        if let Some(bucket) = self.cache().generic.borrow().get(&data) {
            if let Some((_, ty)) = bucket.iter().find(|entry| entry.0 == &params[..]) {
                return *ty;
            }
        }
        let node = arena.generics.alloc(GenericNode {
            element: self,
            params,
            data,
            cache: ChildCache::default(),
        });
        let ty = Ty::Generic(node);
        self.cache()
            .generic
            .borrow_mut()
            .entry(data)
            .or_default()
            .push((&node.params, ty));
        ty
    }

    /// Strips references and cv-qualification down to the underlying entity
    /// type, returning that entity plus the ref-kind and cv set peeled off
    /// along the way.
    ///
    /// Unlike `cv_of`, a `Cv` node *overwrites* the accumulated cv set rather
    /// than merging with it — `int const volatile` and `(int const)
    /// volatile` both have the outermost `Cv` win once you're walking down
    /// to find the entity, there's nothing further out to merge with.
    /// Matches `GetEntityInternal` in the source.
    pub fn entity(self) -> (Ty<'arena>, Cv, Option<RefKind>) {
        let mut cv = Cv::NONE;
        let mut ref_kind = None;
        let mut current = self;
        loop {
            current = match current {
                Ty::LRef(n) => {
                    ref_kind = Some(RefKind::LRef);
                    n.element
                }
                Ty::RRef(n) => {
                    ref_kind = Some(RefKind::RRef);
                    n.element
                }
                Ty::Cv(n) => {
                    cv = n.cv;
                    n.element
                }
                other => return (other, cv, ref_kind),
            };
        }
    }

    /// The `(class, bytes)` pair, if this is a `Primitive`.
    pub fn primitive(self) -> Result<PrimitiveDesc, KindMismatch> {
        match self {
            Ty::Primitive(n) => Ok(n.desc),
            _ => Err(mismatch("a primitive descriptor", self.kind())),
        }
    }

    /// The declaration symbol, if this is a `Decl` or `GenericArg`.
    pub fn decl(self) -> Result<Symbol, KindMismatch> {
        match self {
            Ty::Decl(n) | Ty::GenericArg(n) => Ok(n.symbol),
            _ => Err(mismatch("a declaration symbol", self.kind())),
        }
    }

    /// The cv-qualifier set, if this is a `Cv` node.
    pub fn cv(self) -> Result<Cv, KindMismatch> {
        match self {
            Ty::Cv(n) => Ok(n.cv),
            _ => Err(mismatch("a cv-qualifier set", self.kind())),
        }
    }

    /// The wrapped/return/template element, for any kind that has one:
    /// `LRef`, `RRef`, `Ptr`, `Array`, `Cv`, `Member`, `Function`, `Generic`.
    pub fn element(self) -> Result<Ty<'arena>, KindMismatch> {
        match self {
            Ty::LRef(n) | Ty::RRef(n) | Ty::Ptr(n) => Ok(n.element),
            Ty::Array(n) => Ok(n.element),
            Ty::Cv(n) => Ok(n.element),
            Ty::Member(n) => Ok(n.element),
            Ty::Function(n) => Ok(n.element),
            Ty::Generic(n) => Ok(n.element),
            _ => Err(mismatch("a wrapped element", self.kind())),
        }
    }

    /// The array extent, if this is an `Array` node.
    pub fn dimensions(self) -> Result<u32, KindMismatch> {
        match self {
            Ty::Array(n) => Ok(n.dimensions),
            _ => Err(mismatch("an array extent", self.kind())),
        }
    }

    /// The owning class, if this is a `Member` node.
    pub fn class(self) -> Result<Ty<'arena>, KindMismatch> {
        match self {
            Ty::Member(n) => Ok(n.class),
            _ => Err(mismatch("a member-pointer class", self.kind())),
        }
    }

    /// The parameter/argument at `index`, if this is a `Function` or
    /// `Generic` node and `index` is in range.
    pub fn param(self, index: usize) -> Result<Ty<'arena>, KindMismatch> {
        let params = self.params()?;
        params
            .get(index)
            .copied()
            .ok_or_else(|| mismatch("a parameter at that index", self.kind()))
    }

    /// The number of parameters/arguments, if this is a `Function` or
    /// `Generic` node.
    pub fn param_count(self) -> Result<usize, KindMismatch> {
        Ok(self.params()?.len())
    }

    fn params(self) -> Result<&'arena [Ty<'arena>], KindMismatch> {
        match self {
            Ty::Function(n) => Ok(&n.params),
            Ty::Generic(n) => Ok(&n.params),
            _ => Err(mismatch("a parameter list", self.kind())),
        }
    }

    /// The calling-convention/variadic/qualifier data, if this is a
    /// `Function` node.
    pub fn func(self) -> Result<FuncData, KindMismatch> {
        match self {
            Ty::Function(n) => Ok(n.data),
            _ => Err(mismatch("function call data", self.kind())),
        }
    }

    /// The completeness data, if this is a `Generic` node.
    pub fn generic(self) -> Result<GenericData, KindMismatch> {
        match self {
            Ty::Generic(n) => Ok(n.data),
            _ => Err(mismatch("generic instantiation data", self.kind())),
        }
    }
}

fn mismatch(expected: &'static str, actual: Kind) -> KindMismatch {
    KindMismatch { expected, actual }
}
