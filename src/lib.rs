//! Hash-consed, arena-backed representation of C++ types.
//!
//! A [`ty::Ty`] is a `Copy` handle into an [`arena::Arena`]; two handles
//! compare equal exactly when they were produced by the same call (directly,
//! or indirectly through a cache hit), so equality and identity coincide —
//! `==` is a pointer comparison, never a structural walk. Building a type
//! from its parts (a reference, a pointer, a cv-qualification, a function
//! signature, ...) always goes through the owning `Arena`, which is also
//! what makes two calls with the same arguments hand back the same handle.
//!
//! ```
//! use tsys_core::arena::{Arena, PlatformConfig};
//!
//! let arena = Arena::new(PlatformConfig::default());
//! let int_ref = arena.int_type().lref_of(&arena);
//! let int_ref_again = arena.int_type().lref_of(&arena);
//! assert_eq!(int_ref, int_ref_again);
//! ```

pub mod arena;
pub mod cv;
pub mod error;
pub mod func;
pub mod kind;
pub mod primitive;
pub mod symbol;
pub mod ty;
