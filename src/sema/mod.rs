//! Semantic validation of parsed stencils
//!
//! Validation is pure and read-only over the AST: it checks storage name
//! uniqueness, resolves every field access against the declared storages,
//! resolves vertical bounds against a grid context, and rejects ambiguous
//! region overlap. Its only output besides the verdict is the storage
//! table of name-to-index handles that lowering consumes.

mod validate;

pub use validate::{validate, validate_unit};

use crate::parser::VerticalBound;
use std::collections::HashMap;

/// Vertical grid extent the symbolic bounds are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridContext {
    /// Number of vertical levels; `k_end` resolves to `k_size - 1`
    pub k_size: u32,
}

impl GridContext {
    /// Creates a grid context with the given vertical extent
    pub fn new(k_size: u32) -> Self {
        GridContext { k_size }
    }

    /// Resolve a vertical bound to an absolute level.
    ///
    /// Returns `None` when a symbolic offset pushes the level outside the
    /// representable range, so extreme offsets surface as validation errors
    /// instead of wrapping.
    pub fn resolve(&self, bound: VerticalBound) -> Option<i64> {
        match bound {
            VerticalBound::Start { offset } => Some(offset),
            VerticalBound::End { offset } => {
                (i64::from(self.k_size) - 1).checked_add(offset)
            }
            VerticalBound::Literal(value) => Some(value),
        }
    }

    /// Like [`resolve`](Self::resolve) but clamping instead of failing.
    /// Used to report levels in error payloads.
    pub fn resolve_saturating(&self, bound: VerticalBound) -> i64 {
        match bound {
            VerticalBound::Start { offset } => offset,
            VerticalBound::End { offset } => {
                (i64::from(self.k_size) - 1).saturating_add(offset)
            }
            VerticalBound::Literal(value) => value,
        }
    }
}

impl Default for GridContext {
    /// 80 vertical levels, a common atmospheric-model default
    fn default() -> Self {
        GridContext { k_size: 80 }
    }
}

/// Name-to-declaration-index handles for the storages of one stencil.
///
/// Built once during validation; lowering embeds the indices into SIR field
/// accesses so the serialized form carries stable handles instead of
/// back-references into the AST.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageTable {
    indices: HashMap<String, usize>,
}

impl StorageTable {
    pub(crate) fn insert(&mut self, name: &str, index: usize) -> bool {
        self.indices.insert(name.to_string(), index).is_none()
    }

    /// Look up the declaration index of a storage name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Number of declared storages
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the stencil declares no storages
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
