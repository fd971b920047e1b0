//! Stencil Intermediate Representation (SIR)
//!
//! The SIR is the compiler's contract with downstream consumers: a flat,
//! ordered, serializable representation of validated stencils, independent
//! of surface syntax. Lowering copies the data it needs out of the AST, so
//! the AST can be discarded afterwards; nothing in the SIR points back into
//! it. Declaration order is preserved everywhere so two documents produced
//! from identical sources serialize to identical bytes.

pub mod codec;
mod lower;

pub use lower::{lower, lower_unit};

use serde::{Deserialize, Serialize};

/// A complete lowered compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirDocument {
    /// Source name the unit was compiled from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Lowered stencils in source order
    pub stencils: Vec<SirStencil>,
}

/// One lowered stencil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirStencil {
    /// Stencil name
    pub name: String,
    /// Field entries in declaration order
    pub fields: Vec<SirField>,
    /// The flattened (interval, statements) list of the Do method, in
    /// declaration order
    pub regions: Vec<SirVerticalRegion>,
}

/// A field entry preserving the declared storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirField {
    /// Field name
    pub name: String,
    /// Whether the storage was declared as a temporary (`var`)
    pub is_temporary: bool,
    /// Declaration index within the stencil
    pub field_index: usize,
}

/// A lowered vertical region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirVerticalRegion {
    /// Interval bounds, still symbolic and tagged as declared
    pub interval: SirInterval,
    /// Lowered statements in source order
    pub statements: Vec<SirStmt>,
}

/// A closed vertical interval with tagged bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirInterval {
    /// Lower bound
    pub lower: SirBound,
    /// Upper bound
    pub upper: SirBound,
}

/// A vertical bound in the SIR. Bounds stay symbolic so the document is
/// independent of the grid size the unit was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SirBound {
    /// First vertical level plus an offset
    Start {
        /// Offset relative to the first level
        offset: i64,
    },
    /// Last vertical level plus an offset
    End {
        /// Offset relative to the last level
        offset: i64,
    },
    /// An absolute level
    Level {
        /// The level value
        value: i64,
    },
}

/// Lowered statements, mirroring the AST statement variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SirStmt {
    /// Assignment statement
    Assign {
        /// Left-hand field access
        lhs: SirFieldAccess,
        /// Right-hand expression tree
        rhs: SirExpr,
    },
    /// Bare expression statement
    Expr(SirExpr),
}

/// Lowered expression tree, a structural copy of the AST expression (no
/// simplification, no constant folding)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SirExpr {
    /// Field access
    FieldAccess(SirFieldAccess),
    /// Integer literal
    IntLiteral(i64),
    /// Floating-point literal
    FloatLiteral(f64),
    /// Unary operation; the operator is its surface spelling
    Unary {
        /// Operator spelling ("-")
        op: String,
        /// Operand expression
        operand: Box<SirExpr>,
    },
    /// Binary operation; the operator is its surface spelling
    Binary {
        /// Operator spelling ("+", "-", "*", "/")
        op: String,
        /// Left operand expression
        left: Box<SirExpr>,
        /// Right operand expression
        right: Box<SirExpr>,
    },
}

/// A lowered field access: the storage name, its resolved declaration
/// index, and the grid-point offset triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirFieldAccess {
    /// Name of the accessed field
    pub name: String,
    /// Declaration index of the field within its stencil
    pub field_index: usize,
    /// Offset triple (i, j, k) relative to the current grid point
    pub offset: [i64; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let access = SirFieldAccess {
            name: "field_a".to_string(),
            field_index: 0,
            offset: [0, 0, 0],
        };
        assert_eq!(access.clone(), access);

        let shifted = SirFieldAccess {
            offset: [1, 0, 0],
            ..access.clone()
        };
        assert_ne!(access, shifted);
    }

    #[test]
    fn test_bounds_stay_tagged() {
        let interval = SirInterval {
            lower: SirBound::Start { offset: 0 },
            upper: SirBound::End { offset: -1 },
        };
        let json = serde_json::to_string(&interval).unwrap();
        assert!(json.contains("Start"));
        assert!(json.contains("End"));
    }
}
