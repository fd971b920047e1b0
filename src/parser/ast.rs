use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed source buffer: an ordered list of stencil declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Stencils in source order
    pub stencils: Vec<StencilDecl>,
}

/// A `stencil <name> { ... }` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StencilDecl {
    /// Stencil name (unique identifier)
    pub name: String,
    /// Storage declarations in source order
    pub storages: Vec<StorageDecl>,
    /// The single Do method of the stencil
    pub do_method: DoMethod,
}

/// A single declared storage inside a stencil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageDecl {
    /// Storage name, unique within the enclosing stencil
    pub name: String,
    /// Plain field vs. temporary
    pub kind: StorageKind,
}

/// Kind of a declared storage. All storages are 3D grid fields; the rank is
/// fixed for this domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    /// Plain field (`storage` keyword)
    Field,
    /// Temporary field (`var` keyword)
    Temporary,
}

/// The `Do { ... }` method: vertical regions evaluated in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoMethod {
    /// At least one vertical region
    pub regions: Vec<VerticalRegion>,
}

/// A `vertical_region(<lower>, <upper>) <body>` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalRegion {
    /// The interval the region covers
    pub interval: Interval,
    /// Statements in source order
    pub body: Vec<Stmt>,
}

/// A closed vertical interval `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound
    pub lower: VerticalBound,
    /// Upper bound
    pub upper: VerticalBound,
}

/// A vertical bound: symbolic `k_start`/`k_end` with an optional integer
/// offset, or a literal level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VerticalBound {
    /// `k_start` plus an offset (`k_start` alone has offset 0)
    Start {
        /// Offset relative to the first level
        offset: i64,
    },
    /// `k_end` plus an offset (`k_end` alone has offset 0)
    End {
        /// Offset relative to the last level
        offset: i64,
    },
    /// An absolute level written as an integer literal
    Literal(i64),
}

/// Statements inside a vertical region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Assignment: `<field access> = <expr>;`
    Assign {
        /// Left-hand field access
        lhs: FieldAccess,
        /// Right-hand expression tree
        rhs: Expr,
    },
    /// Bare expression statement: `<expr>;`
    Expr(Expr),
}

/// Expression tree nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Reference to a storage at an offset
    FieldAccess(FieldAccess),
    /// Integer literal
    IntLiteral(i64),
    /// Floating-point literal
    FloatLiteral(f64),
    /// Unary operation
    Unary {
        /// Operator to apply
        op: UnaryOp,
        /// Operand expression
        operand: Box<Expr>,
    },
    /// Binary operation
    Binary {
        /// Operator to apply
        op: BinaryOp,
        /// Left operand expression
        left: Box<Expr>,
        /// Right operand expression
        right: Box<Expr>,
    },
}

/// A reference to a storage by name plus a grid-point offset.
///
/// The reference is non-owning: the name is resolved against the enclosing
/// stencil's storage declarations during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccess {
    /// Name of the referenced storage
    pub name: String,
    /// Offset relative to the current grid point
    pub offset: Offset,
}

impl FieldAccess {
    /// A field access at the current grid point (offset zero)
    pub fn at_center(name: impl Into<String>) -> Self {
        FieldAccess {
            name: name.into(),
            offset: Offset::default(),
        }
    }
}

/// Integer offset triple relative to the current grid point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offset {
    /// Offset along the i axis
    pub i: i64,
    /// Offset along the j axis
    pub j: i64,
    /// Offset along the k axis
    pub k: i64,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition operator (+)
    Add,
    /// Subtraction operator (-)
    Sub,
    /// Multiplication operator (*)
    Mul,
    /// Division operator (/)
    Div,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Negation operator (-x)
    Neg,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

impl fmt::Display for VerticalBound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VerticalBound::Start { offset: 0 } => write!(f, "k_start"),
            VerticalBound::Start { offset } if *offset > 0 => write!(f, "k_start+{}", offset),
            VerticalBound::Start { offset } => write!(f, "k_start{}", offset),
            VerticalBound::End { offset: 0 } => write!(f, "k_end"),
            VerticalBound::End { offset } if *offset > 0 => write!(f, "k_end+{}", offset),
            VerticalBound::End { offset } => write!(f, "k_end{}", offset),
            VerticalBound::Literal(v) => write!(f, "{}", v),
        }
    }
}

impl Interval {
    /// The full symbolic vertical extent `[k_start, k_end]`
    pub fn full() -> Self {
        Interval {
            lower: VerticalBound::Start { offset: 0 },
            upper: VerticalBound::End { offset: 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offset_is_center() {
        let access = FieldAccess::at_center("field_a");
        assert_eq!(access.offset, Offset { i: 0, j: 0, k: 0 });
    }

    #[test]
    fn test_bound_display() {
        assert_eq!(VerticalBound::Start { offset: 0 }.to_string(), "k_start");
        assert_eq!(VerticalBound::Start { offset: 2 }.to_string(), "k_start+2");
        assert_eq!(VerticalBound::End { offset: -1 }.to_string(), "k_end-1");
        assert_eq!(VerticalBound::Literal(5).to_string(), "5");
    }

    #[test]
    fn test_full_interval() {
        let interval = Interval::full();
        assert_eq!(interval.lower, VerticalBound::Start { offset: 0 });
        assert_eq!(interval.upper, VerticalBound::End { offset: 0 });
    }
}
