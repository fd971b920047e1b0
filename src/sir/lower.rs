//! Lowering: validated AST → SIR
//!
//! Lowering is a pure structural copy: declaration order is preserved for
//! fields, regions, and statements, expression trees are copied node for
//! node, and field accesses pick up the declaration-index handles resolved
//! by validation. It is total over validated input and never fails.

use super::{
    SirBound, SirDocument, SirExpr, SirField, SirFieldAccess, SirInterval, SirStencil, SirStmt,
    SirVerticalRegion,
};
use crate::parser::{
    CompilationUnit, Expr, FieldAccess, StencilDecl, Stmt, StorageKind, VerticalBound,
};
use crate::sema::StorageTable;
use tracing::debug;

/// Lowers one validated stencil into its SIR form.
pub fn lower(stencil: &StencilDecl, table: &StorageTable) -> SirStencil {
    debug!(stencil = %stencil.name, "lowering stencil");

    let fields = stencil
        .storages
        .iter()
        .enumerate()
        .map(|(field_index, storage)| SirField {
            name: storage.name.clone(),
            is_temporary: storage.kind == StorageKind::Temporary,
            field_index,
        })
        .collect();

    let regions = stencil
        .do_method
        .regions
        .iter()
        .map(|region| SirVerticalRegion {
            interval: SirInterval {
                lower: lower_bound(region.interval.lower),
                upper: lower_bound(region.interval.upper),
            },
            statements: region
                .body
                .iter()
                .map(|stmt| lower_stmt(stmt, table))
                .collect(),
        })
        .collect();

    SirStencil {
        name: stencil.name.clone(),
        fields,
        regions,
    }
}

/// Lowers a validated compilation unit into a document, one storage table
/// per stencil in the same order `validate_unit` produced them.
pub fn lower_unit(
    unit: &CompilationUnit,
    tables: &[StorageTable],
    filename: Option<&str>,
) -> SirDocument {
    let stencils = unit
        .stencils
        .iter()
        .zip(tables)
        .map(|(stencil, table)| lower(stencil, table))
        .collect();

    SirDocument {
        filename: filename.map(str::to_string),
        stencils,
    }
}

fn lower_bound(bound: VerticalBound) -> SirBound {
    match bound {
        VerticalBound::Start { offset } => SirBound::Start { offset },
        VerticalBound::End { offset } => SirBound::End { offset },
        VerticalBound::Literal(value) => SirBound::Level { value },
    }
}

fn lower_stmt(stmt: &Stmt, table: &StorageTable) -> SirStmt {
    match stmt {
        Stmt::Assign { lhs, rhs } => SirStmt::Assign {
            lhs: lower_access(lhs, table),
            rhs: lower_expr(rhs, table),
        },
        Stmt::Expr(expr) => SirStmt::Expr(lower_expr(expr, table)),
    }
}

fn lower_expr(expr: &Expr, table: &StorageTable) -> SirExpr {
    match expr {
        Expr::FieldAccess(access) => SirExpr::FieldAccess(lower_access(access, table)),
        Expr::IntLiteral(v) => SirExpr::IntLiteral(*v),
        Expr::FloatLiteral(v) => SirExpr::FloatLiteral(*v),
        Expr::Unary { op, operand } => SirExpr::Unary {
            op: op.to_string(),
            operand: Box::new(lower_expr(operand, table)),
        },
        Expr::Binary { op, left, right } => SirExpr::Binary {
            op: op.to_string(),
            left: Box::new(lower_expr(left, table)),
            right: Box::new(lower_expr(right, table)),
        },
    }
}

fn lower_access(access: &FieldAccess, table: &StorageTable) -> SirFieldAccess {
    // Validation has resolved every access; a missing entry here would mean
    // lowering ran on an unvalidated tree.
    let field_index = table.index_of(&access.name).unwrap_or(usize::MAX);
    SirFieldAccess {
        name: access.name.clone(),
        field_index,
        offset: [access.offset.i, access.offset.j, access.offset.k],
    }
}
