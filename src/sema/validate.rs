use super::{GridContext, StorageTable};
use crate::error::{Error, Result};
use crate::parser::{CompilationUnit, Expr, FieldAccess, StencilDecl, Stmt, VerticalRegion};
use tracing::debug;

/// Validates one stencil and returns its storage table.
///
/// Checks run in a fixed order and the first violation is returned:
///
///   1. storage name uniqueness
///   2. every field access names a declared storage
///   3. each region interval resolves with lower <= upper
///   4. no two region intervals intersect
///
/// The overlap rule is deliberately conservative: regions whose intervals
/// intersect are rejected even when their writes would not conflict, so
/// assignment order stays unambiguous.
pub fn validate(stencil: &StencilDecl, grid: &GridContext) -> Result<StorageTable> {
    debug!(stencil = %stencil.name, "validating stencil");

    let table = check_storage_uniqueness(stencil)?;
    check_field_resolution(stencil, &table)?;
    check_intervals(stencil, grid)?;
    check_overlap(stencil, grid)?;

    Ok(table)
}

/// Validates every stencil of a compilation unit in source order, returning
/// one storage table per stencil.
pub fn validate_unit(unit: &CompilationUnit, grid: &GridContext) -> Result<Vec<StorageTable>> {
    unit.stencils
        .iter()
        .map(|stencil| validate(stencil, grid))
        .collect()
}

fn check_storage_uniqueness(stencil: &StencilDecl) -> Result<StorageTable> {
    let mut table = StorageTable::default();
    for (index, storage) in stencil.storages.iter().enumerate() {
        if !table.insert(&storage.name, index) {
            return Err(Error::DuplicateStorage {
                stencil: stencil.name.clone(),
                name: storage.name.clone(),
            });
        }
    }
    Ok(table)
}

fn check_field_resolution(stencil: &StencilDecl, table: &StorageTable) -> Result<()> {
    for region in &stencil.do_method.regions {
        for stmt in &region.body {
            match stmt {
                Stmt::Assign { lhs, rhs } => {
                    check_access(stencil, table, lhs)?;
                    check_expr(stencil, table, rhs)?;
                }
                Stmt::Expr(expr) => check_expr(stencil, table, expr)?,
            }
        }
    }
    Ok(())
}

fn check_access(stencil: &StencilDecl, table: &StorageTable, access: &FieldAccess) -> Result<()> {
    if table.index_of(&access.name).is_none() {
        return Err(Error::UnresolvedField {
            stencil: stencil.name.clone(),
            name: access.name.clone(),
        });
    }
    Ok(())
}

fn check_expr(stencil: &StencilDecl, table: &StorageTable, expr: &Expr) -> Result<()> {
    match expr {
        Expr::FieldAccess(access) => check_access(stencil, table, access),
        Expr::IntLiteral(_) | Expr::FloatLiteral(_) => Ok(()),
        Expr::Unary { operand, .. } => check_expr(stencil, table, operand),
        Expr::Binary { left, right, .. } => {
            check_expr(stencil, table, left)?;
            check_expr(stencil, table, right)
        }
    }
}

/// Resolves a region's interval to absolute levels, failing when a bound
/// does not resolve at all or the interval is inverted. The error payload
/// carries clamped levels so overflowed offsets still report a range.
fn resolve(stencil: &StencilDecl, region: &VerticalRegion, grid: &GridContext) -> Result<(i64, i64)> {
    let lower = grid.resolve(region.interval.lower);
    let upper = grid.resolve(region.interval.upper);
    match (lower, upper) {
        (Some(lower), Some(upper)) if lower <= upper => Ok((lower, upper)),
        _ => Err(Error::InvalidInterval {
            stencil: stencil.name.clone(),
            lower: grid.resolve_saturating(region.interval.lower),
            upper: grid.resolve_saturating(region.interval.upper),
        }),
    }
}

fn check_intervals(stencil: &StencilDecl, grid: &GridContext) -> Result<()> {
    for region in &stencil.do_method.regions {
        resolve(stencil, region, grid)?;
    }
    Ok(())
}

fn check_overlap(stencil: &StencilDecl, grid: &GridContext) -> Result<()> {
    let regions = &stencil.do_method.regions;
    for (i, first) in regions.iter().enumerate() {
        let (first_lower, first_upper) = resolve(stencil, first, grid)?;
        for second in &regions[i + 1..] {
            let (second_lower, second_upper) = resolve(stencil, second, grid)?;
            // Closed intervals intersect iff neither lies fully on one side
            if first_lower <= second_upper && second_lower <= first_upper {
                return Err(Error::OverlappingRegions {
                    stencil: stencil.name.clone(),
                    first_lower,
                    first_upper,
                    second_lower,
                    second_upper,
                });
            }
        }
    }
    Ok(())
}
