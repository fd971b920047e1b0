//! Compilation pipeline
//!
//! Chains the stages end to end for one compilation unit:
//!
//!   source text → Scanner → Tokens → Parser → AST → Validator → Lowering → SIR
//!
//! Each stage fully consumes its predecessor's output; data flows strictly
//! forward and no stage holds process-wide mutable state, so independent
//! units can be compiled in parallel with [`compile_many`].

use crate::error::Result;
use crate::lexer::Scanner;
use crate::parser::StencilParser;
use crate::sema::{validate_unit, GridContext};
use crate::sir::codec::write_sir;
use crate::sir::{lower_unit, SirDocument};
use rayon::prelude::*;
use std::io::Write;
use tracing::debug;

/// Compiles one DSL source buffer into an SIR document using the default
/// grid context.
pub fn compile(source: &str) -> Result<SirDocument> {
    compile_with(source, &GridContext::default(), None)
}

/// Compiles one DSL source buffer against an explicit grid context,
/// optionally recording the source name in the document.
pub fn compile_with(
    source: &str,
    grid: &GridContext,
    filename: Option<&str>,
) -> Result<SirDocument> {
    debug!(len = source.len(), filename, "compiling unit");

    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens()?;
    debug!(tokens = tokens.len(), "scanned");

    let mut parser = StencilParser::new(tokens);
    let unit = parser.parse()?;
    debug!(stencils = unit.stencils.len(), "parsed");

    let tables = validate_unit(&unit, grid)?;

    let doc = lower_unit(&unit, &tables, filename);
    debug!(stencils = doc.stencils.len(), "lowered");

    Ok(doc)
}

/// Compiles independent units in parallel.
///
/// Each unit runs its own pipeline; a failure aborts only that unit and the
/// others still report their own results, in input order.
pub fn compile_many(units: &[(&str, &str)], grid: &GridContext) -> Vec<Result<SirDocument>> {
    units
        .par_iter()
        .map(|&(name, source)| compile_with(source, grid, Some(name)))
        .collect()
}

/// Compiles a source buffer and writes the serialized document to a sink
/// (the "emit SIR, skip code generation" mode).
pub fn compile_to_sink<W: Write>(source: &str, sink: W) -> Result<()> {
    let doc = compile(source)?;
    write_sir(&doc, sink)
}
