use super::ast::{DoMethod, StencilDecl, StorageDecl, StorageKind, VerticalRegion};
use crate::error::{Error, Result};

/// Assembles parsed fragments into a well-formed [`StencilDecl`].
///
/// The parser hands storages and vertical regions to the builder in source
/// order; `finish` enforces the structural invariants that are not visible
/// to the grammar alone: a stencil must have exactly one `Do` method and
/// that method must contain at least one vertical region.
pub struct StencilBuilder {
    name: String,
    storages: Vec<StorageDecl>,
    regions: Option<Vec<VerticalRegion>>,
}

impl StencilBuilder {
    /// Starts building a stencil with the given name
    pub fn new(name: impl Into<String>) -> Self {
        StencilBuilder {
            name: name.into(),
            storages: Vec::new(),
            regions: None,
        }
    }

    /// Declares a storage in source order
    pub fn add_storage(&mut self, name: impl Into<String>, kind: StorageKind) {
        self.storages.push(StorageDecl {
            name: name.into(),
            kind,
        });
    }

    /// Whether a `Do` method has already been recorded
    pub fn has_do_method(&self) -> bool {
        self.regions.is_some()
    }

    /// Records the stencil's `Do` method. A second `Do` block is a
    /// structural error.
    pub fn set_do_method(&mut self, regions: Vec<VerticalRegion>) -> Result<()> {
        if self.regions.is_some() {
            return Err(Error::malformed(format!(
                "stencil '{}' has more than one Do method",
                self.name
            )));
        }
        self.regions = Some(regions);
        Ok(())
    }

    /// Closes the stencil block, checking structural completeness
    pub fn finish(self) -> Result<StencilDecl> {
        let regions = self.regions.ok_or_else(|| {
            Error::malformed(format!("stencil '{}' has no Do method", self.name))
        })?;

        if regions.is_empty() {
            return Err(Error::malformed(format!(
                "Do method of stencil '{}' has no vertical regions",
                self.name
            )));
        }

        Ok(StencilDecl {
            name: self.name,
            storages: self.storages,
            do_method: DoMethod { regions },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{FieldAccess, Interval, Stmt};

    fn copy_region() -> VerticalRegion {
        VerticalRegion {
            interval: Interval::full(),
            body: vec![Stmt::Assign {
                lhs: FieldAccess::at_center("a"),
                rhs: crate::parser::ast::Expr::FieldAccess(FieldAccess::at_center("b")),
            }],
        }
    }

    #[test]
    fn test_builds_complete_stencil() {
        let mut builder = StencilBuilder::new("Test");
        builder.add_storage("a", StorageKind::Field);
        builder.add_storage("b", StorageKind::Field);
        builder.set_do_method(vec![copy_region()]).unwrap();

        let stencil = builder.finish().unwrap();
        assert_eq!(stencil.name, "Test");
        assert_eq!(stencil.storages.len(), 2);
        assert_eq!(stencil.do_method.regions.len(), 1);
    }

    #[test]
    fn test_missing_do_method() {
        let mut builder = StencilBuilder::new("Test");
        builder.add_storage("a", StorageKind::Field);

        let err = builder.finish().unwrap_err();
        assert!(matches!(err, Error::MalformedAst { .. }));
        assert!(err.to_string().contains("no Do method"));
    }

    #[test]
    fn test_empty_do_method() {
        let mut builder = StencilBuilder::new("Test");
        builder.set_do_method(Vec::new()).unwrap();

        let err = builder.finish().unwrap_err();
        assert!(matches!(err, Error::MalformedAst { .. }));
        assert!(err.to_string().contains("no vertical regions"));
    }

    #[test]
    fn test_double_do_method() {
        let mut builder = StencilBuilder::new("Test");
        builder.set_do_method(vec![copy_region()]).unwrap();

        let err = builder.set_do_method(vec![copy_region()]).unwrap_err();
        assert!(matches!(err, Error::MalformedAst { .. }));
    }
}
