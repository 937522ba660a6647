//! ADM transforms: pure, total `Module -> Module` rewriters, plus lint
//! checks that report findings rather than rewrite.
//!
//! Transforms never mutate a live, published [`crate::catalog::Catalog`] —
//! each one takes a [`Module`] by value/reference and returns a freshly
//! built one, operating on catalog copies rather than in-place on the live
//! catalog.

pub mod add_enum;
pub mod canonicalize;
pub mod lint;

use crate::catalog::Module;
use crate::error::Result;

pub use add_enum::add_enum;
pub use canonicalize::canonicalize;
pub use lint::{lint_ensure_hyphenated_names, LintFinding};

/// A named, total `Module -> Module` rewrite, run by [`run_pipeline`].
pub trait Transform {
    fn name(&self) -> &'static str;
    fn apply(&self, module: &Module) -> Result<Module>;
}

pub struct AddEnum;

impl Transform for AddEnum {
    fn name(&self) -> &'static str {
        "adm-add-enum"
    }

    fn apply(&self, module: &Module) -> Result<Module> {
        add_enum(module)
    }
}

pub struct Canonicalize;

impl Transform for Canonicalize {
    fn name(&self) -> &'static str {
        "canonicalize"
    }

    fn apply(&self, module: &Module) -> Result<Module> {
        canonicalize(module)
    }
}

/// Looks up a transform by its `-t <name>` token, the set `ace_adm` accepts
/// repeated on the command line.
pub fn by_name(name: &str) -> Option<Box<dyn Transform>> {
    Some(match name {
        "adm-add-enum" => Box::new(AddEnum),
        "canonicalize" => Box::new(Canonicalize),
        _ => return None,
    })
}

/// Applies `transforms` in order, each against the previous one's output.
pub fn run_pipeline(module: &Module, transforms: &[Box<dyn Transform>]) -> Result<Module> {
    let mut current = module.clone();
    for t in transforms {
        current = t.apply(&current)?;
    }
    Ok(current)
}
