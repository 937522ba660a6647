//! The ADM catalog: an in-memory index of ADM modules and their objects,
//! with symbolic↔numeric name resolution.
//!
//! Concurrency: many concurrent readers, or one exclusive writer, enforced
//! here with a [`RwLock`] rather than fine-grained per-module locks,
//! matching a reader-writer discipline with copy-on-write/snapshot-swap
//! semantics on write.

pub mod module;
pub mod object;
mod resolve;

use std::sync::{Arc, RwLock};

use crate::error::{CodecError, Result};
use crate::ident::{Name, ObjectRef, ObjectType, Revision};
use crate::typesys::TypeExpr;
use crate::value::{Ari, AriMap, ExecSet, Primitive, Report, ReportSet, Table};

pub use module::Module;
pub use object::{FormalParam, Object, ObjectKind};

#[derive(Default)]
struct CatalogInner {
    modules: Vec<Module>,
}

/// A process-wide, mutable-during-load, frozen-during-use index of ADM
/// modules. Cloning a `Catalog` shares the same
/// underlying lock; codec operations hold it only for the duration of a
/// single lookup.
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<CatalogInner>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent by `(org, module, revision)`: loading the same module
    /// twice is a no-op the second time.
    pub fn load_module(&self, module: Module) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| CodecError::InvariantViolation("catalog lock poisoned".into()))?;
        let identity = module.identity();
        if inner.modules.iter().any(|m| m.identity() == identity) {
            log::debug!(
                "module {:?}/{:?}@{:?} already loaded, skipping",
                identity.0,
                identity.1,
                identity.2
            );
            return Ok(());
        }
        log::debug!("loading module {:?}/{:?}", module.org, module.module);
        inner.modules.push(module);
        Ok(())
    }

    /// Iteration order is unspecified for this one operation.
    pub fn list_modules(&self) -> Vec<Module> {
        let inner = self.inner.read().expect("catalog lock poisoned");
        inner.modules.clone()
    }

    pub fn resolve_by_name(
        &self,
        org: &Name,
        module: &Name,
        revision: Option<Revision>,
        object_type: ObjectType,
        name: &Name,
    ) -> Result<Object> {
        let inner = self.inner.read().expect("catalog lock poisoned");
        resolve::check_org_ambiguity(&inner.modules, org)?;
        let candidates = resolve::matching_modules(&inner.modules, org, module);
        let m = resolve::pick_revision(candidates, revision)
            .ok_or_else(|| CodecError::NotFound(format!("module {org:?}/{module:?}")))?;
        let obj = match name {
            Name::Text(n) => m.get_by_name(object_type, n),
            Name::Num(n) => m.get_by_enum(object_type, (*n) as u32),
        };
        obj.cloned()
            .ok_or_else(|| CodecError::NotFound(format!("{object_type:?}/{name:?}")))
    }

    /// The module whose `org`/`module` match the request, at the given
    /// (or latest) revision. Used by the text formatter and CBOR encoder
    /// to recover `org_enum`/`module_enum` when emitting numeric names.
    pub fn find_module(&self, org: &Name, module: &Name, revision: Option<Revision>) -> Option<Module> {
        let inner = self.inner.read().expect("catalog lock poisoned");
        let candidates = resolve::matching_modules(&inner.modules, org, module);
        resolve::pick_revision(candidates, revision).cloned()
    }

    pub fn resolve_by_enum(
        &self,
        org_enum: u32,
        module_enum: u32,
        revision: Option<Revision>,
        object_type: ObjectType,
        enum_id: u32,
    ) -> Result<Object> {
        self.resolve_by_name(
            &Name::Num(org_enum.into()),
            &Name::Num(module_enum.into()),
            revision,
            object_type,
            &Name::Num(enum_id.into()),
        )
    }

    /// The expanded type expression for a `TYPEDEF` object.
    pub fn typedef(&self, org: &Name, module: &Name, name: &Name) -> Result<TypeExpr> {
        let obj = self.resolve_by_name(org, module, None, ObjectType::Typedef, name)?;
        match obj.kind {
            ObjectKind::Typedef { expr } => Ok(expr),
            _ => Err(CodecError::InvariantViolation(format!(
                "object {name:?} is not a TYPEDEF"
            ))),
        }
    }

    /// Resolves every object reference nested anywhere in `ari` against
    /// this catalog: fills missing actual parameters from formal defaults
    /// and type-checks each actual against its formal's type. When
    /// `strict` is `true`, an unresolvable reference fails with
    /// `NotFound`; otherwise it is left structurally unchanged (still with
    /// its own parameters recursively resolved).
    ///
    /// This does not rewrite `org`/`model`/`object` identifiers into a
    /// combined text+enum form — [`Name`] only ever carries one form at a
    /// time, and the text/CBOR formatters already consult the catalog at
    /// emission time to pick symbolic or numeric output (see
    /// `text::formatter` and `cbor::encode`). Resolution's job here is
    /// existence-checking and parameter type-checking, not identifier
    /// rewriting; see `DESIGN.md` for this call.
    pub fn resolve_ari(&self, ari: &Ari, strict: bool) -> Result<Ari> {
        match ari {
            Ari::Undefined => Ok(Ari::Undefined),
            Ari::Null => Ok(Ari::Null),
            Ari::Literal(lit) => Ok(Ari::Literal(crate::value::Literal::new_unchecked(
                lit.ty.clone(),
                self.resolve_primitive(&lit.primitive, strict)?,
            ))),
            Ari::Reference(r) => self.resolve_reference(r, strict),
        }
    }

    fn resolve_primitive(&self, p: &Primitive, strict: bool) -> Result<Primitive> {
        Ok(match p {
            Primitive::Ac(items) => Primitive::Ac(self.resolve_all(items, strict)?),
            Primitive::Am(map) => {
                let mut resolved = AriMap::new();
                for (k, v) in map.iter() {
                    resolved.try_insert(self.resolve_ari(k, strict)?, self.resolve_ari(v, strict)?)?;
                }
                Primitive::Am(resolved)
            }
            Primitive::Tbl(t) => Primitive::Tbl(Table::new(t.columns.clone(), self.resolve_all(&t.cells, strict)?)?),
            Primitive::Tblt(fields) => Primitive::Tblt(
                fields
                    .iter()
                    .map(|f| {
                        Ok(crate::value::TbltField {
                            name: f.name.clone(),
                            ty: f.ty.clone(),
                            value: self.resolve_ari(&f.value, strict)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Primitive::ExecSet(e) => Primitive::ExecSet(ExecSet {
                nonce: e.nonce,
                targets: self.resolve_all(&e.targets, strict)?,
            }),
            Primitive::RptSet(r) => Primitive::RptSet(ReportSet {
                reference_time: r.reference_time,
                reports: r
                    .reports
                    .iter()
                    .map(|rep| self.resolve_report(rep, strict))
                    .collect::<Result<Vec<_>>>()?,
            }),
            Primitive::Rpt(r) => Primitive::Rpt(self.resolve_report(r, strict)?),
            other => other.clone(),
        })
    }

    fn resolve_report(&self, r: &Report, strict: bool) -> Result<Report> {
        Ok(Report {
            source: Box::new(self.resolve_ari(&r.source, strict)?),
            time: r.time,
            items: self.resolve_all(&r.items, strict)?,
        })
    }

    fn resolve_all(&self, items: &[Ari], strict: bool) -> Result<Vec<Ari>> {
        items.iter().map(|a| self.resolve_ari(a, strict)).collect()
    }

    fn resolve_reference(&self, r: &ObjectRef, strict: bool) -> Result<Ari> {
        match self.resolve_by_name(&r.org, &r.model, r.revision, r.object_type, &r.object) {
            Ok(obj) => {
                let formals = obj.formal_params();
                if r.params.len() > formals.len() {
                    return Err(CodecError::TypeMismatch {
                        expected: format!("at most {} actual parameters", formals.len()),
                        found: format!("{} actual parameters", r.params.len()),
                    });
                }
                let mut params = Vec::with_capacity(formals.len());
                for (i, formal) in formals.iter().enumerate() {
                    let actual = match r.params.get(i) {
                        Some(a) => self.resolve_ari(a, strict)?,
                        None => formal.default.clone().ok_or_else(|| {
                            CodecError::TypeMismatch {
                                expected: format!("parameter {:?}", formal.name),
                                found: "missing, no declared default".into(),
                            }
                        })?,
                    };
                    crate::typesys::compat::check_ari_against_ref(self, &formal.ty, &actual)?;
                    params.push(actual);
                }
                Ok(Ari::Reference(r.with_params(params)))
            }
            Err(e) if strict => Err(e),
            Err(_) => Ok(Ari::Reference(r.with_params(self.resolve_all(&r.params, strict)?))),
        }
    }
}
