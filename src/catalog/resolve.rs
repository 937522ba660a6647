//! Name/enum resolution helpers shared by [`super::Catalog::resolve_by_name`]
//! and [`super::Catalog::resolve_by_enum`].

use crate::error::CodecError;
use crate::ident::{Name, Revision};

use super::module::Module;

/// Picks the modules whose `org`/`module` match the request, by either
/// text or numeric form (the catalog indexes both).
pub(super) fn matching_modules<'a>(
    modules: &'a [Module],
    org: &Name,
    module: &Name,
) -> Vec<&'a Module> {
    modules
        .iter()
        .filter(|m| name_matches(&m.org, m.org_enum, org) && name_matches(&m.module, m.module_enum, module))
        .collect()
}

fn name_matches(catalog_name: &Name, catalog_enum: u32, requested: &Name) -> bool {
    match requested {
        Name::Text(t) => matches!(catalog_name, Name::Text(c) if c == t),
        Name::Num(n) => *n == u64::from(catalog_enum),
    }
}

/// Detects the `AmbiguousReference` case: the same symbolic org alias
/// resolving to more than one distinct numeric org enum with no
/// disambiguating information given.
pub(super) fn check_org_ambiguity(modules: &[Module], org: &Name) -> crate::error::Result<()> {
    if let Name::Text(alias) = org {
        let mut enums: Vec<u32> = modules
            .iter()
            .filter(|m| matches!(&m.org, Name::Text(c) if c == alias))
            .map(|m| m.org_enum)
            .collect();
        enums.sort_unstable();
        enums.dedup();
        if enums.len() > 1 {
            return Err(CodecError::AmbiguousReference(format!(
                "organization alias {alias:?} resolves to {} distinct enums",
                enums.len()
            )));
        }
    }
    Ok(())
}

/// Narrows an already-org/module-matched set of modules by revision:
/// exact match if `revision` is given, else the single latest revision.
pub(super) fn pick_revision<'a>(
    candidates: Vec<&'a Module>,
    revision: Option<Revision>,
) -> Option<&'a Module> {
    match revision {
        Some(r) => candidates.into_iter().find(|m| m.revision == Some(r)),
        None => candidates.into_iter().max_by_key(|m| m.revision),
    }
}
