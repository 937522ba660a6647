//! A loaded ADM module: its identity plus the index over its objects.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ident::{Name, ObjectType, Revision};

use super::object::{Object, UNASSIGNED_ENUM};

/// `{org_id, module_id, revision_date, object_list}`.
#[derive(Debug, Clone)]
pub struct Module {
    pub org: Name,
    pub org_enum: u32,
    pub module: Name,
    pub module_enum: u32,
    pub revision: Option<Revision>,
    objects: Vec<Object>,
    by_name: HashMap<(ObjectType, String), usize>,
    by_enum: HashMap<(ObjectType, u32), usize>,
}

/// The on-the-wire shape of a JSON/YAML ADM record: the `by_name`/`by_enum`
/// indices are rebuilt from `objects` on load rather than carried in the
/// serialized form.
#[derive(serde::Serialize, serde::Deserialize)]
struct ModuleRecord {
    org: Name,
    org_enum: u32,
    module: Name,
    module_enum: u32,
    revision: Option<Revision>,
    objects: Vec<Object>,
}

impl serde::Serialize for Module {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ModuleRecord {
            org: self.org.clone(),
            org_enum: self.org_enum,
            module: self.module.clone(),
            module_enum: self.module_enum,
            revision: self.revision,
            objects: self.objects.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Module {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = ModuleRecord::deserialize(deserializer)?;
        Module::new(
            record.org,
            record.org_enum,
            record.module,
            record.module_enum,
            record.revision,
            record.objects,
        )
        .map_err(serde::de::Error::custom)
    }
}

impl Module {
    pub fn new(
        org: Name,
        org_enum: u32,
        module: Name,
        module_enum: u32,
        revision: Option<Revision>,
        objects: Vec<Object>,
    ) -> crate::error::Result<Self> {
        let mut by_name = HashMap::new();
        let mut by_enum = HashMap::new();
        for (idx, obj) in objects.iter().enumerate() {
            let name_key = (obj.object_type, obj.name.clone());
            if by_name.insert(name_key, idx).is_some() {
                return Err(crate::error::CodecError::InvariantViolation(format!(
                    "duplicate object name {:?}/{}",
                    obj.object_type, obj.name
                )));
            }
            // UNASSIGNED_ENUM marks "not yet enumerated" and is carried by
            // any number of objects at once (that's the state `adm-add-enum`
            // exists to resolve); only real, assigned enums must be unique.
            if obj.enum_id == UNASSIGNED_ENUM {
                continue;
            }
            let enum_key = (obj.object_type, obj.enum_id);
            if by_enum.insert(enum_key, idx).is_some() {
                return Err(crate::error::CodecError::InvariantViolation(format!(
                    "duplicate enum {} in bucket {:?}",
                    obj.enum_id, obj.object_type
                )));
            }
        }
        Ok(Self {
            org,
            org_enum,
            module,
            module_enum,
            revision,
            objects,
            by_name,
            by_enum,
        })
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn get_by_name(&self, object_type: ObjectType, name: &str) -> Option<&Object> {
        self.by_name
            .get(&(object_type, name.to_string()))
            .map(|&idx| &self.objects[idx])
    }

    pub fn get_by_enum(&self, object_type: ObjectType, enum_id: u32) -> Option<&Object> {
        self.by_enum
            .get(&(object_type, enum_id))
            .map(|&idx| &self.objects[idx])
    }

    /// Identity key used for idempotent loading: `(org, module, revision)`.
    pub fn identity(&self) -> (Name, Name, Option<Revision>) {
        (self.org.clone(), self.module.clone(), self.revision)
    }
}
