//! Process-wide memo of document field tables.
//!
//! Each document type's table is built once, leaked, and shared for the
//! rest of the process. Concurrent first lookups for the same type build it
//! exactly once: the read path is checked again under the write lock before
//! building.

use super::{FieldDescriptor, SearchDocument};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::OnceLock;

type Table = &'static (dyn Any + Send + Sync);

static TABLES: OnceLock<RwLock<HashMap<TypeId, Table>>> = OnceLock::new();

fn lookup<D: SearchDocument>(
    tables: &HashMap<TypeId, Table>,
) -> Option<&'static [FieldDescriptor<D>]> {
    tables
        .get(&TypeId::of::<D>())
        .copied()
        .and_then(|table: Table| table.downcast_ref::<Vec<FieldDescriptor<D>>>())
        .map(Vec::as_slice)
}

/// The field table of `D`, built on first use.
pub fn fields_of<D: SearchDocument>() -> &'static [FieldDescriptor<D>] {
    let tables = TABLES.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(fields) = lookup::<D>(&tables.read()) {
        return fields;
    }

    let mut guard = tables.write();
    if let Some(fields) = lookup::<D>(&guard) {
        return fields;
    }

    let fields: &'static Vec<FieldDescriptor<D>> = Box::leak(Box::new(D::describe_fields()));
    tracing::debug!(
        document = std::any::type_name::<D>(),
        fields = fields.len(),
        "built document field table"
    );
    guard.insert(TypeId::of::<D>(), fields);
    fields.as_slice()
}
