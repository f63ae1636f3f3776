//! The post-import metadata update.
//!
//! Runs once after the main commit, in a second transaction: re-reads
//! the persisted root row, follows its singular `CATEGORY` slot to the
//! document variant, and writes the singleton `meta_data` row. The
//! update is a plain `UPDATE ... WHERE rid = 1` against the bootstrap
//! row, so it is idempotent: a crash between the two commits leaves
//! `schema_version` NULL, which is detectable and repaired by running
//! the update again.

use chrono::Utc;
use rusqlite::{OptionalExtension, params};

use crate::datatype::TIMESTAMP_FORMAT;
use crate::error::{MsrswdbError, Result};
use crate::persist::Persistor;
use crate::registry::{Cardinality, Registry};

/// Version of the mapping engine's relational layout, not of any source
/// document.
pub const SCHEMA_VERSION: i64 = 10;

pub fn update(
    persistor: &mut Persistor,
    registry: &Registry,
    root_kind: &str,
    root_rid: i64,
    xml_schema: Option<&str>,
) -> Result<()> {
    let descriptor = registry.lookup(root_kind).ok_or_else(|| {
        MsrswdbError::Invariant(format!("root kind '{}' left the registry", root_kind))
    })?;

    let variant: Option<String> = match descriptor.child_slot("CATEGORY") {
        Some(slot) if slot.cardinality == Cardinality::One => {
            let category = registry.lookup("CATEGORY").ok_or_else(|| {
                MsrswdbError::Invariant("CATEGORY kind left the registry".to_owned())
            })?;
            let sql = format!(
                "select c.content from \"{}\" r
                    join \"{}\" c on c.rid = r.\"{}_rid\"
                    where r.rid = ?",
                descriptor.table(),
                category.table(),
                slot.field,
            );
            persistor
                .connection()
                .query_row(&sql, [root_rid], |row| row.get(0))
                .optional()?
        }
        _ => None,
    };

    let created = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
    let tx = persistor.transaction()?;
    tx.execute(
        "update meta_data
            set schema_version = ?, variant = ?, xml_schema = ?, created = ?
            where rid = 1",
        params![SCHEMA_VERSION, variant, xml_schema, created],
    )?;
    tx.commit()?;
    Ok(())
}
