//! SQLite persistence.
//!
//! One table per element kind: `rid` primary key, one column per
//! attribute field, a `content` column for terminal kinds and one
//! nullable `<slot>_rid` foreign-key column per singular child slot.
//! Plural slots go through the single `element_link` adjacency table,
//! whose `position` column preserves within-kind document order. The
//! whole arena is flushed inside one transaction; rows are inserted in
//! arena order, which puts every child before its parent.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{Connection, Transaction, params, params_from_iter};
use tracing::info;

use crate::datatype::ScalarKind;
use crate::error::{MsrswdbError, Result};
use crate::registry::{Cardinality, Descriptor, Registry};
use crate::settings::ConnectionSettings;
use crate::walker::Arena;

/// File extension convention carried over from earlier tooling.
pub const DB_EXTENSION: &str = "msrswdb";

pub enum PersistenceMode {
    InMemory,
    File(String),
}

lazy_static! {
    // compiled patterns survive across regexp() invocations
    static ref REGEX_CACHE: Mutex<HashMap<String, Regex>> = Mutex::new(HashMap::new());
}

// ------------- Persistence -------------
pub struct Persistor {
    connection: Connection,
}

impl Persistor {
    /// Opens a connection, applies the tuning pragmas and registers the
    /// `regexp(pattern, text)` function for downstream queries.
    pub fn new(mode: PersistenceMode, settings: &ConnectionSettings) -> Result<Persistor> {
        let connection = match mode {
            PersistenceMode::InMemory => Connection::open_in_memory()?,
            PersistenceMode::File(path) => Connection::open(path)?,
        };
        // page_size must be applied before the first table is written
        connection.execute_batch(&format!(
            "PRAGMA page_size = {};
             PRAGMA cache_size = -{};
             PRAGMA synchronous = {};
             PRAGMA locking_mode = {};
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = {};",
            settings.page_size,
            // negative cache_size is in KiB
            settings.cache_size_mb * 1024,
            settings.synchronous.pragma(),
            settings.locking_mode.pragma(),
            if settings.foreign_keys { "ON" } else { "OFF" },
        ))?;
        register_regexp(&connection)?;
        Ok(Persistor { connection })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.connection.transaction()?)
    }

    /// Creates one table per registered kind, the `element_link`
    /// adjacency table and the `meta_data` singleton bootstrap.
    /// Idempotent.
    pub fn create_schema(&self, registry: &Registry) -> Result<()> {
        let mut batch = String::new();
        let mut descriptors: Vec<&Descriptor> = registry.iter().collect();
        descriptors.sort_by_key(|d| d.table().to_owned());
        for descriptor in descriptors {
            batch.push_str(&create_table(descriptor, registry));
        }
        batch.push_str(
            "create table if not exists element_link (
                parent_table text not null,
                parent_rid integer not null,
                slot text not null,
                position integer not null,
                child_table text not null,
                child_rid integer not null,
                constraint referenceable_element_link primary key (
                    parent_table, parent_rid, slot, position
                )
            );
            create table if not exists meta_data (
                rid integer not null,
                schema_version integer null,
                variant text null,
                xml_schema text null,
                created text null,
                constraint referenceable_meta_data_rid primary key (rid),
                constraint single_meta_data_row check (rid = 1)
            );
            insert or ignore into meta_data (rid) values (1);",
        );
        self.connection.execute_batch(&batch)?;
        Ok(())
    }

    /// Flushes the whole arena in a single transaction. Any failure
    /// rolls everything back; nothing is durable unless the one commit
    /// succeeds.
    pub fn persist(&mut self, arena: &Arena, registry: &Registry) -> Result<()> {
        let tx = self.connection.transaction()?;
        {
            let mut link = tx.prepare(
                "insert into element_link (
                    parent_table, parent_rid, slot, position, child_table, child_rid
                ) values (?, ?, ?, ?, ?, ?)",
            )?;
            let mut rows = 0usize;
            for (id, entity) in arena.iter() {
                if !entity.live {
                    continue;
                }
                let descriptor = registry.lookup(entity.kind).ok_or_else(|| {
                    MsrswdbError::Invariant(format!("kind '{}' left the registry", entity.kind))
                })?;

                let mut columns = vec!["rid".to_owned()];
                let mut values = vec![Value::Integer(Arena::rid(id))];
                for (field, value) in &entity.attributes {
                    columns.push(quote(field));
                    values.push(Value::from(value));
                }
                if let Some(content) = &entity.content {
                    columns.push(quote("content"));
                    values.push(Value::from(content));
                }
                for (field, child) in &entity.singles {
                    columns.push(quote(&format!("{}_rid", field)));
                    values.push(Value::Integer(Arena::rid(*child)));
                }
                let placeholders = vec!["?"; columns.len()].join(", ");
                let sql = format!(
                    "insert into {} ({}) values ({})",
                    quote(descriptor.table()),
                    columns.join(", "),
                    placeholders
                );
                tx.prepare_cached(&sql)?.execute(params_from_iter(values.iter()))?;
                rows += 1;

                for (field, group) in &entity.collections {
                    for (position, child) in group.iter().enumerate() {
                        let child_table = registry
                            .lookup(arena.get(*child).kind)
                            .map(|d| d.table().to_owned())
                            .ok_or_else(|| {
                                MsrswdbError::Invariant(format!(
                                    "kind '{}' left the registry",
                                    arena.get(*child).kind
                                ))
                            })?;
                        link.execute(params![
                            descriptor.table(),
                            Arena::rid(id),
                            field,
                            position as i64,
                            child_table,
                            Arena::rid(*child),
                        ])?;
                    }
                }
            }
            info!(rows, "flushing entity rows");
        }
        tx.commit()?;
        Ok(())
    }
}

fn create_table(descriptor: &Descriptor, registry: &Registry) -> String {
    let mut columns = vec!["rid integer not null".to_owned()];
    for attribute in descriptor.attributes() {
        columns.push(format!("{} {} null", quote(attribute.field), column_type(attribute.coerce)));
    }
    if descriptor.is_terminal() {
        columns.push(format!("content {} null", column_type(descriptor.content_kind())));
    }
    let mut constraints = vec![format!(
        "constraint referenceable_{}_rid primary key (rid)",
        descriptor.table()
    )];
    for slot in descriptor.child_slots() {
        if slot.cardinality != Cardinality::One {
            continue;
        }
        columns.push(format!("{} integer null", quote(&format!("{}_rid", slot.field))));
        // a slot whose kind is not shipped still gets its column,
        // just without the reference
        if let Some(child) = registry.lookup(slot.tag) {
            constraints.push(format!(
                "constraint {}_references_{} foreign key ({}) references {} (rid)",
                slot.field,
                child.table(),
                quote(&format!("{}_rid", slot.field)),
                quote(child.table()),
            ));
        }
    }
    format!(
        "create table if not exists {} (\n    {},\n    {}\n);\n",
        quote(descriptor.table()),
        columns.join(",\n    "),
        constraints.join(",\n    "),
    )
}

fn column_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::HexBlob => "blob",
        _ => "text",
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

/// `value REGEXP pattern` and `regexp(pattern, value)`; anchored at the
/// start of the value, like the predicate it replaces.
fn register_regexp(connection: &Connection) -> Result<()> {
    connection.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern = ctx.get::<Option<String>>(0)?;
            let text = ctx.get::<Option<String>>(1)?;
            let (Some(pattern), Some(text)) = (pattern, text) else {
                return Ok(false);
            };
            let mut cache = REGEX_CACHE
                .lock()
                .map_err(|_| rusqlite::Error::UserFunctionError("regex cache poisoned".into()))?;
            let regex = match cache.entry(pattern) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(v) => {
                    let compiled = Regex::new(v.key())
                        .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;
                    v.insert(compiled)
                }
            };
            Ok(regex.find(&text).map(|m| m.start() == 0).unwrap_or(false))
        },
    )?;
    Ok(())
}
