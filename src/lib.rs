//! msrswdb – imports ASAM MSRSW calibration exchange documents into SQLite.
//!
//! The crate is a generic document-to-relational mapping engine wrapped
//! around a fixed vocabulary:
//! * A [`registry::Descriptor`] declares one element kind — its
//!   attribute map, child slots with cardinalities, and whether the
//!   kind is terminal (inner text becomes a `content` column).
//! * The [`registry::Registry`] is the injected, immutable set of
//!   descriptors; [`catalog::msrsw`] builds the shipped MSRSW subset.
//! * The [`walker::Walker`] recursively maps every source element to an
//!   entity in an arena, children before parents, so foreign keys are
//!   just arena indices even though the kind graph is cyclic.
//! * The [`persist::Persistor`] owns the SQLite connection (tuning
//!   pragmas, `regexp()` extension) and flushes the arena in a single
//!   all-or-nothing transaction: one table per kind, singular child
//!   slots as nullable `<slot>_rid` columns, plural slots through the
//!   ordered `element_link` adjacency table.
//! * The [`metadata`] pass then records `schema_version`, the document
//!   variant and the schema location in the singleton `meta_data` row,
//!   in a second, idempotent transaction.
//!
//! ## Modules
//! * [`registry`] – descriptor and registry types, namespace stripping.
//! * [`catalog`] – the MSRSW descriptor catalog (configuration data).
//! * [`walker`] – arena, recursive walker, import orchestration.
//! * [`persist`] – SQLite schema creation and the transactional flush.
//! * [`metadata`] – the post-import singleton metadata update.
//! * [`datatype`] – scalar kinds and the string→timestamp/decimal/blob
//!   coercions.
//! * [`settings`] – connection and import settings (config file plus
//!   environment overrides).
//! * [`error`] – the crate error type.
//!
//! ## Unknown names
//! Tags and attributes missing from the registry follow the configured
//! [`settings::UnknownPolicy`]: `Strict` fails the import, `Lenient`
//! drops them and counts every drop in the
//! [`walker::ImportReport`]. Malformed scalar content is always fatal.
//!
//! ## Quick Start
//! ```
//! use msrswdb::catalog;
//! use msrswdb::persist::{PersistenceMode, Persistor};
//! use msrswdb::settings::{ConnectionSettings, ImportSettings};
//! use msrswdb::walker::Importer;
//!
//! let mut persistor =
//!     Persistor::new(PersistenceMode::InMemory, &ConnectionSettings::default()).unwrap();
//! let importer = Importer::new(catalog::msrsw(), ImportSettings::default());
//! let outcome = importer
//!     .import_str(
//!         "<MSRSW><SHORT-NAME>demo</SHORT-NAME><CATEGORY>CDF20</CATEGORY></MSRSW>",
//!         &mut persistor,
//!     )
//!     .unwrap();
//! assert_eq!(outcome.report.skipped_elements, 0);
//! ```

pub mod catalog;
pub mod datatype;
pub mod error;
pub mod metadata;
pub mod persist;
pub mod registry;
pub mod settings;
pub mod walker;
