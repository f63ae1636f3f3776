//! The recursive document walker and the import orchestration.
//!
//! [`Walker::map`] turns one source element into one [`EntityInstance`]
//! inside an [`Arena`], recursing through the children first so that
//! every child occupies a lower arena index than its parent. Foreign
//! keys are plain arena indices shifted by one; because children are
//! enqueued before their parents, rows can later be inserted in arena
//! order without deferred constraints even though the kind graph is
//! cyclic.
//!
//! Child results are grouped by kind name before they are attached to
//! the parent's slots. Grouping is stable within a kind; the relative
//! order of siblings of *different* kinds is not preserved. Singular
//! slots keep only the first child of their kind; the rest of the group
//! is discarded together with its subtree and counted in the report.

use std::collections::BTreeMap;

use roxmltree::{Document, Node};
use tracing::{info, warn};

use crate::datatype::ScalarValue;
use crate::error::{MsrswdbError, Result};
use crate::metadata;
use crate::persist::Persistor;
use crate::registry::{Cardinality, Registry, strip_namespace};
use crate::settings::{ImportSettings, UnknownPolicy};

/// Arena index of an entity. The persisted surrogate key is
/// [`Arena::rid`] of this.
pub type EntityId = usize;

/// One row-to-be: the mapped form of exactly one source element.
#[derive(Debug)]
pub struct EntityInstance {
    pub kind: &'static str,
    pub attributes: Vec<(&'static str, ScalarValue)>,
    pub content: Option<ScalarValue>,
    /// Singular child slots, one reference each.
    pub singles: Vec<(&'static str, EntityId)>,
    /// Plural child slots, ordered references.
    pub collections: Vec<(&'static str, Vec<EntityId>)>,
    /// Cleared when the entity is discarded (extra child under a
    /// singular slot, or an unplaced child in lenient mode). Dead
    /// entities are never persisted.
    pub live: bool,
}

#[derive(Debug, Default)]
pub struct Arena {
    entities: Vec<EntityInstance>,
}

impl Arena {
    pub fn new() -> Self {
        Self { entities: Vec::new() }
    }
    fn push(&mut self, entity: EntityInstance) -> EntityId {
        self.entities.push(entity);
        self.entities.len() - 1
    }
    pub fn get(&self, id: EntityId) -> &EntityInstance {
        &self.entities[id]
    }
    pub fn len(&self) -> usize {
        self.entities.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityInstance)> {
        self.entities.iter().enumerate()
    }
    /// Surrogate key of an arena entity. Starts at 1 so that 0 never
    /// appears as a foreign key.
    pub fn rid(id: EntityId) -> i64 {
        (id + 1) as i64
    }
}

/// Counters for everything the walk dropped on the floor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Elements whose tag is not in the registry (lenient mode).
    pub skipped_elements: usize,
    /// Attributes missing from their kind's attribute map.
    pub dropped_attributes: usize,
    /// Children whose kind has no slot on the parent (lenient mode).
    pub unplaced_children: usize,
    /// Extra same-kind children discarded from singular slots.
    pub discarded_extras: usize,
}

// Schema-location attributes are captured by the importer directly from
// the top-level element; they belong to no descriptor.
const SCHEMA_ATTRIBUTES: [&str; 2] = ["noNamespaceSchemaLocation", "schemaLocation"];

pub struct Walker<'a> {
    registry: &'a Registry,
    policy: UnknownPolicy,
    arena: Arena,
    report: ImportReport,
}

impl<'a> Walker<'a> {
    pub fn new(registry: &'a Registry, policy: UnknownPolicy) -> Self {
        Self { registry, policy, arena: Arena::new(), report: ImportReport::default() }
    }

    /// Maps one element and, recursively, everything below it. Returns
    /// `None` when the element was skipped under the lenient policy.
    pub fn map(&mut self, node: Node) -> Result<Option<EntityId>> {
        let tag = strip_namespace(node.tag_name().name());
        let Some(descriptor) = self.registry.lookup(tag) else {
            return match self.policy {
                UnknownPolicy::Strict => {
                    Err(MsrswdbError::UnknownElementKind { tag: tag.to_owned() })
                }
                UnknownPolicy::Lenient => {
                    warn!(tag, "skipping unknown element kind");
                    self.report.skipped_elements += 1;
                    Ok(None)
                }
            };
        };

        let mut entity = EntityInstance {
            kind: descriptor.tag(),
            attributes: Vec::new(),
            content: None,
            singles: Vec::new(),
            collections: Vec::new(),
            live: true,
        };

        for attribute in node.attributes() {
            let name = strip_namespace(attribute.name());
            if SCHEMA_ATTRIBUTES.contains(&name) {
                continue;
            }
            match descriptor.attribute_spec(name) {
                Some(spec) => {
                    let value = ScalarValue::coerce(spec.coerce, attribute.value())?;
                    entity.attributes.push((spec.field, value));
                }
                None => match self.policy {
                    UnknownPolicy::Strict => {
                        return Err(MsrswdbError::UnknownAttribute {
                            tag: descriptor.tag(),
                            attribute: name.to_owned(),
                        });
                    }
                    UnknownPolicy::Lenient => self.report.dropped_attributes += 1,
                },
            }
        }

        // Only leaf text is modeled; text interleaved with child
        // elements is not captured.
        if descriptor.is_terminal() {
            entity.content = coerce_content(descriptor.content_kind(), node.text())?;
        }

        let mut mapped = Vec::new();
        for child in node.children().filter(Node::is_element) {
            if let Some(id) = self.map(child)? {
                mapped.push(id);
            }
        }

        // Stable within a kind; across kinds the groups come out in
        // kind-name order, not document order.
        let mut groups: BTreeMap<&'static str, Vec<EntityId>> = BTreeMap::new();
        for id in mapped {
            groups.entry(self.arena.get(id).kind).or_default().push(id);
        }

        for (kind, group) in groups {
            match descriptor.child_slot(kind) {
                Some(slot) => match slot.cardinality {
                    Cardinality::Many => entity.collections.push((slot.field, group)),
                    Cardinality::One => {
                        if group.len() > 1 {
                            warn!(
                                parent = descriptor.tag(),
                                child = kind,
                                extras = group.len() - 1,
                                "discarding extra children of a singular slot"
                            );
                            self.report.discarded_extras += group.len() - 1;
                            for extra in &group[1..] {
                                self.discard(*extra);
                            }
                        }
                        entity.singles.push((slot.field, group[0]));
                    }
                },
                None => match self.policy {
                    UnknownPolicy::Strict => {
                        return Err(MsrswdbError::UnknownChildSlot {
                            parent: descriptor.tag(),
                            child: kind,
                        });
                    }
                    UnknownPolicy::Lenient => {
                        warn!(parent = descriptor.tag(), child = kind, "no slot for child kind");
                        self.report.unplaced_children += group.len();
                        for unplaced in group {
                            self.discard(unplaced);
                        }
                    }
                },
            }
        }

        Ok(Some(self.arena.push(entity)))
    }

    /// Tombstones an entity together with its whole subtree.
    fn discard(&mut self, id: EntityId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let entity = &mut self.arena.entities[id];
            if !entity.live {
                continue;
            }
            entity.live = false;
            pending.extend(entity.singles.iter().map(|(_, child)| *child));
            for (_, group) in &entity.collections {
                pending.extend(group.iter().copied());
            }
        }
    }

    pub fn into_parts(self) -> (Arena, ImportReport) {
        (self.arena, self.report)
    }
}

fn coerce_content(
    kind: crate::datatype::ScalarKind,
    text: Option<&str>,
) -> Result<Option<ScalarValue>> {
    match kind {
        // text content defaults to the empty string, as some wrappers
        // legitimately carry none
        crate::datatype::ScalarKind::Text => {
            Ok(Some(ScalarValue::Text(text.unwrap_or("").to_owned())))
        }
        _ => match text {
            Some(raw) if !raw.trim().is_empty() => ScalarValue::coerce(kind, raw).map(Some),
            _ => Ok(None),
        },
    }
}

/// The result of one successful import.
#[derive(Debug)]
pub struct ImportOutcome {
    pub root: EntityId,
    pub root_rid: i64,
    pub report: ImportReport,
}

/// Wires a registry and a policy to the persistence sink: parse, walk,
/// flush in one transaction, then the metadata update in a second one.
pub struct Importer {
    registry: Registry,
    settings: ImportSettings,
}

impl Importer {
    pub fn new(registry: Registry, settings: ImportSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn import_str(&self, xml: &str, persistor: &mut Persistor) -> Result<ImportOutcome> {
        let document = Document::parse(xml)?;
        let root = document.root_element();
        let xml_schema = schema_location(&root);

        // schema first, so a failed walk still leaves an empty but
        // queryable store
        persistor.create_schema(&self.registry)?;

        let mut walker = Walker::new(&self.registry, self.settings.policy);
        let mapped = walker.map(root)?;
        // an unknown root leaves nothing to import, regardless of policy
        let Some(root_id) = mapped else {
            return Err(MsrswdbError::UnknownElementKind {
                tag: strip_namespace(root.tag_name().name()).to_owned(),
            });
        };
        let (arena, report) = walker.into_parts();

        persistor.persist(&arena, &self.registry)?;
        info!(entities = arena.len(), "document committed");

        metadata::update(
            persistor,
            &self.registry,
            arena.get(root_id).kind,
            Arena::rid(root_id),
            xml_schema.as_deref(),
        )?;

        Ok(ImportOutcome { root: root_id, root_rid: Arena::rid(root_id), report })
    }

    pub fn import_file(&self, path: &std::path::Path, persistor: &mut Persistor) -> Result<ImportOutcome> {
        let xml = std::fs::read_to_string(path)
            .map_err(|e| MsrswdbError::Parse(format!("{}: {}", path.display(), e)))?;
        self.import_str(&xml, persistor)
    }
}

fn schema_location(root: &Node) -> Option<String> {
    root.attributes()
        .find(|a| SCHEMA_ATTRIBUTES.contains(&strip_namespace(a.name())))
        .map(|a| a.value().to_owned())
}
