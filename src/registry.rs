//! The schema registry: one immutable descriptor per element kind.
//!
//! A [`Descriptor`] declares everything the walker needs to know about a
//! kind: which source attributes map to which columns (with optional
//! scalar coercion), which child tags land in which slot and with what
//! cardinality, and whether the kind is terminal (its inner text becomes
//! a `content` column). The registry is plain data handed to the walker
//! by value; there is no global tag table.

use std::collections::HashMap;

use crate::datatype::ScalarKind;

/// Whether a child slot holds at most one or any number of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// Maps one source attribute to one column, with an optional coercion.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub source: &'static str,
    pub field: &'static str,
    pub coerce: ScalarKind,
}

/// Maps one child tag to one slot on the owning kind.
#[derive(Debug, Clone)]
pub struct ChildSpec {
    pub tag: &'static str,
    pub field: &'static str,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone)]
pub struct Descriptor {
    tag: &'static str,
    table: String,
    attributes: Vec<AttributeSpec>,
    children: Vec<ChildSpec>,
    // advisory only, never enforced during import
    enums: Vec<(&'static str, &'static [&'static str])>,
    terminal: bool,
    content: ScalarKind,
}

impl Descriptor {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            table: table_name(tag),
            attributes: Vec::new(),
            children: Vec::new(),
            enums: Vec::new(),
            terminal: false,
            content: ScalarKind::Text,
        }
    }
    pub fn attribute(mut self, source: &'static str, field: &'static str) -> Self {
        self.attributes.push(AttributeSpec { source, field, coerce: ScalarKind::Text });
        self
    }
    pub fn typed_attribute(
        mut self,
        source: &'static str,
        field: &'static str,
        coerce: ScalarKind,
    ) -> Self {
        self.attributes.push(AttributeSpec { source, field, coerce });
        self
    }
    pub fn child(mut self, tag: &'static str, field: &'static str) -> Self {
        self.children.push(ChildSpec { tag, field, cardinality: Cardinality::One });
        self
    }
    pub fn children(mut self, tag: &'static str, field: &'static str) -> Self {
        self.children.push(ChildSpec { tag, field, cardinality: Cardinality::Many });
        self
    }
    pub fn legal(mut self, field: &'static str, values: &'static [&'static str]) -> Self {
        self.enums.push((field, values));
        self
    }
    /// Terminal kinds carry their payload as inner text, stored in the
    /// `content` column after coercion.
    pub fn terminal(mut self, content: ScalarKind) -> Self {
        self.terminal = true;
        self.content = content;
        self
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }
    pub fn child_slots(&self) -> &[ChildSpec] {
        &self.children
    }
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
    pub fn content_kind(&self) -> ScalarKind {
        self.content
    }
    pub fn attribute_spec(&self, source: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.source == source)
    }
    pub fn child_slot(&self, tag: &str) -> Option<&ChildSpec> {
        self.children.iter().find(|c| c.tag == tag)
    }
    /// Advisory value set for a field, when one is declared.
    pub fn legal_values(&self, field: &str) -> Option<&'static [&'static str]> {
        self.enums.iter().find(|(f, _)| *f == field).map(|(_, v)| *v)
    }
}

/// Relational name for a kind: `SW-INSTANCE-TREE` becomes `sw_instance_tree`.
pub fn table_name(tag: &str) -> String {
    tag.to_ascii_lowercase().replace('-', "_")
}

/// Drop a `prefix:` qualifier from a tag or attribute name. Descriptor
/// maps are indexed on the bare local name.
pub fn strip_namespace(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    kinds: HashMap<&'static str, Descriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self { kinds: HashMap::new() }
    }
    pub fn register(&mut self, descriptor: Descriptor) {
        self.kinds.insert(descriptor.tag(), descriptor);
    }
    pub fn lookup(&self, tag: &str) -> Option<&Descriptor> {
        self.kinds.get(tag)
    }
    pub fn len(&self) -> usize {
        self.kinds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.kinds.values()
    }
}
