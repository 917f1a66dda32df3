use super::*;
use crate::field_set::FieldSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct FieldId(pub(super) usize);

/// A field of an object or interface definition in a subgraph.
pub(crate) struct Field {
    parent_definition_id: DefinitionId,
    node: ast::FieldDefinition,
    is_external: bool,
    requires: Option<FieldSet>,
    provides: Option<FieldSet>,
}

pub(crate) struct FieldRecord {
    pub(crate) node: ast::FieldDefinition,
    pub(crate) is_external: bool,
    pub(crate) requires: Option<FieldSet>,
    pub(crate) provides: Option<FieldSet>,
}

impl Field {
    pub(super) fn from_record(parent_definition_id: DefinitionId, record: FieldRecord) -> Self {
        Field {
            parent_definition_id,
            node: record.node,
            is_external: record.is_external,
            requires: record.requires,
            provides: record.provides,
        }
    }
}

pub(crate) type FieldWalker<'a> = Walker<'a, FieldId>;

impl<'a> FieldWalker<'a> {
    fn field(self) -> &'a Field {
        &self.subgraphs.fields[self.id.0]
    }

    pub(crate) fn name(self) -> &'a str {
        &self.field().node.name
    }

    pub(crate) fn node(self) -> &'a ast::FieldDefinition {
        &self.field().node
    }

    pub(crate) fn ty(self) -> &'a ast::Type {
        &self.field().node.ty
    }

    pub(crate) fn is_external(self) -> bool {
        self.field().is_external
    }

    pub(crate) fn requires(self) -> Option<&'a FieldSet> {
        self.field().requires.as_ref()
    }

    pub(crate) fn provides(self) -> Option<&'a FieldSet> {
        self.field().provides.as_ref()
    }

    pub(crate) fn parent_definition(self) -> DefinitionWalker<'a> {
        self.walk(self.field().parent_definition_id)
    }

    pub(crate) fn subgraph(self) -> SubgraphWalker<'a> {
        self.parent_definition().subgraph()
    }
}
