use super::*;
use crate::{ast::TypeKind, field_set::FieldSet};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct DefinitionId(usize);

/// One type definition or extension, as written in a subgraph.
pub(crate) struct Definition {
    subgraph_id: SubgraphId,
    /// The node, with its federation directives still applied.
    node: ast::TypeDefinition,
    is_extension: bool,
    root_operation: Option<OperationType>,
    keys: Vec<FieldSet>,
    fields: Range<usize>,
}

pub(crate) struct DefinitionRecord {
    pub(crate) node: ast::TypeDefinition,
    pub(crate) is_extension: bool,
    pub(crate) root_operation: Option<OperationType>,
    pub(crate) keys: Vec<FieldSet>,
}

impl Subgraphs {
    pub(crate) fn push_definition(
        &mut self,
        subgraph_id: SubgraphId,
        record: DefinitionRecord,
        fields: Vec<FieldRecord>,
    ) -> DefinitionId {
        let id = DefinitionId(self.definitions.len());
        let start = self.fields.len();

        self.fields
            .extend(fields.into_iter().map(|field| Field::from_record(id, field)));

        self.definition_names.insert((record.node.name.clone(), subgraph_id, id));
        self.definitions.push(Definition {
            subgraph_id,
            node: record.node,
            is_extension: record.is_extension,
            root_operation: record.root_operation,
            keys: record.keys,
            fields: start..self.fields.len(),
        });

        id
    }

    pub(crate) fn iter_definitions(&self) -> impl Iterator<Item = DefinitionWalker<'_>> {
        (0..self.definitions.len()).map(|idx| self.walk(DefinitionId(idx)))
    }
}

pub(crate) type DefinitionWalker<'a> = Walker<'a, DefinitionId>;

impl<'a> DefinitionWalker<'a> {
    fn definition(self) -> &'a Definition {
        &self.subgraphs.definitions[self.id.0]
    }

    pub(crate) fn name(self) -> &'a str {
        &self.definition().node.name
    }

    pub(crate) fn kind(self) -> TypeKind {
        self.definition().node.kind()
    }

    pub(crate) fn node(self) -> &'a ast::TypeDefinition {
        &self.definition().node
    }

    /// `extend type`, `@extends`, or a root operation type.
    pub(crate) fn is_extension(self) -> bool {
        self.definition().is_extension
    }

    pub(crate) fn root_operation(self) -> Option<OperationType> {
        self.definition().root_operation
    }

    pub(crate) fn keys(self) -> &'a [FieldSet] {
        &self.definition().keys
    }

    pub(crate) fn subgraph(self) -> SubgraphWalker<'a> {
        self.walk(self.definition().subgraph_id)
    }

    pub(crate) fn fields(self) -> impl Iterator<Item = FieldWalker<'a>> {
        self.definition().fields.clone().map(move |idx| self.walk(FieldId(idx)))
    }
}

impl<'a> SubgraphWalker<'a> {
    pub(crate) fn definitions(self) -> impl Iterator<Item = DefinitionWalker<'a>> {
        let subgraph_id = self.id;
        self.subgraphs
            .iter_definitions()
            .filter(move |definition| definition.definition().subgraph_id == subgraph_id)
    }
}
