mod definitions;
mod fields;
mod walker;

pub(crate) use self::{definitions::*, fields::*, walker::Walker};

use crate::{
    ast::{self, OperationType},
    diagnostics::{CompositionError, CompositionErrorKind},
    Diagnostics, ServiceDefinition,
};
use itertools::Itertools;
use std::collections::BTreeSet;

/// Programmer errors when assembling the set of subgraphs. Composition stops right away.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("The service name `{0}` is used more than once.")]
    DuplicateServiceName(String),
}

/// A set of subgraphs to be composed.
#[derive(Default)]
pub struct Subgraphs {
    subgraphs: Vec<Subgraph>,
    definitions: Vec<Definition>,
    fields: Vec<Field>,
    directive_definitions: Vec<(SubgraphId, ast::DirectiveDefinition)>,

    ingestion_diagnostics: Diagnostics,

    // Secondary indexes.

    // (definition name, subgraph_id, definition_id). Ordered so definitions sharing a name are
    // adjacent, in service order then definition order.
    definition_names: BTreeSet<(String, SubgraphId, DefinitionId)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SubgraphId(usize);

pub(crate) struct Subgraph {
    name: String,
    url: Option<String>,
    /// Directives applied to `schema` and `extend schema`.
    schema_directives: Vec<(ast::Directive, ast::Location)>,
}

impl Subgraphs {
    /// Add a parsed subgraph to compose.
    pub fn ingest(&mut self, service: &ServiceDefinition) -> Result<(), IngestError> {
        self.ensure_unique_name(&service.name)?;
        crate::ingest_subgraph::ingest_subgraph(&service.type_defs, &service.name, service.url.as_deref(), self);
        Ok(())
    }

    /// Parse and add a subgraph. A subgraph with a syntax error is left out of composition and the
    /// error is reported with the composition errors.
    pub fn ingest_str(&mut self, sdl: &str, name: &str, url: Option<&str>) -> Result<(), IngestError> {
        self.ensure_unique_name(name)?;

        match ast::parse(sdl) {
            Ok(document) => {
                crate::ingest_subgraph::ingest_subgraph(&document, name, url, self);
            }
            Err(error) => {
                tracing::warn!(service = name, "dropping service with a syntax error: {error}");

                // Reserve the name, so it cannot be reused by a later service.
                self.push_subgraph(name, url);
                self.ingestion_diagnostics.push(
                    CompositionError::new(CompositionErrorKind::Syntax, format!("[{name}] {error}")).in_service(name),
                );
            }
        }

        Ok(())
    }

    /// Iterate over the subgraphs, in the order they were ingested.
    pub(crate) fn iter_subgraphs(&self) -> impl ExactSizeIterator<Item = SubgraphWalker<'_>> {
        (0..self.subgraphs.len()).map(|idx| self.walk(SubgraphId(idx)))
    }

    pub fn len(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subgraphs.is_empty()
    }

    /// Iterate over groups of definitions to compose. The definitions are grouped by name. Inside
    /// a group, definitions are ordered by service name, then by their position in the service.
    pub(crate) fn iter_definition_groups<'a>(&'a self, mut compose_fn: impl FnMut(&[DefinitionWalker<'a>])) {
        let mut buf = Vec::new();

        for (_, group) in &self.definition_names.iter().chunk_by(|(name, _, _)| name) {
            buf.clear();
            buf.extend(group.map(|(_, _, definition_id)| self.walk(*definition_id)));
            buf.sort_by_key(|definition: &DefinitionWalker<'a>| definition.subgraph().name());
            compose_fn(&buf);
        }
    }

    /// Directive definitions of all subgraphs, in service name order.
    pub(crate) fn iter_directive_definitions(&self) -> impl Iterator<Item = (SubgraphWalker<'_>, &ast::DirectiveDefinition)> {
        self.directive_definitions
            .iter()
            .map(|(subgraph_id, definition)| (self.walk(*subgraph_id), definition))
            .sorted_by_key(|(subgraph, _)| subgraph.name())
    }

    /// The subgraphs, in service name order.
    pub(crate) fn iter_subgraphs_by_name(&self) -> impl Iterator<Item = SubgraphWalker<'_>> {
        self.iter_subgraphs().sorted_by_key(|subgraph| subgraph.name())
    }

    pub(crate) fn ingestion_diagnostics(&self) -> &Diagnostics {
        &self.ingestion_diagnostics
    }

    pub(crate) fn push_ingestion_diagnostic(&mut self, subgraph_id: SubgraphId, error: CompositionError) {
        let name = self.subgraphs[subgraph_id.0].name.clone();
        self.ingestion_diagnostics.push(error.in_service(name));
    }

    pub(crate) fn push_subgraph(&mut self, name: &str, url: Option<&str>) -> SubgraphId {
        self.subgraphs.push(Subgraph {
            name: name.to_owned(),
            url: url.map(str::to_owned),
            schema_directives: Vec::new(),
        });
        SubgraphId(self.subgraphs.len() - 1)
    }

    pub(crate) fn push_schema_directives(
        &mut self,
        subgraph_id: SubgraphId,
        directives: impl IntoIterator<Item = (ast::Directive, ast::Location)>,
    ) {
        self.subgraphs[subgraph_id.0].schema_directives.extend(directives);
    }

    pub(crate) fn push_directive_definition(&mut self, subgraph_id: SubgraphId, definition: ast::DirectiveDefinition) {
        self.directive_definitions.push((subgraph_id, definition));
    }

    pub(crate) fn walk<Id>(&self, id: Id) -> Walker<'_, Id> {
        Walker { id, subgraphs: self }
    }

    fn ensure_unique_name(&self, name: &str) -> Result<(), IngestError> {
        if self.subgraphs.iter().any(|subgraph| subgraph.name == name) {
            return Err(IngestError::DuplicateServiceName(name.to_owned()));
        }

        Ok(())
    }
}

pub(crate) type SubgraphWalker<'a> = Walker<'a, SubgraphId>;

impl<'a> SubgraphWalker<'a> {
    fn subgraph(self) -> &'a Subgraph {
        &self.subgraphs.subgraphs[self.id.0]
    }

    pub(crate) fn name(self) -> &'a str {
        &self.subgraph().name
    }

    pub(crate) fn url(self) -> Option<&'a str> {
        self.subgraph().url.as_deref()
    }

    pub(crate) fn schema_directives(self) -> &'a [(ast::Directive, ast::Location)] {
        &self.subgraph().schema_directives
    }

    /// Directive definitions declared in this subgraph.
    pub(crate) fn directive_definitions(self) -> impl Iterator<Item = &'a ast::DirectiveDefinition> {
        self.subgraphs
            .directive_definitions
            .iter()
            .filter(move |(subgraph_id, _)| *subgraph_id == self.id)
            .map(|(_, definition)| definition)
    }

    /// The definition of the root type for an operation in this subgraph.
    pub(crate) fn root_definitions(self, operation: OperationType) -> impl Iterator<Item = DefinitionWalker<'a>> {
        self.definitions()
            .filter(move |definition| definition.root_operation() == Some(operation))
    }
}
