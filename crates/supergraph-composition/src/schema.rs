//! An in-memory schema built out of SDL documents.

mod build;
mod federation;
mod references;

pub use self::{
    build::{build_schema, extend_schema, ExtendSchemaOptions},
    federation::{FieldContribution, FieldFederation, FederationMetadata, TypeFederation},
};

pub(crate) use self::{build::extend_schema_unchecked, references::check_type_references};

use crate::ast::{
    Definition, Directive, DirectiveDefinition, Document, Location, OperationType, RootOperationType,
    SchemaDefinition, TypeBody, TypeDefinition,
};
use indexmap::IndexMap;
use std::fmt;

/// Scalars every schema knows without defining them.
pub(crate) const BUILTIN_SCALARS: &[&str] = &["ID", "String", "Int", "Float", "Boolean"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    types: IndexMap<String, TypeDefinition>,
    directive_definitions: IndexMap<String, DirectiveDefinition>,
    /// Root operation types named in a `schema` definition.
    root_operation_types: IndexMap<OperationType, String>,
    schema_directives: Vec<Directive>,
    federation: FederationMetadata,
}

impl Schema {
    /// A schema with no types. Built-in scalars are always known.
    pub fn empty() -> Self {
        Schema::default()
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// In definition order.
    pub fn types(&self) -> impl ExactSizeIterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn directive_definitions(&self) -> impl ExactSizeIterator<Item = &DirectiveDefinition> {
        self.directive_definitions.values()
    }

    pub fn get_directive_definition(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directive_definitions.get(name)
    }

    pub fn schema_directives(&self) -> &[Directive] {
        &self.schema_directives
    }

    /// The root type of an operation: the type named in the `schema` definition, or the type with
    /// the conventional name.
    pub fn root_operation_type(&self, operation: OperationType) -> Option<&TypeDefinition> {
        match self.root_operation_types.get(&operation) {
            Some(name) => self.types.get(name),
            None => self.types.get(operation.default_type_name()),
        }
    }

    pub fn query_type(&self) -> Option<&TypeDefinition> {
        self.root_operation_type(OperationType::Query)
    }

    pub fn mutation_type(&self) -> Option<&TypeDefinition> {
        self.root_operation_type(OperationType::Mutation)
    }

    pub fn subscription_type(&self) -> Option<&TypeDefinition> {
        self.root_operation_type(OperationType::Subscription)
    }

    /// Empty unless the schema is the result of composition.
    pub fn federation(&self) -> &FederationMetadata {
        &self.federation
    }

    /// Is `name` defined, or a built-in scalar?
    pub fn is_known_type(&self, name: &str) -> bool {
        BUILTIN_SCALARS.contains(&name) || self.types.contains_key(name)
    }

    /// Can a value of type `concrete` be returned where `abstract_type` is expected? True for the
    /// type itself, the interfaces it implements and the unions it is a member of.
    pub fn is_subtype(&self, abstract_type: &str, concrete: &str) -> bool {
        if abstract_type == concrete {
            return true;
        }

        match self.types.get(abstract_type).map(|definition| &definition.body) {
            Some(TypeBody::Union(members)) => members.iter().any(|member| member == concrete),
            Some(TypeBody::Interface(_)) => self
                .types
                .get(concrete)
                .is_some_and(|definition| definition.implements().iter().any(|name| name == abstract_type)),
            _ => false,
        }
    }

    /// The schema as a document: the `schema` definition if one is needed, then directive
    /// definitions, then types.
    pub fn to_document(&self) -> Document {
        let mut definitions = Vec::with_capacity(1 + self.directive_definitions.len() + self.types.len());

        let has_custom_roots = self
            .root_operation_types
            .iter()
            .any(|(operation, name)| name != operation.default_type_name());

        if has_custom_roots || !self.schema_directives.is_empty() {
            definitions.push(Definition::Schema(SchemaDefinition {
                description: None,
                directives: self.schema_directives.clone(),
                root_operations: self
                    .root_operation_types
                    .iter()
                    .map(|(operation, named_type)| RootOperationType {
                        operation: *operation,
                        named_type: named_type.clone(),
                    })
                    .collect(),
                is_extension: false,
                location: Location::default(),
            }));
        }

        definitions.extend(self.directive_definitions.values().cloned().map(Definition::Directive));
        definitions.extend(self.types.values().cloned().map(Definition::Type));

        Document { definitions }
    }

    pub(crate) fn with_federation(self, federation: FederationMetadata) -> Self {
        Schema { federation, ..self }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_document(), f)
    }
}
