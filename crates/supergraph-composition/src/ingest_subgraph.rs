//! This is a separate module because we want to use only the public API of [Subgraphs] and avoid
//! mixing AST traversal with our internals.

use crate::{
    ast::{self, Action, OperationType, Transform, TypeBody},
    diagnostics::{CompositionError, CompositionErrorKind},
    directives::{self, FederationDirective},
    subgraphs::{DefinitionRecord, FieldRecord, SubgraphId},
    Subgraphs,
};

/// Types exposed by subgraphs for the router's use. They are not composed.
const SUBGRAPH_ONLY_TYPES: &[&str] = &["_Service", "_Entity", "_Any", "_FieldSet"];

pub(crate) fn ingest_subgraph(document: &ast::Document, name: &str, url: Option<&str>, subgraphs: &mut Subgraphs) {
    let subgraph_id = subgraphs.push_subgraph(name, url);
    let roots = RootTypes::new(document);

    for (shadowed_name, location) in &roots.shadowed {
        subgraphs.push_ingestion_diagnostic(
            subgraph_id,
            CompositionError::new(
                CompositionErrorKind::DuplicateTypeDefinition,
                format!("[{name}] The `{shadowed_name}` type has the default name for a root type but is itself not a root."),
            )
            .on_type(shadowed_name)
            .at(*location),
        );
    }

    let renamed;
    let document = if roots.renames.is_empty() {
        document
    } else {
        renamed = ast::visit(document, &mut RenameTypes(&roots));
        &renamed
    };

    for definition in &document.definitions {
        match definition {
            ast::Definition::Schema(schema) => {
                subgraphs.push_schema_directives(
                    subgraph_id,
                    schema
                        .directives
                        .iter()
                        .map(|directive| (directive.clone(), schema.location)),
                );
            }
            ast::Definition::Directive(directive_definition) => {
                subgraphs.push_directive_definition(subgraph_id, directive_definition.clone());
            }
            ast::Definition::Type(type_definition) => {
                if SUBGRAPH_ONLY_TYPES.contains(&type_definition.name.as_str()) {
                    continue;
                }

                ingest_type_definition(subgraph_id, name, type_definition, subgraphs);
            }
        }
    }
}

fn ingest_type_definition(
    subgraph_id: SubgraphId,
    subgraph_name: &str,
    definition: &ast::TypeDefinition,
    subgraphs: &mut Subgraphs,
) {
    let root_operation = [
        OperationType::Query,
        OperationType::Mutation,
        OperationType::Subscription,
    ]
    .into_iter()
    .find(|operation| operation.default_type_name() == definition.name);

    let mut keys = Vec::new();

    for directive in &definition.directives {
        match FederationDirective::interpret(directive) {
            Ok(FederationDirective::Key { fields }) => keys.push(fields),
            Ok(_) => (),
            Err(error) => subgraphs.push_ingestion_diagnostic(
                subgraph_id,
                CompositionError::new(
                    CompositionErrorKind::DirectiveArgument,
                    format!("[{subgraph_name}] {error} (on `{}`)", definition.name),
                )
                .on_type(&definition.name)
                .at(definition.location),
            ),
        }
    }

    let mut fields = Vec::with_capacity(definition.fields().len());

    for field in definition.fields() {
        let mut record = FieldRecord {
            node: field.clone(),
            is_external: false,
            requires: None,
            provides: None,
        };

        for directive in &field.directives {
            match FederationDirective::interpret(directive) {
                Ok(FederationDirective::External) => record.is_external = true,
                Ok(FederationDirective::Requires { fields }) => record.requires = Some(fields),
                Ok(FederationDirective::Provides { fields }) => record.provides = Some(fields),
                Ok(_) => (),
                Err(error) => subgraphs.push_ingestion_diagnostic(
                    subgraph_id,
                    CompositionError::new(
                        CompositionErrorKind::DirectiveArgument,
                        format!("[{subgraph_name}] {error} (on `{}.{}`)", definition.name, field.name),
                    )
                    .on_field(&definition.name, &field.name)
                    .at(field.location),
                ),
            }
        }

        fields.push(record);
    }

    subgraphs.push_definition(
        subgraph_id,
        DefinitionRecord {
            node: definition.clone(),
            is_extension: directives::is_extension(definition) || root_operation.is_some(),
            root_operation,
            keys,
        },
        fields,
    );
}

/// The root operation types of a subgraph. Roots with custom names are renamed to the
/// conventional `Query`, `Mutation` and `Subscription`, so roots from all subgraphs merge.
struct RootTypes {
    /// (custom name, conventional name)
    renames: Vec<(String, &'static str)>,
    /// Types carrying a conventional root name without being roots. They are left out.
    shadowed: Vec<(String, ast::Location)>,
}

impl RootTypes {
    fn new(document: &ast::Document) -> Self {
        let mut renames: Vec<(String, &'static str)> = Vec::new();

        for root in document
            .schema_definitions()
            .flat_map(|schema| schema.root_operations.iter())
        {
            let conventional = root.operation.default_type_name();

            renames.retain(|(_, to)| *to != conventional);

            if root.named_type != conventional {
                renames.push((root.named_type.clone(), conventional));
            }
        }

        let shadowed = document
            .type_definitions()
            .filter(|definition| renames.iter().any(|(_, conventional)| definition.name == *conventional))
            .map(|definition| (definition.name.clone(), definition.location))
            .collect();

        RootTypes { renames, shadowed }
    }
}

struct RenameTypes<'a>(&'a RootTypes);

impl RenameTypes<'_> {
    fn rename(&self, name: &mut String) {
        if let Some((_, to)) = self.0.renames.iter().find(|(from, _)| from == name) {
            *name = (*to).to_owned();
        }
    }

    fn rename_type(&self, ty: &mut ast::Type) {
        for (from, to) in &self.0.renames {
            ty.rename(from, to);
        }
    }
}

impl Transform for RenameTypes<'_> {
    fn type_definition(&mut self, definition: &ast::TypeDefinition) -> Action<ast::TypeDefinition> {
        if self.0.shadowed.iter().any(|(name, _)| *name == definition.name) {
            return Action::Delete;
        }

        let mut definition = definition.clone();
        self.rename(&mut definition.name);

        match &mut definition.body {
            TypeBody::Object(body) | TypeBody::Interface(body) => {
                body.implements.iter_mut().for_each(|name| self.rename(name));
            }
            TypeBody::Union(members) => members.iter_mut().for_each(|name| self.rename(name)),
            TypeBody::Scalar | TypeBody::Enum(_) | TypeBody::InputObject(_) => (),
        }

        Action::Replace(definition)
    }

    fn field_definition(&mut self, field: &ast::FieldDefinition) -> Action<ast::FieldDefinition> {
        let mut field = field.clone();
        self.rename_type(&mut field.ty);
        Action::Replace(field)
    }

    fn input_value_definition(&mut self, input_value: &ast::InputValueDefinition) -> Action<ast::InputValueDefinition> {
        let mut input_value = input_value.clone();
        self.rename_type(&mut input_value.ty);
        Action::Replace(input_value)
    }
}
