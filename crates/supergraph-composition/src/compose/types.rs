use super::{conflicting_directive_error, fields, first_description, merge_directive, ComposeContext};
use crate::{
    ast::{self, Action, Definition, Document, ObjectBody, Transform, TypeBody, TypeDefinition, TypeKind},
    diagnostics::{CompositionError, CompositionErrorKind},
    directives::is_subgraph_only_directive,
    schema::TypeFederation,
    subgraphs::DefinitionWalker,
};
use itertools::Itertools;

/// Merge all the definitions sharing a name into one.
pub(super) fn compose_definition_group(
    ctx: &mut ComposeContext<'_>,
    group: &[DefinitionWalker<'_>],
) -> Option<(TypeDefinition, TypeFederation)> {
    let first = *group.first()?;
    let type_name = first.name();
    let definitions = definitions_of_one_kind(ctx, group);

    let is_root = definitions.iter().any(|definition| definition.root_operation().is_some());
    let bases = base_definitions(ctx, &definitions);

    let is_value_type = bases.len() > 1
        && bases[1..]
            .iter()
            .all(|definition| same_structure(bases[0].node(), definition.node()));

    let conflicting_bases = bases.len() > 1 && !is_value_type;

    if conflicting_bases {
        ctx.push_error(
            CompositionError::new(
                CompositionErrorKind::DuplicateTypeDefinition,
                format!(
                    "The type `{type_name}` is defined in {} with different definitions. Only one service may define a type, the others must extend it.",
                    quoted_services(bases.iter().map(|definition| definition.subgraph().name()))
                ),
            )
            .on_type(type_name),
        );
    }

    if bases.is_empty() && !is_root {
        ctx.push_error(
            CompositionError::new(
                CompositionErrorKind::ExtensionWithNoBase,
                format!(
                    "The type `{type_name}` is extended in {} but never defined.",
                    quoted_services(definitions.iter().map(|definition| definition.subgraph().name()))
                ),
            )
            .on_type(type_name),
        );
    }

    let mut federation = TypeFederation {
        owner: match bases.as_slice() {
            [base] => Some(base.subgraph().name().to_owned()),
            _ => None,
        },
        is_value_type,
        ..Default::default()
    };

    for definition in &definitions {
        for key in definition.keys() {
            let entry = (definition.subgraph().name().to_owned(), key.clone());

            if !federation.keys.contains(&entry) {
                federation.keys.push(entry);
            }
        }
    }

    let shareable = is_root || is_value_type || conflicting_bases;

    let body = match first.kind() {
        TypeKind::Object | TypeKind::Interface => {
            let implements = definitions
                .iter()
                .flat_map(|definition| definition.node().implements())
                .unique()
                .cloned()
                .collect();

            let (fields, field_federation) = fields::compose_object_fields(ctx, type_name, &definitions, shareable);
            federation.fields = field_federation;

            let body = ObjectBody { implements, fields };

            if first.kind() == TypeKind::Object {
                TypeBody::Object(body)
            } else {
                TypeBody::Interface(body)
            }
        }
        TypeKind::Union => TypeBody::Union(
            definitions
                .iter()
                .filter_map(|definition| match &definition.node().body {
                    TypeBody::Union(members) => Some(members),
                    _ => None,
                })
                .flatten()
                .unique()
                .cloned()
                .collect(),
        ),
        TypeKind::Enum => TypeBody::Enum(fields::compose_enum_values(ctx, type_name, &definitions)),
        TypeKind::InputObject => TypeBody::InputObject(fields::compose_input_fields(ctx, type_name, &definitions)),
        TypeKind::Scalar => TypeBody::Scalar,
    };

    let mut directives = Vec::new();

    for definition in &definitions {
        for directive in &definition.node().directives {
            if is_subgraph_only_directive(&directive.name) {
                continue;
            }

            if let Some(existing) = merge_directive(&mut directives, directive, ctx.is_repeatable(&directive.name)) {
                ctx.push_error(
                    conflicting_directive_error(&format!("`{type_name}`"), &existing, directive).on_type(type_name),
                );
            }
        }
    }

    let definition = TypeDefinition {
        name: type_name.to_owned(),
        description: first_description(
            definitions
                .iter()
                .map(|definition| (definition.subgraph().id, definition.node().description.as_ref())),
        ),
        directives,
        is_extension: false,
        body,
        location: first.node().location,
    };

    Some((definition, federation))
}

/// Definitions of a name must all be of the same kind. On a mismatch, the kind used by the first
/// service wins and the other definitions are left out.
fn definitions_of_one_kind<'a>(
    ctx: &mut ComposeContext<'_>,
    group: &[DefinitionWalker<'a>],
) -> Vec<DefinitionWalker<'a>> {
    let kind = group[0].kind();

    if group.iter().all(|definition| definition.kind() == kind) {
        return group.to_vec();
    }

    let kinds = group
        .iter()
        .map(|definition| format!("{} in `{}`", definition.kind(), definition.subgraph().name()))
        .dedup()
        .join(", ");

    ctx.push_error(
        CompositionError::new(
            CompositionErrorKind::TypeKindMismatch,
            format!(
                "The type `{}` is defined with different kinds: {kinds}.",
                group[0].name()
            ),
        )
        .on_type(group[0].name()),
    );

    group
        .iter()
        .copied()
        .filter(|definition| definition.kind() == kind)
        .collect()
}

/// The base definition of each service defining the type. A service with more than one base
/// definition is reported, and its first one is used.
fn base_definitions<'a>(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'a>]) -> Vec<DefinitionWalker<'a>> {
    let mut bases = Vec::new();

    let chunks = definitions
        .iter()
        .copied()
        .filter(|definition| !definition.is_extension())
        .chunk_by(|definition| definition.subgraph().id);

    for (_, chunk) in &chunks {
        let chunk = chunk.collect::<Vec<_>>();
        let first = chunk[0];

        if chunk.len() > 1 {
            let service = first.subgraph().name();

            ctx.push_error(
                CompositionError::new(
                    CompositionErrorKind::DuplicateTypeDefinition,
                    format!("[{service}] The type `{}` is defined more than once.", first.name()),
                )
                .on_type(first.name())
                .in_service(service)
                .at(chunk[1].node().location),
            );
        }

        bases.push(first);
    }

    bases
}

/// Equal when ignoring descriptions, directives and the order of members.
fn same_structure(a: &TypeDefinition, b: &TypeDefinition) -> bool {
    structure(a) == structure(b)
}

fn structure(definition: &TypeDefinition) -> Option<TypeBody> {
    let document = Document {
        definitions: vec![Definition::Type(definition.clone())],
    };

    let mut body = match ast::visit(&document, &mut StructureOnly).definitions.pop()? {
        Definition::Type(definition) => definition.body,
        _ => return None,
    };

    match &mut body {
        TypeBody::Object(body) | TypeBody::Interface(body) => {
            body.implements.sort();
            body.fields.sort_by(|a, b| a.name.cmp(&b.name));

            for field in &mut body.fields {
                field.arguments.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
        TypeBody::Union(members) => members.sort(),
        TypeBody::Enum(values) => values.sort_by(|a, b| a.value.cmp(&b.value)),
        TypeBody::InputObject(fields) => fields.sort_by(|a, b| a.name.cmp(&b.name)),
        TypeBody::Scalar => (),
    }

    Some(body)
}

struct StructureOnly;

impl Transform for StructureOnly {
    fn type_definition(&mut self, definition: &TypeDefinition) -> Action<TypeDefinition> {
        Action::Replace(TypeDefinition {
            description: None,
            ..definition.clone()
        })
    }

    fn field_definition(&mut self, field: &ast::FieldDefinition) -> Action<ast::FieldDefinition> {
        Action::Replace(ast::FieldDefinition {
            description: None,
            ..field.clone()
        })
    }

    fn input_value_definition(&mut self, input_value: &ast::InputValueDefinition) -> Action<ast::InputValueDefinition> {
        Action::Replace(ast::InputValueDefinition {
            description: None,
            ..input_value.clone()
        })
    }

    fn enum_value_definition(&mut self, value: &ast::EnumValueDefinition) -> Action<ast::EnumValueDefinition> {
        Action::Replace(ast::EnumValueDefinition {
            description: None,
            ..value.clone()
        })
    }

    fn directive(&mut self, _directive: &ast::Directive) -> Action<ast::Directive> {
        Action::Delete
    }
}

/// "`a`, `b`", sorted and deduplicated.
pub(super) fn quoted_services<'a>(services: impl Iterator<Item = &'a str>) -> String {
    services
        .sorted_unstable()
        .dedup()
        .map(|service| format!("`{service}`"))
        .join(", ")
}
