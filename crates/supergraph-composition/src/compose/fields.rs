use super::{conflicting_directive_error, first_description, merge_directive, types::quoted_services, ComposeContext};
use crate::{
    ast::{Directive, EnumValueDefinition, FieldDefinition, InputValueDefinition, Type, TypeBody},
    diagnostics::{CompositionError, CompositionErrorKind},
    directives::is_subgraph_only_directive,
    schema::{FieldContribution, FieldFederation},
    subgraphs::{DefinitionWalker, FieldWalker, SubgraphWalker},
};
use indexmap::IndexMap;
use itertools::Itertools;

/// Merge the fields of an object or interface. `shareable` lifts the requirement that only one
/// service resolves each field.
pub(super) fn compose_object_fields(
    ctx: &mut ComposeContext<'_>,
    type_name: &str,
    definitions: &[DefinitionWalker<'_>],
    shareable: bool,
) -> (Vec<FieldDefinition>, IndexMap<String, FieldFederation>) {
    let mut by_name: IndexMap<&str, Vec<(SubgraphWalker<'_>, FieldWalker<'_>)>> = IndexMap::new();

    for field in definitions.iter().flat_map(|definition| definition.fields()) {
        by_name.entry(field.name()).or_default().push((field.subgraph(), field));
    }

    let mut fields = Vec::with_capacity(by_name.len());
    let mut federation = IndexMap::with_capacity(by_name.len());

    for (field_name, declarations) in by_name {
        let declarations = first_per_service(ctx, "Field", type_name, field_name, declarations);

        let type_mismatch = check_types(
            ctx,
            type_name,
            field_name,
            &format!("field `{type_name}.{field_name}`"),
            declarations
                .iter()
                .map(|(subgraph, field)| (subgraph.name(), field.ty())),
        );

        check_argument_types(ctx, type_name, field_name, &declarations);

        let owners = declarations
            .iter()
            .filter(|(_, field)| !field.is_external())
            .collect::<Vec<_>>();

        if !shareable && !type_mismatch && owners.len() > 1 {
            ctx.push_error(
                CompositionError::new(
                    CompositionErrorKind::DuplicateTypeDefinition,
                    format!(
                        "The field `{type_name}.{field_name}` is defined in {}. Only one service may define a field, the others must mark it @external.",
                        quoted_services(owners.iter().map(|(subgraph, _)| subgraph.name()))
                    ),
                )
                .on_field(type_name, field_name),
            );
        }

        let (_, canonical) = owners.first().copied().copied().unwrap_or(declarations[0]);

        let mut arguments = canonical.node().arguments.clone();
        for (_, field) in &declarations {
            for argument in &field.node().arguments {
                if !arguments.iter().any(|existing| existing.name == argument.name) {
                    arguments.push(argument.clone());
                }
            }
        }

        let directives = merge_member_directives(
            ctx,
            type_name,
            field_name,
            declarations.iter().map(|(_, field)| field.node().directives.as_slice()),
        );

        fields.push(FieldDefinition {
            description: first_description(
                declarations
                    .iter()
                    .map(|(subgraph, field)| (subgraph.id, field.node().description.as_ref())),
            ),
            arguments,
            directives,
            ..canonical.node().clone()
        });

        federation.insert(
            field_name.to_owned(),
            FieldFederation {
                contributions: declarations
                    .iter()
                    .map(|(subgraph, field)| FieldContribution {
                        service: subgraph.name().to_owned(),
                        is_external: field.is_external(),
                        requires: field.requires().cloned(),
                        provides: field.provides().cloned(),
                    })
                    .collect(),
            },
        );
    }

    (fields, federation)
}

/// Input objects are shared freely, as long as the field types agree.
pub(super) fn compose_input_fields(
    ctx: &mut ComposeContext<'_>,
    type_name: &str,
    definitions: &[DefinitionWalker<'_>],
) -> Vec<InputValueDefinition> {
    let mut by_name: IndexMap<&str, Vec<(SubgraphWalker<'_>, &InputValueDefinition)>> = IndexMap::new();

    for definition in definitions {
        let TypeBody::InputObject(fields) = &definition.node().body else {
            continue;
        };

        for field in fields {
            by_name
                .entry(field.name.as_str())
                .or_default()
                .push((definition.subgraph(), field));
        }
    }

    let mut fields = Vec::with_capacity(by_name.len());

    for (field_name, declarations) in by_name {
        let declarations = first_per_service(ctx, "Input field", type_name, field_name, declarations);

        check_types(
            ctx,
            type_name,
            field_name,
            &format!("input field `{type_name}.{field_name}`"),
            declarations.iter().map(|(subgraph, field)| (subgraph.name(), &field.ty)),
        );

        let directives = merge_member_directives(
            ctx,
            type_name,
            field_name,
            declarations.iter().map(|(_, field)| field.directives.as_slice()),
        );

        let (_, canonical) = declarations[0];

        fields.push(InputValueDefinition {
            description: first_description(
                declarations
                    .iter()
                    .map(|(subgraph, field)| (subgraph.id, field.description.as_ref())),
            ),
            default_value: declarations.iter().find_map(|(_, field)| field.default_value.clone()),
            directives,
            ..canonical.clone()
        });
    }

    fields
}

pub(super) fn compose_enum_values(
    ctx: &mut ComposeContext<'_>,
    type_name: &str,
    definitions: &[DefinitionWalker<'_>],
) -> Vec<EnumValueDefinition> {
    let mut by_name: IndexMap<&str, Vec<(SubgraphWalker<'_>, &EnumValueDefinition)>> = IndexMap::new();

    for definition in definitions {
        let TypeBody::Enum(values) = &definition.node().body else {
            continue;
        };

        for value in values {
            by_name
                .entry(value.value.as_str())
                .or_default()
                .push((definition.subgraph(), value));
        }
    }

    let mut values = Vec::with_capacity(by_name.len());

    for (value_name, declarations) in by_name {
        let declarations = first_per_service(ctx, "Enum value", type_name, value_name, declarations);

        let directives = merge_member_directives(
            ctx,
            type_name,
            value_name,
            declarations.iter().map(|(_, value)| value.directives.as_slice()),
        );

        let (_, canonical) = declarations[0];

        values.push(EnumValueDefinition {
            description: first_description(
                declarations
                    .iter()
                    .map(|(subgraph, value)| (subgraph.id, value.description.as_ref())),
            ),
            directives,
            ..canonical.clone()
        });
    }

    values
}

/// Keep the first declaration of each service. A service declaring the same member twice is
/// reported once.
fn first_per_service<'a, T: Copy>(
    ctx: &mut ComposeContext<'_>,
    label: &str,
    type_name: &str,
    member_name: &str,
    declarations: Vec<(SubgraphWalker<'a>, T)>,
) -> Vec<(SubgraphWalker<'a>, T)> {
    let mut kept = Vec::with_capacity(declarations.len());

    for (_, chunk) in &declarations.into_iter().chunk_by(|(subgraph, _)| subgraph.id) {
        let chunk = chunk.collect::<Vec<_>>();
        let (subgraph, _) = chunk[0];

        if chunk.len() > 1 {
            ctx.push_error(
                CompositionError::new(
                    CompositionErrorKind::DuplicateTypeDefinition,
                    format!(
                        "[{}] {label} `{type_name}.{member_name}` can only be defined once.",
                        subgraph.name()
                    ),
                )
                .on_field(type_name, member_name)
                .in_service(subgraph.name()),
            );
        }

        kept.push(chunk[0]);
    }

    kept
}

/// Report declarations disagreeing on the type. Returns whether they do.
fn check_types<'a>(
    ctx: &mut ComposeContext<'_>,
    type_name: &str,
    field_name: &str,
    what: &str,
    declarations: impl Iterator<Item = (&'a str, &'a Type)>,
) -> bool {
    let declarations = declarations
        .sorted_by_key(|(service, _)| *service)
        .collect::<Vec<_>>();

    if declarations.iter().map(|(_, ty)| *ty).all_equal() {
        return false;
    }

    ctx.push_error(
        CompositionError::new(
            CompositionErrorKind::FieldTypeMismatch,
            format!(
                "The {what} has conflicting types across services: {}.",
                declarations
                    .iter()
                    .map(|(service, ty)| format!("`{ty}` in `{service}`"))
                    .join(", ")
            ),
        )
        .on_field(type_name, field_name),
    );

    true
}

/// Arguments are merged by name. An argument declared by several services must have the same type
/// everywhere.
fn check_argument_types(
    ctx: &mut ComposeContext<'_>,
    type_name: &str,
    field_name: &str,
    declarations: &[(SubgraphWalker<'_>, FieldWalker<'_>)],
) {
    let argument_names = declarations
        .iter()
        .flat_map(|(_, field)| field.node().arguments.iter().map(|argument| argument.name.as_str()))
        .unique()
        .collect::<Vec<_>>();

    for argument_name in argument_names {
        check_types(
            ctx,
            type_name,
            field_name,
            &format!("argument `{type_name}.{field_name}({argument_name}:)`"),
            declarations.iter().filter_map(|(subgraph, field)| {
                field
                    .node()
                    .argument(argument_name)
                    .map(|argument| (subgraph.name(), &argument.ty))
            }),
        );
    }
}

fn merge_member_directives<'a>(
    ctx: &mut ComposeContext<'_>,
    type_name: &str,
    member_name: &str,
    declarations: impl Iterator<Item = &'a [Directive]>,
) -> Vec<Directive> {
    let mut merged = Vec::new();

    for directive in declarations.flatten() {
        if is_subgraph_only_directive(&directive.name) {
            continue;
        }

        if let Some(existing) = merge_directive(&mut merged, directive, ctx.is_repeatable(&directive.name)) {
            ctx.push_error(
                conflicting_directive_error(&format!("`{type_name}.{member_name}`"), &existing, directive)
                    .on_field(type_name, member_name),
            );
        }
    }

    merged
}
