use crate::{
    ast::OperationType,
    compose::ComposeContext,
    diagnostics::{CompositionError, CompositionErrorKind},
    subgraphs::SubgraphWalker,
};

/// Fields the router adds to every subgraph's query root.
const RESERVED_QUERY_FIELDS: &[&str] = &["_service", "_entities"];

pub(super) fn validate_reserved_fields(ctx: &mut ComposeContext<'_>, subgraph: SubgraphWalker<'_>) {
    for query in subgraph.root_definitions(OperationType::Query) {
        for field in query.fields() {
            if !RESERVED_QUERY_FIELDS.contains(&field.name()) {
                continue;
            }

            ctx.diagnostics.push(
                CompositionError::new(
                    CompositionErrorKind::ReservedFieldUsed,
                    format!(
                        "[{}] `{}.{}` is a field reserved for federation and cannot be defined by a service.",
                        subgraph.name(),
                        query.name(),
                        field.name()
                    ),
                )
                .on_field(query.name(), field.name())
                .in_service(subgraph.name())
                .at(field.node().location),
            );
        }
    }
}

/// `@external` and `@requires` only make sense on type extensions.
pub(super) fn validate_base_type_fields(ctx: &mut ComposeContext<'_>, subgraph: SubgraphWalker<'_>) {
    for definition in subgraph.definitions().filter(|definition| !definition.is_extension()) {
        for field in definition.fields() {
            if field.is_external() {
                ctx.diagnostics.push(
                    CompositionError::new(
                        CompositionErrorKind::ExternalUsedOnBase,
                        format!(
                            "[{}] `{}.{}` is marked @external but `{}` is not an extension.",
                            subgraph.name(),
                            definition.name(),
                            field.name(),
                            definition.name()
                        ),
                    )
                    .on_field(definition.name(), field.name())
                    .in_service(subgraph.name())
                    .at(field.node().location),
                );
            }

            if field.requires().is_some() {
                ctx.diagnostics.push(
                    CompositionError::new(
                        CompositionErrorKind::RequiresUsedOnBase,
                        format!(
                            "[{}] `{}.{}` uses @requires but `{}` is not an extension.",
                            subgraph.name(),
                            definition.name(),
                            field.name(),
                            definition.name()
                        ),
                    )
                    .on_field(definition.name(), field.name())
                    .in_service(subgraph.name())
                    .at(field.node().location),
                );
            }
        }
    }
}

/// Key fields a type extension declares itself must be `@external`: the type's owner resolves
/// them.
pub(super) fn validate_extension_keys(ctx: &mut ComposeContext<'_>, subgraph: SubgraphWalker<'_>) {
    let extensions = subgraph
        .definitions()
        .filter(|definition| definition.is_extension() && definition.root_operation().is_none());

    for definition in extensions {
        let key_fields = definition
            .keys()
            .iter()
            .flat_map(|key| key.field_names())
            .collect::<Vec<_>>();

        for field in definition.fields() {
            if field.is_external() || !key_fields.contains(&field.name()) {
                continue;
            }

            ctx.diagnostics.push(
                CompositionError::new(
                    CompositionErrorKind::KeyFieldsMissingExternal,
                    format!(
                        "[{}] `{}.{}` is part of a @key on an extension and must be marked @external.",
                        subgraph.name(),
                        definition.name(),
                        field.name()
                    ),
                )
                .on_field(definition.name(), field.name())
                .in_service(subgraph.name())
                .at(field.node().location),
            );
        }
    }
}
