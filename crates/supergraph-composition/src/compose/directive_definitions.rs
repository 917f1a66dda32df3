use super::{first_description, ComposeContext};
use crate::{
    ast::{DirectiveDefinition, Type, Value},
    diagnostics::{CompositionError, CompositionErrorKind},
    directives::builtin_directive_definitions,
    subgraphs::SubgraphWalker,
};
use std::collections::BTreeMap;

/// Merge the custom directive definitions of all services. Federation and built-in directives
/// are left out: the supergraph declares its own. Definitions are emitted in name order.
pub(super) fn compose_directive_definitions(ctx: &mut ComposeContext<'_>) -> Vec<DirectiveDefinition> {
    let builtins = builtin_directive_definitions();
    let mut by_name: BTreeMap<&str, Vec<(SubgraphWalker<'_>, &DirectiveDefinition)>> = BTreeMap::new();

    for (subgraph, definition) in ctx.subgraphs.iter_directive_definitions() {
        if builtins.iter().any(|builtin| builtin.name == definition.name) {
            continue;
        }

        by_name
            .entry(definition.name.as_str())
            .or_default()
            .push((subgraph, definition));
    }

    let mut composed = Vec::with_capacity(by_name.len());

    for (name, definitions) in by_name {
        let (_, first) = definitions[0];

        let conflicting = definitions
            .iter()
            .any(|(_, definition)| !same_signature(first, definition));

        if conflicting {
            let mut services = definitions
                .iter()
                .map(|(subgraph, _)| subgraph.name())
                .collect::<Vec<_>>();
            services.sort_unstable();
            services.dedup();

            ctx.push_error(
                CompositionError::new(
                    CompositionErrorKind::ConflictingDirective,
                    format!(
                        "The directive `@{name}` is defined differently in {}.",
                        services
                            .iter()
                            .map(|service| format!("`{service}`"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
                .on_type(format!("@{name}")),
            );
        }

        let mut definition = first.clone();
        definition.description = first_description(
            definitions
                .iter()
                .map(|(subgraph, definition)| (subgraph.id, definition.description.as_ref())),
        );

        composed.push(definition);
    }

    composed
}

/// Same arguments, repeatability and locations. Descriptions and the order of locations do not
/// matter.
fn same_signature(a: &DirectiveDefinition, b: &DirectiveDefinition) -> bool {
    fn arguments(definition: &DirectiveDefinition) -> Vec<(&String, &Type, &Option<Value>)> {
        let mut arguments = definition
            .arguments
            .iter()
            .map(|argument| (&argument.name, &argument.ty, &argument.default_value))
            .collect::<Vec<_>>();
        arguments.sort_by(|a, b| a.0.cmp(b.0));
        arguments
    }

    let locations = |definition: &DirectiveDefinition| {
        let mut locations = definition.locations.clone();
        locations.sort_unstable();
        locations.dedup();
        locations
    };

    a.is_repeatable == b.is_repeatable && arguments(a) == arguments(b) && locations(a) == locations(b)
}
