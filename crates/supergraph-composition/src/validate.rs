mod directive_sites;
mod federation_directives;

pub(crate) use self::directive_sites::{validate_directive_sites, DirectiveSite};

use crate::{compose::ComposeContext, directives::builtin_directive_definitions, subgraphs::SubgraphWalker};

/// Pre-composition validations happen here. They look at one subgraph at a time.
pub(crate) fn validate(ctx: &mut ComposeContext<'_>) {
    let builtins = builtin_directive_definitions();
    let subgraphs = ctx.subgraphs;

    for subgraph in subgraphs.iter_subgraphs() {
        validate_directive_applications(ctx, subgraph, &builtins);
        federation_directives::validate_reserved_fields(ctx, subgraph);
        federation_directives::validate_base_type_fields(ctx, subgraph);
        federation_directives::validate_extension_keys(ctx, subgraph);
    }
}

fn validate_directive_applications(
    ctx: &mut ComposeContext<'_>,
    subgraph: SubgraphWalker<'_>,
    builtins: &[crate::ast::DirectiveDefinition],
) {
    let mut sites = Vec::new();

    for (directive, location) in subgraph.schema_directives() {
        sites.push(DirectiveSite::schema(directive, *location));
    }

    for definition in subgraph.definitions() {
        DirectiveSite::collect(definition.node(), &mut sites);
    }

    let lookup = |name: &str| {
        subgraph
            .directive_definitions()
            .find(|definition| definition.name == name)
            .or_else(|| builtins.iter().find(|definition| definition.name == name))
    };

    validate_directive_sites(&sites, lookup, |error| {
        ctx.diagnostics
            .push(error.prefix_message(subgraph.name()).in_service(subgraph.name()));
    });
}
