mod context;
mod directive_definitions;
mod directives;
mod fields;
mod types;

pub(crate) use self::{
    context::ComposeContext,
    directives::{conflicting_directive_error, merge_directive},
};

use crate::{
    ast::{Definition, Document},
    schema::FederationMetadata,
    subgraphs::SubgraphId,
};

/// The merged type system document of all subgraphs, and where each part came from.
pub(crate) struct ComposedTypes {
    pub(crate) document: Document,
    pub(crate) federation: FederationMetadata,
}

/// Merge the definitions of all subgraphs into a single document. Types are emitted in name order,
/// so the result does not depend on the order of the services.
pub(crate) fn compose_subgraphs(ctx: &mut ComposeContext<'_>) -> ComposedTypes {
    let mut definitions: Vec<Definition> = directive_definitions::compose_directive_definitions(ctx)
        .into_iter()
        .map(Definition::Directive)
        .collect();

    let mut federation = FederationMetadata::default();
    let subgraphs = ctx.subgraphs;

    subgraphs.iter_definition_groups(|group| {
        if let Some((definition, metadata)) = types::compose_definition_group(ctx, group) {
            federation.insert(definition.name.clone(), metadata);
            definitions.push(Definition::Type(definition));
        }
    });

    ComposedTypes {
        document: Document { definitions },
        federation,
    }
}

/// Descriptions are taken from the first service in the service list that has one, whatever the
/// order in which the definitions are merged.
fn first_description<'a>(descriptions: impl Iterator<Item = (SubgraphId, Option<&'a String>)>) -> Option<String> {
    descriptions
        .filter_map(|(subgraph, description)| Some((subgraph, description?)))
        .min_by_key(|(subgraph, _)| *subgraph)
        .map(|(_, description)| description.clone())
}
