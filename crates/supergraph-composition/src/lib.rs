#![cfg_attr(test, allow(unused_crate_dependencies))]
#![deny(unsafe_code, rust_2018_idioms)]
#![doc = include_str!("../README.md")]

pub mod ast;
pub mod config;

mod compose;
mod diagnostics;
mod directives;
mod field_set;
mod ingest_subgraph;
mod post_composition;
mod result;
mod schema;
mod service;
mod subgraphs;
mod supergraph;
mod validate;

pub use self::{
    config::{CompositionConfig, ConfigError, SubgraphConfig},
    diagnostics::{CompositionError, CompositionErrorKind, Diagnostics},
    directives::{extract_keys, is_extension, is_external, DirectiveArgumentError, FederationDirective},
    field_set::{FieldSelection, FieldSet},
    result::{CompositionResult, Supergraph},
    schema::{
        build_schema, extend_schema, ExtendSchemaOptions, FederationMetadata, FieldContribution, FieldFederation,
        Schema, TypeFederation,
    },
    service::ServiceDefinition,
    subgraphs::{IngestError, Subgraphs},
};

use self::compose::ComposeContext;

/// Compose subgraphs into a supergraph.
pub fn compose(subgraphs: &Subgraphs) -> CompositionResult {
    let _span = tracing::debug_span!("compose", services = subgraphs.len()).entered();

    let mut diagnostics = subgraphs.ingestion_diagnostics().clone();
    let mut context = ComposeContext::new(subgraphs, &mut diagnostics);

    validate::validate(&mut context);
    tracing::debug!(errors = context.diagnostics.len(), "validated subgraphs");

    let composed = compose::compose_subgraphs(&mut context);
    tracing::debug!(
        errors = context.diagnostics.len(),
        definitions = composed.document.definitions.len(),
        "merged subgraphs"
    );

    let schema = schema::extend_schema_unchecked(&Schema::empty(), &composed.document, &mut diagnostics)
        .with_federation(composed.federation);

    post_composition::validate(&schema, &mut diagnostics);
    diagnostics.sort();
    tracing::debug!(errors = diagnostics.len(), "validated the composed schema");

    if !diagnostics.is_empty() {
        return CompositionResult {
            supergraph: None,
            diagnostics,
        };
    }

    let supergraph_sdl = supergraph::render_supergraph(&schema, subgraphs);

    CompositionResult {
        supergraph: Some(Supergraph { schema, supergraph_sdl }),
        diagnostics,
    }
}

/// Compose already parsed services. Fails right away on duplicate service names; every other
/// problem is reported in the [CompositionResult]. The services are not modified.
pub fn compose_and_validate(services: &[ServiceDefinition]) -> Result<CompositionResult, IngestError> {
    let mut subgraphs = Subgraphs::default();

    for service in services {
        subgraphs.ingest(service)?;
    }

    Ok(compose(&subgraphs))
}

/// Did composition fail?
pub fn composition_has_errors(result: &CompositionResult) -> bool {
    result.has_errors()
}
