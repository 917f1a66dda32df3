use crate::{Diagnostics, Schema};

/// The result of a [`compose()`](crate::compose()) invocation.
#[derive(Debug)]
pub struct CompositionResult {
    pub(crate) supergraph: Option<Supergraph>,
    pub(crate) diagnostics: Diagnostics,
}

/// A successfully composed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Supergraph {
    pub(crate) schema: Schema,
    pub(crate) supergraph_sdl: String,
}

impl Supergraph {
    /// The composed schema, with the ownership of types and fields in
    /// [Schema::federation()].
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The composed schema rendered with `join` directives, for a router.
    pub fn supergraph_sdl(&self) -> &str {
        &self.supergraph_sdl
    }
}

impl CompositionResult {
    /// Simplify the result data to a yes-no answer: did composition succeed?
    ///
    /// `Ok()` contains the [Supergraph].
    /// `Err()` contains all [Diagnostics].
    pub fn into_result(self) -> Result<Supergraph, Diagnostics> {
        match self.supergraph {
            Some(supergraph) => Ok(supergraph),
            None => Err(self.diagnostics),
        }
    }

    /// `None` when composition failed.
    pub fn supergraph(&self) -> Option<&Supergraph> {
        self.supergraph.as_ref()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.supergraph.as_ref().map(Supergraph::schema)
    }

    pub fn supergraph_sdl(&self) -> Option<&str> {
        self.supergraph.as_ref().map(Supergraph::supergraph_sdl)
    }

    /// Composition errors, sorted by kind, type and field.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
