use crate::{
    diagnostics::CompositionError,
    directives::builtin_directive_definitions,
    Diagnostics, Subgraphs,
};
use std::collections::HashSet;

pub(crate) struct ComposeContext<'a> {
    pub(crate) subgraphs: &'a Subgraphs,
    pub(crate) diagnostics: &'a mut Diagnostics,
    /// Names of the directives declared `repeatable`, in any subgraph or built in.
    repeatable_directives: HashSet<String>,
}

impl<'a> ComposeContext<'a> {
    pub(crate) fn new(subgraphs: &'a Subgraphs, diagnostics: &'a mut Diagnostics) -> Self {
        let repeatable_directives = builtin_directive_definitions()
            .into_iter()
            .chain(subgraphs.iter_directive_definitions().map(|(_, definition)| definition.clone()))
            .filter(|definition| definition.is_repeatable)
            .map(|definition| definition.name)
            .collect();

        ComposeContext {
            subgraphs,
            diagnostics,
            repeatable_directives,
        }
    }

    pub(crate) fn is_repeatable(&self, directive_name: &str) -> bool {
        self.repeatable_directives.contains(directive_name)
    }

    pub(crate) fn push_error(&mut self, error: CompositionError) {
        self.diagnostics.push(error);
    }
}
