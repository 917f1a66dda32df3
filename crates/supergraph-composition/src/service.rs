use crate::ast::{self, Document, SyntaxError};

/// One service to compose: its name, where the router reaches it and its type definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub name: String,
    pub url: Option<String>,
    pub type_defs: Document,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>, url: Option<String>, type_defs: Document) -> Self {
        ServiceDefinition {
            name: name.into(),
            url,
            type_defs,
        }
    }

    pub fn from_sdl(name: impl Into<String>, url: Option<&str>, sdl: &str) -> Result<Self, SyntaxError> {
        Ok(ServiceDefinition::new(name, url.map(str::to_owned), ast::parse(sdl)?))
    }
}
