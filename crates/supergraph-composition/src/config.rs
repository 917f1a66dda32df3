//! A TOML manifest listing the services to compose.
//!
//! ```toml
//! [subgraphs.products]
//! url = "http://products:4001/graphql"
//! schema_path = "products.graphql"
//! ```

use crate::{ast::SyntaxError, CompositionResult, IngestError, ServiceDefinition, Subgraphs};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositionConfig {
    /// Services to compose, by name, in declaration order.
    pub subgraphs: IndexMap<String, SubgraphConfig>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubgraphConfig {
    /// Where the router reaches the service.
    pub url: Option<String>,
    /// The SDL of the service. Relative paths are relative to the manifest.
    pub schema_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid composition config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("The schema of `{service}` could not be parsed: {source}")]
    Syntax {
        service: String,
        #[source]
        source: SyntaxError,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl CompositionConfig {
    /// Read a manifest. Schema paths are resolved against the directory of the manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = read(path)?;
        let mut config = CompositionConfig::from_toml_str(&contents)?;

        if let Some(base_dir) = path.parent() {
            for subgraph in config.subgraphs.values_mut() {
                if subgraph.schema_path.is_relative() {
                    subgraph.schema_path = base_dir.join(&subgraph.schema_path);
                }
            }
        }

        tracing::debug!(path = %path.display(), services = config.subgraphs.len(), "loaded composition config");

        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse the schema of every service. Any syntax error is returned.
    pub fn into_services(self) -> Result<Vec<ServiceDefinition>, ConfigError> {
        self.subgraphs
            .into_iter()
            .map(|(name, subgraph)| {
                let sdl = read(&subgraph.schema_path)?;

                ServiceDefinition::from_sdl(name.as_str(), subgraph.url.as_deref(), &sdl)
                    .map_err(|source| ConfigError::Syntax { service: name, source })
            })
            .collect()
    }

    /// Read the schema of every service and compose them. A service with a syntax error is left
    /// out, and the error is reported with the composition errors.
    pub fn compose(&self) -> Result<CompositionResult, ConfigError> {
        let mut subgraphs = Subgraphs::default();

        for (name, subgraph) in &self.subgraphs {
            let sdl = read(&subgraph.schema_path)?;
            subgraphs.ingest_str(&sdl, name, subgraph.url.as_deref())?;
        }

        Ok(crate::compose(&subgraphs))
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })
}
