#![allow(unused_crate_dependencies)]

use std::fs;
use supergraph_composition::{CompositionConfig, CompositionErrorKind, ConfigError};

fn write_manifest(dir: &tempfile::TempDir, products_sdl: &str) -> std::path::PathBuf {
    fs::write(dir.path().join("products.graphql"), products_sdl).unwrap();

    fs::create_dir(dir.path().join("schemas")).unwrap();
    fs::write(
        dir.path().join("schemas/inventory.graphql"),
        r#"
        extend type Product @key(fields: "upc") {
            upc: String! @external
            inStock: Boolean
        }
        "#,
    )
    .unwrap();

    let manifest = dir.path().join("composition.toml");
    fs::write(
        &manifest,
        r#"
        [subgraphs.products]
        url = "http://products:4001/graphql"
        schema_path = "products.graphql"

        [subgraphs.inventory]
        url = "http://inventory:4002/graphql"
        schema_path = "schemas/inventory.graphql"
        "#,
    )
    .unwrap();

    manifest
}

const PRODUCTS: &str = r#"
    type Product @key(fields: "upc") {
        upc: String!
        name: String
    }

    type Query {
        topProducts: [Product]
    }
"#;

#[test]
fn compose_from_a_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir, PRODUCTS);

    let config = CompositionConfig::load(&manifest).unwrap();

    assert_eq!(
        config.subgraphs["inventory"].schema_path,
        dir.path().join("schemas/inventory.graphql")
    );

    let result = config.compose().unwrap();
    let sdl = result.supergraph_sdl().unwrap();

    assert!(
        sdl.contains(r#"INVENTORY @join__graph(name: "inventory", url: "http://inventory:4002/graphql")"#),
        "{sdl}"
    );
    assert!(sdl.contains("inStock: Boolean @join__field(graph: INVENTORY)"), "{sdl}");
}

#[test]
fn services_from_a_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir, PRODUCTS);

    let services = CompositionConfig::load(&manifest).unwrap().into_services().unwrap();

    assert_eq!(
        services.iter().map(|service| service.name.as_str()).collect::<Vec<_>>(),
        ["products", "inventory"]
    );
    assert_eq!(services[0].url.as_deref(), Some("http://products:4001/graphql"));
    assert_eq!(services[1].type_defs.type_definitions().count(), 1);
}

#[test]
fn syntax_errors_in_a_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(&dir, "type Product {");
    let config = CompositionConfig::load(&manifest).unwrap();

    let result = config.compose().unwrap();
    assert!(result.diagnostics().kinds().any(|kind| kind == CompositionErrorKind::Syntax));

    let error = config.into_services().unwrap_err();
    assert!(matches!(error, ConfigError::Syntax { ref service, .. } if service == "products"));
}

#[test]
fn missing_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("composition.toml");
    fs::write(
        &manifest,
        r#"
        [subgraphs.products]
        schema_path = "nowhere.graphql"
        "#,
    )
    .unwrap();

    let error = CompositionConfig::load(&manifest).unwrap().compose().unwrap_err();

    assert!(matches!(error, ConfigError::Io { .. }), "{error}");
}

#[test]
fn missing_manifest() {
    let dir = tempfile::tempdir().unwrap();

    let error = CompositionConfig::load(dir.path().join("composition.toml")).unwrap_err();

    assert!(matches!(error, ConfigError::Io { .. }));
}
