#![allow(unused_crate_dependencies)]

use itertools::Itertools;
use pretty_assertions::assert_eq;
use supergraph_composition::{
    ast::{self, StripDirectives},
    compose, compose_and_validate, composition_has_errors, CompositionErrorKind, CompositionResult, IngestError,
    ServiceDefinition, Subgraphs,
};

fn service(name: &str, sdl: &str) -> ServiceDefinition {
    ServiceDefinition::from_sdl(name, Some(&format!("http://{name}:4000/graphql")), sdl).unwrap()
}

fn compose_services(services: &[(&str, &str)]) -> CompositionResult {
    let services = services
        .iter()
        .map(|(name, sdl)| service(name, sdl))
        .collect::<Vec<_>>();

    compose_and_validate(&services).unwrap()
}

fn error_kinds(result: &CompositionResult) -> Vec<CompositionErrorKind> {
    result.diagnostics().kinds().collect()
}

fn field_names(result: &CompositionResult, type_name: &str) -> Vec<String> {
    result
        .schema()
        .unwrap()
        .get_type(type_name)
        .unwrap()
        .fields()
        .iter()
        .map(|field| field.name.clone())
        .collect()
}

const PRODUCTS: &str = r#"
    type Product @key(fields: "upc") {
        upc: String!
    }

    type Query {
        topProducts: [Product]
    }
"#;

const INVENTORY: &str = r#"
    extend type Product @key(fields: "upc") {
        upc: String! @external
        inStock: Boolean
    }
"#;

#[test]
fn extension_backed_by_external_fields() {
    let result = compose_services(&[("products", PRODUCTS), ("inventory", INVENTORY)]);

    assert!(!composition_has_errors(&result), "{}", result.diagnostics());
    assert_eq!(field_names(&result, "Product"), ["upc", "inStock"]);

    let federation = result.schema().unwrap().federation();
    assert_eq!(federation.field_owner("Product", "upc"), Some("products"));
    assert_eq!(federation.field_owner("Product", "inStock"), Some("inventory"));
    assert_eq!(federation.get_type("Product").unwrap().owner.as_deref(), Some("products"));

    let sdl = result.supergraph_sdl().unwrap();
    assert!(sdl.contains("upc: String! @join__field(graph: PRODUCTS)"), "{sdl}");
    assert!(sdl.contains("inStock: Boolean @join__field(graph: INVENTORY)"), "{sdl}");
    assert!(sdl.contains(r#"@join__type(graph: INVENTORY, key: "upc")"#), "{sdl}");
    assert!(sdl.contains("@join__owner(graph: PRODUCTS)"), "{sdl}");
    assert_eq!(sdl.matches("inStock").count(), 1);
}

#[test]
fn supergraph_sdl() {
    let accounts = r#"
        type Query {
            me: User
        }

        "A user of the shop"
        type User @key(fields: "id") {
            id: ID!
            email: String
        }
    "#;

    let reviews = r#"
        type Review {
            body: String
            author: User @provides(fields: "email")
        }

        extend type User @key(fields: "id") {
            id: ID! @external
            email: String @external
            reviews: [Review]
            reviewCount: Int @requires(fields: "email")
        }
    "#;

    let result = compose_services(&[("accounts", accounts), ("reviews", reviews)]);
    let supergraph = result.into_result().unwrap();

    insta::assert_snapshot!(supergraph.supergraph_sdl(), @r#"
    schema @core(feature: "https://specs.apollo.dev/core/v0.1") @core(feature: "https://specs.apollo.dev/join/v0.1", for: EXECUTION) {
        query: Query
    }

    directive @core(feature: String!, as: String, for: core__Purpose) repeatable on SCHEMA

    directive @join__field(graph: join__Graph, requires: join__FieldSet, provides: join__FieldSet) on FIELD_DEFINITION

    directive @join__type(graph: join__Graph!, key: join__FieldSet) repeatable on OBJECT | INTERFACE

    directive @join__owner(graph: join__Graph!) on OBJECT | INTERFACE

    directive @join__graph(name: String!, url: String!) on ENUM_VALUE

    enum core__Purpose {
        "`EXECUTION` features provide metadata necessary to for operation execution."
        EXECUTION
        "`SECURITY` features provide metadata necessary to securely resolve fields."
        SECURITY
    }

    scalar join__FieldSet

    enum join__Graph {
        ACCOUNTS @join__graph(name: "accounts", url: "http://accounts:4000/graphql")
        REVIEWS @join__graph(name: "reviews", url: "http://reviews:4000/graphql")
    }

    type Query {
        me: User @join__field(graph: ACCOUNTS)
    }

    type Review {
        body: String @join__field(graph: REVIEWS)
        author: User @join__field(graph: REVIEWS, provides: "email")
    }

    "A user of the shop"
    type User @join__owner(graph: ACCOUNTS) @join__type(graph: ACCOUNTS, key: "id") @join__type(graph: REVIEWS, key: "id") {
        id: ID! @join__field(graph: ACCOUNTS)
        email: String @join__field(graph: ACCOUNTS)
        reviews: [Review] @join__field(graph: REVIEWS)
        reviewCount: Int @join__field(graph: REVIEWS, requires: "email")
    }
    "#);
}

#[test]
fn identical_input_types_are_merged() {
    let input = r#"
        input NewProductInput {
            sku: ID!
            type: String
        }
    "#;

    let result = compose_services(&[("products", input), ("catalog", input)]);

    assert!(!result.has_errors(), "{}", result.diagnostics());

    let input_fields = match &result.schema().unwrap().get_type("NewProductInput").unwrap().body {
        ast::TypeBody::InputObject(fields) => fields.iter().map(|field| field.name.as_str()).collect::<Vec<_>>(),
        _ => Vec::new(),
    };

    assert_eq!(input_fields, ["sku", "type"]);
    assert_eq!(result.supergraph_sdl().unwrap().matches("input NewProductInput").count(), 1);
}

#[test]
fn identical_value_types_have_no_owner() {
    let money = r#"
        type Money {
            amount: Int
            currency: String
        }
    "#;

    let result = compose_services(&[("payments", money), ("billing", money)]);

    assert!(!result.has_errors(), "{}", result.diagnostics());

    let federation = result.schema().unwrap().federation();
    let metadata = federation.get_type("Money").unwrap();
    assert!(metadata.is_value_type);
    assert_eq!(metadata.owner, None);

    let sdl = result.supergraph_sdl().unwrap();
    assert!(sdl.contains("type Money {"), "{sdl}");
    assert!(sdl.contains("amount: Int @join__field(graph: BILLING)"), "{sdl}");
}

#[test]
fn duplicate_field_within_one_service() {
    let result = compose_services(&[("a", "type Foo { id: ID } extend type Foo { id: ID }")]);

    assert!(composition_has_errors(&result));
    assert!(result.schema().is_none());
    assert!(result.supergraph_sdl().is_none());

    let errors = result.diagnostics();
    assert_eq!(errors.len(), 1);

    let error = errors.iter().next().unwrap();
    assert_eq!(error.kind(), CompositionErrorKind::DuplicateTypeDefinition);
    assert_eq!(error.type_name(), Some("Foo"));
    assert_eq!(error.field_name(), Some("id"));

    assert_eq!(
        serde_json::to_value(errors).unwrap(),
        serde_json::json!([{
            "kind": "DuplicateTypeDefinitionError",
            "message": "[a] Field `Foo.id` can only be defined once.",
            "typeName": "Foo",
            "fieldName": "id",
            "serviceName": "a",
        }])
    );
}

#[test]
fn base_definitions_in_two_services() {
    let result = compose_services(&[("users", "type User { id: ID }"), ("profiles", "type User { name: String }")]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::DuplicateTypeDefinition]);
    insta::assert_snapshot!(result.diagnostics().iter().next().unwrap(), @"DuplicateTypeDefinitionError: The type `User` is defined in `profiles`, `users` with different definitions. Only one service may define a type, the others must extend it.");
}

#[test]
fn conflicting_field_types() {
    let inventory = r#"
        extend type Product @key(fields: "upc") {
            upc: ID! @external
            inStock: Boolean
        }
    "#;

    let result = compose_services(&[("products", PRODUCTS), ("inventory", inventory)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::FieldTypeMismatch]);
    insta::assert_snapshot!(result.diagnostics().iter().next().unwrap(), @"FieldTypeMismatchError: The field `Product.upc` has conflicting types across services: `ID!` in `inventory`, `String!` in `products`.");
}

#[test]
fn field_defined_by_two_services() {
    let reviews = r#"
        extend type Product @key(fields: "upc") {
            upc: String! @external
            name: String
        }
    "#;

    let catalog = r#"
        extend type Product @key(fields: "upc") {
            upc: String! @external
            name: String
        }
    "#;

    let result = compose_services(&[("products", PRODUCTS), ("reviews", reviews), ("catalog", catalog)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::DuplicateTypeDefinition]);
    assert_eq!(
        result.diagnostics().iter_messages().collect::<Vec<_>>(),
        ["The field `Product.name` is defined in `catalog`, `reviews`. Only one service may define a field, the others must mark it @external."]
    );
}

#[test]
fn external_field_without_a_definition() {
    let accounts = r#"
        type Query {
            me: User
        }

        type User @key(fields: "id") {
            id: ID!
        }
    "#;

    let reviews = r#"
        extend type User @key(fields: "id") {
            id: ID! @external
            email: String @external
            reviewCount: Int @requires(fields: "email")
        }
    "#;

    let result = compose_services(&[("accounts", accounts), ("reviews", reviews)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::UnresolvedExternalField]);
    assert_eq!(
        result.diagnostics().iter_messages().collect::<Vec<_>>(),
        ["The field `User.email` is marked @external in `reviews` but no service defines it."]
    );
}

#[test]
fn interface_field_not_implemented() {
    let sdl = r#"
        interface Node {
            id: ID!
        }

        type User implements Node {
            name: String
        }

        type Query {
            me: User
        }
    "#;

    let result = compose_services(&[("accounts", sdl)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::InterfaceFieldMissing]);
    assert_eq!(
        result.diagnostics().iter_messages().collect::<Vec<_>>(),
        ["`User` implements `Node` but does not define `Node.id`."]
    );
}

#[test]
fn root_field_resolved_by_two_services() {
    let result = compose_services(&[
        ("accounts", "type Query { me: String }"),
        ("profiles", "extend type Query { me: String }"),
    ]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::DuplicateTypeDefinition]);
    assert_eq!(
        result.diagnostics().iter_messages().collect::<Vec<_>>(),
        ["The root field `Query.me` is defined in `accounts`, `profiles`. Only one service may resolve a root field."]
    );
}

#[test]
fn root_fields_are_merged() {
    let result = compose_services(&[
        ("accounts", "type Query { me: String }"),
        ("products", "extend type Query { topProducts: [String] }"),
    ]);

    assert!(!result.has_errors(), "{}", result.diagnostics());
    assert_eq!(field_names(&result, "Query"), ["me", "topProducts"]);
}

#[test]
fn executable_directive_on_a_field_definition() {
    let sdl = r#"
        directive @lowercase on FIELD

        type Query {
            name: String @lowercase
        }
    "#;

    let result = compose_services(&[("accounts", sdl)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::DirectiveLocation]);
    assert!(result.schema().is_none());
}

#[test]
fn conflicting_directive_arguments() {
    let result = compose_services(&[
        ("a", r#"enum Color { RED @deprecated(reason: "old") }"#),
        ("b", r#"enum Color { RED @deprecated(reason: "gone") }"#),
    ]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::ConflictingDirective]);
}

#[test]
fn conflicting_directive_definitions() {
    let result = compose_services(&[
        ("a", "directive @cost(weight: Int) on FIELD_DEFINITION type Query { a: Int @cost(weight: 1) }"),
        ("b", "directive @cost(weight: String) on FIELD_DEFINITION extend type Query { b: Int }"),
    ]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::ConflictingDirective]);
}

#[test]
fn reserved_query_fields() {
    let result = compose_services(&[("accounts", "type Query { _service: String me: String }")]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::ReservedFieldUsed]);
}

#[test]
fn external_on_a_base_type() {
    let result = compose_services(&[(
        "accounts",
        r#"
        type User @key(fields: "id") {
            id: ID! @external
        }
        "#,
    )]);

    assert!(error_kinds(&result).contains(&CompositionErrorKind::ExternalUsedOnBase));
}

#[test]
fn extension_without_a_base() {
    let result = compose_services(&[("reviews", "extend type Review { body: String }")]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::ExtensionWithNoBase]);
}

#[test]
fn every_error_is_reported() {
    let result = compose_services(&[
        ("a", "type User { id: ID } type Query { me: Account }"),
        ("b", "type User { id: String }"),
        ("c", "interface Node { id: ID! } type Item implements Node { name: String }"),
    ]);

    let kinds = error_kinds(&result);
    assert!(kinds.contains(&CompositionErrorKind::DuplicateTypeDefinition), "{kinds:?}");
    assert!(kinds.contains(&CompositionErrorKind::UnknownType), "{kinds:?}");
    assert!(kinds.contains(&CompositionErrorKind::InterfaceFieldMissing), "{kinds:?}");
    assert!(kinds.iter().tuple_windows().all(|(a, b)| a <= b), "{kinds:?}");
}

#[test]
fn key_on_a_missing_field() {
    let products = r#"
        type Product @key(fields: "sku") {
            upc: String!
        }

        type Query {
            topProducts: [Product]
        }
    "#;

    let result = compose_services(&[("products", products)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::DirectiveArgument]);
    insta::assert_snapshot!(result.diagnostics().iter().next().unwrap(), @r#"DirectiveArgumentError: [products] The @key(fields: "sku") on `Product` is invalid: `Product` has no field `sku`."#);
}

#[test]
fn malformed_key_selection() {
    let products = r#"
        type Product @key(fields: "upc } query Q { doesNotExist") {
            upc: String!
        }

        type Query {
            topProducts: [Product]
        }
    "#;

    let result = compose_services(&[("products", products)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::DirectiveArgument]);

    let error = result.diagnostics().iter().next().unwrap();
    assert_eq!(error.type_name(), Some("Product"));
    assert!(result.supergraph_sdl().is_none());
}

#[test]
fn key_field_of_an_extension_not_external() {
    let inventory = r#"
        extend type Product @key(fields: "upc") {
            upc: String!
            inStock: Boolean
        }
    "#;

    let result = compose_services(&[("products", PRODUCTS), ("inventory", inventory)]);

    let error = result
        .diagnostics()
        .iter()
        .find(|error| error.kind() == CompositionErrorKind::KeyFieldsMissingExternal)
        .unwrap();

    assert_eq!(error.service_name(), Some("inventory"));
    assert_eq!(error.field_name(), Some("upc"));
}

#[test]
fn requires_on_a_base_type() {
    let accounts = r#"
        type User @key(fields: "id") {
            id: ID!
            email: String
            domain: String @requires(fields: "email")
        }

        type Query {
            me: User
        }
    "#;

    let result = compose_services(&[("accounts", accounts)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::RequiresUsedOnBase]);
    assert_eq!(result.diagnostics().iter().next().unwrap().field_name(), Some("domain"));
}

#[test]
fn type_defined_with_two_kinds() {
    let result = compose_services(&[
        ("payments", "interface Money { amount: Int }"),
        ("billing", "type Money { amount: Int }"),
    ]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::TypeKindMismatch]);
    insta::assert_snapshot!(result.diagnostics().iter().next().unwrap(), @"TypeKindMismatchError: The type `Money` is defined with different kinds: object in `billing`, interface in `payments`.");
}

#[test]
fn custom_root_names_are_merged() {
    let accounts = r#"
        schema {
            query: RootQuery
        }

        type RootQuery {
            me: User
        }

        type User {
            id: ID!
        }
    "#;

    let result = compose_services(&[("accounts", accounts), ("products", "type Query { topProducts: [String] }")]);

    assert!(!result.has_errors(), "{}", result.diagnostics());
    assert_eq!(field_names(&result, "Query"), ["me", "topProducts"]);
    assert!(result.schema().unwrap().get_type("RootQuery").is_none());
}

#[test]
fn type_shadowing_a_custom_root() {
    let accounts = r#"
        schema {
            query: RootQuery
        }

        type RootQuery {
            me: String
        }

        type Query {
            legacy: String
        }
    "#;

    let result = compose_services(&[("accounts", accounts)]);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::DuplicateTypeDefinition]);
    assert_eq!(
        result.diagnostics().iter_messages().collect::<Vec<_>>(),
        ["[accounts] The `Query` type has the default name for a root type but is itself not a root."]
    );
}

#[rstest::rstest]
#[case::zeta_first(["zeta", "alpha"], "From zeta")]
#[case::alpha_first(["alpha", "zeta"], "From alpha")]
fn descriptions_come_from_the_first_service_in_the_list(#[case] order: [&str; 2], #[case] expected: &str) {
    let sdl = |name: &str| {
        format!(
            r#"
            "From {name}"
            type Money {{
                "Amount from {name}"
                amount: Int
            }}
            "#
        )
    };

    let services = order
        .iter()
        .map(|name| service(name, &sdl(name)))
        .collect::<Vec<_>>();

    let result = compose_and_validate(&services).unwrap();
    let money = result.schema().unwrap().get_type("Money").unwrap();

    assert_eq!(money.description.as_deref(), Some(expected));
    assert_eq!(
        money.fields()[0].description.as_deref(),
        Some(expected.replace("From", "Amount from").as_str())
    );
}

#[test]
fn service_order_does_not_matter() {
    let accounts = r#"
        type Query {
            "The current user"
            me: User
        }

        type User @key(fields: "id") {
            id: ID!
            username: String
        }

        enum Role {
            ADMIN
        }
    "#;

    let reviews = r#"
        extend type Query {
            "Top reviews"
            topReviews(first: Int = 5): [Review]
        }

        type Review @key(fields: "id") {
            id: ID!
            body: String
            author: User @provides(fields: "username")
        }

        extend type User @key(fields: "id") {
            id: ID! @external
            username: String @external
            reviews: [Review]
        }

        enum Role {
            ADMIN
        }
    "#;

    let inventory = r#"
        directive @cacheControl(maxAge: Int) on FIELD_DEFINITION

        extend type Review @key(fields: "id") {
            id: ID! @external
            flagged: Boolean @cacheControl(maxAge: 30)
        }

        extend type Query {
            "Reviews waiting for moderation"
            flaggedReviews: [Review]
        }
    "#;

    let services = [("accounts", accounts), ("reviews", reviews), ("inventory", inventory)];
    let expected = compose_services(&services);

    assert!(!expected.has_errors(), "{}", expected.diagnostics());

    for permutation in services.iter().copied().permutations(services.len()) {
        let result = compose_services(&permutation);

        assert_eq!(result.supergraph_sdl(), expected.supergraph_sdl());
        assert_eq!(result.schema(), expected.schema());
    }
}

#[test]
fn service_order_does_not_change_errors() {
    let services = [
        ("a", "type Product { upc: String } type Query { a: Int }"),
        ("b", "type Product { upc: Int } extend type Query { a: Int }"),
        ("c", "extend type Review { body: String }"),
    ];

    let sorted_messages = |result: &CompositionResult| {
        result
            .diagnostics()
            .iter()
            .map(|error| error.to_string())
            .sorted()
            .collect::<Vec<_>>()
    };

    let expected = sorted_messages(&compose_services(&services));
    assert!(!expected.is_empty());

    for permutation in services.iter().copied().permutations(services.len()) {
        assert_eq!(sorted_messages(&compose_services(&permutation)), expected);
    }
}

#[test]
fn deleting_directives_from_the_supergraph() {
    let result = compose_services(&[("products", PRODUCTS), ("inventory", INVENTORY)]);
    let document = ast::parse(result.supergraph_sdl().unwrap()).unwrap();

    let stripped = ast::visit(&document, &mut StripDirectives(|_: &ast::Directive| true));
    let printed = stripped.to_string();

    for line in printed.lines().filter(|line| line.contains('@')) {
        assert!(line.starts_with("directive @"), "{line}");
    }

    assert_eq!(stripped.type_definitions().count(), document.type_definitions().count());
    assert!(printed.contains("inStock: Boolean\n"), "{printed}");
}

#[test]
fn duplicate_service_names() {
    let error = compose_and_validate(&[service("products", PRODUCTS), service("products", INVENTORY)]).unwrap_err();

    assert!(matches!(error, IngestError::DuplicateServiceName(ref name) if name == "products"));
}

#[test]
fn syntax_error_drops_the_service() {
    let mut subgraphs = Subgraphs::default();
    subgraphs.ingest_str(PRODUCTS, "products", None).unwrap();
    subgraphs.ingest_str("extend type Product {", "inventory", None).unwrap();

    let result = compose(&subgraphs);

    assert_eq!(error_kinds(&result), [CompositionErrorKind::Syntax]);
    assert_eq!(result.diagnostics().iter().next().unwrap().service_name(), Some("inventory"));

    // The name stays taken.
    assert!(subgraphs.ingest_str("type Query { a: Int }", "inventory", None).is_err());
}

#[test]
fn no_services() {
    let result = compose_and_validate(&[]).unwrap();

    assert!(!result.has_errors());
    assert!(result.schema().unwrap().types().next().is_none());
}

#[test]
fn services_are_not_modified() {
    let services = vec![service("products", PRODUCTS), service("inventory", INVENTORY)];
    let before = services.clone();

    compose_and_validate(&services).unwrap();

    assert_eq!(services, before);
}
