#![allow(unused_crate_dependencies)]

use pretty_assertions::assert_eq;
use rstest::rstest;
use supergraph_composition::ast::{self, StripDirectives};

#[rstest]
#[case::object_with_arguments(
    r#"
    type Query {
        products(first: Int = 5, filter: ProductFilter): [Product!]! @deprecated(reason: "use search")
    }
    "#
)]
#[case::descriptions(
    r#"
    """
    A thing that can be bought.
    It has two lines.
    """
    type Product implements Node & Priced @key(fields: "upc") {
        "The id"
        upc: String!
        price: Int
    }
    "#
)]
#[case::extensions(
    r#"
    extend type Product @key(fields: "upc") {
        upc: String! @external
        weight: Int @requires(fields: "size { width height }")
    }

    extend interface Node {
        createdAt: String
    }

    extend union SearchResult = Review

    extend enum Color {
        BLUE
    }

    extend input ProductFilter {
        onSale: Boolean
    }

    extend scalar Date @specifiedBy(url: "https://example.com/date")
    "#
)]
#[case::every_kind(
    r#"
    schema {
        query: RootQuery
        mutation: RootMutation
    }

    scalar Date

    interface Node {
        id: ID!
    }

    union SearchResult = Product | User

    enum Color {
        "Red"
        RED
        GREEN @deprecated
    }

    input ProductFilter {
        colors: [Color!] = [RED, GREEN]
        range: Range = {min: 1, max: 2.5}
        name: String = "a \"quoted\" name"
        exact: Boolean = false
        cursor: String = null
    }

    directive @cacheControl(maxAge: Int, scope: String) repeatable on FIELD_DEFINITION | OBJECT
    "#
)]
fn printing_is_a_fixed_point_of_parsing(#[case] sdl: &str) {
    let document = ast::parse(sdl).unwrap();
    let printed = document.to_string();
    let reparsed = ast::parse(&printed).unwrap();

    assert_eq!(reparsed, document);
    assert_eq!(reparsed.to_string(), printed);
}

#[test]
fn formatting_does_not_matter() {
    let compact = ast::parse("type Query{a(x:Int=1):String b:[Int!]!}").unwrap();
    let spread = ast::parse(
        r#"
        type Query {
            a(x: Int = 1): String

            b: [Int!]!
        }
        "#,
    )
    .unwrap();

    assert_eq!(compact, spread);
}

#[test]
fn malformed_sdl_is_rejected() {
    let error = ast::parse("type Query {\n  name String\n}").unwrap_err();

    assert!(!error.message.is_empty());
}

#[test]
fn deleting_every_directive_keeps_the_rest() {
    let sdl = r#"
    directive @lowercase on FIELD

    type Product @key(fields: "upc") @extends {
        upc: String! @external
        reviews(first: Int = 10 @deprecated): [Review] @provides(fields: "body")
    }

    enum Color @tag(name: "public") {
        RED @deprecated(reason: "no")
    }

    input Filter {
        color: Color @tag(name: "public")
    }
    "#;

    let document = ast::parse(sdl).unwrap();
    let stripped = ast::visit(&document, &mut StripDirectives(|_: &ast::Directive| true));
    let printed = stripped.to_string();

    // The directive definition itself stays.
    assert_eq!(printed.matches('@').count(), 1, "{printed}");
    assert!(printed.contains("directive @lowercase on FIELD"));

    insta::assert_snapshot!(printed, @r#"
    directive @lowercase on FIELD

    type Product {
        upc: String!
        reviews(first: Int = 10): [Review]
    }

    enum Color {
        RED
    }

    input Filter {
        color: Color
    }
    "#);
}

#[test]
fn deleting_directives_without_definitions_leaves_no_annotation() {
    let document = ast::parse(
        r#"
        type Query {
            me(id: ID @deprecated): User @lowercase
        }

        type User @key(fields: "id") {
            id: ID!
        }
        "#,
    )
    .unwrap();

    let stripped = ast::visit(&document, &mut StripDirectives(|_: &ast::Directive| true));

    assert!(!stripped.to_string().contains('@'));
    assert_eq!(stripped.type_definitions().count(), 2);
    assert_eq!(
        stripped.type_definitions().next().unwrap().fields()[0].arguments[0].name,
        "id"
    );
}
