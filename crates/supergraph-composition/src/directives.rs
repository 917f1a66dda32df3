//! Recognition of federation directives.
//!
//! Directive applications are interpreted into [FederationDirective] values when a subgraph is
//! ingested, which is where malformed arguments are reported. Later stages match directive names
//! against the constants below, and [is_subgraph_only_directive] is the single list of directives
//! stripped from composed types.

use crate::{
    ast::{self, Directive, DirectiveDefinition, DirectiveLocation, InputValueDefinition, Location, Type, Value},
    field_set::FieldSet,
};

pub(crate) const KEY: &str = "key";
pub(crate) const EXTERNAL: &str = "external";
pub(crate) const EXTENDS: &str = "extends";
pub(crate) const REQUIRES: &str = "requires";
pub(crate) const PROVIDES: &str = "provides";
pub(crate) const TAG: &str = "tag";

/// A malformed argument on a federation directive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("The `{argument}` argument of `@{directive}` is invalid: {reason}")]
pub struct DirectiveArgumentError {
    pub directive: String,
    pub argument: String,
    pub reason: String,
}

impl DirectiveArgumentError {
    fn new(directive: &str, argument: &str, reason: impl Into<String>) -> Self {
        DirectiveArgumentError {
            directive: directive.to_owned(),
            argument: argument.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A directive application, interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum FederationDirective {
    /// `@key(fields: "...")`
    Key { fields: FieldSet },
    /// `@external`
    External,
    /// `@extends`
    Extends,
    /// `@requires(fields: "...")`
    Requires { fields: FieldSet },
    /// `@provides(fields: "...")`
    Provides { fields: FieldSet },
    /// `@tag(name: "...")`
    Tag { name: String },
    /// Any other directive, carried as is.
    Other(Directive),
}

impl FederationDirective {
    pub fn interpret(directive: &Directive) -> Result<Self, DirectiveArgumentError> {
        Ok(match directive.name.as_str() {
            KEY => FederationDirective::Key {
                fields: field_set_argument(directive)?,
            },
            EXTERNAL => FederationDirective::External,
            EXTENDS => FederationDirective::Extends,
            REQUIRES => FederationDirective::Requires {
                fields: field_set_argument(directive)?,
            },
            PROVIDES => FederationDirective::Provides {
                fields: field_set_argument(directive)?,
            },
            TAG => FederationDirective::Tag {
                name: string_argument(directive, "name")?.to_owned(),
            },
            _ => FederationDirective::Other(directive.clone()),
        })
    }
}

/// Is this the name of a directive that only makes sense inside a subgraph?
pub(crate) fn is_subgraph_only_directive(name: &str) -> bool {
    matches!(name, KEY | EXTERNAL | EXTENDS | REQUIRES | PROVIDES)
}

fn string_argument<'a>(directive: &'a Directive, argument: &str) -> Result<&'a str, DirectiveArgumentError> {
    match directive.argument(argument) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(DirectiveArgumentError::new(
            &directive.name,
            argument,
            format!("expected a string, found {other}"),
        )),
        None => Err(DirectiveArgumentError::new(&directive.name, argument, "missing argument")),
    }
}

fn field_set_argument(directive: &Directive) -> Result<FieldSet, DirectiveArgumentError> {
    let fields = string_argument(directive, "fields")?;
    FieldSet::parse(fields).map_err(|reason| DirectiveArgumentError::new(&directive.name, "fields", reason))
}

/// The ordered key field sets of a type. Empty when the type has no `@key`.
pub fn extract_keys(definition: &ast::TypeDefinition) -> Result<Vec<FieldSet>, DirectiveArgumentError> {
    definition
        .directives_named(KEY)
        .map(field_set_argument)
        .collect()
}

pub fn is_external(field: &ast::FieldDefinition) -> bool {
    field.directives.iter().any(|directive| directive.name == EXTERNAL)
}

/// Either `extend type ...` or a definition annotated with `@extends`.
pub fn is_extension(definition: &ast::TypeDefinition) -> bool {
    definition.is_extension || definition.directives_named(EXTENDS).next().is_some()
}

/// Definitions of the federation directives, `@tag` and the GraphQL built-in directives. Used
/// when a subgraph applies them without defining them.
pub(crate) fn builtin_directive_definitions() -> Vec<DirectiveDefinition> {
    use DirectiveLocation::*;

    let fields = || vec![argument("fields", Type::non_null(Type::named("String")), None)];

    vec![
        definition(KEY, fields(), true, &[Object, Interface]),
        definition(EXTENDS, Vec::new(), false, &[Object, Interface]),
        definition(EXTERNAL, Vec::new(), false, &[Object, FieldDefinition]),
        definition(REQUIRES, fields(), false, &[FieldDefinition]),
        definition(PROVIDES, fields(), false, &[FieldDefinition]),
        definition(
            TAG,
            vec![argument("name", Type::non_null(Type::named("String")), None)],
            true,
            &[FieldDefinition, Object, Interface, Union],
        ),
        definition(
            "deprecated",
            vec![argument(
                "reason",
                Type::named("String"),
                Some(Value::String("No longer supported".to_owned())),
            )],
            false,
            &[FieldDefinition, ArgumentDefinition, InputFieldDefinition, EnumValue],
        ),
        definition(
            "specifiedBy",
            vec![argument("url", Type::non_null(Type::named("String")), None)],
            false,
            &[Scalar],
        ),
        definition(
            "skip",
            vec![argument("if", Type::non_null(Type::named("Boolean")), None)],
            false,
            &[Field, FragmentSpread, InlineFragment],
        ),
        definition(
            "include",
            vec![argument("if", Type::non_null(Type::named("Boolean")), None)],
            false,
            &[Field, FragmentSpread, InlineFragment],
        ),
    ]
}

fn definition(
    name: &str,
    arguments: Vec<InputValueDefinition>,
    is_repeatable: bool,
    locations: &[DirectiveLocation],
) -> DirectiveDefinition {
    DirectiveDefinition {
        name: name.to_owned(),
        description: None,
        arguments,
        is_repeatable,
        locations: locations.to_vec(),
        location: Location::default(),
    }
}

fn argument(name: &str, ty: Type, default_value: Option<Value>) -> InputValueDefinition {
    InputValueDefinition {
        name: name.to_owned(),
        description: None,
        ty,
        default_value,
        directives: Vec::new(),
        location: Location::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;

    fn first_type(sdl: &str) -> ast::TypeDefinition {
        parse(sdl).unwrap().type_definitions().next().unwrap().clone()
    }

    #[test]
    fn keys_in_order() {
        let product = first_type(r#"type Product @key(fields: "upc") @key(fields: "sku variation { id }") { upc: String! }"#);
        let keys = extract_keys(&product).unwrap();

        assert_eq!(
            keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["upc", "sku variation { id }"]
        );
    }

    #[test]
    fn no_key() {
        assert!(extract_keys(&first_type("type Product { upc: String! }")).unwrap().is_empty());
    }

    #[test]
    fn malformed_key() {
        let error = extract_keys(&first_type(r#"type Product @key(fields: "upc {") { upc: String! }"#)).unwrap_err();
        assert_eq!(error.directive, "key");
        assert_eq!(error.argument, "fields");

        let error = extract_keys(&first_type("type Product @key(fields: 1) { upc: String! }")).unwrap_err();
        assert_eq!(error.reason, "expected a string, found 1");

        assert!(extract_keys(&first_type("type Product @key { upc: String! }")).is_err());
    }

    #[test]
    fn extensions() {
        assert!(is_extension(&first_type("extend type Product { upc: String! }")));
        assert!(is_extension(&first_type("type Product @extends { upc: String! }")));
        assert!(!is_extension(&first_type("type Product { upc: String! }")));
    }

    #[test]
    fn externals() {
        let product = first_type("type Product { upc: String! @external name: String }");
        assert!(is_external(&product.fields()[0]));
        assert!(!is_external(&product.fields()[1]));
    }

    #[test]
    fn interpretation() {
        let product = first_type(r#"type Product @tag(name: "public") @audit(level: 1) @requires(fields: "a b") { upc: String! }"#);
        let interpreted = product
            .directives
            .iter()
            .map(FederationDirective::interpret)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(
            interpreted[0],
            FederationDirective::Tag {
                name: "public".to_owned()
            }
        );
        assert!(matches!(&interpreted[1], FederationDirective::Other(directive) if directive.name == "audit"));
        assert!(matches!(&interpreted[2], FederationDirective::Requires { fields } if fields.to_string() == "a b"));
    }

    #[test]
    fn subgraph_only_directives() {
        for name in [KEY, EXTERNAL, EXTENDS, REQUIRES, PROVIDES] {
            assert!(is_subgraph_only_directive(name), "{name}");
        }

        for name in [TAG, "deprecated", "audit"] {
            assert!(!is_subgraph_only_directive(name), "{name}");
        }
    }
}
