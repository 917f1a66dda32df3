use crate::{
    ast::{FieldDefinition, Type, TypeBody, TypeDefinition},
    diagnostics::{CompositionError, CompositionErrorKind},
    schema::Schema,
    Diagnostics,
};

/// Objects and interfaces must define every field of the interfaces they implement, with a
/// compatible type and the same arguments.
pub(super) fn validate_interface_implementations(schema: &Schema, diagnostics: &mut Diagnostics) {
    for definition in schema.types() {
        for interface_name in definition.implements() {
            let Some(interface) = schema.get_type(interface_name) else {
                // Reported as an unknown type.
                continue;
            };

            if !matches!(interface.body, TypeBody::Interface(_)) {
                diagnostics.push(
                    CompositionError::new(
                        CompositionErrorKind::TypeKindMismatch,
                        format!(
                            "`{}` implements `{interface_name}`, which is {} and not an interface.",
                            definition.name,
                            interface.kind()
                        ),
                    )
                    .on_type(definition.name.as_str()),
                );
                continue;
            }

            validate_implementation(schema, definition, interface, diagnostics);
        }
    }
}

fn validate_implementation(
    schema: &Schema,
    definition: &TypeDefinition,
    interface: &TypeDefinition,
    diagnostics: &mut Diagnostics,
) {
    let type_name = definition.name.as_str();
    let mut report = |field_name: &str, message: String| {
        diagnostics.push(
            CompositionError::new(CompositionErrorKind::InterfaceFieldMissing, message).on_field(type_name, field_name),
        );
    };

    for transitive in interface.implements() {
        if !definition.implements().contains(transitive) {
            report(
                &interface.name,
                format!(
                    "`{type_name}` implements `{}`, so it must also implement `{transitive}`.",
                    interface.name
                ),
            );
        }
    }

    for interface_field in interface.fields() {
        let field_name = interface_field.name.as_str();

        let Some(field) = definition.field(field_name) else {
            report(
                field_name,
                format!(
                    "`{type_name}` implements `{}` but does not define `{}.{field_name}`.",
                    interface.name, interface.name
                ),
            );
            continue;
        };

        if !is_valid_implementation_type(schema, &field.ty, &interface_field.ty) {
            report(
                field_name,
                format!(
                    "`{type_name}.{field_name}` is of type `{}`, which does not implement `{}.{field_name}` of type `{}`.",
                    field.ty, interface.name, interface_field.ty
                ),
            );
        }

        for message in argument_mismatches(type_name, field, &interface.name, interface_field) {
            report(field_name, message);
        }
    }
}

fn argument_mismatches(
    type_name: &str,
    field: &FieldDefinition,
    interface_name: &str,
    interface_field: &FieldDefinition,
) -> Vec<String> {
    let field_name = field.name.as_str();
    let mut messages = Vec::new();

    for interface_argument in &interface_field.arguments {
        match field.argument(&interface_argument.name) {
            None => messages.push(format!(
                "`{type_name}.{field_name}` is missing the argument `{}` of `{interface_name}.{field_name}`.",
                interface_argument.name
            )),
            Some(argument) if argument.ty != interface_argument.ty => messages.push(format!(
                "The argument `{type_name}.{field_name}({}:)` is of type `{}` but `{interface_name}.{field_name}` expects `{}`.",
                argument.name, argument.ty, interface_argument.ty
            )),
            Some(_) => (),
        }
    }

    for argument in &field.arguments {
        let is_additional = interface_field.argument(&argument.name).is_none();

        if is_additional && argument.ty.is_non_null() && argument.default_value.is_none() {
            messages.push(format!(
                "The argument `{type_name}.{field_name}({}:)` is required but `{interface_name}.{field_name}` does not declare it.",
                argument.name
            ));
        }
    }

    messages
}

/// Field types may be more specific than the interface field type: non-null where the interface
/// is nullable, or a possible type of the interface's abstract type.
fn is_valid_implementation_type(schema: &Schema, field: &Type, interface: &Type) -> bool {
    match (field, interface) {
        (Type::NonNull(field), Type::NonNull(interface)) => is_valid_implementation_type(schema, field, interface),
        (Type::NonNull(field), interface) => is_valid_implementation_type(schema, field, interface),
        (Type::List(field), Type::List(interface)) => is_valid_implementation_type(schema, field, interface),
        (Type::Named(field), Type::Named(interface)) => schema.is_subtype(interface, field),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::parse, schema::build_schema};

    fn errors(sdl: &str) -> Vec<String> {
        let schema = build_schema(&parse(sdl).unwrap()).unwrap();
        let mut diagnostics = Diagnostics::default();
        validate_interface_implementations(&schema, &mut diagnostics);
        diagnostics.iter_messages().map(str::to_owned).collect()
    }

    #[test]
    fn covariant_field_types_are_accepted() {
        let sdl = r#"
            interface Node { id: ID node: Node friends: [Node] }
            type User implements Node { id: ID! node: User! friends: [User!]! }
        "#;

        assert!(errors(sdl).is_empty());
    }

    #[test]
    fn missing_and_incompatible_fields() {
        let sdl = r#"
            interface Node { id: ID! name(locale: String): String }
            type User implements Node { name(locale: Int, extra: Int!): String }
        "#;

        insta::assert_debug_snapshot!(errors(sdl), @r###"
        [
            "`User` implements `Node` but does not define `Node.id`.",
            "The argument `User.name(locale:)` is of type `Int` but `Node.name` expects `String`.",
            "The argument `User.name(extra:)` is required but `Node.name` does not declare it.",
        ]
        "###);
    }

    #[test]
    fn list_does_not_implement_a_single_value() {
        let sdl = r#"
            interface Node { id: ID }
            type User implements Node { id: [ID] }
        "#;

        assert_eq!(
            errors(sdl),
            ["`User.id` is of type `[ID]`, which does not implement `Node.id` of type `ID`."]
        );
    }
}
