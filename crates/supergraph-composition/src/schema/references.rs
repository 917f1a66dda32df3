use crate::{
    ast::{Type, TypeBody, TypeDefinition},
    diagnostics::{CompositionError, CompositionErrorKind},
};

/// Report every type reference `is_known` rejects: field and argument types, input field types,
/// union members and implemented interfaces.
pub(crate) fn check_type_references<'a>(
    definitions: impl Iterator<Item = &'a TypeDefinition>,
    is_known: impl Fn(&str) -> bool,
    mut report: impl FnMut(CompositionError),
) {
    for definition in definitions {
        let type_name = definition.name.as_str();

        let mut check = |ty: &Type, member: Option<&str>| {
            let referenced = ty.name();

            if is_known(referenced) {
                return;
            }

            let error = match member {
                Some(member) => CompositionError::new(
                    CompositionErrorKind::UnknownType,
                    format!("Unknown type `{referenced}` (on `{type_name}.{member}`)."),
                )
                .on_field(type_name, member),
                None => CompositionError::new(
                    CompositionErrorKind::UnknownType,
                    format!("Unknown type `{referenced}` (on `{type_name}`)."),
                )
                .on_type(type_name),
            };

            report(error.at(definition.location));
        };

        for interface in definition.implements() {
            check(&Type::named(interface.as_str()), None);
        }

        match &definition.body {
            TypeBody::Object(body) | TypeBody::Interface(body) => {
                for field in &body.fields {
                    check(&field.ty, Some(&field.name));

                    for argument in &field.arguments {
                        check(&argument.ty, Some(&field.name));
                    }
                }
            }
            TypeBody::Union(members) => {
                for member in members {
                    check(&Type::named(member.as_str()), None);
                }
            }
            TypeBody::InputObject(fields) => {
                for field in fields {
                    check(&field.ty, Some(&field.name));
                }
            }
            TypeBody::Scalar | TypeBody::Enum(_) => (),
        }
    }
}
