//! Validations of the composed schema, where the contributions of all services are known.

mod interfaces;

use crate::{
    ast::OperationType,
    diagnostics::{CompositionError, CompositionErrorKind},
    schema::{check_type_references, Schema},
    Diagnostics,
};
use itertools::Itertools;

pub(crate) fn validate(schema: &Schema, diagnostics: &mut Diagnostics) {
    validate_keys(schema, diagnostics);
    validate_external_fields(schema, diagnostics);
    interfaces::validate_interface_implementations(schema, diagnostics);
    validate_root_fields(schema, diagnostics);

    check_type_references(
        schema.types(),
        |name| schema.is_known_type(name),
        |error| diagnostics.push(error),
    );
}

/// Every path of every `@key` must select fields of the composed type.
fn validate_keys(schema: &Schema, diagnostics: &mut Diagnostics) {
    for (type_name, metadata) in schema.federation().types() {
        for (service, key) in &metadata.keys {
            for path in key.paths() {
                if let Err(reason) = resolve_path(schema, type_name, &path) {
                    diagnostics.push(
                        CompositionError::new(
                            CompositionErrorKind::DirectiveArgument,
                            format!("[{service}] The @key(fields: \"{key}\") on `{type_name}` is invalid: {reason}."),
                        )
                        .on_type(type_name)
                        .in_service(service.as_str()),
                    );
                }
            }
        }
    }
}

fn resolve_path(schema: &Schema, type_name: &str, path: &[&str]) -> Result<(), String> {
    let mut current = type_name;

    for segment in path {
        let field = schema
            .get_type(current)
            .and_then(|definition| definition.field(segment))
            .ok_or_else(|| format!("`{current}` has no field `{segment}`"))?;

        current = field.ty.name();
    }

    Ok(())
}

/// An `@external` field must be resolved by some other service.
fn validate_external_fields(schema: &Schema, diagnostics: &mut Diagnostics) {
    for (type_name, metadata) in schema.federation().types() {
        for (field_name, field) in &metadata.fields {
            if field.contributions.is_empty() || field.owner().is_some() {
                continue;
            }

            diagnostics.push(
                CompositionError::new(
                    CompositionErrorKind::UnresolvedExternalField,
                    format!(
                        "The field `{type_name}.{field_name}` is marked @external in {} but no service defines it.",
                        field
                            .contributions
                            .iter()
                            .map(|contribution| format!("`{}`", contribution.service))
                            .sorted()
                            .join(", ")
                    ),
                )
                .on_field(type_name, field_name.as_str()),
            );
        }
    }
}

/// A root field is resolved by exactly one service.
fn validate_root_fields(schema: &Schema, diagnostics: &mut Diagnostics) {
    let roots = [OperationType::Query, OperationType::Mutation, OperationType::Subscription]
        .into_iter()
        .filter_map(|operation| schema.root_operation_type(operation));

    for root in roots {
        let Some(metadata) = schema.federation().get_type(&root.name) else {
            continue;
        };

        for (field_name, field) in &metadata.fields {
            let owners = field
                .contributions
                .iter()
                .filter(|contribution| !contribution.is_external)
                .map(|contribution| contribution.service.as_str())
                .sorted()
                .dedup()
                .collect::<Vec<_>>();

            if owners.len() < 2 {
                continue;
            }

            diagnostics.push(
                CompositionError::new(
                    CompositionErrorKind::DuplicateTypeDefinition,
                    format!(
                        "The root field `{}.{field_name}` is defined in {}. Only one service may resolve a root field.",
                        root.name,
                        owners.iter().map(|service| format!("`{service}`")).join(", ")
                    ),
                )
                .on_field(root.name.as_str(), field_name.as_str()),
            );
        }
    }
}
