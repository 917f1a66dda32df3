use crate::{
    ast::{Directive, DirectiveDefinition, DirectiveLocation, Location, Type, TypeBody, TypeDefinition},
    diagnostics::{CompositionError, CompositionErrorKind},
    directives::{is_subgraph_only_directive, TAG},
};

/// A directive application and where it was applied.
pub(crate) struct DirectiveSite<'a> {
    directive: &'a Directive,
    location: DirectiveLocation,
    type_name: Option<&'a str>,
    field_name: Option<&'a str>,
    source_location: Location,
}

impl<'a> DirectiveSite<'a> {
    pub(crate) fn schema(directive: &'a Directive, source_location: Location) -> Self {
        DirectiveSite {
            directive,
            location: DirectiveLocation::Schema,
            type_name: None,
            field_name: None,
            source_location,
        }
    }

    /// Every directive application on the type definition and its members.
    pub(crate) fn collect(definition: &'a TypeDefinition, out: &mut Vec<DirectiveSite<'a>>) {
        let type_name = Some(definition.name.as_str());
        let site = |directive: &'a Directive,
                    location: DirectiveLocation,
                    field_name: Option<&'a str>,
                    source_location: Location| DirectiveSite {
            directive,
            location,
            type_name,
            field_name,
            source_location,
        };

        let type_location = match definition.body {
            TypeBody::Scalar => DirectiveLocation::Scalar,
            TypeBody::Object(_) => DirectiveLocation::Object,
            TypeBody::Interface(_) => DirectiveLocation::Interface,
            TypeBody::Union(_) => DirectiveLocation::Union,
            TypeBody::Enum(_) => DirectiveLocation::Enum,
            TypeBody::InputObject(_) => DirectiveLocation::InputObject,
        };

        out.extend(
            definition
                .directives
                .iter()
                .map(|directive| site(directive, type_location, None, definition.location)),
        );

        for field in definition.fields() {
            let field_name = Some(field.name.as_str());

            out.extend(
                field
                    .directives
                    .iter()
                    .map(|directive| site(directive, DirectiveLocation::FieldDefinition, field_name, field.location)),
            );

            for argument in &field.arguments {
                out.extend(argument.directives.iter().map(|directive| {
                    site(
                        directive,
                        DirectiveLocation::ArgumentDefinition,
                        field_name,
                        argument.location,
                    )
                }));
            }
        }

        match &definition.body {
            TypeBody::Enum(values) => {
                for value in values {
                    out.extend(value.directives.iter().map(|directive| {
                        site(
                            directive,
                            DirectiveLocation::EnumValue,
                            Some(value.value.as_str()),
                            value.location,
                        )
                    }));
                }
            }
            TypeBody::InputObject(fields) => {
                for field in fields {
                    out.extend(field.directives.iter().map(|directive| {
                        site(
                            directive,
                            DirectiveLocation::InputFieldDefinition,
                            Some(field.name.as_str()),
                            field.location,
                        )
                    }));
                }
            }
            _ => (),
        }
    }

    fn describe(&self) -> String {
        match (self.type_name, self.field_name) {
            (Some(type_name), Some(field_name)) => format!("`{type_name}.{field_name}`"),
            (Some(type_name), None) => format!("`{type_name}`"),
            _ => "the schema".to_owned(),
        }
    }

    fn error(&self, kind: CompositionErrorKind, message: String) -> CompositionError {
        let error = CompositionError::new(kind, message).at(self.source_location);

        match (self.type_name, self.field_name) {
            (Some(type_name), Some(field_name)) => error.on_field(type_name, field_name),
            (Some(type_name), None) => error.on_type(type_name),
            _ => error,
        }
    }
}

/// Check that every directive is applied where its definition allows it, with the arguments
/// the definition declares. Directives without a definition are not checked.
pub(crate) fn validate_directive_sites<'a>(
    sites: &[DirectiveSite<'_>],
    lookup: impl Fn(&str) -> Option<&'a DirectiveDefinition>,
    mut report: impl FnMut(CompositionError),
) {
    for site in sites {
        let name = site.directive.name.as_str();
        let Some(definition) = lookup(name) else {
            continue;
        };

        if !definition.locations.contains(&site.location) {
            let allowed = definition
                .locations
                .iter()
                .map(|location| location.as_str())
                .collect::<Vec<_>>()
                .join(" | ");

            report(site.error(
                CompositionErrorKind::DirectiveLocation,
                format!(
                    "The directive `@{name}` is not allowed at {} (on {}). Its allowed locations are: {allowed}.",
                    site.location,
                    site.describe()
                ),
            ));
        }

        // Arguments of federation directives are checked when they are interpreted.
        if is_subgraph_only_directive(name) || name == TAG {
            continue;
        }

        for argument in &site.directive.arguments {
            if !definition
                .arguments
                .iter()
                .any(|definition| definition.name == argument.name)
            {
                report(site.error(
                    CompositionErrorKind::DirectiveArgument,
                    format!(
                        "The directive `@{name}` has no argument named `{}` (on {}).",
                        argument.name,
                        site.describe()
                    ),
                ));
            }
        }

        for argument_definition in &definition.arguments {
            let is_required = matches!(argument_definition.ty, Type::NonNull(_)) && argument_definition.default_value.is_none();

            if is_required && site.directive.argument(&argument_definition.name).is_none() {
                report(site.error(
                    CompositionErrorKind::DirectiveArgument,
                    format!(
                        "The directive `@{name}` is missing its required `{}` argument (on {}).",
                        argument_definition.name,
                        site.describe()
                    ),
                ));
            }
        }
    }
}
