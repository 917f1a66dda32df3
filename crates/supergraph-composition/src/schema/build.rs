use super::{references::check_type_references, Schema};
use crate::{
    ast::{Definition, Directive, DirectiveDefinition, Document, ObjectBody, SchemaDefinition, TypeBody, TypeDefinition},
    compose::{conflicting_directive_error, merge_directive},
    diagnostics::{CompositionError, CompositionErrorKind},
    directives::builtin_directive_definitions,
    validate::{validate_directive_sites, DirectiveSite},
    Diagnostics,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendSchemaOptions {
    /// Skip checking directive applications and type references. Conflicting definitions are
    /// reported either way.
    pub assume_valid_sdl: bool,
}

/// Build a schema out of a single document. Same as extending the empty schema.
pub fn build_schema(document: &Document) -> Result<Schema, Diagnostics> {
    extend_schema(&Schema::empty(), document, ExtendSchemaOptions::default())
}

/// A new schema with the definitions and extensions of `document` applied to `schema`. Base
/// definitions are applied before extensions, so an extension may come before the type it extends.
pub fn extend_schema(schema: &Schema, document: &Document, options: ExtendSchemaOptions) -> Result<Schema, Diagnostics> {
    let mut diagnostics = Diagnostics::default();

    if !options.assume_valid_sdl {
        validate_sdl(schema, document, &mut diagnostics);
    }

    let extended = extend_schema_unchecked(schema, document, &mut diagnostics);

    if diagnostics.is_empty() {
        Ok(extended)
    } else {
        diagnostics.sort();
        Err(diagnostics)
    }
}

/// Apply `document` to `schema`, reporting conflicting definitions to `diagnostics`. The schema is
/// returned even when there are conflicts: the first definition wins.
pub(crate) fn extend_schema_unchecked(schema: &Schema, document: &Document, diagnostics: &mut Diagnostics) -> Schema {
    let mut builder = SchemaBuilder {
        schema: schema.clone(),
        builtins: builtin_directive_definitions(),
        diagnostics,
    };

    for definition in &document.definitions {
        match definition {
            Definition::Directive(definition) => builder.add_directive_definition(definition),
            Definition::Schema(definition) => builder.add_schema_definition(definition),
            Definition::Type(definition) if !definition.is_extension => builder.add_type_definition(definition),
            Definition::Type(_) => (),
        }
    }

    for extension in document.type_definitions().filter(|definition| definition.is_extension) {
        builder.add_type_extension(extension);
    }

    builder.schema
}

struct SchemaBuilder<'a> {
    schema: Schema,
    builtins: Vec<DirectiveDefinition>,
    diagnostics: &'a mut Diagnostics,
}

impl SchemaBuilder<'_> {
    fn add_directive_definition(&mut self, definition: &DirectiveDefinition) {
        if self.schema.directive_definitions.contains_key(&definition.name) {
            self.diagnostics.push(
                CompositionError::new(
                    CompositionErrorKind::DuplicateTypeDefinition,
                    format!("There can be only one directive named `@{}`.", definition.name),
                )
                .on_type(format!("@{}", definition.name))
                .at(definition.location),
            );
            return;
        }

        self.schema
            .directive_definitions
            .insert(definition.name.clone(), definition.clone());
    }

    fn add_schema_definition(&mut self, definition: &SchemaDefinition) {
        for root in &definition.root_operations {
            match self.schema.root_operation_types.get(&root.operation) {
                Some(existing) if *existing != root.named_type => {
                    self.diagnostics.push(
                        CompositionError::new(
                            CompositionErrorKind::DuplicateTypeDefinition,
                            format!(
                                "The {} root type is already `{existing}`, it cannot also be `{}`.",
                                root.operation, root.named_type
                            ),
                        )
                        .on_type(root.named_type.as_str())
                        .at(definition.location),
                    );
                }
                Some(_) => (),
                None => {
                    self.schema
                        .root_operation_types
                        .insert(root.operation, root.named_type.clone());
                }
            }
        }

        let repeatable = self.repeatable(&definition.directives);
        let mut directives = std::mem::take(&mut self.schema.schema_directives);
        merge_directives(&mut directives, &definition.directives, &repeatable, "the schema", |error| {
            self.diagnostics.push(error)
        });
        self.schema.schema_directives = directives;
    }

    fn add_type_definition(&mut self, definition: &TypeDefinition) {
        if self.schema.types.contains_key(&definition.name) {
            self.diagnostics.push(
                CompositionError::new(
                    CompositionErrorKind::DuplicateTypeDefinition,
                    format!("There can be only one type named `{}`.", definition.name),
                )
                .on_type(definition.name.as_str())
                .at(definition.location),
            );
            return;
        }

        let mut shell = TypeDefinition {
            directives: Vec::new(),
            body: definition.body.empty_like(),
            ..definition.clone()
        };

        let repeatable = self.repeatable(&definition.directives);
        apply_members(&mut shell, definition, &repeatable, self.diagnostics);

        self.schema.types.insert(definition.name.clone(), shell);
    }

    /// Extensions of a type no document defines create the type.
    fn add_type_extension(&mut self, extension: &TypeDefinition) {
        let repeatable = self.repeatable(&extension.directives);

        let target = self
            .schema
            .types
            .entry(extension.name.clone())
            .or_insert_with(|| TypeDefinition {
                name: extension.name.clone(),
                description: None,
                directives: Vec::new(),
                is_extension: false,
                body: extension.body.empty_like(),
                location: extension.location,
            });

        if target.kind() != extension.kind() {
            self.diagnostics.push(
                CompositionError::new(
                    CompositionErrorKind::TypeKindMismatch,
                    format!(
                        "Cannot extend `{}` as {} {}: it is {} {}.",
                        extension.name,
                        article(extension.kind()),
                        extension.kind(),
                        article(target.kind()),
                        target.kind()
                    ),
                )
                .on_type(extension.name.as_str())
                .at(extension.location),
            );
            return;
        }

        apply_members(target, extension, &repeatable, self.diagnostics);
    }

    fn repeatable(&self, directives: &[Directive]) -> Vec<bool> {
        directives
            .iter()
            .map(|directive| {
                self.schema
                    .directive_definitions
                    .get(&directive.name)
                    .or_else(|| self.builtins.iter().find(|builtin| builtin.name == directive.name))
                    .is_some_and(|definition| definition.is_repeatable)
            })
            .collect()
    }
}

/// Add the description, directives and members of `source` to `target`. Both have the same kind.
fn apply_members(target: &mut TypeDefinition, source: &TypeDefinition, repeatable: &[bool], diagnostics: &mut Diagnostics) {
    let type_name = target.name.clone();

    if target.description.is_none() {
        target.description.clone_from(&source.description);
    }

    merge_directives(
        &mut target.directives,
        &source.directives,
        repeatable,
        &format!("`{type_name}`"),
        |error| diagnostics.push(error.on_type(type_name.as_str())),
    );

    let mut duplicate = |member: &str, location| {
        diagnostics.push(
            CompositionError::new(
                CompositionErrorKind::DuplicateTypeDefinition,
                format!("Field `{type_name}.{member}` can only be defined once."),
            )
            .on_field(type_name.as_str(), member)
            .at(location),
        );
    };

    match (&mut target.body, &source.body) {
        (TypeBody::Object(target), TypeBody::Object(source)) | (TypeBody::Interface(target), TypeBody::Interface(source)) => {
            let ObjectBody { implements, fields } = target;

            for interface in &source.implements {
                if !implements.contains(interface) {
                    implements.push(interface.clone());
                }
            }

            for field in &source.fields {
                if fields.iter().any(|existing| existing.name == field.name) {
                    duplicate(&field.name, field.location);
                } else {
                    fields.push(field.clone());
                }
            }
        }
        (TypeBody::Union(members), TypeBody::Union(source)) => {
            for member in source {
                if !members.contains(member) {
                    members.push(member.clone());
                }
            }
        }
        (TypeBody::Enum(values), TypeBody::Enum(source)) => {
            for value in source {
                if values.iter().any(|existing| existing.value == value.value) {
                    duplicate(&value.value, value.location);
                } else {
                    values.push(value.clone());
                }
            }
        }
        (TypeBody::InputObject(fields), TypeBody::InputObject(source)) => {
            for field in source {
                if fields.iter().any(|existing| existing.name == field.name) {
                    duplicate(&field.name, field.location);
                } else {
                    fields.push(field.clone());
                }
            }
        }
        _ => (),
    }
}

fn merge_directives(
    merged: &mut Vec<Directive>,
    directives: &[Directive],
    repeatable: &[bool],
    site: &str,
    mut report: impl FnMut(CompositionError),
) {
    for (directive, is_repeatable) in directives.iter().zip(repeatable) {
        if let Some(existing) = merge_directive(merged, directive, *is_repeatable) {
            report(conflicting_directive_error(site, &existing, directive));
        }
    }
}

fn article(kind: crate::ast::TypeKind) -> &'static str {
    match kind {
        crate::ast::TypeKind::Object
        | crate::ast::TypeKind::Interface
        | crate::ast::TypeKind::Enum
        | crate::ast::TypeKind::InputObject => "an",
        _ => "a",
    }
}

/// Checks that only make sense on hand-written SDL. Composed documents skip them.
fn validate_sdl(schema: &Schema, document: &Document, diagnostics: &mut Diagnostics) {
    let builtins = builtin_directive_definitions();
    let mut sites = Vec::new();

    for definition in document.schema_definitions() {
        for directive in &definition.directives {
            sites.push(DirectiveSite::schema(directive, definition.location));
        }
    }

    for definition in document.type_definitions() {
        DirectiveSite::collect(definition, &mut sites);
    }

    let lookup = |name: &str| {
        document
            .directive_definitions()
            .find(|definition| definition.name == name)
            .or_else(|| schema.get_directive_definition(name))
            .or_else(|| builtins.iter().find(|definition| definition.name == name))
    };

    validate_directive_sites(&sites, lookup, |error| diagnostics.push(error));

    let is_known = |name: &str| {
        schema.is_known_type(name)
            || document
                .type_definitions()
                .any(|definition| definition.name == name)
    };

    check_type_references(document.type_definitions(), is_known, |error| diagnostics.push(error));
}
