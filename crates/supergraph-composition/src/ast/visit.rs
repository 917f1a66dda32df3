use super::nodes::*;

/// What a [Transform] hook decides for the node it was handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<T> {
    Keep,
    Replace(T),
    /// Remove the node. Its siblings keep their relative order.
    Delete,
}

/// Per node kind hooks for [visit()]. Every hook defaults to [Action::Keep].
///
/// Hooks run before the children of the node are visited. When a hook replaces a node, the
/// children of the replacement are visited.
pub trait Transform {
    fn schema_definition(&mut self, _definition: &SchemaDefinition) -> Action<SchemaDefinition> {
        Action::Keep
    }

    fn type_definition(&mut self, _definition: &TypeDefinition) -> Action<TypeDefinition> {
        Action::Keep
    }

    fn directive_definition(&mut self, _definition: &DirectiveDefinition) -> Action<DirectiveDefinition> {
        Action::Keep
    }

    fn field_definition(&mut self, _field: &FieldDefinition) -> Action<FieldDefinition> {
        Action::Keep
    }

    fn input_value_definition(&mut self, _input_value: &InputValueDefinition) -> Action<InputValueDefinition> {
        Action::Keep
    }

    fn enum_value_definition(&mut self, _value: &EnumValueDefinition) -> Action<EnumValueDefinition> {
        Action::Keep
    }

    fn directive(&mut self, _directive: &Directive) -> Action<Directive> {
        Action::Keep
    }
}

/// Walk the document depth-first and build a new document out of the decisions of `transform`.
/// The input document is left untouched.
pub fn visit(document: &Document, transform: &mut impl Transform) -> Document {
    let definitions = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::Schema(schema) => {
                let schema = resolve(schema, transform.schema_definition(schema))?;
                Some(Definition::Schema(SchemaDefinition {
                    directives: visit_directives(&schema.directives, transform),
                    ..schema
                }))
            }
            Definition::Type(ty) => {
                let ty = resolve(ty, transform.type_definition(ty))?;
                Some(Definition::Type(visit_type_definition(ty, transform)))
            }
            Definition::Directive(directive) => {
                let directive = resolve(directive, transform.directive_definition(directive))?;
                Some(Definition::Directive(DirectiveDefinition {
                    arguments: visit_input_values(&directive.arguments, transform),
                    ..directive
                }))
            }
        })
        .collect();

    Document { definitions }
}

fn resolve<T: Clone>(node: &T, action: Action<T>) -> Option<T> {
    match action {
        Action::Keep => Some(node.clone()),
        Action::Replace(replacement) => Some(replacement),
        Action::Delete => None,
    }
}

fn visit_type_definition(ty: TypeDefinition, transform: &mut impl Transform) -> TypeDefinition {
    let body = match &ty.body {
        TypeBody::Scalar => TypeBody::Scalar,
        TypeBody::Object(body) => TypeBody::Object(visit_object_body(body, transform)),
        TypeBody::Interface(body) => TypeBody::Interface(visit_object_body(body, transform)),
        TypeBody::Union(members) => TypeBody::Union(members.clone()),
        TypeBody::Enum(values) => TypeBody::Enum(
            values
                .iter()
                .filter_map(|value| {
                    let value = resolve(value, transform.enum_value_definition(value))?;
                    Some(EnumValueDefinition {
                        directives: visit_directives(&value.directives, transform),
                        ..value
                    })
                })
                .collect(),
        ),
        TypeBody::InputObject(fields) => TypeBody::InputObject(visit_input_values(fields, transform)),
    };

    TypeDefinition {
        directives: visit_directives(&ty.directives, transform),
        body,
        ..ty
    }
}

fn visit_object_body(body: &ObjectBody, transform: &mut impl Transform) -> ObjectBody {
    let fields = body
        .fields
        .iter()
        .filter_map(|field| {
            let field = resolve(field, transform.field_definition(field))?;
            Some(FieldDefinition {
                arguments: visit_input_values(&field.arguments, transform),
                directives: visit_directives(&field.directives, transform),
                ..field
            })
        })
        .collect();

    ObjectBody {
        implements: body.implements.clone(),
        fields,
    }
}

fn visit_input_values(values: &[InputValueDefinition], transform: &mut impl Transform) -> Vec<InputValueDefinition> {
    values
        .iter()
        .filter_map(|value| {
            let value = resolve(value, transform.input_value_definition(value))?;
            Some(InputValueDefinition {
                directives: visit_directives(&value.directives, transform),
                ..value
            })
        })
        .collect()
}

fn visit_directives(directives: &[Directive], transform: &mut impl Transform) -> Vec<Directive> {
    directives
        .iter()
        .filter_map(|directive| resolve(directive, transform.directive(directive)))
        .collect()
}

/// Deletes every directive application the predicate matches.
pub struct StripDirectives<F>(pub F);

impl<F> Transform for StripDirectives<F>
where
    F: FnMut(&Directive) -> bool,
{
    fn directive(&mut self, directive: &Directive) -> Action<Directive> {
        if (self.0)(directive) {
            Action::Delete
        } else {
            Action::Keep
        }
    }
}
