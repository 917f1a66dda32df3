use super::nodes::*;
use cynic_parser::{type_system as parser, ConstValue};

/// Malformed SDL.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
}

/// Parse a GraphQL type system document.
pub fn parse(source: &str) -> Result<Document, SyntaxError> {
    let parsed = cynic_parser::parse_type_system_document(source).map_err(|err| SyntaxError {
        message: err.to_string(),
    })?;

    let lines = LineIndex::new(source);
    let definitions = parsed
        .definitions()
        .map(|definition| match definition {
            parser::Definition::Schema(schema) => Definition::Schema(convert_schema_definition(schema, false, &lines)),
            parser::Definition::SchemaExtension(schema) => {
                Definition::Schema(convert_schema_definition(schema, true, &lines))
            }
            parser::Definition::Type(ty) => Definition::Type(convert_type_definition(ty, false, &lines)),
            parser::Definition::TypeExtension(ty) => Definition::Type(convert_type_definition(ty, true, &lines)),
            parser::Definition::Directive(directive) => {
                Definition::Directive(convert_directive_definition(directive, &lines))
            }
        })
        .collect();

    Ok(Document { definitions })
}

/// Byte offsets of line starts, to turn spans into line and column numbers.
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();

        LineIndex { line_starts }
    }

    fn location(&self, span: cynic_parser::Span) -> Location {
        let line = self.line_starts.partition_point(|start| *start <= span.start).max(1);
        let column = span.start - self.line_starts[line - 1] + 1;

        Location { line, column }
    }
}

fn convert_schema_definition(
    schema: parser::SchemaDefinition<'_>,
    is_extension: bool,
    lines: &LineIndex,
) -> SchemaDefinition {
    let root_operations = [
        (OperationType::Query, schema.query_type()),
        (OperationType::Mutation, schema.mutation_type()),
        (OperationType::Subscription, schema.subscription_type()),
    ]
    .into_iter()
    .filter_map(|(operation, root)| {
        root.map(|root| RootOperationType {
            operation,
            named_type: root.named_type().to_owned(),
        })
    })
    .collect();

    SchemaDefinition {
        description: schema.description().map(|description| description.to_cow().into_owned()),
        directives: convert_directives(schema.directives()),
        root_operations,
        is_extension,
        location: lines.location(schema.span()),
    }
}

fn convert_type_definition(ty: parser::TypeDefinition<'_>, is_extension: bool, lines: &LineIndex) -> TypeDefinition {
    let body = match ty {
        parser::TypeDefinition::Scalar(_) => TypeBody::Scalar,
        parser::TypeDefinition::Object(object) => TypeBody::Object(ObjectBody {
            implements: object.implements_interfaces().map(str::to_owned).collect(),
            fields: object.fields().map(|field| convert_field(field, lines)).collect(),
        }),
        parser::TypeDefinition::Interface(interface) => TypeBody::Interface(ObjectBody {
            implements: interface.implements_interfaces().map(str::to_owned).collect(),
            fields: interface.fields().map(|field| convert_field(field, lines)).collect(),
        }),
        parser::TypeDefinition::Union(union) => {
            TypeBody::Union(union.members().map(|member| member.name().to_owned()).collect())
        }
        parser::TypeDefinition::Enum(enm) => TypeBody::Enum(
            enm.values()
                .map(|value| EnumValueDefinition {
                    value: value.value().to_owned(),
                    description: value.description().map(|description| description.to_cow().into_owned()),
                    directives: convert_directives(value.directives()),
                    location: lines.location(value.span()),
                })
                .collect(),
        ),
        parser::TypeDefinition::InputObject(input_object) => TypeBody::InputObject(
            input_object
                .fields()
                .map(|field| convert_input_value(field, lines))
                .collect(),
        ),
    };

    TypeDefinition {
        name: ty.name().to_owned(),
        description: ty.description().map(|description| description.to_cow().into_owned()),
        directives: convert_directives(ty.directives()),
        is_extension,
        body,
        location: lines.location(ty.span()),
    }
}

fn convert_directive_definition(directive: parser::DirectiveDefinition<'_>, lines: &LineIndex) -> DirectiveDefinition {
    DirectiveDefinition {
        name: directive.name().to_owned(),
        description: directive
            .description()
            .map(|description| description.to_cow().into_owned()),
        arguments: directive
            .arguments()
            .map(|argument| convert_input_value(argument, lines))
            .collect(),
        is_repeatable: directive.is_repeatable(),
        locations: directive
            .locations()
            .filter_map(|location| location.as_str().parse().ok())
            .collect(),
        location: lines.location(directive.span()),
    }
}

fn convert_field(field: parser::FieldDefinition<'_>, lines: &LineIndex) -> FieldDefinition {
    FieldDefinition {
        name: field.name().to_owned(),
        description: field.description().map(|description| description.to_cow().into_owned()),
        arguments: field
            .arguments()
            .map(|argument| convert_input_value(argument, lines))
            .collect(),
        ty: convert_type(field.ty()),
        directives: convert_directives(field.directives()),
        location: lines.location(field.span()),
    }
}

fn convert_input_value(input_value: parser::InputValueDefinition<'_>, lines: &LineIndex) -> InputValueDefinition {
    InputValueDefinition {
        name: input_value.name().to_owned(),
        description: input_value
            .description()
            .map(|description| description.to_cow().into_owned()),
        ty: convert_type(input_value.ty()),
        default_value: input_value.default_value().map(convert_value),
        directives: convert_directives(input_value.directives()),
        location: lines.location(input_value.span()),
    }
}

fn convert_type(ty: parser::Type<'_>) -> Type {
    use cynic_parser::common::WrappingType;

    let wrappers = ty.wrappers().collect::<Vec<_>>();

    // Wrappers come outermost first.
    wrappers
        .into_iter()
        .rev()
        .fold(Type::named(ty.name()), |inner, wrapper| match wrapper {
            WrappingType::NonNull => Type::non_null(inner),
            WrappingType::List => Type::list(inner),
        })
}

fn convert_directives<'a>(directives: impl Iterator<Item = parser::Directive<'a>>) -> Vec<Directive> {
    directives
        .map(|directive| Directive {
            name: directive.name().to_owned(),
            arguments: directive
                .arguments()
                .map(|argument| Argument {
                    name: argument.name().to_owned(),
                    value: convert_value(argument.value()),
                })
                .collect(),
        })
        .collect()
}

fn convert_value(value: ConstValue<'_>) -> Value {
    match value {
        ConstValue::Null(_) => Value::Null,
        ConstValue::Int(n) => Value::Int(n.as_i64()),
        ConstValue::Float(n) => Value::Float(n.as_f64()),
        ConstValue::String(s) => Value::String(s.as_str().to_owned()),
        ConstValue::Boolean(b) => Value::Boolean(b.value()),
        ConstValue::Enum(e) => Value::Enum(e.name().to_owned()),
        ConstValue::List(list) => Value::List(list.items().map(convert_value).collect()),
        ConstValue::Object(object) => Value::Object(
            object
                .fields()
                .map(|field| (field.name().to_owned(), convert_value(field.value())))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_are_one_based() {
        let document = parse("scalar A\n\ntype B {\n  id: ID\n}\n").unwrap();
        let Definition::Type(b) = &document.definitions[1] else {
            unreachable!()
        };

        assert_eq!(b.location.line, 3);
        assert_eq!(b.location.column, 1);
        assert_eq!(b.fields()[0].location.line, 4);
        assert_eq!(b.fields()[0].location.column, 3);
    }

    #[test]
    fn wrapping_types() {
        let document = parse("type A { list: [String!]! }").unwrap();
        let Definition::Type(a) = &document.definitions[0] else {
            unreachable!()
        };

        assert_eq!(
            a.fields()[0].ty,
            Type::non_null(Type::list(Type::non_null(Type::named("String"))))
        );
    }

    #[test]
    fn syntax_error() {
        assert!(parse("type A {").is_err());
    }
}
