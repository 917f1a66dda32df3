//! Rendering of a composed schema as supergraph SDL: the schema annotated with the `join`
//! directives telling a router which service resolves which type and field.

use crate::{
    ast::{
        Definition, Directive, DirectiveDefinition, DirectiveLocation, Document, EnumValueDefinition,
        InputValueDefinition, Location, OperationType, RootOperationType, SchemaDefinition, Type, TypeBody,
        TypeDefinition, Value,
    },
    schema::{FederationMetadata, Schema},
    subgraphs::Subgraphs,
};

const CORE_FEATURE: &str = "https://specs.apollo.dev/core/v0.1";
const JOIN_FEATURE: &str = "https://specs.apollo.dev/join/v0.1";

const JOIN_GRAPH: &str = "join__Graph";
const JOIN_FIELD_SET: &str = "join__FieldSet";
const CORE_PURPOSE: &str = "core__Purpose";

pub(crate) fn render_supergraph(schema: &Schema, subgraphs: &Subgraphs) -> String {
    let graphs = GraphEnum::new(subgraphs);

    let mut definitions = vec![Definition::Schema(schema_definition(schema))];
    definitions.extend(supergraph_directive_definitions().into_iter().map(Definition::Directive));
    definitions.push(Definition::Type(core_purpose_enum()));
    definitions.push(Definition::Type(type_definition(JOIN_FIELD_SET, TypeBody::Scalar)));
    definitions.push(Definition::Type(graphs.definition()));
    definitions.extend(schema.directive_definitions().cloned().map(Definition::Directive));
    definitions.extend(
        schema
            .types()
            .map(|definition| Definition::Type(annotate(definition, schema.federation(), &graphs))),
    );

    Document { definitions }.to_string()
}

fn schema_definition(schema: &Schema) -> SchemaDefinition {
    let root_operations = [OperationType::Query, OperationType::Mutation, OperationType::Subscription]
        .into_iter()
        .filter_map(|operation| {
            schema.root_operation_type(operation).map(|root| RootOperationType {
                operation,
                named_type: root.name.clone(),
            })
        })
        .collect();

    SchemaDefinition {
        description: None,
        directives: vec![
            Directive::new("core").with_argument("feature", CORE_FEATURE.into()),
            Directive::new("core")
                .with_argument("feature", JOIN_FEATURE.into())
                .with_argument("for", Value::Enum("EXECUTION".to_owned())),
        ],
        root_operations,
        is_extension: false,
        location: Location::default(),
    }
}

/// Add `@join__owner`, `@join__type` and `@join__field` to objects and interfaces.
fn annotate(definition: &TypeDefinition, federation: &FederationMetadata, graphs: &GraphEnum) -> TypeDefinition {
    let mut definition = definition.clone();

    let Some(metadata) = federation.get_type(&definition.name) else {
        return definition;
    };

    if !matches!(definition.body, TypeBody::Object(_) | TypeBody::Interface(_)) {
        return definition;
    }

    if let Some(owner) = metadata.owner.as_deref().filter(|_| !metadata.keys.is_empty()) {
        definition
            .directives
            .push(Directive::new("join__owner").with_argument("graph", graphs.value(owner)));
    }

    for (service, key) in &metadata.keys {
        definition.directives.push(
            Directive::new("join__type")
                .with_argument("graph", graphs.value(service))
                .with_argument("key", Value::String(key.to_string())),
        );
    }

    let (TypeBody::Object(body) | TypeBody::Interface(body)) = &mut definition.body else {
        return definition;
    };

    for field in &mut body.fields {
        let Some(field_metadata) = metadata.fields.get(&field.name) else {
            continue;
        };

        // Value type fields have no owner: any service defining them resolves them.
        let Some(contribution) = field_metadata
            .owner()
            .or_else(|| field_metadata.contributions.first())
        else {
            continue;
        };

        let mut join_field = Directive::new("join__field").with_argument("graph", graphs.value(&contribution.service));

        if let Some(requires) = &contribution.requires {
            join_field = join_field.with_argument("requires", Value::String(requires.to_string()));
        }

        if let Some(provides) = &contribution.provides {
            join_field = join_field.with_argument("provides", Value::String(provides.to_string()));
        }

        field.directives.push(join_field);
    }

    definition
}

/// The `join__Graph` enum: one value per service, in service name order.
struct GraphEnum {
    graphs: Vec<Graph>,
}

struct Graph {
    service: String,
    url: String,
    value: String,
}

impl GraphEnum {
    fn new(subgraphs: &Subgraphs) -> Self {
        let mut graphs: Vec<Graph> = Vec::with_capacity(subgraphs.len());

        for subgraph in subgraphs.iter_subgraphs_by_name() {
            let base = graph_enum_value(subgraph.name());
            let mut value = base.clone();
            let mut suffix = 1;

            while graphs.iter().any(|graph| graph.value == value) {
                value = format!("{base}_{suffix}");
                suffix += 1;
            }

            graphs.push(Graph {
                service: subgraph.name().to_owned(),
                url: subgraph.url().unwrap_or_default().to_owned(),
                value,
            });
        }

        GraphEnum { graphs }
    }

    fn value(&self, service: &str) -> Value {
        let value = self
            .graphs
            .iter()
            .find(|graph| graph.service == service)
            .map(|graph| graph.value.clone())
            .unwrap_or_else(|| graph_enum_value(service));

        Value::Enum(value)
    }

    fn definition(&self) -> TypeDefinition {
        let values = self
            .graphs
            .iter()
            .map(|graph| EnumValueDefinition {
                value: graph.value.clone(),
                description: None,
                directives: vec![Directive::new("join__graph")
                    .with_argument("name", graph.service.as_str().into())
                    .with_argument("url", graph.url.as_str().into())],
                location: Location::default(),
            })
            .collect();

        type_definition(JOIN_GRAPH, TypeBody::Enum(values))
    }
}

/// Upper case, with everything but ASCII letters and digits replaced by underscores. Names
/// ending like a deduplication suffix (`_2`) get a trailing underscore.
fn graph_enum_value(service: &str) -> String {
    let mut value = service
        .chars()
        .map(|char| {
            if char.is_ascii_alphanumeric() {
                char.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect::<String>();

    if value.starts_with(|char: char| char.is_ascii_digit()) {
        value.insert(0, '_');
    }

    let ends_like_suffix = value
        .rsplit_once('_')
        .is_some_and(|(_, suffix)| !suffix.is_empty() && suffix.chars().all(|char| char.is_ascii_digit()));

    if ends_like_suffix {
        value.push('_');
    }

    value
}

fn supergraph_directive_definitions() -> Vec<DirectiveDefinition> {
    let graph = |ty: Type| argument("graph", ty);
    let join_graph = || Type::named(JOIN_GRAPH);
    let field_set = || Type::named(JOIN_FIELD_SET);
    let string = || Type::named("String");

    vec![
        directive(
            "core",
            vec![
                argument("feature", Type::non_null(string())),
                argument("as", string()),
                argument("for", Type::named(CORE_PURPOSE)),
            ],
            true,
            &[DirectiveLocation::Schema],
        ),
        directive(
            "join__field",
            vec![
                graph(join_graph()),
                argument("requires", field_set()),
                argument("provides", field_set()),
            ],
            false,
            &[DirectiveLocation::FieldDefinition],
        ),
        directive(
            "join__type",
            vec![graph(Type::non_null(join_graph())), argument("key", field_set())],
            true,
            &[DirectiveLocation::Object, DirectiveLocation::Interface],
        ),
        directive(
            "join__owner",
            vec![graph(Type::non_null(join_graph()))],
            false,
            &[DirectiveLocation::Object, DirectiveLocation::Interface],
        ),
        directive(
            "join__graph",
            vec![
                argument("name", Type::non_null(string())),
                argument("url", Type::non_null(string())),
            ],
            false,
            &[DirectiveLocation::EnumValue],
        ),
    ]
}

fn core_purpose_enum() -> TypeDefinition {
    let value = |value: &str, description: &str| EnumValueDefinition {
        value: value.to_owned(),
        description: Some(description.to_owned()),
        directives: Vec::new(),
        location: Location::default(),
    };

    type_definition(
        CORE_PURPOSE,
        TypeBody::Enum(vec![
            value(
                "EXECUTION",
                "`EXECUTION` features provide metadata necessary to for operation execution.",
            ),
            value(
                "SECURITY",
                "`SECURITY` features provide metadata necessary to securely resolve fields.",
            ),
        ]),
    )
}

fn directive(
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

fn argument(name: &str, ty: Type) -> InputValueDefinition {
    InputValueDefinition {
        name: name.to_owned(),
        description: None,
        ty,
        default_value: None,
        directives: Vec::new(),
        location: Location::default(),
    }
}

fn type_definition(name: &str, body: TypeBody) -> TypeDefinition {
    TypeDefinition {
        name: name.to_owned(),
        description: None,
        directives: Vec::new(),
        is_extension: false,
        body,
        location: Location::default(),
    }
}
