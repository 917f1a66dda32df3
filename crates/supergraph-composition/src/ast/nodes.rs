use serde::Serialize;
use std::fmt;

/// A position in the source text, 1-based. Source positions never take part in structural
/// equality: two nodes parsed from differently formatted text compare equal.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl PartialEq for Location {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Type(type_definition) => Some(type_definition),
            _ => None,
        })
    }

    pub fn directive_definitions(&self) -> impl Iterator<Item = &DirectiveDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Directive(directive_definition) => Some(directive_definition),
            _ => None,
        })
    }

    pub fn schema_definitions(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Schema(schema_definition) => Some(schema_definition),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// A `schema` definition or `extend schema` extension.
    Schema(SchemaDefinition),
    /// A type definition or type extension.
    Type(TypeDefinition),
    Directive(DirectiveDefinition),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub root_operations: Vec<RootOperationType>,
    pub is_extension: bool,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootOperationType {
    pub operation: OperationType,
    pub named_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    /// The conventional name of the root type for this operation.
    pub fn default_type_name(self) -> &'static str {
        match self {
            OperationType::Query => "Query",
            OperationType::Mutation => "Mutation",
            OperationType::Subscription => "Subscription",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    /// `extend type ...` and friends.
    pub is_extension: bool,
    pub body: TypeBody,
    pub location: Location,
}

impl TypeDefinition {
    pub fn kind(&self) -> TypeKind {
        self.body.kind()
    }

    /// Fields of objects and interfaces. Empty for other kinds.
    pub fn fields(&self) -> &[FieldDefinition] {
        match &self.body {
            TypeBody::Object(body) | TypeBody::Interface(body) => &body.fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Interfaces implemented by objects and interfaces. Empty for other kinds.
    pub fn implements(&self) -> &[String] {
        match &self.body {
            TypeBody::Object(body) | TypeBody::Interface(body) => &body.implements,
            _ => &[],
        }
    }

    pub fn directives_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Directive> + 'a {
        self.directives.iter().filter(move |directive| directive.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeBody {
    Scalar,
    Object(ObjectBody),
    Interface(ObjectBody),
    Union(Vec<String>),
    Enum(Vec<EnumValueDefinition>),
    InputObject(Vec<InputValueDefinition>),
}

impl TypeBody {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeBody::Scalar => TypeKind::Scalar,
            TypeBody::Object(_) => TypeKind::Object,
            TypeBody::Interface(_) => TypeKind::Interface,
            TypeBody::Union(_) => TypeKind::Union,
            TypeBody::Enum(_) => TypeKind::Enum,
            TypeBody::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// A body of the same kind with no members.
    pub(crate) fn empty_like(&self) -> TypeBody {
        match self {
            TypeBody::Scalar => TypeBody::Scalar,
            TypeBody::Object(_) => TypeBody::Object(ObjectBody::default()),
            TypeBody::Interface(_) => TypeBody::Interface(ObjectBody::default()),
            TypeBody::Union(_) => TypeBody::Union(Vec::new()),
            TypeBody::Enum(_) => TypeBody::Enum(Vec::new()),
            TypeBody::InputObject(_) => TypeBody::InputObject(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectBody {
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum TypeKind {
    #[strum(serialize = "scalar")]
    Scalar,
    #[strum(serialize = "object")]
    Object,
    #[strum(serialize = "interface")]
    Interface,
    #[strum(serialize = "union")]
    Union,
    #[strum(serialize = "enum")]
    Enum,
    #[strum(serialize = "input object")]
    InputObject,
}

impl TypeKind {
    /// Objects, interfaces and unions.
    pub fn is_composite(self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface | TypeKind::Union)
    }

    pub fn is_input(self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    pub directives: Vec<Directive>,
    pub location: Location,
}

impl FieldDefinition {
    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|argument| argument.name == name)
    }
}

/// Field arguments, input object fields and directive arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDefinition {
    pub value: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub is_repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
    pub location: Location,
}

impl DirectiveDefinition {
    pub fn is_executable(&self) -> bool {
        self.locations.iter().any(|location| location.is_executable())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    /// Locations inside operations, as opposed to type system locations.
    pub fn is_executable(self) -> bool {
        matches!(
            self,
            DirectiveLocation::Query
                | DirectiveLocation::Mutation
                | DirectiveLocation::Subscription
                | DirectiveLocation::Field
                | DirectiveLocation::FragmentDefinition
                | DirectiveLocation::FragmentSpread
                | DirectiveLocation::InlineFragment
                | DirectiveLocation::VariableDefinition
        )
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A directive application: `@name(argument: value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<Argument>,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Directive {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            value,
        });
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

/// A type reference, e.g. `[String!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(String),
    List(Box<Type>),
    NonNull(Box<Type>),
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn non_null(inner: Type) -> Self {
        Type::NonNull(Box::new(inner))
    }

    pub fn list(inner: Type) -> Self {
        Type::List(Box::new(inner))
    }

    /// The innermost named type.
    pub fn name(&self) -> &str {
        match self {
            Type::Named(name) => name,
            Type::List(inner) | Type::NonNull(inner) => inner.name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }

    pub(crate) fn rename(&mut self, from: &str, to: &str) {
        match self {
            Type::Named(name) if name == from => *name = to.to_owned(),
            Type::Named(_) => (),
            Type::List(inner) | Type::NonNull(inner) => inner.rename(from, to),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(boolean) => Some(*boolean),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}
