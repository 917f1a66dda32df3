use super::nodes::*;
use std::fmt::{self, Display, Write};

const INDENT: &str = "    ";

impl Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut definitions = self.definitions.iter().peekable();

        while let Some(definition) = definitions.next() {
            Display::fmt(definition, f)?;

            if definitions.peek().is_some() {
                f.write_char('\n')?;
            }
        }

        Ok(())
    }
}

impl Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Schema(schema) => Display::fmt(schema, f),
            Definition::Type(ty) => Display::fmt(ty, f),
            Definition::Directive(directive) => Display::fmt(directive, f),
        }
    }
}

impl Display for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_description(f, self.description.as_deref(), "")?;

        if self.is_extension {
            f.write_str("extend ")?;
        }

        f.write_str("schema")?;
        write_directives(f, &self.directives)?;

        if !self.root_operations.is_empty() {
            write_block(f, |f| {
                for root in &self.root_operations {
                    writeln!(f, "{INDENT}{}: {}", root.operation, root.named_type)?;
                }
                Ok(())
            })?;
        }

        f.write_char('\n')
    }
}

impl Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_description(f, self.description.as_deref(), "")?;

        if self.is_extension {
            f.write_str("extend ")?;
        }

        let keyword = match self.body {
            TypeBody::Scalar => "scalar",
            TypeBody::Object(_) => "type",
            TypeBody::Interface(_) => "interface",
            TypeBody::Union(_) => "union",
            TypeBody::Enum(_) => "enum",
            TypeBody::InputObject(_) => "input",
        };

        write!(f, "{keyword} {}", self.name)?;

        if !self.implements().is_empty() {
            write!(f, " implements {}", self.implements().join(" & "))?;
        }

        write_directives(f, &self.directives)?;

        match &self.body {
            TypeBody::Scalar => (),
            TypeBody::Object(ObjectBody { fields, .. }) | TypeBody::Interface(ObjectBody { fields, .. }) => {
                if !fields.is_empty() {
                    write_block(f, |f| {
                        for field in fields {
                            write_description(f, field.description.as_deref(), INDENT)?;
                            writeln!(f, "{INDENT}{field}")?;
                        }
                        Ok(())
                    })?;
                }
            }
            TypeBody::Union(members) => {
                if !members.is_empty() {
                    write!(f, " = {}", members.join(" | "))?;
                }
            }
            TypeBody::Enum(values) => {
                if !values.is_empty() {
                    write_block(f, |f| {
                        for value in values {
                            write_description(f, value.description.as_deref(), INDENT)?;
                            writeln!(f, "{INDENT}{value}")?;
                        }
                        Ok(())
                    })?;
                }
            }
            TypeBody::InputObject(fields) => {
                if !fields.is_empty() {
                    write_block(f, |f| {
                        for field in fields {
                            write_description(f, field.description.as_deref(), INDENT)?;
                            writeln!(f, "{INDENT}{field}")?;
                        }
                        Ok(())
                    })?;
                }
            }
        }

        f.write_char('\n')
    }
}

/// Renders the field without its description.
impl Display for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        write_arguments_definition(f, &self.arguments)?;
        write!(f, ": {}", self.ty)?;
        write_directives(f, &self.directives)
    }
}

/// Renders the input value without its description.
impl Display for InputValueDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)?;

        if let Some(default_value) = &self.default_value {
            write!(f, " = {default_value}")?;
        }

        write_directives(f, &self.directives)
    }
}

/// Renders the enum value without its description.
impl Display for EnumValueDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)?;
        write_directives(f, &self.directives)
    }
}

impl Display for DirectiveDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_description(f, self.description.as_deref(), "")?;
        write!(f, "directive @{}", self.name)?;
        write_arguments_definition(f, &self.arguments)?;

        if self.is_repeatable {
            f.write_str(" repeatable")?;
        }

        f.write_str(" on ")?;

        let mut locations = self.locations.iter().peekable();
        while let Some(location) = locations.next() {
            f.write_str(location.as_str())?;

            if locations.peek().is_some() {
                f.write_str(" | ")?;
            }
        }

        f.write_char('\n')
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;

        if self.arguments.is_empty() {
            return Ok(());
        }

        f.write_char('(')?;

        let mut arguments = self.arguments.iter().peekable();
        while let Some(argument) = arguments.next() {
            write!(f, "{}: {}", argument.name, argument.value)?;

            if arguments.peek().is_some() {
                f.write_str(", ")?;
            }
        }

        f.write_char(')')
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => f.write_str(name),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(n) => Display::fmt(n, f),
            // Debug keeps the fractional part, so the value parses back as a float.
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write_quoted(f, s),
            Value::Boolean(true) => f.write_str("true"),
            Value::Boolean(false) => f.write_str("false"),
            Value::Enum(name) => f.write_str(name),
            Value::List(items) => {
                f.write_char('[')?;

                let mut items = items.iter().peekable();
                while let Some(item) = items.next() {
                    Display::fmt(item, f)?;

                    if items.peek().is_some() {
                        f.write_str(", ")?;
                    }
                }

                f.write_char(']')
            }
            Value::Object(fields) => {
                f.write_char('{')?;

                let mut fields = fields.iter().peekable();
                while let Some((name, value)) = fields.next() {
                    write!(f, "{name}: {value}")?;

                    if fields.peek().is_some() {
                        f.write_str(", ")?;
                    }
                }

                f.write_char('}')
            }
        }
    }
}

pub(crate) fn write_quoted(f: &mut impl Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '\r' => f.write_str("\\r"),
            '\n' => f.write_str("\\n"),
            '\t' => f.write_str("\\t"),
            '\\' => f.write_str("\\\\"),
            '"' => f.write_str("\\\""),
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32),
            c => f.write_char(c),
        }?
    }
    f.write_char('"')
}

fn write_block(
    f: &mut fmt::Formatter<'_>,
    inner: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    f.write_str(" {\n")?;
    inner(f)?;
    f.write_char('}')
}

fn write_directives(f: &mut fmt::Formatter<'_>, directives: &[Directive]) -> fmt::Result {
    for directive in directives {
        write!(f, " {directive}")?;
    }
    Ok(())
}

fn write_arguments_definition(f: &mut fmt::Formatter<'_>, arguments: &[InputValueDefinition]) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }

    f.write_char('(')?;

    let mut arguments = arguments.iter().peekable();
    while let Some(argument) = arguments.next() {
        if let Some(description) = &argument.description {
            write_quoted(f, description)?;
            f.write_char(' ')?;
        }

        Display::fmt(argument, f)?;

        if arguments.peek().is_some() {
            f.write_str(", ")?;
        }
    }

    f.write_char(')')
}

/// Descriptions render as block strings when the block string reads back to the exact same
/// text, and as quoted strings otherwise.
fn write_description(f: &mut fmt::Formatter<'_>, description: Option<&str>, indent: &str) -> fmt::Result {
    let Some(description) = description else {
        return Ok(());
    };

    if !renders_as_block_string(description) {
        f.write_str(indent)?;
        write_quoted(f, description)?;
        return f.write_char('\n');
    }

    writeln!(f, r#"{indent}""""#)?;

    for line in description.split('\n') {
        if line.is_empty() {
            f.write_char('\n')?;
        } else {
            writeln!(f, "{indent}{line}")?;
        }
    }

    writeln!(f, r#"{indent}""""#)
}

fn renders_as_block_string(description: &str) -> bool {
    let is_blank = |line: &str| line.chars().all(|c| c == ' ' || c == '\t');
    let lines = description.split('\n').collect::<Vec<_>>();

    lines.len() > 1
        && !description.contains(r#"""""#)
        && !description.chars().any(|c| c.is_control() && c != '\n' && c != '\t')
        && lines.first().is_some_and(|line| !is_blank(line))
        && lines.last().is_some_and(|line| !is_blank(line))
        && lines
            .iter()
            .any(|line| !is_blank(line) && !line.starts_with([' ', '\t']))
}
