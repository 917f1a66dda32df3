use std::fmt;

/// The selection of fields in the `fields` argument of `@key`, `@requires` and `@provides`, e.g.
/// `"id organization { id }"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSet(Vec<FieldSelection>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub field: String,
    pub subselection: FieldSet,
}

impl FieldSet {
    /// Parse a field set. Only bare field names and nested selections are accepted.
    pub fn parse(fields: &str) -> Result<FieldSet, String> {
        use cynic_parser::executable as ast;

        let document = format!("{{ {fields} }}");
        let parsed = cynic_parser::parse_executable_document(&document)
            .map_err(|err| format!("could not parse {fields:?} as a selection set: {err}"))?;

        let mut operations = parsed.operations();
        let (Some(operation), None) = (operations.next(), operations.next()) else {
            return Err(format!("{fields:?} is not a single selection set"));
        };

        if parsed.fragments().next().is_some() {
            return Err(format!("{fields:?} is not a single selection set"));
        }

        fn build_selection_set(selections: ast::Iter<'_, ast::Selection<'_>>) -> Result<FieldSet, String> {
            selections
                .map(|selection| match selection {
                    ast::Selection::Field(item) => {
                        if item.alias().is_some() {
                            return Err(format!("aliases are not allowed (on `{}`)", item.name()));
                        }

                        if item.arguments().next().is_some() {
                            return Err(format!("arguments are not allowed (on `{}`)", item.name()));
                        }

                        if item.directives().next().is_some() {
                            return Err(format!("directives are not allowed (on `{}`)", item.name()));
                        }

                        Ok(FieldSelection {
                            field: item.name().to_owned(),
                            subselection: build_selection_set(item.selection_set())?,
                        })
                    }
                    ast::Selection::InlineFragment(_) => Err("inline fragments are not allowed".to_owned()),
                    ast::Selection::FragmentSpread(_) => Err("fragment spreads are not allowed".to_owned()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldSet)
        }

        let field_set = build_selection_set(operation.selection_set())?;

        if field_set.is_empty() {
            return Err("the selection set is empty".to_owned());
        }

        Ok(field_set)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn selections(&self) -> &[FieldSelection] {
        &self.0
    }

    /// Names of the top-level fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|selection| selection.field.as_str())
    }

    /// Every path from the top-level to a leaf selection, in selection order.
    pub fn paths(&self) -> Vec<Vec<&str>> {
        let mut paths = Vec::new();

        for selection in &self.0 {
            if selection.subselection.is_empty() {
                paths.push(vec![selection.field.as_str()]);
                continue;
            }

            for subpath in selection.subselection.paths() {
                let mut path = Vec::with_capacity(subpath.len() + 1);
                path.push(selection.field.as_str());
                path.extend(subpath);
                paths.push(path);
            }
        }

        paths
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut selections = self.0.iter().peekable();

        while let Some(selection) = selections.next() {
            f.write_str(&selection.field)?;

            if !selection.subselection.is_empty() {
                write!(f, " {{ {} }}", selection.subselection)?;
            }

            if selections.peek().is_some() {
                f.write_str(" ")?;
            }
        }

        Ok(())
    }
}
