use crate::{
    ast::Directive,
    diagnostics::{CompositionError, CompositionErrorKind},
};

/// Add `directive` to `merged` unless an identical application is already there. A
/// non-repeatable directive already applied with other arguments is left as is, and the
/// existing application is returned.
pub(crate) fn merge_directive(merged: &mut Vec<Directive>, directive: &Directive, is_repeatable: bool) -> Option<Directive> {
    if merged.contains(directive) {
        return None;
    }

    if !is_repeatable {
        if let Some(existing) = merged.iter().find(|existing| existing.name == directive.name) {
            return Some(existing.clone());
        }
    }

    merged.push(directive.clone());
    None
}

/// `site` is the rendered coordinate of the annotated element, e.g. "`Product.upc`".
pub(crate) fn conflicting_directive_error(site: &str, existing: &Directive, incoming: &Directive) -> CompositionError {
    let mut applications = [existing.to_string(), incoming.to_string()];
    applications.sort();
    let [first, second] = applications;

    CompositionError::new(
        CompositionErrorKind::ConflictingDirective,
        format!(
            "The directive `@{}` is applied to {site} with different arguments: `{first}` and `{second}`.",
            incoming.name
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;

    #[test]
    fn identical_applications_are_deduplicated() {
        let mut merged = vec![Directive::new("tag").with_argument("name", "a".into())];

        assert_eq!(
            merge_directive(&mut merged, &Directive::new("tag").with_argument("name", "a".into()), true),
            None
        );
        assert_eq!(
            merge_directive(&mut merged, &Directive::new("tag").with_argument("name", "b".into()), true),
            None
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn non_repeatable_conflict_keeps_the_first_application() {
        let mut merged = vec![Directive::new("cost").with_argument("weight", Value::Int(1))];

        let existing = merge_directive(
            &mut merged,
            &Directive::new("cost").with_argument("weight", Value::Int(2)),
            false,
        );

        assert_eq!(existing, Some(Directive::new("cost").with_argument("weight", Value::Int(1))));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn conflict_message_does_not_depend_on_order() {
        let a = Directive::new("cost").with_argument("weight", Value::Int(1));
        let b = Directive::new("cost").with_argument("weight", Value::Int(2));

        assert_eq!(
            conflicting_directive_error("`Query.a`", &a, &b).message(),
            conflicting_directive_error("`Query.a`", &b, &a).message(),
        );
        insta::assert_snapshot!(
            conflicting_directive_error("`Query.a`", &a, &b).message(),
            @"The directive `@cost` is applied to `Query.a` with different arguments: `@cost(weight: 1)` and `@cost(weight: 2)`."
        );
    }
}
