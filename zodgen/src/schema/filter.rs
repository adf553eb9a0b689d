//! Filter schema synthesis
//!
//! Generates:
//! - The fixed primitive filter catalog (StringFilter, BooleanFilter,
//!   DateTimeFilter, NumberFilter, notNullFilter)
//! - Per-entity list/singular relation filter types
//!
//! and provides the scalar value/filter lookups shared by the where-input
//! and update-input compilers.

use heck::ToUpperCamelCase;
use once_cell::sync::Lazy;

use super::Context;
use crate::emit::{ConstDef, Expr, Statement};
use crate::ir::{Entity, ScalarType};

/// Operator keys of the string filter shape
const STRING_OPS: &[&str] = &[
    "equals",
    "in",
    "notIn",
    "lt",
    "lte",
    "gt",
    "gte",
    "contains",
    "startsWith",
    "endsWith",
    "not",
];

/// Operator keys of the ordered-comparison filter shapes (date, number)
const COMPARE_OPS: &[&str] = &[
    "equals", "in", "notIn", "lt", "lte", "gt", "gte", "not",
];

/// The fixed primitive filter catalog, emitted at the top of every output
static CATALOG: Lazy<Vec<Statement>> = Lazy::new(|| {
    vec![
        plain_const("StringFilter", filter_object(&Expr::String, STRING_OPS).optional()),
        plain_const(
            "BooleanFilter",
            filter_object(&Expr::Boolean, &["equals", "not"]).optional(),
        ),
        plain_const(
            "DateTimeFilter",
            filter_object(&Expr::date_or_string(), COMPARE_OPS).optional(),
        ),
        plain_const("NumberFilter", filter_object(&Expr::Number, COMPARE_OPS).optional()),
        // Recognizes exactly `{ not: null }`: lets a nullable field be
        // filtered by "is not null" inside composite unions.
        plain_const(
            "notNullFilter",
            Expr::Object(vec![("not".to_string(), Expr::Null)]),
        ),
    ]
});

/// The primitive filter statements in catalog order
pub(crate) fn primitive_filters() -> Vec<Statement> {
    CATALOG.clone()
}

/// Base value expression for a scalar kind
pub(crate) fn scalar_value(scalar: ScalarType) -> Expr {
    match scalar {
        ScalarType::String => Expr::String,
        ScalarType::Boolean => Expr::Boolean,
        ScalarType::DateTime => Expr::date_or_string(),
        ScalarType::Int | ScalarType::Float => Expr::Number,
    }
}

/// Catalog filter name for a scalar kind
pub(crate) fn scalar_filter(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::String => "StringFilter",
        ScalarType::Boolean => "BooleanFilter",
        ScalarType::DateTime => "DateTimeFilter",
        ScalarType::Int | ScalarType::Float => "NumberFilter",
    }
}

/// The value-or-filter union used for scalar fields in where and update
/// inputs.
///
/// With `nullable` set (where-input position for a model-nullable field) the
/// union also accepts the not-null filter and the whole union is marked
/// nullable.
pub(crate) fn value_or_filter(scalar: ScalarType, nullable: bool) -> Expr {
    let mut parts = vec![scalar_value(scalar), Expr::ident(scalar_filter(scalar))];
    if nullable {
        parts.push(Expr::ident("notNullFilter"));
    }
    let union = Expr::Union(parts);
    let union = if nullable { union.nullable() } else { union };
    union.optional()
}

/// Synthesize the list and singular relation filters for `entity`.
///
/// Each filter is defined at most once per run, tracked through the context
/// seen-set; repeat calls emit nothing, regardless of traversal order.
pub(crate) fn relation_filters(ctx: &mut Context<'_>, entity: &Entity) -> Vec<Statement> {
    let type_name = entity.name.to_upper_camel_case();
    let where_name = format!("{type_name}WhereInput");
    let mut statements = Vec::new();

    let list_name = format!("{type_name}ListRelationFilter");
    if ctx.define(&list_name) {
        statements.push(Statement::Comment(format!(
            "Define {list_name} for use in where input"
        )));
        statements.push(plain_const(
            &list_name,
            quantified_object(&where_name, &["every", "some", "none"]).optional(),
        ));
    }

    let singular_name = format!("{type_name}RelationFilter");
    if ctx.define(&singular_name) {
        statements.push(plain_const(
            &singular_name,
            quantified_object(&where_name, &["is", "isNot"]).optional(),
        ));
    }

    statements
}

/// An object of optional operator keys over one value expression
fn filter_object(value: &Expr, keys: &[&str]) -> Expr {
    let fields = keys
        .iter()
        .map(|key| {
            let operand = match *key {
                "in" | "notIn" => value.clone().array(),
                _ => value.clone(),
            };
            (key.to_string(), operand.optional())
        })
        .collect();
    Expr::Object(fields)
}

/// An object of optional lazy where-input references, one per quantifier key
fn quantified_object(where_name: &str, keys: &[&str]) -> Expr {
    let fields = keys
        .iter()
        .map(|key| (key.to_string(), Expr::lazy(where_name).optional()))
        .collect();
    Expr::Object(fields)
}

fn plain_const(name: &str, init: Expr) -> Statement {
    Statement::Const(ConstDef {
        name: name.to_string(),
        export: false,
        recursive: false,
        init,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::fixtures;

    #[test]
    fn test_catalog_order_and_names() {
        let statements = primitive_filters();
        let names: Vec<&str> = statements.iter().filter_map(Statement::name).collect();
        assert_eq!(
            names,
            [
                "StringFilter",
                "BooleanFilter",
                "DateTimeFilter",
                "NumberFilter",
                "notNullFilter"
            ]
        );
    }

    #[test]
    fn test_string_filter_shape() {
        let statements = primitive_filters();
        let Statement::Const(def) = &statements[0] else {
            panic!("expected const");
        };
        let keys = def.init.object_keys().unwrap();
        assert_eq!(keys, STRING_OPS);
        assert_eq!(
            def.init.object_field("in"),
            Some(&Expr::String.array().optional())
        );
        assert_eq!(def.init.object_field("contains"), Some(&Expr::String.optional()));
    }

    #[test]
    fn test_not_null_filter_recognizes_only_null() {
        let statements = primitive_filters();
        let Statement::Const(def) = &statements[4] else {
            panic!("expected const");
        };
        assert_eq!(
            def.init,
            Expr::Object(vec![("not".to_string(), Expr::Null)])
        );
    }

    #[test]
    fn test_number_filter_is_numeric() {
        let statements = primitive_filters();
        let Statement::Const(def) = &statements[3] else {
            panic!("expected const");
        };
        assert_eq!(def.init.object_keys().unwrap(), COMPARE_OPS);
        assert_eq!(def.init.object_field("lt"), Some(&Expr::Number.optional()));
    }

    #[test]
    fn test_value_or_filter_nullable_wrapping() {
        let expr = value_or_filter(ScalarType::DateTime, true);
        assert_eq!(
            expr,
            Expr::Union(vec![
                Expr::date_or_string(),
                Expr::ident("DateTimeFilter"),
                Expr::ident("notNullFilter"),
            ])
            .nullable()
            .optional()
        );

        let expr = value_or_filter(ScalarType::String, false);
        assert_eq!(
            expr,
            Expr::Union(vec![Expr::String, Expr::ident("StringFilter")]).optional()
        );
    }

    #[test]
    fn test_relation_filters_shapes() {
        let graph = fixtures::todo_graph();
        let mut ctx = Context::new(&graph);
        let statements = relation_filters(&mut ctx, &graph[0]);
        assert_eq!(
            statements.iter().filter_map(Statement::name).collect::<Vec<_>>(),
            ["ListListRelationFilter", "ListRelationFilter"]
        );

        let Statement::Const(list) = &statements[1] else {
            panic!("expected const");
        };
        assert_eq!(list.init.object_keys().unwrap(), ["every", "some", "none"]);
        assert_eq!(
            list.init.object_field("some"),
            Some(&Expr::lazy("ListWhereInput").optional())
        );

        let Statement::Const(singular) = &statements[2] else {
            panic!("expected const");
        };
        assert_eq!(singular.init.object_keys().unwrap(), ["is", "isNot"]);
    }

    #[test]
    fn test_relation_filters_deduplicated_per_run() {
        let graph = fixtures::todo_graph();
        let mut ctx = Context::new(&graph);
        let first = relation_filters(&mut ctx, &graph[0]);
        let second = relation_filters(&mut ctx, &graph[0]);
        assert!(!first.is_empty());
        assert!(second.is_empty());
    }
}
