//! Where-clause compilation
//!
//! Builds `{Entity}WhereInput`: boolean composition over self-references
//! plus one filter entry per model field. Self- and cross-entity references
//! are all deferred, so the mutually recursive where/relation-filter graph
//! never evaluates eagerly.

use heck::ToUpperCamelCase;

use super::filter;
use crate::emit::{ConstDef, Expr, Statement};
use crate::ir::{Entity, FieldType};

/// Generate `{Entity}WhereInput`.
///
/// Every entity's where input except the designated first entity carries a
/// trailing `.optional()` for embedding in operation `where` clauses;
/// `top_level_optional` selects between the two.
pub(crate) fn generate(entity: &Entity, top_level_optional: bool) -> Vec<Statement> {
    let type_name = entity.name.to_upper_camel_case();
    let where_name = format!("{type_name}WhereInput");

    let self_or_array = || {
        Expr::Union(vec![
            Expr::lazy(&where_name),
            Expr::lazy(&where_name).array(),
        ])
        .optional()
    };

    let mut fields = vec![
        ("AND".to_string(), self_or_array()),
        ("OR".to_string(), Expr::lazy(&where_name).array().optional()),
        ("NOT".to_string(), self_or_array()),
    ];

    for field in &entity.fields {
        let entry = match &field.ty {
            FieldType::Relation(rel) => {
                let target = rel.target.to_upper_camel_case();
                if rel.many {
                    Expr::ident(format!("{target}ListRelationFilter"))
                } else {
                    Expr::ident(format!("{target}RelationFilter"))
                }
            }
            FieldType::Scalar(scalar) => filter::value_or_filter(*scalar, field.optional),
        };
        fields.push((field.name.clone(), entry));
    }

    let mut init = Expr::Object(fields);
    if top_level_optional {
        init = init.optional();
    }

    vec![
        Statement::Comment(format!("Define {where_name}")),
        Statement::Const(ConstDef {
            name: where_name,
            export: true,
            recursive: true,
            init,
        }),
    ]
}
