//! Update-input compilation
//!
//! `{Entity}UpdateInputSchema` is a flattened partial patch: scalar fields
//! only, each optional. Relations are not updatable through this shape, and
//! foreign-key storage stays with the relation machinery, so neither
//! appears.

use heck::ToUpperCamelCase;

use super::filter;
use crate::emit::{ConstDef, Expr, Statement};
use crate::ir::Entity;

/// Generate `{Entity}UpdateInputSchema`
pub(crate) fn generate(entity: &Entity) -> Vec<Statement> {
    let type_name = entity.name.to_upper_camel_case();

    let fields = entity
        .fields
        .iter()
        .filter(|field| !entity.is_foreign_key(&field.name))
        .filter_map(|field| {
            let scalar = field.scalar_type()?;
            Some((field.name.clone(), filter::value_or_filter(scalar, false)))
        })
        .collect();

    vec![
        Statement::Comment("Schema for update input data - reusing existing filters".to_string()),
        Statement::Const(ConstDef {
            name: format!("{type_name}UpdateInputSchema"),
            export: true,
            recursive: false,
            init: Expr::Object(fields),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::fixtures;

    fn update_def(index: usize) -> ConstDef {
        let graph = fixtures::todo_graph();
        match generate(&graph[index]).into_iter().nth(1) {
            Some(Statement::Const(def)) => def,
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_scalars_only_all_optional() {
        let def = update_def(1);
        assert_eq!(def.name, "TodoUpdateInputSchema");
        let keys = def.init.object_keys().unwrap();
        assert_eq!(keys, ["id", "createdAt", "updatedAt", "title", "completedAt"]);
        assert_eq!(
            def.init.object_field("title"),
            Some(&Expr::Union(vec![Expr::String, Expr::ident("StringFilter")]).optional())
        );
    }

    #[test]
    fn test_foreign_keys_never_updatable() {
        for index in 0..3 {
            let def = update_def(index);
            let keys = def.init.object_keys().unwrap();
            assert!(!keys.contains(&"ownerId"), "{} leaks ownerId", def.name);
            assert!(!keys.contains(&"listId"), "{} leaks listId", def.name);
        }
    }

    #[test]
    fn test_no_nullable_wrapping_in_update_position() {
        let def = update_def(1);
        // completedAt is nullable in the model but the patch union carries
        // neither the not-null filter nor .nullable().
        assert_eq!(
            def.init.object_field("completedAt"),
            Some(
                &Expr::Union(vec![Expr::date_or_string(), Expr::ident("DateTimeFilter")])
                    .optional()
            )
        );
    }
}
