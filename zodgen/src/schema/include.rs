//! Include schema generation
//!
//! One optional boolean eager-load toggle per relation field. Entities with
//! no relations get no include schema at all.

use heck::ToUpperCamelCase;

use crate::emit::{ConstDef, Expr, Statement};
use crate::ir::Entity;

/// Generate `{Entity}Include` for entities with at least one relation
pub(crate) fn generate(entity: &Entity) -> Vec<Statement> {
    if !entity.has_relations() {
        return Vec::new();
    }

    let type_name = entity.name.to_upper_camel_case();
    let fields = entity
        .relations()
        .map(|(field, _)| (field.name.clone(), Expr::Boolean.optional()))
        .collect();

    vec![
        Statement::Comment(format!(
            "Define {type_name}Include schema for related records"
        )),
        Statement::Const(ConstDef {
            name: format!("{type_name}Include"),
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
    use crate::ir::ScalarType;

    #[test]
    fn test_one_toggle_per_relation_field() {
        let graph = fixtures::todo_graph();
        let statements = generate(&graph[2]);
        let Some(Statement::Const(def)) = statements.into_iter().nth(1) else {
            panic!("expected const");
        };
        assert_eq!(def.name, "UserInclude");
        assert_eq!(def.init.object_keys().unwrap(), ["todo", "list"]);
        assert_eq!(
            def.init.object_field("todo"),
            Some(&Expr::Boolean.optional())
        );
    }

    #[test]
    fn test_no_relations_no_include() {
        let entity = Entity {
            name: "Plain".to_string(),
            fields: vec![fixtures::scalar("value", ScalarType::String)],
        };
        assert!(generate(&entity).is_empty());
    }
}
