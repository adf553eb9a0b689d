//! Create-input compilation
//!
//! For every entity this produces one `{E}CreateNestedWithout{B}Input` per
//! relation field targeting B, then the standalone `{E}CreateInput`. A
//! nested variant omits the back-reference through which it was reached, and
//! every `create` branch points at the counterpart nested variant of the
//! target through a deferred reference, which is what keeps cyclic entity
//! graphs finite.

use heck::ToUpperCamelCase;

use super::{Context, filter};
use crate::emit::{ConstDef, Expr, Statement};
use crate::error::GeneratorError;
use crate::ir::{Entity, Field, FieldType, Relation};

/// Generate the nested create variants and the standalone create input.
///
/// Nested variants come first: the standalone input's relation fields
/// reference them by name.
pub(crate) fn generate(
    ctx: &mut Context<'_>,
    entity: &Entity,
) -> Result<Vec<Statement>, GeneratorError> {
    let type_name = entity.name.to_upper_camel_case();
    let mut statements = Vec::new();

    for (field, rel) in entity.relations() {
        let nested_name = format!(
            "{type_name}CreateNestedWithout{}Input",
            rel.target.to_upper_camel_case()
        );
        // Two relation fields to one target collide on the variant name;
        // only the first definition is emitted.
        if !ctx.define(&nested_name) {
            continue;
        }
        let props = input_props(ctx, entity, Some(field.name.as_str()))?;
        statements.push(Statement::Const(ConstDef {
            name: nested_name,
            export: true,
            recursive: true,
            init: Expr::Object(props),
        }));
    }

    let props = input_props(ctx, entity, None)?;
    statements.push(Statement::Const(ConstDef {
        name: format!("{type_name}CreateInput"),
        export: true,
        recursive: true,
        init: Expr::Object(props),
    }));

    Ok(statements)
}

/// Build the admitted properties for a create input of `entity`, omitting
/// `skip` (the back-reference of a nested variant).
fn input_props(
    ctx: &Context<'_>,
    entity: &Entity,
    skip: Option<&str>,
) -> Result<Vec<(String, Expr)>, GeneratorError> {
    let mut props = Vec::new();

    for field in &entity.fields {
        if !admitted(entity, field, skip) {
            continue;
        }
        match &field.ty {
            FieldType::Relation(rel) => {
                let target = ctx.require(&entity.name, &field.name, &rel.target)?;
                props.push((
                    field.name.clone(),
                    connect_or_create(entity, field, rel, target)?,
                ));
            }
            FieldType::Scalar(scalar) => {
                let mut value = filter::scalar_value(*scalar);
                // The client need not supply server-defaulted or managed values.
                if field.attrs.has_default || field.attrs.updated_at || field.optional {
                    value = value.optional();
                }
                props.push((field.name.clone(), value));
            }
        }
    }

    Ok(props)
}

/// Field admission for create inputs.
///
/// A field is excluded when it is foreign-key storage (the relation field
/// governs connection), when it is the back-reference omitted by the current
/// nested variant, or when its default — or, for a relation field, any of
/// its foreign-key fields' defaults — derives from the caller's
/// authenticated identity.
fn admitted(entity: &Entity, field: &Field, skip: Option<&str>) -> bool {
    if skip == Some(field.name.as_str()) {
        return false;
    }
    if entity.is_foreign_key(&field.name) {
        return false;
    }
    if field.attrs.default_uses_auth {
        return false;
    }
    if let FieldType::Relation(rel) = &field.ty {
        let fk_uses_auth = rel.fk_fields.iter().any(|fk| {
            entity
                .field(fk)
                .is_some_and(|f| f.attrs.default_uses_auth)
        });
        if fk_uses_auth {
            return false;
        }
    }
    true
}

/// The two-branch connect-or-create union for an admitted relation field.
///
/// Optional exactly when the relation is to-many, or when the to-one field
/// is itself nullable in the model.
fn connect_or_create(
    entity: &Entity,
    field: &Field,
    rel: &Relation,
    target: &Entity,
) -> Result<Expr, GeneratorError> {
    let connect = connect_shape(target)?;
    let nested_name = format!(
        "{}CreateNestedWithout{}Input",
        rel.target.to_upper_camel_case(),
        entity.name.to_upper_camel_case()
    );
    let create = Expr::lazy(nested_name);

    let (connect, create) = if rel.many {
        (connect.array(), create.array())
    } else {
        (connect, create)
    };

    let union = Expr::Union(vec![
        Expr::Object(vec![("connect".to_string(), connect)]),
        Expr::Object(vec![("create".to_string(), create)]),
    ]);

    Ok(if rel.many || field.optional {
        union.optional()
    } else {
        union
    })
}

/// Identify an existing target record: the identity-field combination as one
/// object shape, or'd with each singularly-unique field as an independently
/// sufficient shape.
fn connect_shape(target: &Entity) -> Result<Expr, GeneratorError> {
    let id_fields: Vec<(String, Expr)> = target
        .id_fields()
        .filter_map(|f| {
            f.scalar_type()
                .map(|scalar| (f.name.clone(), filter::scalar_value(scalar)))
        })
        .collect();
    if id_fields.is_empty() {
        return Err(GeneratorError::MissingIdentity(target.name.clone()));
    }

    let mut shape = Expr::Object(id_fields);
    for field in target.unique_fields() {
        let Some(scalar) = field.scalar_type() else {
            continue;
        };
        shape = shape.or(Expr::Object(vec![(
            field.name.clone(),
            filter::scalar_value(scalar),
        )]));
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::fixtures::{self, id_field, relation, scalar};
    use crate::ir::{FieldAttrs, ScalarType};

    fn compile(entities: &[Entity], index: usize) -> Vec<ConstDef> {
        let mut ctx = Context::new(entities);
        generate(&mut ctx, &entities[index])
            .unwrap()
            .into_iter()
            .map(|statement| match statement {
                Statement::Const(def) => def,
                other => panic!("unexpected statement: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_nested_variants_precede_standalone_input() {
        let graph = fixtures::todo_graph();
        let names: Vec<String> = compile(&graph, 0).into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            [
                "ListCreateNestedWithoutUserInput",
                "ListCreateNestedWithoutTodoInput",
                "ListCreateInput",
            ]
        );
    }

    #[test]
    fn test_nested_variant_omits_back_reference() {
        let graph = fixtures::todo_graph();
        let defs = compile(&graph, 0);
        let without_todo = &defs[1];
        let keys = without_todo.init.object_keys().unwrap();
        assert!(keys.contains(&"title"));
        assert!(keys.contains(&"private"));
        assert!(keys.contains(&"createdAt"));
        assert!(keys.contains(&"updatedAt"));
        assert!(!keys.contains(&"todos"));

        // The standalone input keeps the relation the variant omitted.
        let standalone = &defs[2];
        assert!(standalone.init.object_keys().unwrap().contains(&"todos"));
    }

    #[test]
    fn test_foreign_key_and_auth_fields_excluded() {
        let graph = fixtures::todo_graph();
        for def in compile(&graph, 1) {
            let keys = def.init.object_keys().unwrap();
            assert!(!keys.contains(&"ownerId"), "{} leaks ownerId", def.name);
            assert!(!keys.contains(&"listId"), "{} leaks listId", def.name);
            // owner's foreign key defaults from the caller's identity.
            assert!(!keys.contains(&"owner"), "{} leaks owner", def.name);
        }
    }

    #[test]
    fn test_to_many_relation_is_optional_connect_or_create() {
        let graph = fixtures::todo_graph();
        let defs = compile(&graph, 0);
        let standalone = &defs[2];
        assert_eq!(
            standalone.init.object_field("todos"),
            Some(
                &Expr::Union(vec![
                    Expr::Object(vec![(
                        "connect".to_string(),
                        Expr::Object(vec![("id".to_string(), Expr::String)]).array(),
                    )]),
                    Expr::Object(vec![(
                        "create".to_string(),
                        Expr::lazy("TodoCreateNestedWithoutListInput").array(),
                    )]),
                ])
                .optional()
            )
        );
    }

    #[test]
    fn test_to_one_relation_is_required() {
        let graph = fixtures::todo_graph();
        let defs = compile(&graph, 1);
        let standalone = defs.last().unwrap();
        let list = standalone.init.object_field("list").unwrap();
        // No .optional() wrapper: a required to-one relation.
        assert!(matches!(list, Expr::Union(_)));
    }

    #[test]
    fn test_nullable_to_one_relation_is_optional() {
        let profile = Entity {
            name: "Profile".to_string(),
            fields: vec![id_field("id")],
        };
        let account = Entity {
            name: "Account".to_string(),
            fields: vec![
                id_field("id"),
                Field {
                    name: "profile".to_string(),
                    ty: FieldType::Relation(Relation {
                        target: "Profile".to_string(),
                        ..Default::default()
                    }),
                    optional: true,
                    ..Default::default()
                },
            ],
        };
        let graph = [profile, account];
        let defs = compile(&graph, 1);
        let standalone = defs.last().unwrap();
        assert!(matches!(
            standalone.init.object_field("profile"),
            Some(Expr::Optional(_))
        ));
    }

    #[test]
    fn test_connect_accepts_each_unique_field_independently() {
        let team = Entity {
            name: "Team".to_string(),
            fields: vec![
                id_field("id"),
                Field {
                    name: "slug".to_string(),
                    attrs: FieldAttrs {
                        unique: true,
                        ..Default::default()
                    },
                    ..Default::default()
                },
                Field {
                    name: "number".to_string(),
                    ty: FieldType::Scalar(ScalarType::Int),
                    attrs: FieldAttrs {
                        unique: true,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            ],
        };
        let member = Entity {
            name: "Member".to_string(),
            fields: vec![
                id_field("id"),
                relation(
                    "team",
                    Relation {
                        target: "Team".to_string(),
                        fk_fields: vec!["teamId".to_string()],
                        references: vec!["id".to_string()],
                        ..Default::default()
                    },
                ),
                scalar("teamId", ScalarType::String),
            ],
        };
        let graph = [team, member];
        let defs = compile(&graph, 1);
        let standalone = defs.last().unwrap();
        let team_prop = standalone.init.object_field("team").unwrap();
        let Expr::Union(branches) = team_prop else {
            panic!("expected connect-or-create union, got {team_prop:?}");
        };
        assert_eq!(
            branches[0].object_field("connect"),
            Some(
                &Expr::Object(vec![("id".to_string(), Expr::String)])
                    .or(Expr::Object(vec![("slug".to_string(), Expr::String)]))
                    .or(Expr::Object(vec![("number".to_string(), Expr::Number)]))
            )
        );
    }

    #[test]
    fn test_scalar_optionality_rules() {
        let graph = fixtures::todo_graph();
        let defs = compile(&graph, 2);
        let standalone = defs.last().unwrap();
        // Defaulted and model-optional fields relax; plain ones stay required.
        assert_eq!(
            standalone.init.object_field("id"),
            Some(&Expr::String.optional())
        );
        assert_eq!(
            standalone.init.object_field("email"),
            Some(&Expr::String.optional())
        );
        assert_eq!(
            standalone.init.object_field("password"),
            Some(&Expr::String)
        );
    }

    #[test]
    fn test_duplicate_target_variants_collapse() {
        let user = Entity {
            name: "User".to_string(),
            fields: vec![id_field("id")],
        };
        let review = Entity {
            name: "Review".to_string(),
            fields: vec![
                id_field("id"),
                relation(
                    "author",
                    Relation {
                        target: "User".to_string(),
                        ..Default::default()
                    },
                ),
                relation(
                    "moderator",
                    Relation {
                        target: "User".to_string(),
                        ..Default::default()
                    },
                ),
            ],
        };
        let graph = [user, review];
        let names: Vec<String> = compile(&graph, 1).into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            ["ReviewCreateNestedWithoutUserInput", "ReviewCreateInput"]
        );
    }
}
