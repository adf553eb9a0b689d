//! Operation assembly and the consolidated registry
//!
//! Wraps the per-entity schemas into `findMany` / `create` / `update`
//! argument shapes, then builds the registry keyed by lower-cased entity
//! name — the sole externally consumed artifact of the compiler besides the
//! registry's type-level shape.

use heck::ToUpperCamelCase;

use crate::emit::{ConstDef, Expr, RegistryDef, Statement};
use crate::ir::Entity;

/// Generate `{Entity}FindManyArgsSchema` and its inferred type
pub(crate) fn find_many(entity: &Entity) -> Vec<Statement> {
    let type_name = entity.name.to_upper_camel_case();

    let mut fields = vec![(
        "where".to_string(),
        Expr::ident(format!("{type_name}WhereInput")).optional(),
    )];
    if entity.has_relations() {
        fields.push((
            "include".to_string(),
            Expr::ident(format!("{type_name}Include")).optional(),
        ));
    }

    vec![
        Statement::Comment(format!(
            "Define the main {type_name}FindManyArgs schema with where and include"
        )),
        Statement::Const(ConstDef {
            name: format!("{type_name}FindManyArgsSchema"),
            export: true,
            recursive: false,
            init: Expr::Object(fields).describe(format!(
                "Prisma client API `findMany` function args for {type_name} model"
            )),
        }),
        Statement::InferType {
            name: format!("{type_name}FindManyArgsType"),
            schema: format!("{type_name}FindManyArgsSchema"),
        },
    ]
}

/// Generate `{Entity}CreateArgsSchema` and its inferred type
pub(crate) fn create(entity: &Entity) -> Vec<Statement> {
    let type_name = entity.name.to_upper_camel_case();

    vec![
        Statement::Comment(format!("Schema for the {type_name}CreateArgs")),
        Statement::Const(ConstDef {
            name: format!("{type_name}CreateArgsSchema"),
            export: true,
            recursive: false,
            init: Expr::Object(vec![(
                "data".to_string(),
                Expr::ident(format!("{type_name}CreateInput")),
            )])
            .describe(format!(
                "Prisma client API `create` function args for {type_name} model"
            )),
        }),
        Statement::InferType {
            name: format!("{type_name}CreateArgsSchemaType"),
            schema: format!("{type_name}CreateArgsSchema"),
        },
    ]
}

/// Generate `{Entity}UpdateArgsSchema` and its inferred type.
///
/// `where` carries no `.optional()` at the use site: update targets at least
/// one record, so its effective optionality is exactly the where input's own.
pub(crate) fn update(entity: &Entity) -> Vec<Statement> {
    let type_name = entity.name.to_upper_camel_case();

    vec![
        Statement::Comment(format!(
            "Schema for the {type_name}UpdateArgs with data and where"
        )),
        Statement::Const(ConstDef {
            name: format!("{type_name}UpdateArgsSchema"),
            export: true,
            recursive: false,
            init: Expr::Object(vec![
                (
                    "data".to_string(),
                    Expr::ident(format!("{type_name}UpdateInputSchema")),
                ),
                (
                    "where".to_string(),
                    Expr::ident(format!("{type_name}WhereInput")),
                ),
            ])
            .describe(format!(
                "Prisma client API `update` function args for {type_name} model"
            )),
        }),
        Statement::Comment("Type inference helper".to_string()),
        Statement::InferType {
            name: format!("{type_name}UpdateArgsType"),
            schema: format!("{type_name}UpdateArgsSchema"),
        },
    ]
}

/// Generate the consolidated registry and its type alias
pub(crate) fn registry(entities: &[Entity]) -> Vec<Statement> {
    let entries = entities
        .iter()
        .map(|entity| {
            let type_name = entity.name.to_upper_camel_case();
            (
                entity.name.to_lowercase(),
                vec![
                    (
                        "findMany".to_string(),
                        format!("{type_name}FindManyArgsSchema"),
                    ),
                    ("update".to_string(), format!("{type_name}UpdateArgsSchema")),
                    ("create".to_string(), format!("{type_name}CreateArgsSchema")),
                ],
            )
        })
        .collect();

    vec![
        Statement::Comment("Consolidated schema export for all models".to_string()),
        Statement::Registry(RegistryDef {
            name: "allSchemas".to_string(),
            entries,
        }),
        Statement::Comment("Type for the consolidated schemas".to_string()),
        Statement::TypeOf {
            name: "AllSchemasType".to_string(),
            of: "allSchemas".to_string(),
        },
    ]
}

/// Generate the trailing prompt export
pub(crate) fn system_prompt(prompt: &str) -> Vec<Statement> {
    vec![
        Statement::Comment("System prompt for the AI".to_string()),
        Statement::TemplateConst {
            name: "systemPrompt".to_string(),
            value: prompt.to_string(),
        },
    ]
}
