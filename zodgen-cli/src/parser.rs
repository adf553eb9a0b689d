//! Model definition parsing
//!
//! Parses model definition files into the compiler's entity graph. The
//! syntax is a small Prisma-flavored subset:
//!
//! ```text
//! model List {
//!   id      String  @id @default(uuid())
//!   owner   User    @relation(fields: [ownerId], references: [id])
//!   ownerId String  @default(auth().id)
//!   title   String
//!   private Boolean @default(false)
//!   todos   Todo[]
//! }
//! ```
//!
//! `Type?` marks a nullable field, `Type[]` a list. Recognized attributes:
//! `@id`, `@unique`, `@updatedAt`, `@default(...)` (an expression containing
//! `auth(` marks the default as derived from the caller's identity), and
//! `@relation(fields: [...], references: [...])`.

use std::collections::HashSet;
use std::path::Path;

use zodgen::ir::{Entity, Field, FieldAttrs, FieldType, Relation, ScalarType};

/// A field line before type resolution
#[derive(Debug, Clone)]
struct RawField {
    name: String,
    type_name: String,
    many: bool,
    optional: bool,
    attrs: FieldAttrs,
    fk_fields: Vec<String>,
    references: Vec<String>,
}

/// A model block before type resolution
#[derive(Debug, Clone)]
struct RawModel {
    name: String,
    fields: Vec<RawField>,
}

/// Parse model files and resolve them into the entity graph
pub fn parse_model_files(
    inputs: &[impl AsRef<Path>],
) -> Result<Vec<Entity>, Box<dyn std::error::Error>> {
    let mut models = Vec::new();
    for input in inputs {
        let content = std::fs::read_to_string(input.as_ref())?;
        models.extend(parse_models(&content)?);
    }
    Ok(resolve(models))
}

/// Parse raw model blocks from file content
fn parse_models(content: &str) -> Result<Vec<RawModel>, Box<dyn std::error::Error>> {
    let mut models = Vec::new();
    let mut current: Option<RawModel> = None;

    for line in content.lines() {
        let line = line.trim();

        // Skip blanks and comments
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(rest) = line.strip_prefix("model ") {
            if current.is_some() {
                return Err("nested model block".into());
            }
            let name = rest.split('{').next().unwrap_or("").trim();
            if name.is_empty() {
                return Err(format!("model block without a name: `{line}`").into());
            }
            current = Some(RawModel {
                name: name.to_string(),
                fields: Vec::new(),
            });
            continue;
        }

        if line == "}" {
            match current.take() {
                Some(model) => models.push(model),
                None => return Err("unmatched `}`".into()),
            }
            continue;
        }

        if let Some(model) = current.as_mut() {
            if let Some(field) = parse_field(line) {
                model.fields.push(field);
            }
        }
    }

    if let Some(model) = current {
        return Err(format!("unterminated model block `{}`", model.name).into());
    }

    Ok(models)
}

/// Parse one field line: `name Type[?|[]] [@attr ...]`
fn parse_field(line: &str) -> Option<RawField> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let type_token = parts.next()?;

    // Attribute-only lines (block-level `@@` directives) are not fields
    if name.starts_with('@') {
        return None;
    }

    let (type_name, many, optional) = if let Some(t) = type_token.strip_suffix("[]") {
        (t, true, false)
    } else if let Some(t) = type_token.strip_suffix('?') {
        (t, false, true)
    } else {
        (type_token, false, false)
    };

    // Attribute text starts at the first `@`
    let attr_text = line.find('@').map(|i| &line[i..]).unwrap_or("");

    let mut attrs = FieldAttrs {
        id: attr_text.contains("@id"),
        unique: attr_text.contains("@unique"),
        updated_at: attr_text.contains("@updatedAt"),
        ..Default::default()
    };
    if let Some(default_expr) = extract_parenthesized(attr_text, "@default") {
        attrs.has_default = true;
        attrs.default_uses_auth = default_expr.contains("auth(");
    }

    let mut fk_fields = Vec::new();
    let mut references = Vec::new();
    if let Some(relation_args) = extract_parenthesized(attr_text, "@relation") {
        fk_fields = extract_name_list(&relation_args, "fields");
        references = extract_name_list(&relation_args, "references");
    }

    Some(RawField {
        name: name.to_string(),
        type_name: type_name.to_string(),
        many,
        optional,
        attrs,
        fk_fields,
        references,
    })
}

/// Extract the balanced parenthesized argument after `marker`, e.g.
/// `@default(auth().id)` with marker `@default` yields `auth().id`
fn extract_parenthesized(text: &str, marker: &str) -> Option<String> {
    let start = text.find(marker)?;
    let rest = text[start + marker.len()..].strip_prefix('(')?;

    let mut depth = 1usize;
    let mut out = String::new();
    for c in rest.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(out);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    None
}

/// Extract a bracketed name list, e.g. `fields: [ownerId]` with key `fields`
/// yields `["ownerId"]`
fn extract_name_list(text: &str, key: &str) -> Vec<String> {
    let Some(start) = text.find(key) else {
        return Vec::new();
    };
    let rest = &text[start + key.len()..];
    let Some(open) = rest.find('[') else {
        return Vec::new();
    };
    let Some(close) = rest[open..].find(']') else {
        return Vec::new();
    };
    rest[open + 1..open + close]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolve raw field types against the set of declared model names
fn resolve(models: Vec<RawModel>) -> Vec<Entity> {
    let names: HashSet<String> = models.iter().map(|m| m.name.clone()).collect();

    let mut entities = Vec::new();
    for model in models {
        let mut fields = Vec::new();
        for raw in model.fields {
            let ty = if names.contains(&raw.type_name) {
                FieldType::Relation(Relation {
                    target: raw.type_name,
                    many: raw.many,
                    fk_fields: raw.fk_fields,
                    references: raw.references,
                })
            } else {
                FieldType::Scalar(scalar_type(&raw.type_name, &model.name, &raw.name))
            };
            fields.push(Field {
                name: raw.name,
                ty,
                optional: raw.optional,
                attrs: raw.attrs,
            });
        }
        entities.push(Entity {
            name: model.name,
            fields,
        });
    }
    entities
}

/// Map a model-level type name to a scalar kind.
///
/// Unknown names fall back to String — a lossy default kept for forward
/// compatibility with unmodeled kinds.
fn scalar_type(type_name: &str, model: &str, field: &str) -> ScalarType {
    match type_name {
        "String" => ScalarType::String,
        "Boolean" => ScalarType::Boolean,
        "DateTime" => ScalarType::DateTime,
        "Int" | "BigInt" => ScalarType::Int,
        "Float" | "Decimal" => ScalarType::Float,
        other => {
            eprintln!(
                "warning: unknown type `{other}` on {model}.{field}, treating as String"
            );
            ScalarType::String
        }
    }
}
