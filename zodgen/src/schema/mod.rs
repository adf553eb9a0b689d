//! Schema compilation
//!
//! One deterministic, synchronous pass over the entity graph:
//! - the fixed primitive filter catalog,
//! - list/singular relation filters for every entity,
//! - per entity: where-input, include, nested create inputs, create input,
//!   update input, and the three operation argument schemas,
//! - the consolidated registry and the trailing prompt export.
//!
//! All cross-references between generated schemas are deferred (emitted as
//! `z.lazy` or bare identifiers), so construction order across entities is
//! irrelevant and cyclic graphs terminate.

mod args;
mod create;
mod filter;
mod include;
mod update;
mod where_input;

use std::collections::HashSet;

use crate::emit::{SourceFile, Statement};
use crate::error::GeneratorError;
use crate::ir::Entity;

/// Compiler options supplied by the host
#[derive(Debug, Clone)]
pub struct Options {
    /// File identifier handed to the emission layer
    pub file_name: String,

    /// Opaque instructional prompt copied verbatim into the trailing
    /// `systemPrompt` export; host configuration, never computed here
    pub system_prompt: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            file_name: "crud-zod.ts".to_string(),
            system_prompt: String::new(),
        }
    }
}

/// Per-run compiler context.
///
/// Owns the entity lookup and the seen-set that keeps duplicate definitions
/// out of one output. Built fresh for every [`generate`] call; nothing
/// survives a run.
pub(crate) struct Context<'a> {
    entities: &'a [Entity],
    defined: HashSet<String>,
}

impl<'a> Context<'a> {
    fn new(entities: &'a [Entity]) -> Context<'a> {
        Context {
            entities,
            defined: HashSet::new(),
        }
    }

    /// Look up an entity by name
    pub(crate) fn entity(&self, name: &str) -> Option<&'a Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Look up the target of a relation field, failing on a dangling reference
    pub(crate) fn require(
        &self,
        entity: &str,
        field: &str,
        target: &str,
    ) -> Result<&'a Entity, GeneratorError> {
        self.entity(target).ok_or_else(|| GeneratorError::UnknownEntity {
            entity: entity.to_string(),
            field: field.to_string(),
            target: target.to_string(),
        })
    }

    /// Claim a statement name for this run. Returns true the first time;
    /// repeat claims mean the definition was already emitted.
    pub(crate) fn define(&mut self, name: &str) -> bool {
        self.defined.insert(name.to_string())
    }
}

/// Compile the entity graph into the ordered statements of one output file.
///
/// Fails without emitting anything if the graph is malformed; a run either
/// produces one complete, self-consistent file or none.
pub fn generate(entities: &[Entity], options: &Options) -> Result<SourceFile, GeneratorError> {
    validate(entities)?;

    let mut ctx = Context::new(entities);
    let mut file = SourceFile::new(options.file_name.as_str());

    file.push(Statement::Import {
        names: vec!["z".to_string()],
        from: "zod".to_string(),
    });

    file.push(Statement::Comment(
        "Define schemas for basic field filters".to_string(),
    ));
    file.extend(filter::primitive_filters());

    for entity in entities {
        file.extend(filter::relation_filters(&mut ctx, entity));
    }

    for (index, entity) in entities.iter().enumerate() {
        // The first entity's where input stays required at the top level.
        let top_level_optional = index != 0;
        file.extend(where_input::generate(entity, top_level_optional));
        file.extend(include::generate(entity));
        file.extend(create::generate(&mut ctx, entity)?);
        file.extend(update::generate(entity));
        file.extend(args::find_many(entity));
        file.extend(args::create(entity));
        file.extend(args::update(entity));
    }

    file.extend(args::registry(entities));
    file.extend(args::system_prompt(&options.system_prompt));

    Ok(file)
}

/// Whole-graph validation, run before any statement is built
fn validate(entities: &[Entity]) -> Result<(), GeneratorError> {
    let mut names = HashSet::new();
    for entity in entities {
        if !names.insert(entity.name.as_str()) {
            return Err(GeneratorError::DuplicateEntity(entity.name.clone()));
        }
    }

    for entity in entities {
        for (field, rel) in entity.relations() {
            let target = entities
                .iter()
                .find(|e| e.name == rel.target)
                .ok_or_else(|| GeneratorError::UnknownEntity {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                    target: rel.target.clone(),
                })?;
            // Every relation needs a connect shape for the target.
            if target.id_fields().next().is_none() {
                return Err(GeneratorError::MissingIdentity(target.name.clone()));
            }
        }
    }

    Ok(())
}
