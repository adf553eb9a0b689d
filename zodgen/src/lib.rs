//! zodgen
//!
//! Compiles an abstract relational entity graph into a single TypeScript file
//! of interdependent Zod validation schemas mirroring the `findMany`,
//! `create`, and `update` argument shapes of a Prisma-style client, plus a
//! consolidated per-entity operation registry.
//!
//! The pipeline is split in two:
//! - [`schema`] decides *what* to build: named statements describing every
//!   filter, where-input, create-input, update-input, and operation schema,
//!   with cross-references deferred so cyclic entity graphs stay finite.
//! - [`emit`] decides *how* to render it: a statement/expression tree with a
//!   deterministic TypeScript printer.

#![deny(warnings)]

mod error;

pub mod emit;
pub mod ir;
pub mod schema;

pub use error::GeneratorError;
pub use schema::{Options, generate};
