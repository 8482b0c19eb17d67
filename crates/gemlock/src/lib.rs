//! Interpreter for Bundler `Gemfile.lock` files.
//!
//! This crate provides:
//! - A tolerant, indentation-driven interpreter that turns lockfile text into
//!   a tree of nested [`Node`]s
//! - Inference of paths, versions and git revisions from line values
//! - Blocking and async loaders with an explicit [`LockfileLocation`]
//! - A typed [`Lockfile`] view over the well-known sections

mod classify;
mod error;
mod interpret;
mod sections;
mod source;
mod tree;

pub use classify::classify_value;
pub use error::LockfileError;
pub use interpret::{
    interpret, interpret_bytes, missing_sections, StructuralWarning, BUNDLED_WITH,
    CANONICAL_SECTIONS,
};
pub use sections::{Dependency, Lockfile, Requirement, Spec, SOURCE_SECTIONS};
pub use source::{parse, parse_sync, LockfileLocation, DEFAULT_LOCKFILE_NAME};
pub use tree::{Entry, Leaf, Node};
