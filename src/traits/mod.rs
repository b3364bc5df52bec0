//! Trait definitions for GitLab collection operations.
//!
//! Entity types implement the traits they support, encapsulating how each
//! collection is scoped and fetched.

mod list;

pub use list::{List, MergeRequestRef, DEFAULT_PAGE_SIZE};
