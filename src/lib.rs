//! An in-memory beauty salon object graph.
//!
//! Entities live in per-type extents owned by [`salon::Salon`], and every
//! association between them is kept two-sided, bounded and cascade-safe by the
//! primitives in [`links`].

pub mod config;
pub mod error;
pub mod extent;
pub mod links;
pub mod models;
pub mod persist;
pub mod render;
pub mod salon;
pub mod seed;
pub mod validation;

pub use error::{GraphError, Result};
pub use salon::Salon;
