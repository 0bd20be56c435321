pub use crate::errors::{print_error, ChromaError};

pub mod classify;
pub mod engine;
pub mod errors;
pub mod formats;
pub mod hooks;
pub mod registry;
pub mod render;
pub mod syntax;
pub mod theme;

pub use engine::{RenderContext, RenderOptions};
pub use syntax::{parse, Node, NodeKind};
