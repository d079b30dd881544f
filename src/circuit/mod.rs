//! Circuit graph representation and validation.
//!
//! The [`Circuit`] struct holds all components, nodes, and their connections
//! in a form suitable for simulation. Circuits are built programmatically:
//! node names are resolved on first use and ground is `"0"` or `"gnd"`.

mod graph;
mod types;
mod validate;

pub use graph::{is_ground_name, Circuit};
pub use types::*;
pub use validate::validate_circuit;
