//! ProcessModel → BPMN 2.0 + DI document pipeline.
//!
//! Stages run in a fixed order: [`graph::build_elements`] emits the typed
//! element list, [`router::route`] derives the sequence flows,
//! [`layout::layout`] assigns coordinates, and [`export::compile`] renders
//! the XML. Every stage is a pure function; state lives for one call.

pub mod export;
pub mod graph;
pub mod layout;
pub mod router;

pub use export::{compile, CompiledBpmn, FALLBACK_BPMN};
pub use graph::{build_elements, Element};
pub use layout::{layout, Position};
pub use router::{route, Flow};
