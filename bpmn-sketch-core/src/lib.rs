//! Compile extracted business-process models into BPMN 2.0 diagrams.
//!
//! The pipeline is `extract` → [`model`] normalization → [`compile`] →
//! [`validate`]: an extractor turns free text into a [`ProcessModel`], the
//! compiler renders it as a BPMN 2.0 + DI XML document with a deterministic
//! layout, and the validator checks any such document for the required
//! structural constructs. The compiler stages are pure and keep no state
//! across calls, so invocations can run concurrently without coordination.

pub mod compile;
pub mod extract;
pub mod model;
pub mod validate;

pub use compile::{compile, CompiledBpmn};
pub use model::ProcessModel;
pub use validate::{validate, ValidationResult};
