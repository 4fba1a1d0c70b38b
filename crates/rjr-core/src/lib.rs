#![deny(missing_docs)]
#![doc = "Core error surface, four-vector algebra and event input types for the RJR engine."]

pub mod errors;
pub mod event;
pub mod provenance;
pub mod rng;
pub mod vector;

pub use errors::{ErrorInfo, RjrError};
pub use event::EventInput;
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_event_seed, EventRng};
pub use vector::{wrap_phi, FourVector, ThreeVector};
