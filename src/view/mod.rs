//! The top-level state machine driving the surface, tracker and analysis
//! coordinator, and the read-only snapshot presentation renders from.

pub mod events;
pub mod orchestrator;
pub mod snapshot;
