//! HTTP transports for the feature server and the analysis service.
//!
//! Both sit behind object-safe traits so the orchestrator can be driven by
//! in-memory doubles in tests.

pub mod analysis;
pub mod client;
pub mod features;
