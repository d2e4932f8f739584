//! The remote suitability analysis: what is sent, what comes back, and the
//! state machine that keeps a single request in flight.

pub mod coordinator;
pub mod payload;
pub mod response;
pub mod selection;
