pub mod base;
pub mod manager;
pub mod spec;
pub mod tracker;
