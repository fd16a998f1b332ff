pub mod aggregator;
pub mod loader;
pub mod narrator;
pub mod session;
