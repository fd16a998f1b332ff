pub mod employee;
pub mod error;
pub mod llm_config;
pub mod schema;
pub mod summary;
