pub mod catalog;
pub mod llm;
pub mod observability;
pub mod persistence;
