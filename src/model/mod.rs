pub mod entity;
pub mod filter;
pub mod project;
pub mod task;
pub mod validate;
