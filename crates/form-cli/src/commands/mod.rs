pub mod check;
pub mod config;
pub mod descriptor_schema;
