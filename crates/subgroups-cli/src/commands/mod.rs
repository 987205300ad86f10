pub mod options;
pub mod plan;
pub mod validate;
