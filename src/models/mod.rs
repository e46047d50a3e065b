pub mod collection;
pub mod project;
