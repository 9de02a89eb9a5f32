pub mod habit;
pub mod selection;
