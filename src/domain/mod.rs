pub mod entities;
pub mod errors;
pub mod value_objects;
pub mod workspace;
