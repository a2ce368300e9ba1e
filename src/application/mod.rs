pub mod builders;
pub mod parsers;
pub mod services;
pub mod template;
pub mod variables;
