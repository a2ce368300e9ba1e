pub mod request_assembler;
pub mod request_builder;
