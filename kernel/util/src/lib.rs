pub mod anyhow;
pub mod parser;
