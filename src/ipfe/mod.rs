pub mod keys;
pub mod scheme;
