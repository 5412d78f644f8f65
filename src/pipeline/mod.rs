pub mod decryptor;
pub mod encryptor;
