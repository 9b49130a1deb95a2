pub mod file_store;
pub mod lock;
pub mod vault_io;
