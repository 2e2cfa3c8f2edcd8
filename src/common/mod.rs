pub mod context;
pub mod data_lock;
pub mod env;
pub mod error;
pub mod init;
pub mod json_file;
pub mod paths;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
