//! Command implementations that don't need an open repository.

pub mod init;
