pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod load;
pub mod log;
pub mod minmax;
pub mod show;
