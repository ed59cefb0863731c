pub mod load;
pub mod log;
