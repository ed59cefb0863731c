pub mod aggregate;
pub mod reading;
pub mod recording_type;
