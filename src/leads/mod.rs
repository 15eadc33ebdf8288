pub mod commands;
pub mod temperature;

pub use temperature::classify_temperature;
