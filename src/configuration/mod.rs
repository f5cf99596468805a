mod configuration;

pub use configuration::*;
