mod severity;

pub use severity::*;
