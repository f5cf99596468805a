mod notifications;

pub use notifications::*;
