pub mod configuration;
pub mod error;
pub mod message;
pub mod notifications;
pub mod severity;
pub mod telemetry;
pub mod traits;

pub use configuration::{Options, PayloadFormat};
pub use error::DeliveryError;
pub use notifications::{Notifier, configure};
pub use severity::Severity;
