pub mod clock;
pub mod logging;

pub use clock::{elapsed_ms, Clock};
