// Declare submodules
mod alert;
mod common;

pub use alert::alert_prompt;
pub use common::*;
