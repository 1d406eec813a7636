//! Authoritative validation of proposed actions.
mod clock;
mod error;
mod rate;
mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ValidationCode, ValidationError, ValidationResult};
pub use rate::SubmissionHistory;
pub use validator::Validator;
