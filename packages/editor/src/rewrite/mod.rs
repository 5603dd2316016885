//! Selection-scoped rewrites through an external text transform.

mod canned;
mod controller;
mod driver;
mod service;

pub use canned::{CannedRewriter, PRESET_COMMANDS};
pub use controller::{
    RequestId, RewriteController, RewriteOutcome, RewritePhase, RewriteRejected, RewriteRequest,
};
pub use driver::{call_with_timeout, RewriteCompletion, RewriteDriver};
pub use service::{RewriteService, RewriteServiceError};
