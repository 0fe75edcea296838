//! Review and signing session core
//!
//! Drives the flow the host event loop expects: parse the payload, render
//! every field as a paged key/value row, run the pre-approval validation
//! sweep, and only then allow signing. Rendering is addressable by row
//! index so the host can re-render any one of potentially hundreds of rows
//! from constant memory.

/// Row enumeration and rendering
pub mod items;

/// The review state machine and host-facing operations
pub mod session;

/// Fixed-capacity text rendering and paging
pub mod text;

pub use items::{get_item, num_items, validate_items};
pub use session::{App, ReviewSession, Stage, Status};
pub use text::{COIN_AMOUNT_DECIMAL_PLACES, COIN_RATE_DECIMAL_PLACES, MAX_VALUE_LEN};
