//! The booking wizard as a reducer.
//!
//! ```text
//! Start ─▶ Step 1 ─Continue─▶ Step 2 ─Continue─▶ Step 3 ─Continue─▶ Step 4
//!            ◀──────Back────────  ◀──────Back────────  ◀──────Back─────  │
//!                                                                     Submit
//!                                                                        ▼
//!                                        Failed ◀──── Submitting ────▶ Submitted
//!                                        (draft kept,                 (draft cleared)
//!                                         Submit retries)
//! ```
//!
//! Cancel is a two-step operation (`Cancel` then `ConfirmCancel`) from any
//! editing or failed state. Catalog lookups and the submission run as
//! effects; their results come back as actions tagged with the session that
//! issued them.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;

pub use actions::WizardAction;
pub use environment::WizardEnvironment;
pub use reducer::WizardReducer;
pub use state::{Listing, WizardState, WizardStatus};
