//! Processing-fee payments.
//!
//! - `payment` - ledger entry written once per settled transaction
//! - `tracking_id` - `PRCL-YYYYMMDD-XXXXXX` identifier issued at confirmation

mod payment;
mod tracking_id;

pub use payment::{PaidCheckout, Payment};
pub use tracking_id::TrackingId;
