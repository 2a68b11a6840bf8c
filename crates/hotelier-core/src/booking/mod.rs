// ── Booking flow ──
//
// Draft state, per-step gates and the controller that drives the
// four-step reservation wizard.

mod backend;
mod draft;
mod flow;
pub mod gates;
mod stage;

pub use backend::BookingBackend;
pub use draft::{BookingDraft, DraftUpdate, GuestUpdate, Patch, PaymentUpdate};
pub use flow::{BookingFlow, BookingFlowBuilder, BookingSummary, FlowError, SubmitOutcome};
pub use stage::Stage;
