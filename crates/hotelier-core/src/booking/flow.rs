// ── Booking flow controller ──
//
// Owns the draft and the wizard position. State changes are synchronous
// and guarded by a std mutex that is never held across an await; the
// only asynchronous operation is `submit`, which is made exclusive by an
// atomic in-flight flag and tagged with a generation so that a reset
// during the request discards its result.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::backend::BookingBackend;
use super::draft::{BookingDraft, DraftUpdate};
use super::gates::{build_request, check_dates, check_guest, check_payment};
use super::stage::Stage;
use crate::analytics::{AnalyticsEvent, Tracker};
use crate::clock::{Clock, SystemClock};
use crate::error::CoreError;
use crate::model::{Money, Reservation};
use crate::notify::Notifications;
use crate::validation::FieldErrors;

/// Why a flow operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The current step has invalid or missing fields.
    #[error("{0}")]
    Validation(FieldErrors),

    /// Payment details are complete; the next step is reached by submitting.
    #[error("Payment details are complete; submit the booking to continue")]
    SubmissionRequired,

    #[error("Cannot {operation} at step {step}")]
    WrongStep { operation: &'static str, step: u8 },

    /// The server refused or could not be reached. Shown verbatim.
    #[error("{message}")]
    Submission { message: String },

    #[error("Please log in to complete your booking")]
    LoginRequired,
}

impl FlowError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reservation was created; the flow is at step 4.
    Created(Reservation),
    /// Another submission is outstanding; nothing was sent.
    AlreadyInFlight,
    /// The flow was reset while the request was outstanding.
    Discarded,
}

/// Read-only recap of the draft for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub room: Option<String>,
    pub check_in: String,
    pub check_out: String,
    pub adults: u32,
    pub children: u32,
    pub nights: u32,
    pub nightly_rate: Money,
    pub total: Money,
}

#[derive(Debug, Default)]
struct FlowState {
    draft: BookingDraft,
    stage: Stage,
}

struct FlowInner<B> {
    backend: B,
    clock: Arc<dyn Clock>,
    state: Mutex<FlowState>,
    submitting: AtomicBool,
    generation: AtomicU64,
    step_tx: watch::Sender<u8>,
    notifications: Option<Notifications>,
    tracker: Tracker,
}

/// Clears the in-flight flag however `submit` exits.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BookingFlowBuilder<B> {
    backend: B,
    clock: Arc<dyn Clock>,
    notifications: Option<Notifications>,
    tracker: Tracker,
}

impl<B: BookingBackend> BookingFlowBuilder<B> {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Route submission results to a notification center.
    pub fn notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn tracker(mut self, tracker: Tracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn build(self) -> BookingFlow<B> {
        let (step_tx, _) = watch::channel(1);
        BookingFlow {
            inner: Arc::new(FlowInner {
                backend: self.backend,
                clock: self.clock,
                state: Mutex::new(FlowState::default()),
                submitting: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                step_tx,
                notifications: self.notifications,
                tracker: self.tracker,
            }),
        }
    }
}

/// The four-step booking wizard. Clones share the same flow.
pub struct BookingFlow<B> {
    inner: Arc<FlowInner<B>>,
}

impl<B> Clone for BookingFlow<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: BookingBackend> BookingFlow<B> {
    pub fn new(backend: B) -> Self {
        Self::builder(backend).build()
    }

    pub fn builder(backend: B) -> BookingFlowBuilder<B> {
        BookingFlowBuilder {
            backend,
            clock: Arc::new(SystemClock),
            notifications: None,
            tracker: Tracker::disabled(),
        }
    }

    // ── Draft ────────────────────────────────────────────────────────

    /// Merge a partial update into the draft. No validation.
    pub fn update_draft(&self, update: DraftUpdate) {
        self.lock().draft.apply(update);
    }

    pub fn draft(&self) -> BookingDraft {
        self.lock().draft.clone()
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Validate the current step and move forward. Returns the new step.
    ///
    /// Step 3 is left only through [`submit`](Self::submit); advancing
    /// there validates payment and then answers
    /// [`FlowError::SubmissionRequired`]. At step 4 this is a no-op.
    pub fn advance(&self) -> Result<u8, FlowError> {
        let today = self.inner.clock.today();
        let mut state = self.lock();

        let next = match &state.stage {
            Stage::Dates => {
                gate(1, check_dates(&state.draft))?;
                Stage::GuestDetails
            }
            Stage::GuestDetails => {
                gate(2, check_guest(&state.draft))?;
                Stage::Payment
            }
            Stage::Payment => {
                gate(3, check_payment(&state.draft, today))?;
                return Err(FlowError::SubmissionRequired);
            }
            Stage::Confirmation(_) => return Ok(4),
        };

        state.stage = next;
        let step = state.stage.number();
        drop(state);

        info!(step, "booking flow advanced");
        self.stage_changed(step);
        Ok(step)
    }

    /// Move back one step without validating. Entered data is kept.
    /// Confirmation is terminal: only [`reset`](Self::reset) leaves it.
    pub fn retreat(&self) -> Result<u8, FlowError> {
        let mut state = self.lock();

        let prev = match &state.stage {
            Stage::Dates => return Ok(1),
            Stage::GuestDetails => Stage::Dates,
            Stage::Payment => Stage::GuestDetails,
            Stage::Confirmation(_) => {
                return Err(FlowError::WrongStep {
                    operation: "go back",
                    step: 4,
                });
            }
        };

        state.stage = prev;
        let step = state.stage.number();
        drop(state);

        debug!(step, "booking flow retreated");
        self.stage_changed(step);
        Ok(step)
    }

    /// Discard everything and return to step 1.
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            *state = FlowState::default();
            self.inner.generation.fetch_add(1, Ordering::AcqRel);
        }
        info!("booking flow reset");
        self.stage_changed(1);
    }

    // ── Derived values ───────────────────────────────────────────────

    pub fn compute_nights(&self) -> u32 {
        self.lock().draft.nights()
    }

    pub fn compute_total(&self) -> Money {
        self.lock().draft.total()
    }

    pub fn summary(&self) -> BookingSummary {
        let state = self.lock();
        let draft = &state.draft;
        BookingSummary {
            room: draft.room.as_ref().map(|r| r.name.clone()),
            check_in: format_date(draft.check_in),
            check_out: format_date(draft.check_out),
            adults: draft.adults,
            children: draft.children,
            nights: draft.nights(),
            nightly_rate: draft.room.as_ref().map_or(Money::ZERO, |r| r.price),
            total: draft.total(),
        }
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Send the booking. Valid only at step 3.
    ///
    /// Re-checks every step first. On success the card details are
    /// wiped and the flow moves to step 4; on failure the step and the
    /// draft are untouched and the server's message is returned.
    pub async fn submit(&self) -> Result<SubmitOutcome, FlowError> {
        if self.inner.submitting.swap(true, Ordering::AcqRel) {
            debug!("submission already in flight");
            return Ok(SubmitOutcome::AlreadyInFlight);
        }
        let _in_flight = InFlight(&self.inner.submitting);

        let today = self.inner.clock.today();
        let (request, generation) = {
            let state = self.lock();
            if !matches!(state.stage, Stage::Payment) {
                return Err(FlowError::WrongStep {
                    operation: "submit",
                    step: state.stage.number(),
                });
            }
            let request = build_request(&state.draft, today).map_err(|errors| {
                debug!(fields = %errors, "submission blocked by validation");
                FlowError::Validation(errors)
            })?;
            (request, self.inner.generation.load(Ordering::Acquire))
        };

        info!(
            room_id = request.room_id,
            check_in = %request.check_in,
            check_out = %request.check_out,
            "submitting booking"
        );
        let result = self.inner.backend.submit_booking(request).await;

        let mut state = self.lock();
        if self.inner.generation.load(Ordering::Acquire) != generation {
            info!("flow reset during submission; discarding result");
            return Ok(SubmitOutcome::Discarded);
        }

        match result {
            Ok(reservation) => {
                state.draft.payment.clear_card();
                state.stage = Stage::Confirmation(reservation.clone());
                drop(state);

                info!(reference = %reservation.reference, "booking confirmed");
                self.stage_changed(4);
                if let Some(n) = &self.inner.notifications {
                    n.success(format!("Booking confirmed: {}", reservation.reference));
                }
                Ok(SubmitOutcome::Created(reservation))
            }
            Err(e) => {
                drop(state);
                warn!(error = %e, "booking submission failed");
                let err = match e {
                    CoreError::LoginRequired => FlowError::LoginRequired,
                    other => FlowError::Submission {
                        message: other.to_string(),
                    },
                };
                if let Some(n) = &self.inner.notifications {
                    n.error(err.to_string());
                }
                Err(err)
            }
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn stage(&self) -> Stage {
        self.lock().stage.clone()
    }

    /// 1-based step number.
    pub fn step(&self) -> u8 {
        self.lock().stage.number()
    }

    pub fn reservation(&self) -> Option<Reservation> {
        self.lock().stage.reservation().cloned()
    }

    /// `true` while a submission is outstanding; views disable the
    /// submit control on it.
    pub fn is_submitting(&self) -> bool {
        self.inner.submitting.load(Ordering::Acquire)
    }

    /// Step number changes.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.inner.step_tx.subscribe()
    }

    fn stage_changed(&self, step: u8) {
        self.inner.step_tx.send_replace(step);
        self.inner.tracker.track(AnalyticsEvent::booking_step(step));
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn gate(step: u8, errors: FieldErrors) -> Result<(), FlowError> {
    errors.into_result().map_err(|errors| {
        debug!(step, fields = %errors, "step validation failed");
        FlowError::Validation(errors)
    })
}

/// `Jun 1, 2024`, or `Not set`.
fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "Not set".to_owned(), |d| d.format("%b %-d, %Y").to_string())
}
