//! Push-based observable core.
//!
//! Everything in this crate is built on three pieces:
//!
//! - [`Subject`] / [`CurrentValueSubject`]: shared multicast sources with
//!   synchronous, subscription-ordered delivery
//! - [`Signal`]: the composable read side (`map`, `combine_latest`,
//!   `skip_repeats`, `blocked_while`)
//! - [`AnyCancelable`]: idempotent, explicit cancellation handles
//!
//! Delivery is single-threaded and cooperative: "waiting" is modeled by
//! not yet having emitted, never by blocking.

mod cancelable;
mod signal;
mod subject;

pub use cancelable::AnyCancelable;
pub use signal::Signal;
pub use subject::{CurrentValueSubject, ObserverHandler, Subject};
