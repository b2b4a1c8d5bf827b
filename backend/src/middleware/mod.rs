//! Actix middleware wrapped around every request.
//!
//! [`Trace`] assigns the correlation id echoed in error bodies and logs.

pub mod trace;

pub use trace::Trace;
