//! Real-world scenario benchmarks.
//!
//! These drive the controller the way the terminal app does, with an
//! offline device standing in for the sound card.

mod session;

pub use session::bench_session;
