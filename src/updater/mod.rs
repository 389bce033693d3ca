//! Release Update Discovery
//!
//! Polls the release index for a newer published build, throttled to one
//! automatic check per day, with durable per-version user dismissal.
//!
//! Components:
//! - `fetch` - latest-release client with timeout and not-found handling
//! - `tracker` - check throttle and dismissal persistence
//! - `engine` - turns all of it into a prompt/skip decision

pub mod engine;
pub mod fetch;
pub mod tracker;

pub use engine::{UpdateCheckOutcome, UpdateDecision, UpdateEngine};
pub use fetch::{ReleaseAsset, ReleaseDescriptor, ReleaseFetcher};
pub use tracker::UpdateTracker;
