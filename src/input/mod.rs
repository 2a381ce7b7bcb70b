//! Lane key state.
//!
//! [`LaneInputs`] turns raw key down/up events into one logical press per
//! physical hold before they reach the session.

mod key_state;

pub use key_state::{KeyState, LaneInputs};
