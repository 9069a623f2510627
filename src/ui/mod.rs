//! Page controllers for the navigation bar, photo gallery and hover tooltip.
//!
//! Each controller owns only its own state and talks to the page through an
//! [`events::EventSource`], so the same code runs against the DOM and against
//! a synthetic source in tests.

pub mod events;
pub mod gallery;
pub mod nav;
pub mod state;
pub mod tooltip;
