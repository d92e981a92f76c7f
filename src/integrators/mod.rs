//! The integrators of this crate.
pub mod simpson;
