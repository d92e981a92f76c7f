//! Implementation of different callback functions.
use crate::integrators::simpson::SimpsonEstimators;
use std::fmt::Display;

/// Trait for implementing callbacks of finished integrations
pub trait Callback<T> {
    /// This method is called after a successfully finished integration and may print
    /// information about it.
    fn print(&self, estimators: &SimpsonEstimators<T>);
}

/// A callback function that does nothing
pub struct SinkCallback {}

impl<T> Callback<T> for SinkCallback {
    fn print(&self, _: &SimpsonEstimators<T>) {}
}

/// A callback function that prints the result of the integration
pub struct SimpleCallback {}

impl<T> Callback<T> for SimpleCallback
where
    T: Copy + Display,
{
    fn print(&self, estimators: &SimpsonEstimators<T>) {
        println!("integration finished.");
        println!(
            "N={} I={} non-finite calls: {}",
            estimators.calls(),
            estimators.integral(),
            estimators.non_finite_calls()
        );
    }
}
