//! Host measurement bridge.
//!
//! The header is rendered by the host, so only the host can say how tall it
//! will be. The host exposes that as a [`HeaderHeightMeasurer`]; the tree
//! holds an optional handle to it and calls it synchronously through
//! [`find_header_height`].
//!
//! Nothing that goes wrong on the host side is allowed to break layout: a
//! missing environment, an unresolvable service or entry point, an absent
//! instance, a failing or panicking call and a nonsensical result are all
//! logged at error level and reported as "unavailable" (`None`).

mod dummy_layout;

pub use dummy_layout::{DummyLayoutMeasurer, DummyLayoutMetrics};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::MeasureError;

/// Host service that estimates the rendered height of a screen header.
///
/// Implementations may block the calling thread for a host round-trip.
pub trait HeaderHeightMeasurer {
    /// Lay out a header with the given title font size and return its height.
    fn compute_dummy_layout(&self, font_size: i32, is_title_empty: bool)
    -> Result<f32, MeasureError>;
}

/// Ask the host for a header height, absorbing every failure.
///
/// `measurer` is `None` when no host environment is attached to the tree.
/// Negative font sizes are clamped to zero before the call.
pub fn find_header_height(
    measurer: Option<&dyn HeaderHeightMeasurer>,
    font_size: i32,
    is_title_empty: bool,
) -> Option<f32> {
    let Some(measurer) = measurer else {
        log::error!("[screens] {}", MeasureError::EnvironmentUnavailable);
        return None;
    };

    let font_size = font_size.max(0);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        measurer.compute_dummy_layout(font_size, is_title_empty)
    }));

    let result = match outcome {
        Ok(Ok(height)) if height.is_finite() && height >= 0.0 => Ok(height),
        Ok(Ok(height)) => Err(MeasureError::InvalidHeight(height)),
        Ok(Err(err)) => Err(err),
        Err(payload) => Err(MeasureError::CallFailed(panic_message(payload.as_ref()))),
    };

    match result {
        Ok(height) => {
            log::debug!(
                "[screens] host measured header height {} (font size {}, empty title: {})",
                height,
                font_size,
                is_title_empty
            );
            Some(height)
        }
        Err(err) => {
            log::error!("[screens] {err}");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "measurement call panicked".to_string()
    }
}
