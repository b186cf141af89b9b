//! Error types used by the event hub and its subscribers.
//!
//! This module defines two main error enums:
//!
//! - [`HubError`] — errors raised by the hub itself (registration).
//! - [`SubscriberError`] — errors raised by individual subscriber invocations
//!   during dispatch.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics sinks.

use thiserror::Error;

/// # Errors produced by the hub's own operations.
///
/// Registration is the only hub operation that can fail: unsubscribing an
/// unknown callback and publishing to an unknown event are defined as no-ops.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HubError {
    /// The subscriber reported itself non-invocable at registration time.
    ///
    /// The hub rejects such subscribers eagerly rather than discovering the
    /// problem at dispatch time. The registry is left unchanged.
    #[error("subscriber '{name}' is not invocable and can not subscribe to an event")]
    InvalidSubscriber {
        /// Name of the rejected subscriber.
        name: String,
    },
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventhub::HubError;
    ///
    /// let err = HubError::InvalidSubscriber { name: "metrics".into() };
    /// assert_eq!(err.as_label(), "hub_invalid_subscriber");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::InvalidSubscriber { .. } => "hub_invalid_subscriber",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HubError::InvalidSubscriber { name } => {
                format!("invalid subscriber '{name}': rejected at registration")
            }
        }
    }
}

/// # Errors produced by subscriber invocations.
///
/// These represent failures inside a single subscriber during a dispatch
/// pass. The hub isolates them: the failure is handed to the configured
/// [`FailureSink`](crate::FailureSink) and dispatch continues with the
/// remaining subscribers.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubscriberError {
    /// Subscriber returned an error from its handler.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Subscriber panicked while handling the event.
    #[error("handler panicked: {reason}")]
    Panicked {
        /// Panic payload rendered as text, or "unknown panic".
        reason: String,
    },
}

impl SubscriberError {
    /// Creates a [`SubscriberError::Fail`] from anything displayable.
    ///
    /// # Example
    /// ```
    /// use eventhub::SubscriberError;
    ///
    /// let err = SubscriberError::fail("connection refused");
    /// assert_eq!(err.as_label(), "subscriber_fail");
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        SubscriberError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriberError::Fail { .. } => "subscriber_fail",
            SubscriberError::Panicked { .. } => "subscriber_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubscriberError::Fail { error } => format!("handler failed: {error}"),
            SubscriberError::Panicked { reason } => format!("handler panicked: {reason}"),
        }
    }
}
