//! # Simple trace and failure sinks for debugging and demos.
//!
//! [`TraceSink`] receives one record per publish while the hub's diagnostic
//! mode is on; [`FailureSink`] receives subscriber failures caught during
//! dispatch. The built-in [`StdoutTrace`] and [`StderrReporter`] print
//! human-readable lines and are primarily useful for development, debugging,
//! and examples.
//!
//! ## Output format
//! ```text
//! [trace] event=order.created data=Order { id: 7 }
//! [trace] event=cache.flush
//! [eventhub] subscriber 'billing' failed during 'order.created': handler failed: connection refused
//! ```
//!
//! Not intended for production use - implement the traits for structured
//! logging or metrics collection.

use std::fmt;

use crate::error::SubscriberError;

/// Sink for diagnostic trace records.
///
/// Called once per publish, before dispatch, while diagnostic mode is
/// enabled. `data` is `Some` when the publisher supplied a payload. Tracing
/// is a side channel only; it never affects dispatch.
pub trait TraceSink<T>: Send + Sync {
    /// Records one published event.
    fn trace(&self, event: &str, data: Option<&T>);
}

/// Sink for subscriber failures caught during dispatch.
///
/// The hub reports each failing or panicking subscriber here and continues
/// dispatching to the remaining subscribers.
pub trait FailureSink: Send + Sync {
    /// Reports one subscriber failure.
    fn report(&self, event: &str, subscriber: &str, error: &SubscriberError);
}

/// Stdout trace sink.
///
/// Prints one `[trace]` line per record; the payload is rendered with its
/// `Debug` implementation and omitted entirely for payload-less publishes.
#[derive(Debug, Default)]
pub struct StdoutTrace;

impl<T: fmt::Debug> TraceSink<T> for StdoutTrace {
    fn trace(&self, event: &str, data: Option<&T>) {
        match data {
            Some(data) => println!("[trace] event={event} data={data:?}"),
            None => println!("[trace] event={event}"),
        }
    }
}

/// Stderr failure reporter.
#[derive(Debug, Default)]
pub struct StderrReporter;

impl FailureSink for StderrReporter {
    fn report(&self, event: &str, subscriber: &str, error: &SubscriberError) {
        eprintln!("[eventhub] subscriber '{subscriber}' failed during '{event}': {error}");
    }
}
