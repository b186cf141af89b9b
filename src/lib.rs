//! # eventhub
//!
//! **Eventhub** is a lightweight in-process publish/subscribe hub for Rust.
//!
//! Callers register interest in named events; other callers broadcast named
//! events with optional payloads to all current subscribers. Everything is
//! local and synchronous: no network, no persistence of events, no deferred
//! delivery. The crate is designed as an embeddable building block, not a
//! message broker.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  publisher   │   │  publisher   │   │  subscriber  │
//!     │ publish_with │   │   publish    │   │  (un)sub...  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  EventHub<T>                                                  │
//! │  - Registry: event name → ordered subscriber list             │
//! │  - DebugFlag (injected): persistent diagnostic-mode flag      │
//! │  - TraceSink (injected): one record per publish in debug mode │
//! │  - FailureSink (injected): subscriber failures during dispatch│
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        │ snapshot, then in subscription order, on the caller's
//!        │ thread:
//!        ▼                  ▼                  ▼
//!   sub1.on_event()    sub2.on_event()    subN.on_event()
//!        │                  │                  │
//!        └── Err / panic ──► FailureSink (dispatch continues)
//! ```
//!
//! ## Delivery contract
//! - Subscribers fire synchronously, in subscription order, within the
//!   publish call; nothing runs after `publish` returns.
//! - Registering the same handle twice fires it twice per publish;
//!   unsubscribing removes every occurrence of that handle at once.
//! - A failing or panicking subscriber is reported and isolated; the
//!   remaining subscribers still run.
//! - Each dispatch pass runs over a snapshot, so handlers may subscribe or
//!   unsubscribe mid-dispatch without affecting the pass in progress.
//!
//! ## Features
//! | Area              | Description                                             | Key types / traits                    |
//! |-------------------|---------------------------------------------------------|---------------------------------------|
//! | **Pub/sub API**   | Subscribe, unsubscribe, publish with/without payload.   | [`PubSub`], [`EventHub`]              |
//! | **Subscribers**   | Trait + closure adapter + weak forwarding adapter.      | [`Subscribe`], [`SubscriberFn`], [`WeakSubscriber`] |
//! | **Diagnostics**   | Persistent debug-mode toggle, pluggable trace sink.     | [`DebugFlag`], [`TraceSink`]          |
//! | **Fault handling**| Per-subscriber isolation with pluggable reporting.      | [`FailureSink`], [`SubscriberError`]  |
//! | **Errors**        | Typed errors for registration and dispatch.             | [`HubError`], [`SubscriberError`]     |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventhub::{EventHub, PubSub, SubscriberFn};
//!
//! fn main() -> Result<(), eventhub::HubError> {
//!     let hub: EventHub<u32> = EventHub::builder().build();
//!
//!     let audit = SubscriberFn::arc("audit", |data: Option<&u32>| {
//!         if let Some(id) = data {
//!             println!("[audit] order={id}");
//!         }
//!         Ok(())
//!     });
//!
//!     hub.subscribe("order.created", Arc::clone(&audit))?;
//!     hub.publish_with("order.created", &7);
//!
//!     hub.unsubscribe("order.created", &audit);
//!     hub.publish_with("order.created", &8); // audit no longer called
//!     Ok(())
//! }
//! ```

mod error;
mod flags;
mod hub;
mod log;
mod subscriber;

// ---- Public re-exports ----

pub use error::{HubError, SubscriberError};
pub use flags::{DebugFlag, MemoryFlag, DEBUG_FLAG_KEY};
pub use hub::{EventHub, HubBuilder, PubSub};
pub use log::{FailureSink, StderrReporter, StdoutTrace, TraceSink};
pub use subscriber::{Subscribe, SubscriberFn, SubscriberRef, WeakSubscriber};
