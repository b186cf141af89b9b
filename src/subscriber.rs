//! # Subscriber abstraction and function-backed subscriber implementation.
//!
//! This module defines the [`Subscribe`] trait (synchronous, fault-reporting)
//! and two convenient implementations:
//!
//! - [`SubscriberFn`] — wraps a closure into a subscriber.
//! - [`WeakSubscriber`] — forwards to another subscriber through a [`Weak`]
//!   handle, so the target's lifetime is controlled elsewhere.
//!
//! The common handle type is [`SubscriberRef`], an `Arc<dyn Subscribe<T>>`
//! suitable for sharing between the hub and the caller. Unsubscription is by
//! handle identity (`Arc::ptr_eq`), so callers keep a clone of the handle
//! they registered.

use std::{
    borrow::Cow,
    marker::PhantomData,
    sync::{Arc, Weak},
};

use parking_lot::Mutex;

use crate::error::SubscriberError;

/// # Shared handle to a subscriber.
///
/// This is the type the hub stores in its registry and the type callers keep
/// around to unsubscribe later. Identity (`Arc::ptr_eq`) is what ties the two
/// together.
pub type SubscriberRef<T> = Arc<dyn Subscribe<T>>;

/// # Synchronous event subscriber.
///
/// A subscriber has a stable [`name`](Subscribe::name) and an
/// [`on_event`](Subscribe::on_event) method invoked with the published
/// payload (`Some(&T)`) or `None` when the event was published without data.
///
/// ### Implementation requirements
/// - Handlers run on the publisher's thread; do not block indefinitely.
/// - Return `Err` for recoverable handler failures; the hub reports them and
///   keeps dispatching to the remaining subscribers.
/// - Panics are caught by the hub and reported the same way.
///
/// # Example
/// ```
/// use eventhub::{Subscribe, SubscriberError};
///
/// struct Metrics;
///
/// impl Subscribe<u64> for Metrics {
///     fn on_event(&self, data: Option<&u64>) -> Result<(), SubscriberError> {
///         if let Some(count) = data {
///             // export a metric, etc.
///             let _ = count;
///         }
///         Ok(())
///     }
///
///     fn name(&self) -> &str { "metrics" }
/// }
/// ```
pub trait Subscribe<T>: Send + Sync + 'static {
    /// Handles a single published event.
    ///
    /// `data` is `Some` when the publisher supplied a payload, `None` for a
    /// bare publish. Called synchronously, in subscription order, on the
    /// publisher's thread.
    fn on_event(&self, data: Option<&T>) -> Result<(), SubscriberError>;

    /// Returns the subscriber name used in trace and failure reports.
    ///
    /// Prefer short, descriptive names (e.g., "metrics", "audit", "ui").
    /// The default uses `type_name::<Self>()`, which can be verbose -
    /// override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Reports whether this subscriber can currently be invoked.
    ///
    /// Checked once, at registration: the hub rejects non-invocable
    /// subscribers with
    /// [`HubError::InvalidSubscriber`](crate::HubError::InvalidSubscriber)
    /// instead of carrying them to dispatch time. Plain subscribers are
    /// always invocable; adapters such as [`WeakSubscriber`] override this.
    fn is_invocable(&self) -> bool {
        true
    }
}

/// # Function-backed subscriber implementation.
///
/// [`SubscriberFn`] wraps a closure `Fnc: FnMut(Option<&T>) -> Result<(), SubscriberError>`.
/// The closure is protected by a [`Mutex`] to allow calling
/// `on_event(&self, ...)` even though the closure is `FnMut`, so handlers may
/// mutate captured state without extra synchronization. Use
/// [`SubscriberFn::arc`] for a one-liner that returns a [`SubscriberRef`].
///
/// # Example
/// ```
/// use eventhub::{SubscriberFn, SubscriberRef};
///
/// let seen: SubscriberRef<u32> = SubscriberFn::arc("printer", |data: Option<&u32>| {
///     if let Some(n) = data {
///         println!("got {n}");
///     }
///     Ok(())
/// });
///
/// assert_eq!(seen.name(), "printer");
/// ```
pub struct SubscriberFn<T, Fnc>
where
    Fnc: FnMut(Option<&T>) -> Result<(), SubscriberError> + Send + 'static,
{
    /// Stable subscriber name.
    name: Cow<'static, str>,
    /// Underlying function (guarded by a mutex to allow `FnMut` with `&self`).
    func: Mutex<Fnc>,
    _payload: PhantomData<fn(&T)>,
}

impl<T, Fnc> SubscriberFn<T, Fnc>
where
    T: 'static,
    Fnc: FnMut(Option<&T>) -> Result<(), SubscriberError> + Send + 'static,
{
    /// Creates a new function-backed subscriber.
    ///
    /// Prefer [`SubscriberFn::arc`] when you immediately need a
    /// [`SubscriberRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, func: Fnc) -> Self {
        Self {
            name: name.into(),
            func: Mutex::new(func),
            _payload: PhantomData,
        }
    }

    /// Creates the subscriber and returns it as a shared handle
    /// (`Arc<dyn Subscribe<T>>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, func: Fnc) -> SubscriberRef<T> {
        Arc::new(Self::new(name, func))
    }
}

impl<T, Fnc> Subscribe<T> for SubscriberFn<T, Fnc>
where
    T: 'static,
    Fnc: FnMut(Option<&T>) -> Result<(), SubscriberError> + Send + 'static,
{
    fn on_event(&self, data: Option<&T>) -> Result<(), SubscriberError> {
        let mut func = self.func.lock();
        (func)(data)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// # Weak forwarding subscriber.
///
/// Holds a [`Weak`] handle to another subscriber and forwards events to it
/// while the target is alive. If the target has already been dropped when the
/// weak subscriber is registered, [`Subscribe::is_invocable`] reports `false`
/// and the hub rejects the registration; a target dropped later simply stops
/// receiving events.
///
/// # Example
/// ```
/// use eventhub::{SubscriberFn, SubscriberRef, WeakSubscriber};
///
/// let target: SubscriberRef<u32> = SubscriberFn::arc("target", |_| Ok(()));
/// let weak = WeakSubscriber::arc("weak-target", &target);
/// assert!(weak.is_invocable());
///
/// drop(target);
/// assert!(!weak.is_invocable());
/// ```
pub struct WeakSubscriber<T> {
    /// Stable subscriber name (the target may be gone when it is needed).
    name: Cow<'static, str>,
    target: Weak<dyn Subscribe<T>>,
}

impl<T: 'static> WeakSubscriber<T> {
    /// Creates a weak subscriber forwarding to `target`.
    pub fn new(name: impl Into<Cow<'static, str>>, target: &SubscriberRef<T>) -> Self {
        Self {
            name: name.into(),
            target: Arc::downgrade(target),
        }
    }

    /// Creates the weak subscriber and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, target: &SubscriberRef<T>) -> SubscriberRef<T> {
        Arc::new(Self::new(name, target))
    }
}

impl<T: 'static> Subscribe<T> for WeakSubscriber<T> {
    fn on_event(&self, data: Option<&T>) -> Result<(), SubscriberError> {
        match self.target.upgrade() {
            Some(target) => target.on_event(data),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_invocable(&self) -> bool {
        self.target.strong_count() > 0
    }
}
