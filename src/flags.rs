//! # Debug flag capability.
//!
//! The hub's diagnostic mode defaults from a flag that outlives any single
//! hub instance. [`DebugFlag`] abstracts that flag as an injected capability
//! (`get`/`set`) instead of a module-level singleton reading ambient process
//! state, so the hub stays independent of the persistence mechanism and tests
//! can run against an in-memory fake.
//!
//! Durable implementations (a settings file, a registry, browser-style local
//! storage) should key the flag on [`DEBUG_FLAG_KEY`]. The in-memory
//! [`MemoryFlag`] has nothing to key on and ignores it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Fixed key under which durable [`DebugFlag`] implementations store the
/// diagnostic-mode flag.
pub const DEBUG_FLAG_KEY: &str = "pubSubLogs";

/// Boolean flag read at hub construction and written by
/// [`EventHub::toggle_debug_mode`](crate::EventHub::toggle_debug_mode).
///
/// Share one flag between hub instances (via `Arc`) to make the diagnostic
/// mode survive hub recreation.
pub trait DebugFlag: Send + Sync {
    /// Returns the current flag value.
    fn get(&self) -> bool;

    /// Stores a new flag value.
    fn set(&self, enabled: bool);
}

/// In-memory [`DebugFlag`] backed by an [`AtomicBool`].
///
/// The default flag used when a hub is built without an explicit one, and
/// the fake of choice in tests. Persistence across hub instances holds as
/// long as the same `Arc<MemoryFlag>` is handed to each hub.
#[derive(Debug, Default)]
pub struct MemoryFlag {
    enabled: AtomicBool,
}

impl MemoryFlag {
    /// Creates a flag with the given initial value.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }
}

impl DebugFlag for MemoryFlag {
    fn get(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}
