//! Persistent diagnostic mode: toggle once, observe traces, rebuild the hub
//! over the same flag and the mode sticks.
//!
//! Run with: `cargo run --example debug_toggle`

use std::sync::Arc;

use eventhub::{DebugFlag, EventHub, MemoryFlag, PubSub, SubscriberFn};

fn main() -> Result<(), eventhub::HubError> {
    // One flag shared by every hub instance in this process.
    let flags: Arc<MemoryFlag> = Arc::new(MemoryFlag::default());

    let hub: EventHub<u32> = EventHub::builder()
        .with_flags(Arc::clone(&flags) as Arc<dyn DebugFlag>)
        .build();

    hub.subscribe("tick", SubscriberFn::arc("counter", |_| Ok(())))?;

    hub.publish_with("tick", &1); // silent
    hub.toggle_debug_mode();
    hub.publish_with("tick", &2); // [trace] event=tick data=2
    hub.publish("tick"); //          [trace] event=tick

    // A freshly built hub picks the mode up from the shared flag.
    drop(hub);
    let rebuilt: EventHub<u32> = EventHub::builder()
        .with_flags(Arc::clone(&flags) as Arc<dyn DebugFlag>)
        .build();
    println!("rebuilt hub debug mode: {}", rebuilt.is_debug_mode());

    Ok(())
}
