//! Fault isolation: a failing subscriber is reported to stderr and the
//! remaining subscribers still run.
//!
//! Run with: `cargo run --example fault_isolation`

use std::sync::Arc;

use eventhub::{EventHub, PubSub, SubscriberError, SubscriberFn};

fn main() -> Result<(), eventhub::HubError> {
    let hub: EventHub<String> = EventHub::builder().build();

    hub.subscribe(
        "mail.sent",
        SubscriberFn::arc("flaky-webhook", |_: Option<&String>| {
            Err(SubscriberError::fail("connection refused"))
        }),
    )?;
    hub.subscribe(
        "mail.sent",
        SubscriberFn::arc("stats", |data: Option<&String>| {
            println!("[stats] counted mail to {data:?}");
            Ok(())
        }),
    )?;

    // stderr: [eventhub] subscriber 'flaky-webhook' failed during 'mail.sent': ...
    // stdout: [stats] counted mail to Some("ops@example.com")
    hub.publish_with("mail.sent", &"ops@example.com".to_string());

    Ok(())
}
