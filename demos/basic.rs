//! Minimal pub/sub round trip: subscribe, publish, unsubscribe.
//!
//! Run with: `cargo run --example basic`

use std::sync::Arc;

use eventhub::{EventHub, PubSub, SubscriberFn};

#[derive(Debug, Clone)]
struct Order {
    id: u32,
}

fn main() -> Result<(), eventhub::HubError> {
    let hub: EventHub<Order> = EventHub::builder().build();

    let billing = SubscriberFn::arc("billing", |data: Option<&Order>| {
        if let Some(order) = data {
            println!("[billing] invoicing order {}", order.id);
        }
        Ok(())
    });
    let audit = SubscriberFn::arc("audit", |data: Option<&Order>| {
        println!("[audit] order.created data={data:?}");
        Ok(())
    });

    hub.subscribe("order.created", Arc::clone(&billing))?;
    hub.subscribe("order.created", Arc::clone(&audit))?;

    hub.publish_with("order.created", &Order { id: 7 });

    hub.unsubscribe("order.created", &billing);
    hub.publish_with("order.created", &Order { id: 8 }); // audit only

    Ok(())
}
