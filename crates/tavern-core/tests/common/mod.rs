#![allow(dead_code)]

use std::sync::Arc;
use tavern_core::gateway::GatewayEvent;
use tavern_core::memory::MemoryGateway;
use tavern_core::provision;
use tavern_core::types::{Caller, UserId};
use tavern_core::{GroupHandle, Registry};
use tokio::sync::mpsc;

pub const ALICE: UserId = UserId(101);
pub const BOB: UserId = UserId(102);
pub const CAROL: UserId = UserId(103);
pub const OPERATOR: UserId = UserId(900);

pub struct Fixture {
    pub gateway: MemoryGateway,
    pub registry: Registry,
    pub events: mpsc::UnboundedReceiver<GatewayEvent>,
}

pub fn fixture() -> Fixture {
    let (gateway, events) = MemoryGateway::new();
    Fixture {
        gateway,
        registry: Registry::new(),
        events,
    }
}

/// A fixture with one group created by `creator` (who therefore holds
/// both roles).
pub async fn fixture_with_group(name: &str, creator: UserId) -> (Fixture, Arc<GroupHandle>) {
    let f = fixture();
    let handle = provision::create_group(&f.gateway, &f.registry, Caller::new(creator), Some(name))
        .await
        .expect("group creation failed");
    (f, handle)
}
