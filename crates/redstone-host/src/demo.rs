//! A small runtime-side mod used by the CLI to exercise a bridge end to end.
//!
//! It queues a block, a block entity and an item, greets players, filters chat,
//! protects the bottom of the world and posts an engine task every few seconds.

use std::sync::{Arc, Weak};
use std::time::Instant;

use redstone_bridge::events::block_events::BlockBreak;
use redstone_bridge::events::lifecycle_events::{CommandExecute, ServerStarted, Tick};
use redstone_bridge::events::player_events::{PlayerChat, PlayerJoin};
use redstone_bridge::events::{
    BlockDefinition, BlockEntityDefinition, CommandResult, Identifier, ItemDefinition, Permission,
};
use redstone_bridge::{RequestId, RuntimeBridge};
use tracing::info;

const NAMESPACE: &str = "greeter";

/// Lowest Y a player may break blocks at
pub const WORLD_FLOOR_Y: i32 = -64;

/// How often the mod posts an engine task, in ticks
pub const TASK_PERIOD_TICKS: u64 = 100;

/// IDs the mod received when queueing its registrations
#[derive(Debug, Clone, Copy)]
pub struct GreeterIds {
    pub lamp_block: RequestId,
    pub lamp_block_entity: RequestId,
    pub spark_item: RequestId,
}

/// Install the greeter on `bridge`: queue its objects and register its handlers
pub fn install(bridge: &Arc<RuntimeBridge>) -> GreeterIds {
    let lamp = Identifier::new(NAMESPACE, "lamp");

    let mut lamp_block = BlockDefinition::new(lamp.clone());
    lamp_block.luminance = 15;
    let ids = GreeterIds {
        lamp_block: bridge.enqueue_registration(lamp_block),
        lamp_block_entity: bridge.enqueue_registration(BlockEntityDefinition {
            block_id: lamp,
            inventory_size: 0,
            container_title: String::new(),
            ticks: true,
        }),
        spark_item: bridge.enqueue_registration(ItemDefinition::new(Identifier::new(
            NAMESPACE, "spark",
        ))),
    };

    let weak = Arc::downgrade(bridge);

    bridge.set_handler::<PlayerJoin, _>({
        let weak = Weak::clone(&weak);
        move |args| {
            if let Some(bridge) = weak.upgrade() {
                bridge.send_chat_message(args.player_id.into(), "Welcome! The greeter is running.");
            }
        }
    });

    bridge.set_handler::<PlayerChat, _>(filter_chat);

    bridge.set_handler::<BlockBreak, _>(|args| {
        if args.pos.y <= WORLD_FLOOR_Y {
            Permission::Deny
        } else {
            Permission::Allow
        }
    });

    bridge.set_handler::<Tick, _>({
        let weak = Weak::clone(&weak);
        move |args| {
            if args.tick % TASK_PERIOD_TICKS != 0 {
                return;
            }
            let Some(bridge) = weak.upgrade() else {
                return;
            };
            if let Some(runner) = bridge.task_runner() {
                let tick = args.tick;
                runner.post_task(
                    Box::new(move || info!(target: "demo", "Engine task for tick {}", tick)),
                    Instant::now(),
                );
            }
        }
    });

    // Commands are only wired up once the server is running, from inside the
    // started notification itself
    bridge.set_handler::<ServerStarted, _>(move |_| {
        if let Some(bridge) = weak.upgrade() {
            bridge.set_handler::<CommandExecute, _>(|args| {
                info!(
                    target: "demo",
                    "Command {} run by player {}",
                    args.command_id,
                    args.player_id
                );
                CommandResult::Success(1)
            });
            info!(target: "demo", "Greeter commands registered on '{}'", bridge.name());
        }
    });

    bridge.signal_registrations_queued();
    info!(target: "demo", "Greeter installed on '{}'", bridge.name());
    ids
}

/// `!shout <text>` is broadcast in capitals; everything else passes through
fn filter_chat(args: &redstone_bridge::events::player_events::PlayerChatArgs) -> String {
    match args.message.strip_prefix("!shout ") {
        Some(text) => text.to_uppercase(),
        None => args.message.clone(),
    }
}
