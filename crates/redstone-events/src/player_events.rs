use crate::outcome::Permission;
use crate::{Event, EventKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerArgs {
    pub player_id: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerRespawnArgs {
    pub player_id: i32,
    /// True when respawning after leaving the End through the exit portal
    pub end_conquered: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerDeathArgs {
    pub player_id: i32,
    pub damage_source: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerChatArgs {
    pub player_id: i32,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerCommandArgs {
    pub player_id: i32,
    pub command: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerAttackEntityArgs {
    pub player_id: i32,
    pub target_id: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerPickupItemArgs {
    pub player_id: i32,
    pub item_entity_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerDropItemArgs {
    pub player_id: i32,
    pub item_id: String,
    pub count: i32,
}

events! {
    PlayerJoin(PlayerArgs) -> () = ();
    PlayerLeave(PlayerArgs) -> () = ();
    PlayerRespawn(PlayerRespawnArgs) -> () = ();
    /// Returns a custom death message, or `None` for the host's own message
    PlayerDeath(PlayerDeathArgs) -> Option<String> = None;
    PlayerCommand(PlayerCommandArgs) -> Permission = Permission::Allow;
    PlayerAttackEntity(PlayerAttackEntityArgs) -> Permission = Permission::Allow;
    PlayerPickupItem(PlayerPickupItemArgs) -> Permission = Permission::Allow;
    PlayerDropItem(PlayerDropItemArgs) -> Permission = Permission::Allow;
}

/// Chat filter: the handler returns the message to broadcast.
///
/// Without a handler the message passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerChat;

impl Event for PlayerChat {
    const KIND: EventKind = EventKind::PlayerChat;
    type Args = PlayerChatArgs;
    type Outcome = String;

    fn default_outcome(args: &Self::Args) -> Self::Outcome {
        args.message.clone()
    }
}
