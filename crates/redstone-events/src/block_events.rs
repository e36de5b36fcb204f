//! Block events, including events for blocks whose behavior is implemented by the runtime
//! ("proxy" blocks, addressed by the handler ID returned from block registration).

use crate::outcome::{ActionResult, Permission};
use crate::{BlockPos, Hand};

/// A player is breaking a block
#[derive(Debug, Clone, Default)]
pub struct BlockBreakArgs {
    pub pos: BlockPos,
    pub player_id: i64,
}

/// A player right-clicked a block
#[derive(Debug, Clone, Default)]
pub struct BlockInteractArgs {
    pub pos: BlockPos,
    pub player_id: i64,
    pub hand: Hand,
}

/// A player is placing a block
#[derive(Debug, Clone, Default)]
pub struct BlockPlaceArgs {
    pub player_id: i32,
    pub pos: BlockPos,
    pub block_id: String,
}

/// Identifies one proxied block instance in one world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProxyBlockRef {
    /// ID returned when the block was queued for registration
    pub handler_id: u64,
    pub world_id: i64,
    pub pos: BlockPos,
}

#[derive(Debug, Clone, Default)]
pub struct ProxyBlockBreakArgs {
    pub block: ProxyBlockRef,
    pub player_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ProxyBlockUseArgs {
    pub block: ProxyBlockRef,
    pub player_id: i64,
    pub hand: Hand,
}

/// An entity touched a proxied block (stepped on, is inside)
#[derive(Debug, Clone, Default)]
pub struct ProxyBlockEntityArgs {
    pub block: ProxyBlockRef,
    pub entity_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ProxyBlockFallenUponArgs {
    pub block: ProxyBlockRef,
    pub entity_id: i32,
    pub fall_distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ProxyBlockPlacedArgs {
    pub block: ProxyBlockRef,
    pub player_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ProxyBlockNeighborChangedArgs {
    pub block: ProxyBlockRef,
    pub neighbor: BlockPos,
}

events! {
    /// Player breaks a block; deny to cancel the break
    BlockBreak(BlockBreakArgs) -> Permission = Permission::Allow;
    /// Player interacts with a block; deny to cancel the interaction
    BlockInteract(BlockInteractArgs) -> Permission = Permission::Allow;
    /// Player places a block; deny to cancel the placement
    BlockPlace(BlockPlaceArgs) -> Permission = Permission::Allow;

    ProxyBlockBreak(ProxyBlockBreakArgs) -> Permission = Permission::Allow;
    ProxyBlockUse(ProxyBlockUseArgs) -> ActionResult = ActionResult::Pass;
    ProxyBlockSteppedOn(ProxyBlockEntityArgs) -> () = ();
    ProxyBlockFallenUpon(ProxyBlockFallenUponArgs) -> () = ();
    ProxyBlockRandomTick(ProxyBlockRef) -> () = ();
    ProxyBlockPlaced(ProxyBlockPlacedArgs) -> () = ();
    ProxyBlockRemoved(ProxyBlockRef) -> () = ();
    ProxyBlockNeighborChanged(ProxyBlockNeighborChangedArgs) -> () = ();
    ProxyBlockEntityInside(ProxyBlockEntityArgs) -> () = ();
}
