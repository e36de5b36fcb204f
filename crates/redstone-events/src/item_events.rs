use crate::outcome::Permission;
use crate::{BlockPos, Hand};

/// The stack a player is holding when using an item
#[derive(Debug, Clone, Default)]
pub struct HeldItem {
    pub item_id: String,
    pub count: i32,
    pub hand: Hand,
}

#[derive(Debug, Clone, Default)]
pub struct ItemUseArgs {
    pub player_id: i32,
    pub item: HeldItem,
}

#[derive(Debug, Clone, Default)]
pub struct ItemUseOnBlockArgs {
    pub player_id: i32,
    pub item: HeldItem,
    pub pos: BlockPos,
    /// Face of the block that was clicked (host direction ordinal)
    pub face: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ItemUseOnEntityArgs {
    pub player_id: i32,
    pub item: HeldItem,
    pub target_id: i32,
}

events! {
    ItemUse(ItemUseArgs) -> Permission = Permission::Allow;
    ItemUseOnBlock(ItemUseOnBlockArgs) -> Permission = Permission::Allow;
    ItemUseOnEntity(ItemUseOnEntityArgs) -> Permission = Permission::Allow;
}
