//! Container screens (client UI) and container menus (server-side slot logic)

use crate::outcome::{Permission, SlotClickResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerScreenInitArgs {
    pub screen_id: i64,
    pub width: i32,
    pub height: i32,
    pub left_pos: i32,
    pub top_pos: i32,
    pub image_width: i32,
    pub image_height: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerScreenRenderBackgroundArgs {
    pub screen_id: i64,
    pub mouse_x: i32,
    pub mouse_y: i32,
    pub partial_tick: f32,
    pub left_pos: i32,
    pub top_pos: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerScreenArgs {
    pub screen_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SlotClickArgs {
    pub menu_id: i64,
    pub slot_index: i32,
    pub button: i32,
    pub click_type: i32,
    /// Serialized stack on the cursor, empty when nothing is carried
    pub carried_item: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlotArgs {
    pub menu_id: i64,
    pub slot_index: i32,
}

#[derive(Debug, Clone, Default)]
pub struct MayPlaceArgs {
    pub menu_id: i64,
    pub slot_index: i32,
    pub item_data: String,
}

events! {
    ContainerScreenInit(ContainerScreenInitArgs) -> () = ();
    ContainerScreenRenderBackground(ContainerScreenRenderBackgroundArgs) -> () = ();
    ContainerScreenClose(ContainerScreenArgs) -> () = ();

    ContainerSlotClick(SlotClickArgs) -> SlotClickResult = SlotClickResult::Continue;
    /// Returns the serialized stack left in the slot, or `None` for the host's own move
    ContainerQuickMove(SlotArgs) -> Option<String> = None;
    ContainerMayPlace(MayPlaceArgs) -> Permission = Permission::Allow;
    ContainerMayPickup(SlotArgs) -> Permission = Permission::Allow;
}
