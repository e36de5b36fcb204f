use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Every event kind the bridge can dispatch.
///
/// Discriminants are stable and grouped by category so the runtime side can refer to
/// a kind by number:
/// - Block events (100-149), proxy block events (150-199)
/// - Player events (200-299)
/// - Entity events (300-349), proxy entity events (350-399)
/// - Item events (400-499)
/// - Lifecycle events (500-599)
/// - Screen events (600-649), widget events (650-699)
/// - Container screen events (700-749), container menu events (750-799)
/// - Command events (800-899)
/// - Network events (900-999)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum EventKind {
    BlockBreak = 100,
    BlockInteract = 101,
    BlockPlace = 102,

    ProxyBlockBreak = 150,
    ProxyBlockUse = 151,
    ProxyBlockSteppedOn = 152,
    ProxyBlockFallenUpon = 153,
    ProxyBlockRandomTick = 154,
    ProxyBlockPlaced = 155,
    ProxyBlockRemoved = 156,
    ProxyBlockNeighborChanged = 157,
    ProxyBlockEntityInside = 158,

    PlayerJoin = 200,
    PlayerLeave = 201,
    PlayerRespawn = 202,
    PlayerDeath = 203,
    PlayerChat = 204,
    PlayerCommand = 205,
    PlayerAttackEntity = 206,
    PlayerPickupItem = 207,
    PlayerDropItem = 208,

    EntityDamage = 300,
    EntityDeath = 301,

    ProxyEntitySpawn = 350,
    ProxyEntityTick = 351,
    ProxyEntityDeath = 352,
    ProxyEntityDamage = 353,
    ProxyEntityAttack = 354,
    ProxyEntityTarget = 355,

    ItemUse = 400,
    ItemUseOnBlock = 401,
    ItemUseOnEntity = 402,

    ServerStarting = 500,
    ServerStarted = 501,
    ServerStopping = 502,
    RegistryReady = 503,
    Tick = 504,

    ScreenInit = 600,
    ScreenTick = 601,
    ScreenRender = 602,
    ScreenClose = 603,
    ScreenKeyPressed = 604,
    ScreenKeyReleased = 605,
    ScreenCharTyped = 606,
    ScreenMouseClicked = 607,
    ScreenMouseReleased = 608,
    ScreenMouseDragged = 609,
    ScreenMouseScrolled = 610,

    WidgetPressed = 650,
    WidgetTextChanged = 651,

    ContainerScreenInit = 700,
    ContainerScreenRenderBackground = 701,
    ContainerScreenClose = 702,

    ContainerSlotClick = 750,
    ContainerQuickMove = 751,
    ContainerMayPlace = 752,
    ContainerMayPickup = 753,

    CommandExecute = 800,

    PacketReceived = 900,
}

/// Coarse grouping of event kinds, mirrored by the discriminant ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventCategory {
    Block,
    ProxyBlock,
    Player,
    Entity,
    ProxyEntity,
    Item,
    Lifecycle,
    Screen,
    Widget,
    ContainerScreen,
    ContainerMenu,
    Command,
    Network,
}

/// What dispatch answers for an event kind when nothing handles it.
///
/// This is the published default-outcome table; changing an entry is an observable
/// behavior change for every host that embeds the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DefaultOutcome {
    /// Permission-style events let the action happen
    Allow,
    /// Content filters return their input untouched
    Unchanged,
    /// Host keeps its own (vanilla) behavior
    Vanilla,
    /// Interaction falls through to the next handler in the host
    Pass,
    /// UI input is reported as not consumed
    NotHandled,
    /// Container click continues with the host's default handling
    Continue,
    /// Command execution reports failure
    Failure,
    /// Notification with nothing to return
    NoOp,
}

impl EventKind {
    /// Get the discriminant value for this event kind
    pub fn to_discriminant(self) -> u32 {
        self as u32
    }

    /// Convert a u32 discriminant to an event kind
    pub fn from_discriminant(id: u32) -> Option<Self> {
        Self::iter().find(|kind| kind.to_discriminant() == id)
    }

    /// Stable snake_case name, used in logs
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn category(self) -> EventCategory {
        match self.to_discriminant() {
            100..=149 => EventCategory::Block,
            150..=199 => EventCategory::ProxyBlock,
            200..=299 => EventCategory::Player,
            300..=349 => EventCategory::Entity,
            350..=399 => EventCategory::ProxyEntity,
            400..=499 => EventCategory::Item,
            500..=599 => EventCategory::Lifecycle,
            600..=649 => EventCategory::Screen,
            650..=699 => EventCategory::Widget,
            700..=749 => EventCategory::ContainerScreen,
            750..=799 => EventCategory::ContainerMenu,
            800..=899 => EventCategory::Command,
            _ => EventCategory::Network,
        }
    }

    /// The documented outcome when no handler is registered
    pub fn default_outcome(self) -> DefaultOutcome {
        use EventKind::*;

        match self {
            BlockBreak | BlockInteract | BlockPlace | ProxyBlockBreak | PlayerCommand
            | PlayerAttackEntity | PlayerPickupItem | PlayerDropItem | EntityDamage
            | ProxyEntityDamage | ItemUse | ItemUseOnBlock | ItemUseOnEntity
            | ContainerMayPlace | ContainerMayPickup => DefaultOutcome::Allow,

            PlayerChat => DefaultOutcome::Unchanged,

            PlayerDeath | ContainerQuickMove => DefaultOutcome::Vanilla,

            ProxyBlockUse => DefaultOutcome::Pass,

            ScreenKeyPressed | ScreenKeyReleased | ScreenCharTyped | ScreenMouseClicked
            | ScreenMouseReleased | ScreenMouseDragged | ScreenMouseScrolled => {
                DefaultOutcome::NotHandled
            }

            ContainerSlotClick => DefaultOutcome::Continue,

            CommandExecute => DefaultOutcome::Failure,

            ProxyBlockSteppedOn | ProxyBlockFallenUpon | ProxyBlockRandomTick
            | ProxyBlockPlaced | ProxyBlockRemoved | ProxyBlockNeighborChanged
            | ProxyBlockEntityInside | PlayerJoin | PlayerLeave | PlayerRespawn | EntityDeath
            | ProxyEntitySpawn | ProxyEntityTick | ProxyEntityDeath | ProxyEntityAttack
            | ProxyEntityTarget | ServerStarting | ServerStarted | ServerStopping
            | RegistryReady | Tick | ScreenInit | ScreenTick | ScreenRender | ScreenClose
            | WidgetPressed | WidgetTextChanged | ContainerScreenInit
            | ContainerScreenRenderBackground | ContainerScreenClose | PacketReceived => {
                DefaultOutcome::NoOp
            }
        }
    }

    /// All event kinds in discriminant order
    pub fn all() -> impl Iterator<Item = EventKind> {
        Self::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminant_round_trip() {
        for kind in EventKind::all() {
            assert_eq!(EventKind::from_discriminant(kind.to_discriminant()), Some(kind));
        }
        assert_eq!(EventKind::from_discriminant(0), None);
        assert_eq!(EventKind::from_discriminant(999), None);
    }

    #[test]
    fn test_discriminants_are_unique() {
        let mut seen: Vec<u32> = EventKind::all().map(EventKind::to_discriminant).collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn test_categories_follow_ranges() {
        assert_eq!(EventKind::BlockBreak.category(), EventCategory::Block);
        assert_eq!(EventKind::ProxyBlockUse.category(), EventCategory::ProxyBlock);
        assert_eq!(EventKind::PlayerChat.category(), EventCategory::Player);
        assert_eq!(EventKind::ProxyEntityTarget.category(), EventCategory::ProxyEntity);
        assert_eq!(EventKind::ServerStarted.category(), EventCategory::Lifecycle);
        assert_eq!(EventKind::WidgetPressed.category(), EventCategory::Widget);
        assert_eq!(EventKind::ContainerSlotClick.category(), EventCategory::ContainerMenu);
        assert_eq!(EventKind::CommandExecute.category(), EventCategory::Command);
        assert_eq!(EventKind::PacketReceived.category(), EventCategory::Network);
    }

    #[test]
    fn test_names_are_snake_case() {
        assert_eq!(EventKind::BlockBreak.name(), "block_break");
        assert_eq!(
            EventKind::ContainerScreenRenderBackground.to_string(),
            "container_screen_render_background"
        );
    }

    #[test]
    fn test_ui_input_defaults_to_not_handled() {
        for kind in EventKind::all().filter(|k| k.category() == EventCategory::Screen) {
            let expected = match kind {
                EventKind::ScreenInit
                | EventKind::ScreenTick
                | EventKind::ScreenRender
                | EventKind::ScreenClose => DefaultOutcome::NoOp,
                _ => DefaultOutcome::NotHandled,
            };
            assert_eq!(kind.default_outcome(), expected, "{kind}");
        }
    }

    #[test]
    fn test_lifecycle_defaults_are_no_op() {
        for kind in EventKind::all().filter(|k| k.category() == EventCategory::Lifecycle) {
            assert_eq!(kind.default_outcome(), DefaultOutcome::NoOp, "{kind}");
        }
    }
}
