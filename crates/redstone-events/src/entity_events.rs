use crate::outcome::Permission;

#[derive(Debug, Clone, Default)]
pub struct EntityDamageArgs {
    pub entity_id: i32,
    pub damage_source: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EntityDeathArgs {
    pub entity_id: i32,
    pub damage_source: String,
}

/// Identifies one instance of a runtime-defined entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProxyEntityRef {
    /// ID returned when the entity type was queued for registration
    pub handler_id: u64,
    pub entity_id: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyEntitySpawnArgs {
    pub entity: ProxyEntityRef,
    pub world_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ProxyEntityDeathArgs {
    pub entity: ProxyEntityRef,
    pub damage_source: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProxyEntityDamageArgs {
    pub entity: ProxyEntityRef,
    pub damage_source: String,
    pub amount: f64,
}

/// Proxy entity attacks or starts targeting another entity
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyEntityTargetArgs {
    pub entity: ProxyEntityRef,
    pub target_id: i32,
}

events! {
    /// Entity is about to take damage; deny to cancel it
    EntityDamage(EntityDamageArgs) -> Permission = Permission::Allow;
    EntityDeath(EntityDeathArgs) -> () = ();

    ProxyEntitySpawn(ProxyEntitySpawnArgs) -> () = ();
    ProxyEntityTick(ProxyEntityRef) -> () = ();
    ProxyEntityDeath(ProxyEntityDeathArgs) -> () = ();
    ProxyEntityDamage(ProxyEntityDamageArgs) -> Permission = Permission::Allow;
    ProxyEntityAttack(ProxyEntityTargetArgs) -> () = ();
    ProxyEntityTarget(ProxyEntityTargetArgs) -> () = ();
}
