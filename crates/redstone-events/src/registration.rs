//! Payloads the runtime queues for registration with the host's object registries.
//!
//! The host owns these registries and only accepts new entries during its
//! registry-open phase, on its own thread. The runtime therefore never registers
//! directly: it queues one of these definitions and receives the object's handler
//! ID right away.

use std::fmt;

/// Kind of host object a registration request creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    Block,
    Item,
    Entity,
    BlockEntity,
}

/// A payload that can be queued for host-side registration
pub trait Registration: Send + 'static {
    const KIND: ObjectKind;

    /// Identifier used in log lines
    fn identifier(&self) -> String;
}

/// Namespaced identifier such as `mymod:ruby_block`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub namespace: String,
    pub path: String,
}

impl Identifier {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    pub id: Identifier,
    pub hardness: f32,
    pub resistance: f32,
    pub requires_tool: bool,
    pub luminance: i32,
    pub slipperiness: f64,
    pub velocity_multiplier: f64,
    pub jump_velocity_multiplier: f64,
    pub ticks_randomly: bool,
    pub collidable: bool,
    pub replaceable: bool,
    pub burnable: bool,
}

impl BlockDefinition {
    /// Block with the host's stone-like defaults
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            hardness: 1.0,
            resistance: 1.0,
            requires_tool: false,
            luminance: 0,
            slipperiness: 0.6,
            velocity_multiplier: 1.0,
            jump_velocity_multiplier: 1.0,
            ticks_randomly: false,
            collidable: true,
            replaceable: false,
            burnable: false,
        }
    }
}

impl Registration for BlockDefinition {
    const KIND: ObjectKind = ObjectKind::Block;

    fn identifier(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    pub id: Identifier,
    pub max_stack_size: i32,
    /// Durability; zero for items that do not take damage
    pub max_damage: i32,
    pub fire_resistant: bool,
    pub attack_damage: f64,
    pub attack_speed: f64,
    pub attack_knockback: f64,
}

impl ItemDefinition {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            max_stack_size: 64,
            max_damage: 0,
            fire_resistant: false,
            attack_damage: 0.0,
            attack_speed: 0.0,
            attack_knockback: 0.0,
        }
    }
}

impl Registration for ItemDefinition {
    const KIND: ObjectKind = ObjectKind::Item;

    fn identifier(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnGroup {
    Monster,
    #[default]
    Creature,
    Ambient,
    WaterCreature,
    Misc,
}

/// Host class the proxied entity is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityBaseType {
    #[default]
    Animal,
    Monster,
    Projectile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    pub id: Identifier,
    pub width: f64,
    pub height: f64,
    pub max_health: f64,
    pub movement_speed: f64,
    pub attack_damage: f64,
    pub spawn_group: SpawnGroup,
    pub base_type: EntityBaseType,
    pub breeding_item: Option<String>,
    pub model_type: String,
    pub texture_path: String,
    pub model_scale: f64,
    /// AI goals, JSON encoded
    pub goals_json: String,
    pub target_goals_json: String,
}

impl EntityDefinition {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            width: 0.6,
            height: 1.8,
            max_health: 20.0,
            movement_speed: 0.25,
            attack_damage: 2.0,
            spawn_group: SpawnGroup::default(),
            base_type: EntityBaseType::default(),
            breeding_item: None,
            model_type: "humanoid".to_string(),
            texture_path: String::new(),
            model_scale: 1.0,
            goals_json: "[]".to_string(),
            target_goals_json: "[]".to_string(),
        }
    }
}

impl Registration for EntityDefinition {
    const KIND: ObjectKind = ObjectKind::Entity;

    fn identifier(&self) -> String {
        self.id.to_string()
    }
}

/// Block entity attached to an already-queued block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntityDefinition {
    pub block_id: Identifier,
    /// Number of inventory slots, zero for no inventory
    pub inventory_size: u32,
    pub container_title: String,
    pub ticks: bool,
}

impl Registration for BlockEntityDefinition {
    const KIND: ObjectKind = ObjectKind::BlockEntity;

    fn identifier(&self) -> String {
        self.block_id.to_string()
    }
}
