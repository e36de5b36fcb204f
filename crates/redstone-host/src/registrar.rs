//! The host's authoritative object registries, as seen from the registry-open phase

use redstone_bridge::RequestId;
use redstone_bridge::events::{
    BlockDefinition, BlockEntityDefinition, EntityDefinition, ItemDefinition, ObjectKind,
    Registration,
};
use tracing::debug;

/// Receives queued registrations while the host's registries are open.
///
/// Only ever called on the host thread, once per queued request, in queue order per
/// kind. The `id` is the one the runtime already holds.
pub trait ObjectRegistrar {
    /// Called before the requests of each bridge are registered
    fn begin_bridge(&mut self, _bridge: &str) {}

    fn register_block(&mut self, id: RequestId, block: BlockDefinition);

    fn register_item(&mut self, id: RequestId, item: ItemDefinition);

    fn register_entity(&mut self, id: RequestId, entity: EntityDefinition);

    fn register_block_entity(&mut self, id: RequestId, block_entity: BlockEntityDefinition);
}

/// A registered object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredObject {
    pub bridge: String,
    pub kind: ObjectKind,
    pub id: u64,
    pub identifier: String,
}

/// Registrar that just records what it was given
#[derive(Debug, Default)]
pub struct InMemoryRegistrar {
    bridge: String,
    objects: Vec<RegisteredObject>,
}

impl InMemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[RegisteredObject] {
        &self.objects
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|object| object.kind == kind).count()
    }

    pub fn find(&self, identifier: &str) -> Option<&RegisteredObject> {
        self.objects
            .iter()
            .find(|object| object.identifier == identifier)
    }

    fn record<T: Registration>(&mut self, id: RequestId, payload: &T) {
        let object = RegisteredObject {
            bridge: self.bridge.clone(),
            kind: T::KIND,
            id: id.get(),
            identifier: payload.identifier(),
        };
        debug!(
            target: "registration",
            "Registered {} {} (ID {}) for bridge '{}'",
            object.kind,
            object.identifier,
            object.id,
            object.bridge
        );
        self.objects.push(object);
    }
}

impl ObjectRegistrar for InMemoryRegistrar {
    fn begin_bridge(&mut self, bridge: &str) {
        self.bridge = bridge.to_string();
    }

    fn register_block(&mut self, id: RequestId, block: BlockDefinition) {
        self.record(id, &block);
    }

    fn register_item(&mut self, id: RequestId, item: ItemDefinition) {
        self.record(id, &item);
    }

    fn register_entity(&mut self, id: RequestId, entity: EntityDefinition) {
        self.record(id, &entity);
    }

    fn register_block_entity(&mut self, id: RequestId, block_entity: BlockEntityDefinition) {
        self.record(id, &block_entity);
    }
}
