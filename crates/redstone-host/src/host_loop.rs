use std::future::Future;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use redstone_bridge::events::{
    BlockDefinition, BlockEntityDefinition, EntityDefinition, ItemDefinition,
};
use redstone_bridge::{BridgeError, RuntimeBridge};
use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::registrar::ObjectRegistrar;

/// A bridge driven by the host loop
#[derive(Debug, Clone)]
pub struct HostedBridge {
    pub bridge: Arc<RuntimeBridge>,
    pub registration_timeout: Duration,
}

/// What the registry-open phase registered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrySummary {
    pub blocks: usize,
    pub items: usize,
    pub entities: usize,
    pub block_entities: usize,
}

impl RegistrySummary {
    pub fn total(&self) -> usize {
        self.blocks + self.items + self.entities + self.block_entities
    }
}

/// Drives every bridge from the host's main thread.
///
/// The thread that creates the loop is the host's authoritative thread: registries
/// are opened there, bridges are initialized there (binding any task runner to it)
/// and every tick runs there.
#[derive(Debug)]
pub struct HostLoop {
    bridges: Vec<HostedBridge>,
    host_thread: ThreadId,
    tick_interval: Duration,
    tick: u64,
    registries_opened: bool,
}

impl HostLoop {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            bridges: Vec::new(),
            host_thread: thread::current().id(),
            tick_interval,
            tick: 0,
            registries_opened: false,
        }
    }

    /// A loop with one bridge per enabled `[bridges.<name>]` table
    pub fn from_config(config: &HostConfig) -> Self {
        let mut host = Self::new(config.tick_interval());

        for (index, (name, settings)) in config.enabled_bridges().enumerate() {
            let bridge = if settings.merged_task_runner {
                RuntimeBridge::with_task_runner(name, index as u64 + 1)
            } else {
                RuntimeBridge::new(name)
            };
            host.add_bridge(Arc::new(bridge), settings.registration_timeout());
        }

        host
    }

    pub fn add_bridge(&mut self, bridge: Arc<RuntimeBridge>, registration_timeout: Duration) {
        debug!(target: "host", "Hosting bridge '{}'", bridge.name());
        self.bridges.push(HostedBridge {
            bridge,
            registration_timeout,
        });
    }

    pub fn bridges(&self) -> &[HostedBridge] {
        &self.bridges
    }

    pub fn bridge(&self, name: &str) -> Option<&Arc<RuntimeBridge>> {
        self.bridges
            .iter()
            .find(|hosted| hosted.bridge.name() == name)
            .map(|hosted| &hosted.bridge)
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Initialize every bridge on the host thread
    pub fn start(&self) -> Result<(), BridgeError> {
        for hosted in &self.bridges {
            hosted.bridge.initialize()?;
        }
        info!(target: "host", "Started {} bridge(s)", self.bridges.len());
        Ok(())
    }

    /// The host's one-time registry-open phase.
    ///
    /// For each bridge, waits (up to its timeout) for the runtime to signal that it has
    /// queued everything, drains every queue into `registrar`, marks the registrations
    /// flushed and dispatches the registry-ready notification.
    pub fn open_registries<R: ObjectRegistrar>(
        &mut self,
        registrar: &mut R,
    ) -> Result<RegistrySummary, BridgeError> {
        let caller = thread::current().id();
        if caller != self.host_thread {
            return Err(BridgeError::RegistryThread {
                expected: self.host_thread,
                caller,
            });
        }
        if self.registries_opened {
            return Err(BridgeError::RegistriesAlreadyOpen);
        }
        self.registries_opened = true;

        let mut summary = RegistrySummary::default();

        for hosted in &self.bridges {
            let bridge = &hosted.bridge;
            let registrations = bridge.registrations();

            if !registrations.wait_registrations_queued(hosted.registration_timeout) {
                warn!(
                    target: "registration",
                    "Bridge '{}' did not finish queueing registrations within {:?}, registering what is queued",
                    bridge.name(),
                    hosted.registration_timeout
                );
            }

            registrar.begin_bridge(bridge.name());
            while let Some(request) = bridge.try_dequeue::<BlockDefinition>() {
                registrar.register_block(request.id, request.payload);
                summary.blocks += 1;
            }
            while let Some(request) = bridge.try_dequeue::<ItemDefinition>() {
                registrar.register_item(request.id, request.payload);
                summary.items += 1;
            }
            while let Some(request) = bridge.try_dequeue::<EntityDefinition>() {
                registrar.register_entity(request.id, request.payload);
                summary.entities += 1;
            }
            while let Some(request) = bridge.try_dequeue::<BlockEntityDefinition>() {
                registrar.register_block_entity(request.id, request.payload);
                summary.block_entities += 1;
            }

            registrations.mark_flushed();
            bridge.registry_ready();
        }

        info!(
            target: "registration",
            "Registry phase complete: {} blocks, {} items, {} entities, {} block entities",
            summary.blocks,
            summary.items,
            summary.entities,
            summary.block_entities
        );
        Ok(summary)
    }

    /// Tell every runtime the server is up
    pub fn announce_started(&self) {
        for hosted in &self.bridges {
            hosted.bridge.server_starting();
            hosted.bridge.server_started();
        }
    }

    /// Advance one tick: dispatch `Tick` to every bridge, then drain its ready tasks.
    ///
    /// Returns the number of engine tasks that ran.
    pub fn tick_once(&mut self) -> usize {
        self.tick += 1;
        let mut tasks_run = 0;

        for hosted in &self.bridges {
            hosted.bridge.tick(self.tick);
            tasks_run += hosted.bridge.drain_ready_tasks();
        }

        tasks_run
    }

    /// Tick at the configured interval until `shutdown` resolves or `max_ticks` ticks
    /// have run, then shut every bridge down.
    ///
    /// Must be polled on the host thread, so run it on a current-thread runtime.
    pub async fn run<F>(&mut self, shutdown: F, max_ticks: Option<u64>)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(target: "host", "Host loop running every {:?}", self.tick_interval);

        loop {
            if max_ticks.is_some_and(|max| self.tick >= max) {
                info!(target: "host", "Reached tick limit");
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    let tasks_run = self.tick_once();
                    if tasks_run > 0 {
                        debug!(
                            target: "host",
                            "Tick {} ran {} engine task(s)",
                            self.tick,
                            tasks_run
                        );
                    }
                }
                _ = &mut shutdown => {
                    info!(target: "host", "Shutdown requested");
                    break;
                }
            }
        }

        self.shutdown();
    }

    /// Notify every runtime that the server is stopping, then shut its bridge down
    pub fn shutdown(&self) {
        for hosted in &self.bridges {
            hosted.bridge.server_stopping();
            hosted.bridge.shutdown();
        }
        info!(target: "host", "Host loop stopped after {} tick(s)", self.tick);
    }
}
