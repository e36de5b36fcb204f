use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use redstone_bridge::RuntimeBridge;
use redstone_bridge::events::block_events::*;
use redstone_bridge::events::container_events::*;
use redstone_bridge::events::entity_events::*;
use redstone_bridge::events::item_events::*;
use redstone_bridge::events::lifecycle_events::*;
use redstone_bridge::events::player_events::*;
use redstone_bridge::events::screen_events::*;
use redstone_bridge::events::{
    ActionResult, BlockPos, CommandResult, DefaultOutcome, Event, EventKind, InputResult,
    Permission, SlotClickResult,
};

fn initialized_bridge() -> Arc<RuntimeBridge> {
    let bridge = Arc::new(RuntimeBridge::new("server"));
    bridge.initialize().unwrap();
    bridge
}

/// Which row of the default-outcome table a concrete outcome belongs to
trait OutcomeClass {
    fn class(&self) -> Option<DefaultOutcome>;
}

impl OutcomeClass for () {
    fn class(&self) -> Option<DefaultOutcome> {
        Some(DefaultOutcome::NoOp)
    }
}

impl OutcomeClass for Permission {
    fn class(&self) -> Option<DefaultOutcome> {
        (*self == Permission::Allow).then_some(DefaultOutcome::Allow)
    }
}

impl OutcomeClass for ActionResult {
    fn class(&self) -> Option<DefaultOutcome> {
        (*self == ActionResult::Pass).then_some(DefaultOutcome::Pass)
    }
}

impl OutcomeClass for InputResult {
    fn class(&self) -> Option<DefaultOutcome> {
        (*self == InputResult::NotHandled).then_some(DefaultOutcome::NotHandled)
    }
}

impl OutcomeClass for SlotClickResult {
    fn class(&self) -> Option<DefaultOutcome> {
        (*self == SlotClickResult::Continue).then_some(DefaultOutcome::Continue)
    }
}

impl OutcomeClass for CommandResult {
    fn class(&self) -> Option<DefaultOutcome> {
        (*self == CommandResult::Failure).then_some(DefaultOutcome::Failure)
    }
}

// Chat returns its input untouched; the caller checks the text itself
impl OutcomeClass for String {
    fn class(&self) -> Option<DefaultOutcome> {
        Some(DefaultOutcome::Unchanged)
    }
}

impl OutcomeClass for Option<String> {
    fn class(&self) -> Option<DefaultOutcome> {
        self.is_none().then_some(DefaultOutcome::Vanilla)
    }
}

fn check_default<E>(
    bridge: &RuntimeBridge,
    seen: &mut HashSet<EventKind>,
    args: E::Args,
    expected: E::Outcome,
) where
    E: Event,
    E::Outcome: PartialEq + Debug + OutcomeClass,
{
    let outcome = bridge.dispatch::<E>(&args);
    assert_eq!(outcome, expected, "default outcome for {}", E::KIND);
    assert_eq!(
        outcome.class(),
        Some(E::KIND.default_outcome()),
        "dispatch default for {} disagrees with the published table",
        E::KIND
    );
    assert!(seen.insert(E::KIND), "{} checked twice", E::KIND);
}

#[test]
fn test_every_event_kind_has_its_default_outcome() {
    let bridge = initialized_bridge();
    let mut seen = HashSet::new();
    let seen = &mut seen;
    let b = &*bridge;

    check_default::<BlockBreak>(b, seen, Default::default(), Permission::Allow);
    check_default::<BlockInteract>(b, seen, Default::default(), Permission::Allow);
    check_default::<BlockPlace>(b, seen, Default::default(), Permission::Allow);
    check_default::<ProxyBlockBreak>(b, seen, Default::default(), Permission::Allow);
    check_default::<ProxyBlockUse>(b, seen, Default::default(), ActionResult::Pass);
    check_default::<ProxyBlockSteppedOn>(b, seen, Default::default(), ());
    check_default::<ProxyBlockFallenUpon>(b, seen, Default::default(), ());
    check_default::<ProxyBlockRandomTick>(b, seen, Default::default(), ());
    check_default::<ProxyBlockPlaced>(b, seen, Default::default(), ());
    check_default::<ProxyBlockRemoved>(b, seen, Default::default(), ());
    check_default::<ProxyBlockNeighborChanged>(b, seen, Default::default(), ());
    check_default::<ProxyBlockEntityInside>(b, seen, Default::default(), ());

    check_default::<PlayerJoin>(b, seen, Default::default(), ());
    check_default::<PlayerLeave>(b, seen, Default::default(), ());
    check_default::<PlayerRespawn>(b, seen, Default::default(), ());
    check_default::<PlayerDeath>(b, seen, Default::default(), None);
    check_default::<PlayerChat>(
        b,
        seen,
        PlayerChatArgs {
            player_id: 4,
            message: "unchanged".to_string(),
        },
        "unchanged".to_string(),
    );
    check_default::<PlayerCommand>(b, seen, Default::default(), Permission::Allow);
    check_default::<PlayerAttackEntity>(b, seen, Default::default(), Permission::Allow);
    check_default::<PlayerPickupItem>(b, seen, Default::default(), Permission::Allow);
    check_default::<PlayerDropItem>(b, seen, Default::default(), Permission::Allow);

    check_default::<EntityDamage>(b, seen, Default::default(), Permission::Allow);
    check_default::<EntityDeath>(b, seen, Default::default(), ());
    check_default::<ProxyEntitySpawn>(b, seen, Default::default(), ());
    check_default::<ProxyEntityTick>(b, seen, Default::default(), ());
    check_default::<ProxyEntityDeath>(b, seen, Default::default(), ());
    check_default::<ProxyEntityDamage>(b, seen, Default::default(), Permission::Allow);
    check_default::<ProxyEntityAttack>(b, seen, Default::default(), ());
    check_default::<ProxyEntityTarget>(b, seen, Default::default(), ());

    check_default::<ItemUse>(b, seen, Default::default(), Permission::Allow);
    check_default::<ItemUseOnBlock>(b, seen, Default::default(), Permission::Allow);
    check_default::<ItemUseOnEntity>(b, seen, Default::default(), Permission::Allow);

    check_default::<ServerStarting>(b, seen, (), ());
    check_default::<ServerStarted>(b, seen, (), ());
    check_default::<ServerStopping>(b, seen, (), ());
    check_default::<RegistryReady>(b, seen, (), ());
    check_default::<Tick>(b, seen, TickArgs { tick: 20 }, ());

    check_default::<ScreenInit>(b, seen, Default::default(), ());
    check_default::<ScreenTick>(b, seen, Default::default(), ());
    check_default::<ScreenRender>(b, seen, Default::default(), ());
    check_default::<ScreenClose>(b, seen, Default::default(), ());
    check_default::<ScreenKeyPressed>(b, seen, Default::default(), InputResult::NotHandled);
    check_default::<ScreenKeyReleased>(b, seen, Default::default(), InputResult::NotHandled);
    check_default::<ScreenCharTyped>(b, seen, Default::default(), InputResult::NotHandled);
    check_default::<ScreenMouseClicked>(b, seen, Default::default(), InputResult::NotHandled);
    check_default::<ScreenMouseReleased>(b, seen, Default::default(), InputResult::NotHandled);
    check_default::<ScreenMouseDragged>(b, seen, Default::default(), InputResult::NotHandled);
    check_default::<ScreenMouseScrolled>(b, seen, Default::default(), InputResult::NotHandled);
    check_default::<WidgetPressed>(b, seen, Default::default(), ());
    check_default::<WidgetTextChanged>(b, seen, Default::default(), ());

    check_default::<ContainerScreenInit>(b, seen, Default::default(), ());
    check_default::<ContainerScreenRenderBackground>(b, seen, Default::default(), ());
    check_default::<ContainerScreenClose>(b, seen, Default::default(), ());
    check_default::<ContainerSlotClick>(b, seen, Default::default(), SlotClickResult::Continue);
    check_default::<ContainerQuickMove>(b, seen, Default::default(), None);
    check_default::<ContainerMayPlace>(b, seen, Default::default(), Permission::Allow);
    check_default::<ContainerMayPickup>(b, seen, Default::default(), Permission::Allow);

    check_default::<CommandExecute>(b, seen, Default::default(), CommandResult::Failure);
    check_default::<PacketReceived>(b, seen, Default::default(), ());

    let all: HashSet<_> = EventKind::all().collect();
    assert_eq!(*seen, all);
}

#[test]
fn test_deny_then_clear_reverts_to_allow() {
    let bridge = initialized_bridge();
    let args = BlockBreakArgs {
        pos: BlockPos::new(12, 64, -40),
        player_id: 99,
    };

    bridge.set_handler::<BlockBreak, _>(|_| Permission::Deny);
    assert_eq!(bridge.dispatch::<BlockBreak>(&args), Permission::Deny);

    bridge.clear_handlers();
    assert_eq!(bridge.dispatch::<BlockBreak>(&args), Permission::Allow);
}

#[test]
fn test_shutdown_twice_and_dispatch_after() {
    let bridge = initialized_bridge();
    bridge.set_handler::<ScreenKeyPressed, _>(|_| InputResult::Handled);
    bridge.set_handler::<CommandExecute, _>(|_| CommandResult::Success(1));

    bridge.shutdown();
    bridge.shutdown();

    assert_eq!(
        bridge.dispatch::<ScreenKeyPressed>(&KeyArgs::default()),
        InputResult::NotHandled
    );
    assert_eq!(
        bridge.dispatch::<CommandExecute>(&CommandExecuteArgs::default()),
        CommandResult::Failure
    );
    assert_eq!(
        bridge.dispatch_unlocked::<CommandExecute>(&CommandExecuteArgs::default()),
        CommandResult::Failure
    );
    bridge.tick(1);
    bridge.server_started();
}

#[test]
fn test_dispatch_from_many_threads_never_overlaps() {
    let bridge = initialized_bridge();
    let inside = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));

    {
        let inside = Arc::clone(&inside);
        let overlaps = Arc::clone(&overlaps);
        let calls = Arc::clone(&calls);
        bridge.set_handler::<Tick, _>(move |_| {
            if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                overlaps.fetch_add(1, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_micros(50));
            calls.fetch_add(1, Ordering::SeqCst);
            inside.fetch_sub(1, Ordering::SeqCst);
        });
    }

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let bridge = Arc::clone(&bridge);
            thread::spawn(move || {
                for n in 0..50 {
                    bridge.tick(worker * 100 + n);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 200);
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(bridge.affinity_lock().depth(), 0);
}

#[test]
fn test_server_started_handler_can_wait_on_other_threads() {
    let bridge = initialized_bridge();
    let (done_tx, done_rx) = mpsc::channel();

    {
        let inner = Arc::clone(&bridge);
        bridge.set_handler::<ServerStarted, _>(move |_| {
            // Work on another thread that enters the runtime; the handler waits for it
            let worker_bridge = Arc::clone(&inner);
            let outcome = thread::spawn(move || {
                worker_bridge.dispatch::<BlockBreak>(&BlockBreakArgs::default())
            })
            .join()
            .unwrap();
            inner.set_handler::<BlockBreak, _>(|_| Permission::Deny);
            let _ = done_tx.send(outcome);
        });
    }

    let starter = {
        let bridge = Arc::clone(&bridge);
        thread::spawn(move || bridge.server_started())
    };

    let outcome = done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("server started handler deadlocked");
    starter.join().unwrap();

    assert_eq!(outcome, Permission::Allow);
    assert_eq!(
        bridge.dispatch::<BlockBreak>(&BlockBreakArgs::default()),
        Permission::Deny
    );
}

#[test]
fn test_tick_reaches_handler_with_counter() {
    let bridge = initialized_bridge();
    let last_tick = Arc::new(AtomicUsize::new(0));
    {
        let last_tick = Arc::clone(&last_tick);
        bridge.set_handler::<Tick, _>(move |args| {
            last_tick.store(args.tick as usize, Ordering::SeqCst);
        });
    }

    bridge.tick(41);
    bridge.tick(42);
    assert_eq!(last_tick.load(Ordering::SeqCst), 42);
}
