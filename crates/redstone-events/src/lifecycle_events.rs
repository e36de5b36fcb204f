//! Lifecycle notifications and the remaining host-originated events (commands, packets)

use crate::outcome::CommandResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct TickArgs {
    /// Host tick counter
    pub tick: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CommandExecuteArgs {
    /// ID the runtime received when it registered the command
    pub command_id: u64,
    pub player_id: i32,
    /// Parsed command arguments, JSON encoded by the host
    pub args_json: String,
}

#[derive(Debug, Clone, Default)]
pub struct PacketReceivedArgs {
    pub player_id: i32,
    pub packet_type: i32,
    pub data: Vec<u8>,
}

events! {
    ServerStarting(()) -> () = ();
    /// Dispatched without holding the runtime lock, see `RuntimeBridge::server_started`
    ServerStarted(()) -> () = ();
    ServerStopping(()) -> () = ();
    /// Host finished draining registration queues
    RegistryReady(()) -> () = ();
    Tick(TickArgs) -> () = ();

    CommandExecute(CommandExecuteArgs) -> CommandResult = CommandResult::Failure;

    PacketReceived(PacketReceivedArgs) -> () = ();
}
