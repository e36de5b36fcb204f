//! Values a runtime handler hands back to the host.

/// Allow/cancel answer for permission-style events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Permission {
    #[default]
    Allow,
    Deny,
}

impl Permission {
    pub fn is_allowed(self) -> bool {
        self == Permission::Allow
    }
}

impl From<bool> for Permission {
    fn from(allowed: bool) -> Self {
        if allowed {
            Permission::Allow
        } else {
            Permission::Deny
        }
    }
}

/// Result of an interaction with a proxied block.
///
/// The codes match the host's interaction result ordering; `Pass` lets the host
/// continue with its own handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionResult {
    Success,
    Consume,
    Fail,
    #[default]
    Pass,
}

impl ActionResult {
    pub fn code(self) -> i32 {
        match self {
            ActionResult::Success => 0,
            ActionResult::Consume => 1,
            ActionResult::Fail => 2,
            ActionResult::Pass => 3,
        }
    }

    /// Unknown codes map to `Pass`
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ActionResult::Success,
            1 => ActionResult::Consume,
            2 => ActionResult::Fail,
            _ => ActionResult::Pass,
        }
    }
}

/// Whether a UI input event was consumed by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputResult {
    Handled,
    #[default]
    NotHandled,
}

impl InputResult {
    pub fn is_handled(self) -> bool {
        self == InputResult::Handled
    }
}

impl From<bool> for InputResult {
    fn from(handled: bool) -> Self {
        if handled {
            InputResult::Handled
        } else {
            InputResult::NotHandled
        }
    }
}

/// Answer to a container slot click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotClickResult {
    /// Host performs its default click handling
    #[default]
    Continue,
    /// Runtime handled the click; host skips its default handling
    Cancel,
}

impl SlotClickResult {
    pub fn code(self) -> i32 {
        match self {
            SlotClickResult::Continue => 0,
            SlotClickResult::Cancel => 1,
        }
    }
}

/// Result of executing a runtime-registered command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandResult {
    /// Number of things the command affected, at least one
    Success(u32),
    #[default]
    Failure,
}

impl CommandResult {
    /// Host-side command result code; zero means failure
    pub fn code(self) -> i32 {
        match self {
            CommandResult::Success(count) => count.clamp(1, i32::MAX as u32) as i32,
            CommandResult::Failure => 0,
        }
    }

    pub fn from_code(code: i32) -> Self {
        if code > 0 {
            CommandResult::Success(code as u32)
        } else {
            CommandResult::Failure
        }
    }
}
