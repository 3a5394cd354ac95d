use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the core owns a timer. Keeps id spaces apart so the
/// countdown and the assistant never cancel each other's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerScope {
    Countdown,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId {
    pub scope: TimerScope,
    pub seq: u64,
}

impl TimerId {
    #[must_use]
    pub const fn new(scope: TimerScope, seq: u64) -> Self {
        Self { scope, seq }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            TimerScope::Countdown => "countdown",
            TimerScope::Assistant => "assistant",
        };
        write!(f, "{scope}#{}", self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum TimerOperation {
    /// One-shot: the shell resolves it once, after `millis` or on cancel.
    Start { id: TimerId, millis: u64 },
    Cancel { id: TimerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TimerOutput {
    Fired { id: TimerId },
    Cancelled { id: TimerId },
}

impl TimerOutput {
    #[must_use]
    pub const fn id(&self) -> TimerId {
        match self {
            Self::Fired { id } | Self::Cancelled { id } => *id,
        }
    }

    #[must_use]
    pub const fn is_fired(&self) -> bool {
        matches!(self, Self::Fired { .. })
    }
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

pub struct Timer<Ev> {
    context: CapabilityContext<TimerOperation, Ev>,
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<Ev> Timer<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn start<F>(&self, id: TimerId, millis: u64, make_event: F)
    where
        F: FnOnce(TimerOutput) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let output = context
                .request_from_shell(TimerOperation::Start { id, millis })
                .await;
            context.update_app(make_event(output));
        });
    }

    pub fn cancel(&self, id: TimerId) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(TimerOperation::Cancel { id }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_exposes_id() {
        let id = TimerId::new(TimerScope::Countdown, 3);
        assert_eq!(TimerOutput::Fired { id }.id(), id);
        assert_eq!(TimerOutput::Cancelled { id }.id(), id);
        assert!(TimerOutput::Fired { id }.is_fired());
        assert!(!TimerOutput::Cancelled { id }.is_fired());
    }

    #[test]
    fn scopes_keep_ids_distinct() {
        let a = TimerId::new(TimerScope::Countdown, 1);
        let b = TimerId::new(TimerScope::Assistant, 1);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "countdown#1");
        assert_eq!(b.to_string(), "assistant#1");
    }

    #[test]
    fn operation_serialization() {
        let op = TimerOperation::Start {
            id: TimerId::new(TimerScope::Assistant, 7),
            millis: 1500,
        };
        let json = serde_json::to_string(&op).unwrap();
        let back: TimerOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
    }
}
