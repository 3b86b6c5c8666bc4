use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Transient notifications. Fire-and-forget: the shell shows the message and
/// never answers.
pub struct Toast<Ev> {
    context: CapabilityContext<ToastOperation, Ev>,
}

impl<Ev> Capability<Ev> for Toast<Ev> {
    type Operation = ToastOperation;
    type MappedSelf<MappedEv> = Toast<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Toast::new(self.context.map_event(f))
    }
}

impl<Ev> Toast<Ev>
where
    Ev: 'static + Send,
{
    pub fn new(context: CapabilityContext<ToastOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let operation = ToastOperation::new(message, kind);
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastOperation {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl ToastOperation {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms: kind.default_duration_ms(),
        }
    }
}

impl Operation for ToastOperation {
    type Output = ();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}
