use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;

/// Signed-in user's profile. The shell attaches the session; the core only
/// asks for "the current user".
pub struct UserApi<Ev> {
    context: CapabilityContext<UserApiOperation, Ev>,
}

impl<Ev> Capability<Ev> for UserApi<Ev> {
    type Operation = UserApiOperation;
    type MappedSelf<MappedEv> = UserApi<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        UserApi::new(self.context.map_event(f))
    }
}

impl<Ev> UserApi<Ev>
where
    Ev: 'static + Send,
{
    pub fn new(context: CapabilityContext<UserApiOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn get_user<F>(&self, callback: F)
    where
        F: FnOnce(UserApiResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(UserApiOperation::GetUser).await;
            ctx.update_app(callback(output));
        });
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserApiOperation {
    GetUser,
}

impl Operation for UserApiOperation {
    type Output = UserApiResult;
}

/// Raw profile JSON, decoded into `User` by the core.
pub type UserApiResult = Result<Value, ServiceError>;
