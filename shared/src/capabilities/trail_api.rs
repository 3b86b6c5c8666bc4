use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;
use crate::model::{FavoriteId, FavoritePayload};

/// Trail catalog and favorite mutations. The shell owns the transport and
/// forwards raw response bodies; the core decides what they mean.
pub struct TrailApi<Ev> {
    context: CapabilityContext<TrailApiOperation, Ev>,
}

impl<Ev> Capability<Ev> for TrailApi<Ev> {
    type Operation = TrailApiOperation;
    type MappedSelf<MappedEv> = TrailApi<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        TrailApi::new(self.context.map_event(f))
    }
}

impl<Ev> TrailApi<Ev>
where
    Ev: 'static + Send,
{
    pub fn new(context: CapabilityContext<TrailApiOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn get_trails<F>(&self, callback: F)
    where
        F: FnOnce(TrailApiResult) -> Ev + Send + 'static,
    {
        self.request(TrailApiOperation::GetTrails, callback);
    }

    pub fn favorite_trail<F>(&self, payload: FavoritePayload, callback: F)
    where
        F: FnOnce(TrailApiResult) -> Ev + Send + 'static,
    {
        self.request(TrailApiOperation::FavoriteTrail(payload), callback);
    }

    pub fn unfavorite_trail<F>(&self, trail_id: FavoriteId, callback: F)
    where
        F: FnOnce(TrailApiResult) -> Ev + Send + 'static,
    {
        self.request(TrailApiOperation::UnfavoriteTrail { trail_id }, callback);
    }

    fn request<F>(&self, operation: TrailApiOperation, callback: F)
    where
        F: FnOnce(TrailApiResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(output));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TrailApiOperation {
    GetTrails,
    FavoriteTrail(FavoritePayload),
    UnfavoriteTrail { trail_id: FavoriteId },
}

impl Operation for TrailApiOperation {
    type Output = TrailApiResult;
}

/// `Ok(None)` is an empty body.
pub type TrailApiResult = Result<Option<Value>, ServiceError>;

/// JavaScript truthiness of a response body. `{}` and `[]` count as true.
#[must_use]
pub fn is_truthy(body: Option<&Value>) -> bool {
    match body {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// A mutation went through iff the transport succeeded and the body is
/// truthy.
#[must_use]
pub fn mutation_succeeded(result: &TrailApiResult) -> bool {
    matches!(result, Ok(body) if is_truthy(body.as_ref()))
}
