mod toast;
mod trail_api;
mod user_api;

pub use self::toast::{Toast, ToastKind, ToastOperation};
pub use self::trail_api::{
    is_truthy, mutation_succeeded, TrailApi, TrailApiOperation, TrailApiResult,
};
pub use self::user_api::{UserApi, UserApiOperation, UserApiResult};

// Crux's built-in Render capability covers view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub trail_api: TrailApi<Event>,
    pub user_api: UserApi<Event>,
    pub toast: Toast<Event>,
}
