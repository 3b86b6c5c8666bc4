use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::capabilities::{mutation_succeeded, Capabilities, TrailApiResult, UserApiResult};
use crate::catalog;
use crate::config::BrowserConfig;
use crate::error::{BrowserError, CatalogError};
use crate::event::{Event, UserFetch};
use crate::model::{CatalogEntry, FavoriteId, FavoritePayload, Lifecycle, Model, User};
use crate::view::{self, ViewModel};
use crate::{
    FAVORITE_ADDED, FAVORITE_ADD_FAILED, FAVORITE_NOT_FOUND, FAVORITE_REMOVED,
    FAVORITE_REMOVE_ERROR, FAVORITE_REMOVE_FAILED,
};

/// The trail browser page.
///
/// Holds only the random source used for decorative images; all page state
/// lives in [`Model`].
pub struct App {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Default for App {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl App {
    /// Builds the page around a caller-supplied random source, so image
    /// rolls can be made deterministic.
    #[must_use]
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    fn load_catalog(
        &self,
        response: Option<Value>,
        pool_size: u8,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        catalog::load_catalog(response, &mut **rng, pool_size)
    }

    fn configure(config: BrowserConfig, model: &mut Model) {
        if model.lifecycle != Lifecycle::Unmounted {
            warn!("configuration arrived after mount, ignoring");
            return;
        }
        match config.validate() {
            Ok(()) => model.config = config,
            Err(e) => warn!(error = %e, "rejecting configuration, keeping previous"),
        }
    }

    fn mount(is_authenticated: bool, model: &mut Model, caps: &Capabilities) {
        if model.lifecycle != Lifecycle::Unmounted {
            debug!("already mounted");
            return;
        }

        model.lifecycle = Lifecycle::Mounted;
        model.is_authenticated = is_authenticated;

        caps.trail_api.get_trails(Event::CatalogLoaded);
        caps.render.render();
    }

    fn handle_catalog(&self, result: TrailApiResult, model: &mut Model, caps: &Capabilities) {
        if !model.is_loading || model.staged_catalog.is_some() {
            debug!("catalog already received");
            return;
        }

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "catalog request failed");
                return;
            }
        };

        // A bad catalog leaves the page loading; nothing is shown to the user.
        match self.load_catalog(body, model.config.image_pool_size) {
            Ok(entries) => {
                info!(count = entries.len(), "catalog loaded");
                model.staged_catalog = Some(entries);
                caps.user_api.get_user(|result| Event::UserLoaded {
                    purpose: UserFetch::Initial,
                    result,
                });
            }
            Err(e) => warn!(error = %e, "unusable catalog response"),
        }
    }

    fn handle_user(
        purpose: UserFetch,
        result: UserApiResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let user = result
            .map_err(BrowserError::from)
            .and_then(User::from_json);

        match (purpose, user) {
            (UserFetch::Initial, Ok(user)) => {
                if !model.is_loading {
                    debug!("initial profile after ready, ignoring");
                    return;
                }
                model.finish_loading(user);
                info!(trails = model.trails.len(), "trail browser ready");
                caps.render.render();
            }
            (UserFetch::Initial, Err(e)) => {
                error!(error = %e, "initial profile fetch failed");
            }
            (UserFetch::AfterFavorite | UserFetch::AfterUnfavorite, Ok(user)) => {
                debug!(favorites = user.trails.len(), "profile refreshed");
                model.user = Some(user);
                caps.render.render();
            }
            (UserFetch::AfterFavorite, Err(e)) => {
                error!(error = %e, "profile refresh after favorite failed");
            }
            (UserFetch::AfterUnfavorite, Err(e)) => {
                error!(error = %e, "profile refresh after unfavorite failed");
                caps.toast.error(FAVORITE_REMOVE_ERROR);
            }
        }
    }

    fn add_to_favorites(index: usize, model: &Model, caps: &Capabilities) {
        if !model.is_ready() {
            warn!(index, "favorite requested before trails were shown");
            return;
        }

        match model.trail_at(index).and_then(FavoritePayload::for_trail) {
            Ok(payload) => {
                let name = payload.name.clone();
                caps.trail_api
                    .favorite_trail(payload, move |result| Event::FavoriteResponse {
                        name,
                        result,
                    });
            }
            Err(e) => {
                error!(error = %e, index, "cannot build favorite request");
                caps.toast.error(FAVORITE_ADD_FAILED);
            }
        }
    }

    fn handle_favorite_response(name: &str, result: &TrailApiResult, caps: &Capabilities) {
        if mutation_succeeded(result) {
            info!(trail = name, "trail added to favorites");
            caps.toast.success(FAVORITE_ADDED);
            caps.user_api.get_user(|result| Event::UserLoaded {
                purpose: UserFetch::AfterFavorite,
                result,
            });
        } else {
            warn!(trail = name, ?result, "favorite rejected");
            caps.toast.error(FAVORITE_ADD_FAILED);
        }
    }

    /// `Ok(None)` when the trail has no favorite record to remove.
    fn favorite_to_remove(
        model: &Model,
        index: usize,
    ) -> Result<Option<(String, FavoriteId)>, BrowserError> {
        let trail = model.trail_at(index)?;
        let user = model.user.as_ref().ok_or(BrowserError::NoProfile)?;
        Ok(user
            .favorite_named(&trail.name)
            .map(|favorite| (trail.name.clone(), favorite.trail_id.clone())))
    }

    fn remove_from_favorites(index: usize, model: &Model, caps: &Capabilities) {
        if !model.is_ready() {
            warn!(index, "unfavorite requested before trails were shown");
            return;
        }

        match Self::favorite_to_remove(model, index) {
            Ok(Some((name, trail_id))) => {
                caps.trail_api
                    .unfavorite_trail(trail_id, move |result| Event::UnfavoriteResponse {
                        name,
                        result,
                    });
            }
            Ok(None) => {
                info!(index, "trail not in favorites");
                caps.toast.error(FAVORITE_NOT_FOUND);
            }
            Err(e) => {
                error!(error = %e, index, "error removing trail from favorites");
                caps.toast.error(FAVORITE_REMOVE_ERROR);
            }
        }
    }

    fn handle_unfavorite_response(name: &str, result: &TrailApiResult, caps: &Capabilities) {
        if mutation_succeeded(result) {
            info!(trail = name, "trail removed from favorites");
            caps.toast.success(FAVORITE_REMOVED);
            caps.user_api.get_user(|result| Event::UserLoaded {
                purpose: UserFetch::AfterUnfavorite,
                result,
            });
        } else {
            warn!(trail = name, ?result, "unfavorite rejected");
            caps.toast.error(FAVORITE_REMOVE_FAILED);
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[instrument(skip_all, fields(event = event.name()))]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        // Requests are never cancelled, so answers can outlive the view.
        if model.is_torn_down() {
            debug!(completion = event.is_completion(), "view torn down, dropping event");
            return;
        }

        if event.is_user_initiated() {
            debug!("user action");
        }

        match event {
            Event::Configure(config) => Self::configure(config, model),

            Event::Mount { is_authenticated } => Self::mount(is_authenticated, model, caps),

            Event::AuthenticationChanged { is_authenticated } => {
                model.is_authenticated = is_authenticated;
                caps.render.render();
            }

            Event::Unmount => {
                model.lifecycle = Lifecycle::TornDown;
                model.staged_catalog = None;
                debug!("view unmounted");
            }

            Event::AddToFavorites { index } => Self::add_to_favorites(index, model, caps),

            Event::RemoveFromFavorites { index } => {
                Self::remove_from_favorites(index, model, caps);
            }

            Event::CatalogLoaded(result) => self.handle_catalog(result, model, caps),

            Event::UserLoaded { purpose, result } => {
                Self::handle_user(purpose, result, model, caps);
            }

            Event::FavoriteResponse { name, result } => {
                Self::handle_favorite_response(&name, &result, caps);
            }

            Event::UnfavoriteResponse { name, result } => {
                Self::handle_unfavorite_response(&name, &result, caps);
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DecorativeImage;
    use rand::rngs::mock::StepRng;
    use serde_json::json;

    #[test]
    fn test_injected_rng_drives_images() {
        let app = App::with_rng(StepRng::new(0, 0));
        let entries = app
            .load_catalog(Some(json!({"a": {"name": "A"}, "b": {"name": "B"}})), 15)
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.image == DecorativeImage(1)));
    }

    #[test]
    fn test_catalog_error_passes_through() {
        let app = App::with_rng(StepRng::new(0, 0));
        assert_eq!(
            app.load_catalog(Some(json!("nope")), 15),
            Err(CatalogError::NotACollection { found: "string" })
        );
    }

    #[test]
    fn test_favorite_to_remove_without_profile() {
        let mut model = Model::default();
        model.staged_catalog = Some(vec![CatalogEntry {
            trail: crate::model::Trail {
                name: "A".into(),
                ..Default::default()
            },
            image: DecorativeImage(1),
        }]);
        model.finish_loading(User::default());
        model.user = None;

        assert_eq!(
            App::favorite_to_remove(&model, 0),
            Err(BrowserError::NoProfile)
        );
        assert!(matches!(
            App::favorite_to_remove(&model, 5),
            Err(BrowserError::UnknownTrail { index: 5, len: 1 })
        ));
    }
}
