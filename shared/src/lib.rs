//! Headless core for the "Find New Trails" page.
//!
//! The shell renders [`ViewModel`] and resolves the [`Effect`]s emitted by
//! [`App`]; everything else (catalog merging, favorite toggling, image
//! assignment) happens here.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::BrowserConfig;
pub use error::{BrowserError, CatalogError, ConfigError, ServiceError};
pub use event::{Event, UserFetch};
pub use model::{
    CatalogEntry, DecorativeImage, FavoriteEntry, FavoriteId, FavoritePayload, Lifecycle, Model,
    PlaceId, Trail, User,
};
pub use view::{ActionKind, ActionStyle, BrowserContent, CardAction, TrailCard, ViewModel};

pub const DEFAULT_IMAGE_POOL_SIZE: u8 = 15;
pub const DEFAULT_IMAGE_ASSET_PREFIX: &str = "image";
pub const DEFAULT_PAGE_TITLE: &str = "Find New Trails";
pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";
pub const DEFAULT_EMPTY_MESSAGE: &str = "No trails found.";

pub const ADD_ACTION_LABEL: &str = "Add To favorites";
pub const REMOVE_ACTION_LABEL: &str = "Remove";

pub const FAVORITE_ADDED: &str = "Trail added to favorites!";
pub const FAVORITE_ADD_FAILED: &str = "Failed to add trail to favorites.";
pub const FAVORITE_REMOVED: &str = "Trail removed from favorites!";
pub const FAVORITE_REMOVE_FAILED: &str = "Failed to remove trail from favorites.";
pub const FAVORITE_NOT_FOUND: &str = "Trail not found in user's favorites.";
pub const FAVORITE_REMOVE_ERROR: &str = "An error occurred while removing the trail.";
