use serde::{Deserialize, Serialize};

use crate::capabilities::{TrailApiResult, UserApiResult};
use crate::config::BrowserConfig;

/// Why the profile is being fetched.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserFetch {
    Initial,
    AfterFavorite,
    AfterUnfavorite,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Shell lifecycle
    Configure(BrowserConfig),
    Mount {
        is_authenticated: bool,
    },
    AuthenticationChanged {
        is_authenticated: bool,
    },
    Unmount,

    // Card actions, addressed by card position
    AddToFavorites {
        index: usize,
    },
    RemoveFromFavorites {
        index: usize,
    },

    // Service completions (core-internal)
    #[serde(skip)]
    CatalogLoaded(TrailApiResult),
    #[serde(skip)]
    UserLoaded {
        purpose: UserFetch,
        result: UserApiResult,
    },
    #[serde(skip)]
    FavoriteResponse {
        name: String,
        result: TrailApiResult,
    },
    #[serde(skip)]
    UnfavoriteResponse {
        name: String,
        result: TrailApiResult,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Mount { .. } => "mount",
            Self::AuthenticationChanged { .. } => "authentication_changed",
            Self::Unmount => "unmount",
            Self::AddToFavorites { .. } => "add_to_favorites",
            Self::RemoveFromFavorites { .. } => "remove_from_favorites",
            Self::CatalogLoaded(_) => "catalog_loaded",
            Self::UserLoaded { .. } => "user_loaded",
            Self::FavoriteResponse { .. } => "favorite_response",
            Self::UnfavoriteResponse { .. } => "unfavorite_response",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::AddToFavorites { .. } | Self::RemoveFromFavorites { .. }
        )
    }

    /// Answers to requests the core made earlier. These can still arrive
    /// after the view is gone.
    #[must_use]
    pub const fn is_completion(&self) -> bool {
        matches!(
            self,
            Self::CatalogLoaded(_)
                | Self::UserLoaded { .. }
                | Self::FavoriteResponse { .. }
                | Self::UnfavoriteResponse { .. }
        )
    }
}
