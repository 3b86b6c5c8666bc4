use serde::{Deserialize, Serialize};

use crate::model::{CatalogEntry, Model};
use crate::{ADD_ACTION_LABEL, REMOVE_ACTION_LABEL};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionStyle {
    Primary,
    Danger,
}

/// Which event the card's button sends back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddToFavorites,
    RemoveFromFavorites,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardAction {
    pub label: String,
    pub style: ActionStyle,
    pub kind: ActionKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrailCard {
    /// Card position; echoed back in `AddToFavorites` / `RemoveFromFavorites`.
    pub index: usize,
    pub image_index: u8,
    pub image_asset: String,
    pub image_alt: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub action: CardAction,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserContent {
    Loading { message: String },
    Empty { message: String },
    Cards { cards: Vec<TrailCard> },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub show_header: bool,
    pub title: String,
    pub content: BrowserContent,
}

impl CardAction {
    fn for_state(favorited: bool) -> Self {
        if favorited {
            Self {
                label: REMOVE_ACTION_LABEL.into(),
                style: ActionStyle::Danger,
                kind: ActionKind::RemoveFromFavorites,
            }
        } else {
            Self {
                label: ADD_ACTION_LABEL.into(),
                style: ActionStyle::Primary,
                kind: ActionKind::AddToFavorites,
            }
        }
    }
}

fn build_card(model: &Model, index: usize, entry: &CatalogEntry) -> TrailCard {
    let trail = &entry.trail;
    TrailCard {
        index,
        image_index: entry.image.index(),
        image_asset: model.config.asset_name(entry.image.index()),
        image_alt: trail.name.clone(),
        name: trail.name.clone(),
        location: trail.location_line(),
        description: trail.description.clone(),
        action: CardAction::for_state(model.is_trail_favorited(trail)),
    }
}

#[must_use]
pub fn build(model: &Model) -> ViewModel {
    let content = if model.is_loading {
        BrowserContent::Loading {
            message: model.config.loading_message.clone(),
        }
    } else if model.trails.is_empty() {
        BrowserContent::Empty {
            message: model.config.empty_message.clone(),
        }
    } else {
        BrowserContent::Cards {
            cards: model
                .trails
                .iter()
                .enumerate()
                .map(|(index, entry)| build_card(model, index, entry))
                .collect(),
        }
    };

    ViewModel {
        show_header: model.is_authenticated,
        title: model.config.page_title.clone(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecorativeImage, FavoriteEntry, FavoriteId, Trail, User};

    fn entry(name: &str, image: u8) -> CatalogEntry {
        CatalogEntry {
            trail: Trail {
                name: name.into(),
                city: "Boulder".into(),
                state: "CO".into(),
                country: "US".into(),
                description: "Up and over.".into(),
                ..Default::default()
            },
            image: DecorativeImage(image),
        }
    }

    fn loaded(trails: Vec<CatalogEntry>, favorites: &[&str]) -> Model {
        let mut model = Model::default();
        model.staged_catalog = Some(trails);
        model.finish_loading(User {
            trails: favorites
                .iter()
                .enumerate()
                .map(|(i, name)| FavoriteEntry {
                    trail_id: FavoriteId::new(format!("f{i}")),
                    name: (*name).into(),
                    trail_length: None,
                })
                .collect(),
            ..Default::default()
        });
        model
    }

    #[test]
    fn test_loading_shows_only_indicator() {
        let vm = build(&Model::default());
        assert_eq!(
            vm.content,
            BrowserContent::Loading {
                message: "Loading...".into()
            }
        );
        assert_eq!(vm.title, "Find New Trails");
    }

    #[test]
    fn test_empty_catalog_message() {
        let vm = build(&loaded(vec![], &[]));
        assert_eq!(
            vm.content,
            BrowserContent::Empty {
                message: "No trails found.".into()
            }
        );
    }

    #[test]
    fn test_card_fields() {
        let vm = build(&loaded(vec![entry("Ridge Loop", 12)], &[]));
        let BrowserContent::Cards { cards } = vm.content else {
            panic!("expected cards");
        };

        let card = &cards[0];
        assert_eq!(card.index, 0);
        assert_eq!(card.image_index, 12);
        assert_eq!(card.image_asset, "image12");
        assert_eq!(card.image_alt, "Ridge Loop");
        assert_eq!(card.location, "Boulder, CO, US");
        assert_eq!(card.description, "Up and over.");
        assert_eq!(card.action.label, "Add To favorites");
        assert_eq!(card.action.style, ActionStyle::Primary);
        assert_eq!(card.action.kind, ActionKind::AddToFavorites);
    }

    #[test]
    fn test_favorited_card_offers_remove() {
        let vm = build(&loaded(
            vec![entry("Ridge Loop", 1), entry("Mesa", 2)],
            &["Mesa"],
        ));
        let BrowserContent::Cards { cards } = vm.content else {
            panic!("expected cards");
        };

        assert_eq!(cards[0].action.kind, ActionKind::AddToFavorites);
        assert_eq!(cards[1].action.label, "Remove");
        assert_eq!(cards[1].action.style, ActionStyle::Danger);
        assert_eq!(cards[1].action.kind, ActionKind::RemoveFromFavorites);
    }

    #[test]
    fn test_header_follows_authentication() {
        let mut model = loaded(vec![], &[]);
        assert!(!build(&model).show_header);
        model.is_authenticated = true;
        assert!(build(&model).show_header);
    }

    #[test]
    fn test_view_model_wire_shape() {
        let vm = build(&Model::default());
        let json = serde_json::to_value(&vm).unwrap();
        assert_eq!(json["content"]["type"], "loading");
    }
}
