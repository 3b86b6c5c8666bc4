use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::config::BrowserConfig;
use crate::error::BrowserError;

// --- Lenient wire decoding ---
//
// The catalog and profile services are not consistent about field types:
// the same field shows up as a string, a number or null. A record-shaped
// entry always decodes; fields of the wrong shape fall back to empty.

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_number(&Value::deserialize(deserializer)?))
}

fn lenient_record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// `None` only for null; any other value counts as present.
fn present_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(serde_json::from_value(other).unwrap_or_default()),
    })
}

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                lenient_text(deserializer).map(Self)
            }
        }
    };
}

// Catalog identifier of a trail.
typed_id!(PlaceId);
// Server identifier of a favorite record; not the same thing as a PlaceId.
typed_id!(FavoriteId);

// --- Catalog records ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trail {
    pub place_id: PlaceId,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub city: String,
    #[serde(deserialize_with = "lenient_text")]
    pub state: String,
    #[serde(deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_record")]
    pub activities: Activities,
}

impl Trail {
    #[must_use]
    pub fn hiking(&self) -> Option<&HikingActivity> {
        self.activities.hiking.as_ref()
    }

    #[must_use]
    pub fn hiking_length(&self) -> Option<f64> {
        self.hiking()?.length.as_ref().and_then(scalar_number)
    }

    /// "city, state, country", exactly as the card shows it.
    #[must_use]
    pub fn location_line(&self) -> String {
        format!("{}, {}, {}", self.city, self.state, self.country)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activities {
    #[serde(deserialize_with = "present_record")]
    pub hiking: Option<HikingActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HikingActivity {
    /// Kept as sent; the favorite request forwards it untouched.
    pub length: Option<Value>,
}

/// 1-based index into the shell's decorative image pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecorativeImage(pub u8);

impl DecorativeImage {
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// A trail as the page holds it: the catalog record plus its image roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub trail: Trail,
    pub image: DecorativeImage,
}

// --- Profile ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FavoriteEntry {
    pub trail_id: FavoriteId,
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_number")]
    pub trail_length: Option<f64>,
}

/// Signed-in user's profile. Only `trails` drives the page; the rest is
/// carried for the shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "lenient_optional_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_optional_text")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub trails: Vec<FavoriteEntry>,
}

impl User {
    /// Decodes a profile body. `favoritedTrails` stands in for `trails`
    /// when the latter is missing.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ProfileDecode`] when the body is not an object
    /// or `trails` is not a list of favorite records.
    pub fn from_json(mut value: Value) -> Result<Self, BrowserError> {
        if let Value::Object(map) = &mut value {
            if let Some(legacy) = map.remove("favoritedTrails") {
                map.entry("trails").or_insert(legacy);
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// First favorite whose name matches exactly. Names are the only link
    /// between a favorite record and a catalog trail, so same-named trails
    /// share one entry.
    #[must_use]
    pub fn favorite_named(&self, name: &str) -> Option<&FavoriteEntry> {
        self.trails.iter().find(|favorite| favorite.name == name)
    }
}

/// Body of the favorite-mutation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePayload {
    pub app_id: PlaceId,
    pub name: String,
    /// Omitted from the body when the trail has no length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_length: Option<Value>,
}

impl FavoritePayload {
    /// # Errors
    ///
    /// Returns [`BrowserError::NotAHike`] when the trail has no hiking
    /// activity at all.
    pub fn for_trail(trail: &Trail) -> Result<Self, BrowserError> {
        let hiking = trail.hiking().ok_or_else(|| BrowserError::NotAHike {
            name: trail.name.clone(),
        })?;

        Ok(Self {
            app_id: trail.place_id.clone(),
            name: trail.name.clone(),
            trail_length: hiking.length.clone(),
        })
    }
}

// --- Page state ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Unmounted,
    Mounted,
    TornDown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub lifecycle: Lifecycle,
    pub is_authenticated: bool,
    /// True until the first catalog and profile pair lands. Never set back.
    pub is_loading: bool,
    pub trails: Vec<CatalogEntry>,
    pub user: Option<User>,
    /// Catalog that arrived before the initial profile fetch finished.
    pub staged_catalog: Option<Vec<CatalogEntry>>,
    pub config: BrowserConfig,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Unmounted,
            is_authenticated: false,
            is_loading: true,
            trails: Vec::new(),
            user: None,
            staged_catalog: None,
            config: BrowserConfig::default(),
        }
    }
}

impl Model {
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.lifecycle == Lifecycle::TornDown
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted && !self.is_loading
    }

    #[must_use]
    pub fn is_trail_favorited(&self, trail: &Trail) -> bool {
        self.favorite_for(trail).is_some()
    }

    #[must_use]
    pub fn favorite_for(&self, trail: &Trail) -> Option<&FavoriteEntry> {
        self.user.as_ref()?.favorite_named(&trail.name)
    }

    /// # Errors
    ///
    /// Returns [`BrowserError::UnknownTrail`] when no card sits at `index`.
    pub fn trail_at(&self, index: usize) -> Result<&Trail, BrowserError> {
        self.trails
            .get(index)
            .map(|entry| &entry.trail)
            .ok_or(BrowserError::UnknownTrail {
                index,
                len: self.trails.len(),
            })
    }

    /// Moves the staged catalog into place and leaves the loading state.
    pub fn finish_loading(&mut self, user: User) {
        if let Some(trails) = self.staged_catalog.take() {
            self.trails = trails;
        }
        self.user = Some(user);
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn trail(name: &str) -> Trail {
        Trail {
            name: name.into(),
            ..Default::default()
        }
    }

    fn favorite(name: &str, id: &str) -> FavoriteEntry {
        FavoriteEntry {
            trail_id: FavoriteId::new(id),
            name: name.into(),
            trail_length: Some(1.0),
        }
    }

    #[test]
    fn test_trail_decodes_full_record() {
        let t: Trail = serde_json::from_value(json!({
            "name": "Ridge Loop",
            "place_id": "p1",
            "activities": {"hiking": {"length": 3.2}},
            "city": "Boulder",
            "state": "CO",
            "country": "US",
            "description": "..."
        }))
        .unwrap();

        assert_eq!(t.place_id.as_str(), "p1");
        assert_eq!(t.hiking_length(), Some(3.2));
        assert_eq!(t.location_line(), "Boulder, CO, US");
    }

    #[test]
    fn test_trail_tolerates_nulls_and_numeric_ids() {
        let t: Trail = serde_json::from_value(json!({
            "name": "Mesa",
            "place_id": 4021,
            "city": null,
            "activities": {"hiking": {"length": "2.5"}}
        }))
        .unwrap();

        assert_eq!(t.place_id.as_str(), "4021");
        assert_eq!(t.city, "");
        assert_eq!(t.hiking_length(), Some(2.5));
    }

    #[test]
    fn test_trail_without_hiking() {
        let t: Trail = serde_json::from_value(json!({"name": "Bike Only"})).unwrap();
        assert_eq!(t.hiking_length(), None);
        assert!(matches!(
            FavoritePayload::for_trail(&t),
            Err(BrowserError::NotAHike { .. })
        ));

        let t: Trail =
            serde_json::from_value(json!({"name": "Bike Only", "activities": {"hiking": null}}))
                .unwrap();
        assert!(t.hiking().is_none());
    }

    #[test]
    fn test_trail_tolerates_mistyped_fields() {
        let t: Trail = serde_json::from_value(json!({
            "name": 42,
            "place_id": {"nested": true},
            "city": ["Boulder"],
            "state": false,
            "description": 7,
            "activities": {"hiking": "x"}
        }))
        .unwrap();

        assert_eq!(t.name, "42");
        assert_eq!(t.place_id.as_str(), "");
        assert_eq!(t.city, "");
        assert_eq!(t.state, "false");
        assert_eq!(t.description, "7");
        assert!(t.hiking().is_some());
        assert_eq!(t.hiking_length(), None);

        let t: Trail =
            serde_json::from_value(json!({"name": "Mesa", "activities": "none"})).unwrap();
        assert!(t.hiking().is_none());
    }

    #[test]
    fn test_favorite_payload_without_length() {
        let t: Trail = serde_json::from_value(json!({
            "name": "Ridge Loop",
            "place_id": "p1",
            "activities": {"hiking": {}}
        }))
        .unwrap();

        let payload = FavoritePayload::for_trail(&t).unwrap();
        assert_eq!(payload.trail_length, None);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"appId": "p1", "name": "Ridge Loop"})
        );
    }

    #[test]
    fn test_favorite_payload_forwards_raw_length() {
        let t: Trail = serde_json::from_value(json!({
            "name": "Mesa",
            "place_id": "p2",
            "activities": {"hiking": {"length": "3.2"}}
        }))
        .unwrap();

        let payload = FavoritePayload::for_trail(&t).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"appId": "p2", "name": "Mesa", "trailLength": "3.2"})
        );
    }

    #[test]
    fn test_favorite_payload_wire_shape() {
        let t: Trail = serde_json::from_value(json!({
            "name": "Ridge Loop",
            "place_id": "p1",
            "activities": {"hiking": {"length": 3.2}}
        }))
        .unwrap();

        let payload = FavoritePayload::for_trail(&t).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"appId": "p1", "name": "Ridge Loop", "trailLength": 3.2})
        );
    }

    #[test]
    fn test_user_decodes_camel_case_favorites() {
        let user = User::from_json(json!({
            "username": "hiker",
            "trails": [{"name": "Ridge Loop", "trailId": 17, "trailLength": 3.2}]
        }))
        .unwrap();

        assert_eq!(user.username.as_deref(), Some("hiker"));
        assert_eq!(user.trails[0].trail_id.as_str(), "17");
        assert_eq!(user.trails[0].trail_length, Some(3.2));
    }

    #[test]
    fn test_user_accepts_favorited_trails_alias() {
        let user = User::from_json(json!({
            "favoritedTrails": [{"name": "A", "trailId": "f1"}]
        }))
        .unwrap();
        assert_eq!(user.trails.len(), 1);
    }

    #[test]
    fn test_user_prefers_trails_over_alias() {
        let user = User::from_json(json!({
            "trails": [{"name": "A", "trailId": "f1"}],
            "favoritedTrails": [{"name": "B", "trailId": "f2"}, {"name": "C", "trailId": "f3"}]
        }))
        .unwrap();
        assert_eq!(user.trails.len(), 1);
        assert_eq!(user.trails[0].name, "A");
    }

    #[test]
    fn test_user_tolerates_unused_field_types() {
        let user = User::from_json(json!({
            "id": "u-17",
            "username": 99,
            "city": {"name": "Boulder"},
            "experience": null,
            "trails": [{"name": 5, "trailId": 17}]
        }))
        .unwrap();

        assert_eq!(user.id.as_deref(), Some("u-17"));
        assert_eq!(user.username.as_deref(), Some("99"));
        assert_eq!(user.city, None);
        assert_eq!(user.trails[0].name, "5");
    }

    #[test]
    fn test_user_rejects_unusable_trails() {
        assert!(matches!(
            User::from_json(json!({"trails": "none"})),
            Err(BrowserError::ProfileDecode { .. })
        ));
    }

    #[test]
    fn test_user_rejects_non_object() {
        assert!(matches!(
            User::from_json(json!("nope")),
            Err(BrowserError::ProfileDecode { .. })
        ));
    }

    #[test]
    fn test_favorited_false_without_user() {
        let model = Model::default();
        assert!(!model.is_trail_favorited(&trail("Ridge Loop")));
    }

    #[test]
    fn test_favorited_exact_name_match() {
        let mut model = Model::default();
        model.user = Some(User {
            trails: vec![favorite("Ridge Loop", "f1")],
            ..Default::default()
        });

        assert!(model.is_trail_favorited(&trail("Ridge Loop")));
        assert!(!model.is_trail_favorited(&trail("ridge loop")));
        assert!(!model.is_trail_favorited(&trail("Ridge Loop ")));
    }

    #[test]
    fn test_same_named_trails_share_a_favorite() {
        let mut model = Model::default();
        model.user = Some(User {
            trails: vec![favorite("Falls", "f9")],
            ..Default::default()
        });

        let east = Trail {
            place_id: PlaceId::new("east"),
            ..trail("Falls")
        };
        let west = Trail {
            place_id: PlaceId::new("west"),
            ..trail("Falls")
        };

        assert!(model.is_trail_favorited(&east));
        assert!(model.is_trail_favorited(&west));
        assert_eq!(
            model.favorite_for(&west).map(|f| f.trail_id.as_str()),
            Some("f9")
        );
    }

    #[test]
    fn test_default_model_is_loading() {
        let model = Model::default();
        assert!(model.is_loading);
        assert_eq!(model.lifecycle, Lifecycle::Unmounted);
        assert!(!model.is_ready());
    }

    #[test]
    fn test_trail_at_out_of_range() {
        let model = Model::default();
        assert_eq!(
            model.trail_at(2),
            Err(BrowserError::UnknownTrail { index: 2, len: 0 })
        );
    }

    #[test]
    fn test_finish_loading_moves_staged_catalog() {
        let mut model = Model::default();
        model.staged_catalog = Some(vec![CatalogEntry {
            trail: trail("A"),
            image: DecorativeImage(3),
        }]);

        model.finish_loading(User::default());

        assert!(!model.is_loading);
        assert!(model.staged_catalog.is_none());
        assert_eq!(model.trails.len(), 1);
        assert!(model.user.is_some());
    }

    proptest! {
        #[test]
        fn prop_favorited_iff_some_name_matches(
            name in "[ab]{0,3}",
            listed in proptest::collection::vec("[ab]{0,3}", 0..6),
        ) {
            let mut model = Model::default();
            prop_assert!(!model.is_trail_favorited(&trail(&name)));

            model.user = Some(User {
                trails: listed
                    .iter()
                    .enumerate()
                    .map(|(i, listed_name)| favorite(listed_name, &format!("f{i}")))
                    .collect(),
                ..Default::default()
            });

            let expected = listed.iter().any(|listed_name| *listed_name == name);
            prop_assert_eq!(model.is_trail_favorited(&trail(&name)), expected);
        }
    }
}
