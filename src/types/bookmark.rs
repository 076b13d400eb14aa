use serde::{Deserialize, Serialize};

use super::ids;

/// Reference to the user that owns a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerRef {
    #[serde(deserialize_with = "ids::flexible_id")]
    pub id: String,
}

/// The post a bookmark was saved from, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostRef {
    #[serde(deserialize_with = "ids::flexible_id")]
    pub id: String,
    pub title: String,
}

/// A saved place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(deserialize_with = "ids::flexible_id")]
    pub id: String,
    pub place_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub created_at: String,
    pub user: OwnerRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostRef>,
}

impl Bookmark {
    pub fn owner_id(&self) -> &str {
        &self.user.id
    }

    pub fn source_post_id(&self) -> Option<&str> {
        self.post.as_ref().map(|p| p.id.as_str())
    }

    /// Identity of the real-world place this bookmark points at.
    pub fn place_key(&self) -> PlaceKey {
        PlaceKey::new(&self.place_name, self.latitude, self.longitude)
    }
}

/// Place identity used for membership: name plus exact coordinates.
///
/// Coordinates compare by bit pattern, so `37.5665` and `37.56650001`
/// are different places. Independently entered coordinates for the same
/// real-world spot are not reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceKey {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceKey {
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
        }
    }
}

impl PartialEq for PlaceKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for PlaceKey {}

impl std::hash::Hash for PlaceKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

/// Request body for bookmarking a place found through search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavePlaceRequest {
    pub place_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SavePlaceRequest {
    pub fn place_key(&self) -> PlaceKey {
        PlaceKey::new(&self.place_name, self.latitude, self.longitude)
    }
}
