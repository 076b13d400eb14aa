use serde::{Deserialize, Serialize};

use super::ids;

/// Author summary attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostAuthor {
    #[serde(deserialize_with = "ids::flexible_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// A short post tied to a location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    #[serde(deserialize_with = "ids::flexible_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PostAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Partial post edit. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl From<CreatePostRequest> for UpdatePostRequest {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: Some(req.title),
            content: Some(req.content),
            address: Some(req.address),
            latitude: Some(req.latitude),
            longitude: Some(req.longitude),
        }
    }
}
