use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of `/users/{username}/collection/folders/0/releases`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub releases: Vec<CollectionRelease>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub items: u32,
}

impl Pagination {
    /// Page count reported by the API; a missing or zero value means one page.
    pub fn total_pages(&self) -> u32 {
        self.pages.max(1)
    }
}

/// The projection handed back to clients. Fields Discogs sends beyond
/// `id`, `instance_id` and `basic_information` are dropped here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CollectionRelease {
    pub id: u64,
    pub instance_id: u64,
    #[serde(default)]
    pub basic_information: BasicInformation,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BasicInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<FormatRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<ArtistRef>>,
    /// Cover art, ids, genres and the like, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LabelRef {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FormatRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
