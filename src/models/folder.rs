//! Folder groups documents by id
use super::unique::deserialize_unique;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_unique")]
    pub files: Vec<String>,
}

impl Folder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            files: Vec::new(),
        }
    }
}
