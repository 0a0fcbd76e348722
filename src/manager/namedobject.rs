use serde::{
    Serialize,
    Deserialize
};

/// Name and optional parent of a catalog entry, read ahead of the full entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedJsonObject {
    name: String,
    #[serde(default)]
    parent: Option<String>
}


impl NamedJsonObject {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}
