use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde_json;

use super::managererror::{ManagerError, parse_json_value};

/// Mutable registry filled while a catalog is being loaded.
pub struct ManagerBuilder<V: ?Sized> {
    map: HashMap<String, Arc<V>>
}

impl<V: ?Sized> ManagerBuilder<V> {
    pub fn new() -> ManagerBuilder<V> {
        ManagerBuilder { map: HashMap::new() }
    }

    pub fn insert(&mut self, name: String, value: Arc<V>) -> Result<(), ManagerError> {
        if self.map.contains_key(&name) {
            return Err(ManagerError::DuplicateName(name));
        }
        self.map.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<V>, ManagerError> {
        self.map
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::NameNotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn build(self) -> FrozenManager<V> {
        FrozenManager { map: self.map }
    }
}

impl<V: ?Sized> Default for ManagerBuilder<V> {
    fn default() -> Self {
        ManagerBuilder::new()
    }
}

/// Read-only registry; safe to share between threads when `V` is.
#[derive(Debug)]
pub struct FrozenManager<V: ?Sized> {
    map: HashMap<String, Arc<V>>
}

impl<V: ?Sized> FrozenManager<V> {
    pub fn get(&self, name: &str) -> Result<Arc<V>, ManagerError> {
        self.map
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::NameNotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Loads named objects from JSON into a [`ManagerBuilder`].
///
/// `S` carries whatever the loader needs besides the JSON itself.
pub trait IManager<V: ?Sized, S> {
    fn insert_obj_from_json(
        &self,
        builder: &mut ManagerBuilder<V>,
        json_value: serde_json::Value,
        supports: &S
    ) -> Result<(), ManagerError>;

    fn insert_obj_from_json_vec(
        &self,
        builder: &mut ManagerBuilder<V>,
        json_vec: &[serde_json::Value],
        supports: &S
    ) -> Result<(), ManagerError> {
        for j in json_vec.iter() {
            self.insert_obj_from_json(builder, j.clone(), supports)?;
        }
        Ok(())
    }

    fn from_json_vec(&self, json_vec: &[serde_json::Value], supports: &S) -> Result<FrozenManager<V>, ManagerError> {
        let mut builder = ManagerBuilder::new();
        self.insert_obj_from_json_vec(&mut builder, json_vec, supports)?;
        Ok(builder.build())
    }

    /// Accepts either a single object or an array of objects.
    fn from_json_value(&self, json_value: serde_json::Value, supports: &S) -> Result<FrozenManager<V>, ManagerError> {
        if json_value.is_array() {
            let json_array: Vec<serde_json::Value> = parse_json_value(json_value)?;
            self.from_json_vec(&json_array, supports)
        } else {
            self.from_json_vec(&[json_value], supports)
        }
    }

    fn from_reader<P: AsRef<Path>>(&self, file_path: P, supports: &S) -> Result<FrozenManager<V>, ManagerError> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|source| ManagerError::Io {
            path: path.display().to_string(),
            source
        })?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        self.from_json_value(json_value, supports)
    }
}
