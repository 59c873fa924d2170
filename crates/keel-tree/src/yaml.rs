//! Runtime-config tree backed by a parsed YAML value.
//!
//! Unlike the POM backend this one round-trips through `serde_yaml`, so the
//! emitted text is normalized block-style YAML. Comments in the source do not
//! survive; template configs are machine-owned, so nothing of value is lost.

use serde_yaml::{Mapping, Value};

use crate::{joined, PropertyTree, TreeError};

pub struct YamlDocument {
    root: Value,
}

impl YamlDocument {
    /// Parses `text` into a YAML tree. An empty document becomes a null root
    /// that [`PropertyTree::set`] upgrades to a mapping on first write.
    pub fn parse(text: &str) -> Result<Self, TreeError> {
        let root = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(text)?
        };
        Ok(Self { root })
    }

    /// Serializes the tree as block-style YAML.
    pub fn to_text(&self) -> Result<String, TreeError> {
        Ok(serde_yaml::to_string(&self.root)?)
    }
}

impl PropertyTree for YamlDocument {
    fn get(&self, path: &[&str]) -> Option<String> {
        let mut node = &self.root;
        for key in path {
            node = node.as_mapping()?.get(*key)?;
        }
        match node {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn set(&mut self, path: &[&str], value: &str) -> Result<(), TreeError> {
        let mut node = &mut self.root;
        for (i, key) in path.iter().enumerate() {
            if node.is_null() {
                *node = Value::Mapping(Mapping::new());
            }
            let map = node.as_mapping_mut().ok_or_else(|| TreeError::NotMapping {
                path: joined(&path[..i]),
            })?;
            if i + 1 == path.len() {
                map.insert(
                    Value::String((*key).to_string()),
                    Value::String(value.to_string()),
                );
                return Ok(());
            }
            node = map
                .entry(Value::String((*key).to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
        }
        Ok(())
    }

    fn remove(&mut self, path: &[&str]) -> Result<bool, TreeError> {
        let Some((last, parents)) = path.split_last() else {
            return Ok(false);
        };

        let mut node = &mut self.root;
        for (i, key) in parents.iter().enumerate() {
            let map = node.as_mapping_mut().ok_or_else(|| TreeError::NotMapping {
                path: joined(&path[..i]),
            })?;
            match map.get_mut(*key) {
                Some(child) => node = child,
                None => return Ok(false),
            }
        }

        match node.as_mapping_mut() {
            Some(map) => Ok(map.shift_remove(*last).is_some()),
            None => Err(TreeError::NotMapping {
                path: joined(parents),
            }),
        }
    }
}
