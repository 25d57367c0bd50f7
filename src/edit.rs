//! Dotted-path addressing of property schemas.
//!
//! A path like `list.name` starts at the root's `properties`. Each segment
//! names a property of the current node. When the current node has no such
//! property but is a list-form array, the lookup continues in its `items`
//! schema, so `list.name` reaches `properties.list.items.properties.name`.
//! Tuple-form `items` are never descended.
//!
//! Property names containing `.` cannot be addressed.
use indexmap::IndexSet;
use tracing::debug;

use crate::error::PathError;
use crate::schema::{Items, Schema};

impl Schema {
    /// Remove the property schema at `path` together with its subtree.
    ///
    /// Returns `Ok(false)` without touching the tree when any segment does not
    /// resolve, so optional paths can be deleted without checking first.
    pub fn delete_prop(&mut self, path: &str) -> Result<bool, PathError> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(PathError::Empty);
        };

        let mut node = self;
        for seg in parents {
            match node.holder_mut(seg).and_then(|h| h.object.properties.get_mut(*seg)) {
                Some(child) => node = child,
                None => {
                    debug!(path, missing = *seg, "property path does not resolve; nothing deleted");
                    return Ok(false);
                }
            }
        }

        let removed = node
            .holder_mut(last)
            .and_then(|h| h.object.properties.shift_remove(*last))
            .is_some();
        if !removed {
            debug!(path, "property path does not resolve; nothing deleted");
        }
        Ok(removed)
    }

    /// Every addressable property path, depth first in document order.
    ///
    /// A property's own path comes before the paths beneath it.
    pub fn get_all_props(&self) -> Vec<String> {
        let mut out = IndexSet::new();
        collect_props(self, None, &mut out);
        out.into_iter().collect()
    }

    /// The property schema at `path`, using the same addressing as
    /// [`Schema::delete_prop`].
    pub fn get_prop(&self, path: &str) -> Result<Option<&Schema>, PathError> {
        let mut node = self;
        for seg in split_path(path)? {
            match node.holder(seg).and_then(|h| h.object.properties.get(seg)) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    /// The node whose `properties` declares `name`: this node, or the
    /// `items` schema of a list-form array (recursively).
    fn holder(&self, name: &str) -> Option<&Schema> {
        if self.object.properties.contains_key(name) {
            return Some(self);
        }
        match &self.array.items {
            Some(Items::List(item)) => item.holder(name),
            _ => None,
        }
    }

    fn holder_mut(&mut self, name: &str) -> Option<&mut Schema> {
        if self.object.properties.contains_key(name) {
            return Some(self);
        }
        match &mut self.array.items {
            Some(Items::List(item)) => item.holder_mut(name),
            _ => None,
        }
    }
}

fn collect_props(node: &Schema, prefix: Option<&str>, out: &mut IndexSet<String>) {
    for (name, child) in &node.object.properties {
        let path = match prefix {
            Some(p) => format!("{p}.{name}"),
            None => name.clone(),
        };
        out.insert(path.clone());
        collect_props(child, Some(&path), out);
    }
    if let Some(Items::List(item)) = &node.array.items {
        collect_props(item, prefix, out);
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    path.split('.')
        .enumerate()
        .map(|(position, seg)| {
            if seg.is_empty() {
                Err(PathError::EmptySegment { path: path.to_string(), position })
            } else {
                Ok(seg)
            }
        })
        .collect()
}
