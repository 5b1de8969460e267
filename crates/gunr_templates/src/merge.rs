//! Configuration overlay.
//!
//! Two layers of merging are used when a template config is laid over the
//! root config:
//!
//! - [`Overlay`] for the typed, closed parts of the schema. `Option` fields
//!   only change when the overlay carries `Some`, list fields are replaced
//!   wholesale and map fields merge key by key.
//! - [`merge_values`] for the open-ended JSON parts (send data extension
//!   fields, plain property values). Objects merge recursively, arrays and
//!   scalars replace. Template configs are laid over root defaults with
//!   [`MergeMode::PreserveDefaults`], so a `null` never clears a default.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// How `null` in a source value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Every source value replaces the target value, `null` included.
    #[default]
    Overwrite,
    /// A `null` source never replaces a value already present in the target.
    PreserveDefaults,
}

/// Lay `other` over `self`, with `other` taking precedence.
pub trait Overlay {
    fn overlay(&mut self, other: Self);

    /// Owned variant of [`Overlay::overlay`].
    fn overlaid(mut self, other: Self) -> Self
    where
        Self: Sized,
    {
        self.overlay(other);
        self
    }
}

impl<V: Overlay> Overlay for BTreeMap<String, V> {
    fn overlay(&mut self, other: Self) {
        for (key, value) in other {
            match self.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().overlay(value),
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
    }
}

impl Overlay for Map<String, Value> {
    fn overlay(&mut self, other: Self) {
        merge_maps(self, other, MergeMode::PreserveDefaults);
    }
}

impl Overlay for Value {
    fn overlay(&mut self, other: Self) {
        merge_values(self, other, MergeMode::PreserveDefaults);
    }
}

/// Merge an optional object-like field: both present merges, otherwise the
/// present side is kept.
pub fn overlay_option<T: Overlay>(target: &mut Option<T>, source: Option<T>) {
    match (target.as_mut(), source) {
        (Some(existing), Some(value)) => existing.overlay(value),
        (None, Some(value)) => *target = Some(value),
        (_, None) => {}
    }
}

/// Replace an optional scalar or list field when the source carries a value.
pub fn replace_option<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

/// Merge `source` into `target`.
pub fn merge_values(target: &mut Value, source: Value, mode: MergeMode) {
    match source {
        Value::Object(source) => match target {
            Value::Object(existing) => merge_maps(existing, source, mode),
            other => *other = Value::Object(source),
        },
        Value::Null if mode == MergeMode::PreserveDefaults && !target.is_null() => {}
        source => *target = source,
    }
}

/// Merge the keys of `source` into `target`.
pub fn merge_maps(target: &mut Map<String, Value>, source: Map<String, Value>, mode: MergeMode) {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(existing) => merge_values(existing, value, mode),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Merge two values into a fresh one, leaving both inputs untouched.
pub fn merge(target: &Value, source: &Value, mode: MergeMode) -> Value {
    let mut merged = target.clone();
    merge_values(&mut merged, source.clone(), mode);
    merged
}
