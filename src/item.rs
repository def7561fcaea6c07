//! Item identity and presentation
//!
//! Items handed to the widget are opaque. The widget only needs two things
//! from them: a key to de-duplicate selections and a label to display.
//! Both are derived through an [`ItemAdapter`], which hosts can override.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

/// Equality key used to de-duplicate items
///
/// Keys compare strictly: the number `7` and the text `"7"` are different
/// keys. Integral floats are stored as integers, so `7.0` equals `7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKey {
    /// Missing or null id
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Arrays and objects, in their serialized form
    Composite(String),
}

impl ItemKey {
    /// Create a text key
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self::Text(key.into())
    }

    /// The key's text, if it is a text key
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Key for a JSON value
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => Self::from(number.clone()),
            Value::String(text) => Self::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => Self::Composite(value.to_string()),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) | Self::Composite(text) => f.write_str(text),
        }
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for ItemKey {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for ItemKey {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Number> for ItemKey {
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn from(value: Number) -> Self {
        match value.as_f64() {
            Some(float)
                if value.is_f64() && float.fract() == 0.0 && float.abs() < 9_007_199_254_740_992.0 =>
            {
                Self::from(float as i64)
            }
            _ => Self::Number(value),
        }
    }
}

/// Items that carry the default `id` and `label` fields
pub trait DefaultFields {
    /// Value of the `id` field
    fn id(&self) -> ItemKey;

    /// Value of the `label` field
    fn label(&self) -> String;
}

/// A plain tag with an id and a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagItem {
    pub id: ItemKey,
    pub label: String,
}

impl TagItem {
    /// Create a new tag item
    #[must_use]
    pub fn new(id: impl Into<ItemKey>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl DefaultFields for TagItem {
    fn id(&self) -> ItemKey {
        self.id.clone()
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// JSON objects read their `id` and `label` members.
///
/// A missing id is a null key and a missing label is empty. Ids keep their
/// JSON type, so `1` and `"1"` are different keys.
impl DefaultFields for Value {
    fn id(&self) -> ItemKey {
        self.get("id").map_or(ItemKey::Null, ItemKey::from_json)
    }

    fn label(&self) -> String {
        match self.get("label") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

type KeyFn<T> = Arc<dyn Fn(&T) -> ItemKey + Send + Sync>;
type LabelFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Derives keys and labels from items
pub struct ItemAdapter<T> {
    key_of: KeyFn<T>,
    label_of: LabelFn<T>,
}

impl<T> ItemAdapter<T> {
    /// Build an adapter from explicit key and label functions
    pub fn new<K, L>(key_of: K, label_of: L) -> Self
    where
        K: Fn(&T) -> ItemKey + Send + Sync + 'static,
        L: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            key_of: Arc::new(key_of),
            label_of: Arc::new(label_of),
        }
    }

    /// Replace the key function
    #[must_use]
    pub fn with_key<K>(mut self, key_of: K) -> Self
    where
        K: Fn(&T) -> ItemKey + Send + Sync + 'static,
    {
        self.key_of = Arc::new(key_of);
        self
    }

    /// Replace the label function
    #[must_use]
    pub fn with_label<L>(mut self, label_of: L) -> Self
    where
        L: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.label_of = Arc::new(label_of);
        self
    }

    /// Key of an item
    pub fn key_of(&self, item: &T) -> ItemKey {
        (self.key_of)(item)
    }

    /// Display label of an item
    pub fn label_of(&self, item: &T) -> String {
        (self.label_of)(item)
    }

    /// Whether two items share a key
    pub fn same_key(&self, a: &T, b: &T) -> bool {
        self.key_of(a) == self.key_of(b)
    }
}

impl<T: DefaultFields + 'static> Default for ItemAdapter<T> {
    fn default() -> Self {
        Self::new(T::id, T::label)
    }
}

impl<T> Clone for ItemAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            key_of: Arc::clone(&self.key_of),
            label_of: Arc::clone(&self.label_of),
        }
    }
}

impl<T> fmt::Debug for ItemAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemAdapter").finish_non_exhaustive()
    }
}
