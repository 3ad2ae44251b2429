//! Row identity and grouping keys

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use super::Item;
use super::Value;

/// A hashable, totally ordered key derived from a [`Value`].
///
/// Used both as the unique identity of a row in a selection and as the key a
/// row is grouped under. Keys of the same kind compare naturally (text
/// lexicographically, numbers numerically across `Int`/`Float`); keys of
/// different kinds order by kind: null, bool, number, text.
#[derive(Debug, Clone)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Key {
    /// Returns `true` if no key could be derived.
    pub fn is_null(&self) -> bool {
        matches!(self, Key::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Key::Null => 0,
            Key::Bool(_) => 1,
            Key::Int(_) | Key::Float(_) => 2,
            Key::Text(_) => 3,
        }
    }

    // -0.0 and 0.0 are the same key.
    fn norm(n: f64) -> f64 {
        if n == 0.0 { 0.0 } else { n }
    }

    fn float_bits(n: f64) -> u64 {
        Key::norm(n).to_bits()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Null, Key::Null) => true,
            (Key::Bool(a), Key::Bool(b)) => a == b,
            (Key::Int(a), Key::Int(b)) => a == b,
            (Key::Float(a), Key::Float(b)) => Key::float_bits(*a) == Key::float_bits(*b),
            (Key::Text(a), Key::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Key::Null => {}
            Key::Bool(b) => b.hash(state),
            Key::Int(n) => n.hash(state),
            Key::Float(n) => Key::float_bits(*n).hash(state),
            Key::Text(s) => s.hash(state),
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Bool(a), Key::Bool(b)) => a.cmp(b),
            (Key::Int(a), Key::Int(b)) => a.cmp(b),
            (Key::Float(a), Key::Float(b)) => Key::norm(*a).total_cmp(&Key::norm(*b)),
            // Mixed numbers compare by value; Int sorts first on a tie so Ord agrees with Eq.
            (Key::Int(a), Key::Float(b)) => (*a as f64)
                .total_cmp(&Key::norm(*b))
                .then(Ordering::Less),
            (Key::Float(a), Key::Int(b)) => Key::norm(*a)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (Key::Text(a), Key::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => Ok(()),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(n) => write!(f, "{}", n),
            Key::Float(n) => write!(f, "{}", n),
            Key::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Value> for Key {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Key::Null,
            Value::Bool(b) => Key::Bool(*b),
            Value::Int(n) => Key::Int(*n),
            Value::Float(n) => Key::Float(*n),
            Value::String(s) => Key::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Key::Text(value.to_string()),
        }
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Text(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::Text(v)
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Int(v as i64)
    }
}

/// Rule deriving a [`Key`] from an [`Item`]: a dotted field path or a function.
#[derive(Clone)]
pub enum KeyExtractor {
    /// Dotted field path, resolved with [`Item::lookup`].
    Path(String),
    /// Caller-supplied derivation.
    Func(Arc<dyn Fn(&Item) -> Key + Send + Sync>),
}

impl KeyExtractor {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Item) -> Key + Send + Sync + 'static,
    {
        Self::Func(Arc::new(f))
    }

    /// Derives the key for an item; a missing path yields [`Key::Null`].
    pub fn extract(&self, item: &Item) -> Key {
        match self {
            Self::Path(path) => item.lookup(path).map(Key::from).unwrap_or(Key::Null),
            Self::Func(f) => f(item),
        }
    }
}

impl fmt::Debug for KeyExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for KeyExtractor {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ordering_within_and_across_kinds() {
        let mut keys = vec![
            Key::from("b"),
            Key::Int(10),
            Key::from("a"),
            Key::Float(2.5),
            Key::Null,
            Key::Int(2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Key::Null,
                Key::Int(2),
                Key::Float(2.5),
                Key::Int(10),
                Key::from("a"),
                Key::from("b"),
            ]
        );
    }

    #[test]
    fn test_zero_floats_hash_alike() {
        let mut set = HashSet::new();
        set.insert(Key::Float(0.0));
        assert!(set.contains(&Key::Float(-0.0)));
    }

    #[test]
    fn test_extract_path_and_func() {
        let item = Item::new().set("meta", Item::new().set("code", "X1"));

        assert_eq!(KeyExtractor::path("meta.code").extract(&item), Key::from("X1"));
        assert_eq!(KeyExtractor::path("meta.other").extract(&item), Key::Null);

        let lower = KeyExtractor::func(|item| {
            Key::Text(
                item.lookup("meta.code")
                    .map(|v| v.to_string().to_lowercase())
                    .unwrap_or_default(),
            )
        });
        assert_eq!(lower.extract(&item), Key::from("x1"));
    }
}
