//! Query parameters

use indexmap::IndexMap;

use crate::model::Value;

/// Ordered query-string parameters.
///
/// Merging is right-biased: a later source overwrites an earlier one on a
/// key collision, while the key keeps its original position.
///
/// # Example
///
/// ```
/// use datatable_lib::transport::QueryParams;
///
/// let base = QueryParams::new().with("page", 1).with("status", "open");
/// let merged = base.merged(&QueryParams::new().with("status", "closed"));
///
/// assert_eq!(
///     merged.to_pairs(),
///     vec![
///         ("page".to_string(), "1".to_string()),
///         ("status".to_string(), "closed".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: IndexMap<String, Value>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.params.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlays `other` onto `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: &QueryParams) {
        for (key, value) in &other.params {
            self.params.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy of `self` with `other` overlaid.
    pub fn merged(&self, other: &QueryParams) -> QueryParams {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Renders the parameters as query-string pairs.
    ///
    /// Null values are dropped.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.to_query_value()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
