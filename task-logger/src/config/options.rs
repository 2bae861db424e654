use crate::error::ConfigError;
use serde::de::value::StringDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Dotted `prefix.suffix` tag attached to every entry of one callable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogLabel(String);

impl LogLabel {
    /// Joins the non-empty segments with a dot.
    pub fn new(prefix: &str, suffix: &str) -> Self {
        let label = match (prefix.is_empty(), suffix.is_empty()) {
            (false, false) => format!("{prefix}.{suffix}"),
            (false, true) => prefix.to_string(),
            (true, _) => suffix.to_string(),
        };
        Self(label)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification table from error kind to log message.
///
/// Shared read-only once built; adding entries produces a new table.
#[derive(Debug)]
pub struct ExceptionMap<K> {
    entries: Arc<HashMap<K, String>>,
}

impl<K> Clone for ExceptionMap<K> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K> Default for ExceptionMap<K> {
    fn default() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
        }
    }
}

impl<K> ExceptionMap<K> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash> ExceptionMap<K> {
    pub fn get(&self, kind: &K) -> Option<&str> {
        self.entries.get(kind).map(String::as_str)
    }

    pub fn contains(&self, kind: &K) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn with(self, kind: K, message: impl Into<String>) -> Self
    where
        K: Clone,
    {
        let mut entries =
            Arc::try_unwrap(self.entries).unwrap_or_else(|shared| (*shared).clone());
        entries.insert(kind, message.into());
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl<K: Eq + Hash> From<HashMap<K, String>> for ExceptionMap<K> {
    fn from(entries: HashMap<K, String>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl<K: Eq + Hash> FromIterator<(K, String)> for ExceptionMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, String)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<HashMap<_, _>>())
    }
}

// Table keys arrive as strings; each one is parsed as a kind variant name.
impl<'de, K> Deserialize<'de> for ExceptionMap<K>
where
    K: Deserialize<'de> + Eq + Hash,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(name, message)| {
                let key: StringDeserializer<D::Error> = name.into_deserializer();
                let kind = K::deserialize(key)?;
                Ok((kind, message))
            })
            .collect()
    }
}

/// Options accepted when instrumenting a callable.
///
/// Every field has a default, so options can be built up with the `with_*`
/// methods or parsed from a TOML document:
///
/// ```toml
/// info_message = "Executing some code"
/// success_message = "Successfully executed"
/// label_prefix = "example"
/// timed = true
///
/// [exceptions]
/// DivisionByZero = "You can't divide by 0"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, bound(deserialize = "K: Deserialize<'de> + Eq + Hash"))]
pub struct InstrumentOptions<K> {
    pub info_message: String,
    pub success_message: String,
    pub exceptions: ExceptionMap<K>,
    pub label_prefix: String,
    /// Falls back to the callable's own name when unset.
    pub label_suffix: Option<String>,
    pub timed: bool,
}

impl<K> Default for InstrumentOptions<K> {
    fn default() -> Self {
        Self {
            info_message: String::new(),
            success_message: String::new(),
            exceptions: ExceptionMap::default(),
            label_prefix: String::new(),
            label_suffix: None,
            timed: false,
        }
    }
}

impl<K> InstrumentOptions<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info_message(mut self, message: impl Into<String>) -> Self {
        self.info_message = message.into();
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    pub fn with_exceptions(mut self, exceptions: ExceptionMap<K>) -> Self {
        self.exceptions = exceptions;
        self
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    pub fn with_label_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.label_suffix = Some(suffix.into());
        self
    }

    pub fn with_timing(mut self, timed: bool) -> Self {
        self.timed = timed;
        self
    }

    /// Freezes the options for one callable, using `default_suffix` when no
    /// explicit label suffix was given.
    pub fn resolve(&self, default_suffix: &str) -> InstrumentationConfig<K> {
        let suffix = self.label_suffix.as_deref().unwrap_or(default_suffix);
        InstrumentationConfig {
            info_message: self.info_message.clone(),
            success_message: self.success_message.clone(),
            exceptions: self.exceptions.clone(),
            label: LogLabel::new(&self.label_prefix, suffix),
            timed: self.timed,
        }
    }
}

impl<K: Eq + Hash + Clone> InstrumentOptions<K> {
    pub fn on_error(mut self, kind: K, message: impl Into<String>) -> Self {
        self.exceptions = self.exceptions.with(kind, message);
        self
    }
}

impl<K: DeserializeOwned + Eq + Hash> InstrumentOptions<K> {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse { source })
    }
}

/// Resolved, immutable configuration captured by one instrumented callable.
#[derive(Debug, Clone)]
pub struct InstrumentationConfig<K> {
    info_message: String,
    success_message: String,
    exceptions: ExceptionMap<K>,
    label: LogLabel,
    timed: bool,
}

impl<K> InstrumentationConfig<K> {
    pub fn info_message(&self) -> &str {
        &self.info_message
    }

    pub fn success_message(&self) -> &str {
        &self.success_message
    }

    pub fn exceptions(&self) -> &ExceptionMap<K> {
        &self.exceptions
    }

    pub fn label(&self) -> &LogLabel {
        &self.label
    }

    pub fn is_timed(&self) -> bool {
        self.timed
    }
}
