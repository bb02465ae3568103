use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to also return the matching nested/child documents.
///
/// The common options are typed; anything else (`sort`, `highlight`,
/// `_source`, ...) is carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InnerHits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_scores: Option<bool>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

pub struct InnerHitsBuilder<T> {
    inner: InnerHits,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InnerHitsBuilder<T> {
    pub fn new() -> Self {
        Self { inner: InnerHits::default(), _marker: PhantomData }
    }
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }
    pub fn from(mut self, from: u32) -> Self {
        self.inner.from = Some(from);
        self
    }
    pub fn size(mut self, size: u32) -> Self {
        self.inner.size = Some(size);
        self
    }
    pub fn explain(mut self, explain: bool) -> Self {
        self.inner.explain = Some(explain);
        self
    }
    pub fn version(mut self, version: bool) -> Self {
        self.inner.version = Some(version);
        self
    }
    pub fn track_scores(mut self, track_scores: bool) -> Self {
        self.inner.track_scores = Some(track_scores);
        self
    }
    /// Any other option, passed through as-is.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.extra.insert(key.into(), value.into());
        self
    }
    pub fn build(self) -> InnerHits {
        self.inner
    }
}

impl<T> Default for InnerHitsBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<InnerHitsBuilder<T>> for InnerHits {
    fn from(builder: InnerHitsBuilder<T>) -> Self {
        builder.inner
    }
}
