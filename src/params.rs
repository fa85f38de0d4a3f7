use smallvec::SmallVec;

/// Receiver for path parameter bindings. The tree only ever writes through
/// this; it never reads a binding back (captures for a failed branch are
/// simply not recorded, so no rewind capability is required).
pub trait CaptureSink {
    fn record(&mut self, key: &str, value: &str);
}

/// Default capture container: an ordered list of owned `(key, value)` pairs,
/// inline up to four entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(SmallVec<[(String, String); 4]>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl CaptureSink for Params {
    fn record(&mut self, key: &str, value: &str) {
        self.0.push((key.to_string(), value.to_string()));
    }
}

impl CaptureSink for Vec<(String, String)> {
    fn record(&mut self, key: &str, value: &str) {
        self.push((key.to_string(), value.to_string()));
    }
}

/// Sink that discards every binding. Handy for callers that only care
/// whether a path matches: `tree.get(m, p, Option::<&mut NoopSink>::None)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl CaptureSink for NoopSink {
    fn record(&mut self, _key: &str, _value: &str) {}
}
