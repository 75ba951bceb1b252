use crate::value::Value;

/// Path queries over a [`Value`].
///
/// A query is a dot-separated list of segments. Each segment is an optional field name
/// followed by any number of `[index]` suffixes, e.g. `order.lines[0].sku` or `matrix[1][2]`.
pub struct Query<'a> {
    source: &'a Value,
}

impl<'a> Query<'a> {
    pub fn new(source: &'a Value) -> Self {
        Self { source }
    }

    /// Resolve `path`. `None` when any step is missing or the result is `Null`.
    pub fn find(&self, path: &str) -> Option<&'a Value> {
        let mut current = self.source;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = Self::step(current, segment)?;
        }
        current.is_present().then_some(current)
    }

    /// Resolve `path` and require an array.
    pub fn find_array(&self, path: &str) -> Option<&'a [Value]> {
        self.find(path)?.as_list()
    }

    fn step(current: &'a Value, segment: &str) -> Option<&'a Value> {
        let (name, mut indexes) = match segment.find('[') {
            Some(pos) => (&segment[..pos], &segment[pos..]),
            None => (segment, ""),
        };

        let mut current = if name.is_empty() {
            current
        } else {
            current.get(name)?
        };

        while !indexes.is_empty() {
            let close = indexes.find(']')?;
            let index: usize = indexes.get(1..close)?.parse().ok()?;
            current = current.as_list()?.get(index)?;
            indexes = &indexes[close + 1..];
            if !indexes.is_empty() && !indexes.starts_with('[') {
                return None;
            }
        }
        Some(current)
    }
}
