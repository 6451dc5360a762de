// File: crates/tabula-core/src/aggregate.rs
// Summary: Group-by aggregation engine with mean/count/sum/extent reducers and extent helpers.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Count,
    Sum,
    Extent,
    Min,
    Max,
}

/// Reduced value of one metric for one group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reduced {
    Value(f64),
    Extent(f64, f64),
}

impl Reduced {
    /// Scalar view; an extent reads as its upper bound.
    pub fn value(&self) -> f64 {
        match *self {
            Reduced::Value(v) => v,
            Reduced::Extent(_, hi) => hi,
        }
    }

    pub fn extent(&self) -> (f64, f64) {
        match *self {
            Reduced::Value(v) => (v, v),
            Reduced::Extent(lo, hi) => (lo, hi),
        }
    }

    fn zero(reducer: Reducer) -> Self {
        match reducer {
            Reducer::Extent => Reduced::Extent(0.0, 0.0),
            _ => Reduced::Value(0.0),
        }
    }
}

/// A named reduction over a numeric accessor.
pub struct Metric<'a, T: ?Sized> {
    name: String,
    reducer: Reducer,
    accessor: Box<dyn Fn(&T) -> f64 + 'a>,
}

impl<'a, T: ?Sized> Metric<'a, T> {
    pub fn new<F>(name: impl Into<String>, reducer: Reducer, accessor: F) -> Self
    where
        F: Fn(&T) -> f64 + 'a,
    {
        Self { name: name.into(), reducer, accessor: Box::new(accessor) }
    }

    pub fn mean<F: Fn(&T) -> f64 + 'a>(name: impl Into<String>, accessor: F) -> Self {
        Self::new(name, Reducer::Mean, accessor)
    }

    pub fn sum<F: Fn(&T) -> f64 + 'a>(name: impl Into<String>, accessor: F) -> Self {
        Self::new(name, Reducer::Sum, accessor)
    }

    pub fn extent<F: Fn(&T) -> f64 + 'a>(name: impl Into<String>, accessor: F) -> Self {
        Self::new(name, Reducer::Extent, accessor)
    }

    pub fn min<F: Fn(&T) -> f64 + 'a>(name: impl Into<String>, accessor: F) -> Self {
        Self::new(name, Reducer::Min, accessor)
    }

    pub fn max<F: Fn(&T) -> f64 + 'a>(name: impl Into<String>, accessor: F) -> Self {
        Self::new(name, Reducer::Max, accessor)
    }

    pub fn count(name: impl Into<String>) -> Self {
        Self::new(name, Reducer::Count, |_: &T| 0.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reducer(&self) -> Reducer {
        self.reducer
    }
}

#[derive(Clone, Copy)]
struct Accumulator {
    sum: f64,
    seen: usize,
    min: f64,
    max: f64,
}

impl Accumulator {
    const EMPTY: Self = Self { sum: 0.0, seen: 0, min: f64::INFINITY, max: f64::NEG_INFINITY };

    fn push(&mut self, v: f64) {
        // NaN is missing data, never a value
        if v.is_nan() {
            return;
        }
        self.sum += v;
        self.seen += 1;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn finish(&self, reducer: Reducer, count: usize) -> Reduced {
        let (min, max) = if self.seen == 0 { (f64::NAN, f64::NAN) } else { (self.min, self.max) };
        match reducer {
            Reducer::Count => Reduced::Value(count as f64),
            Reducer::Sum => Reduced::Value(self.sum),
            Reducer::Mean if self.seen == 0 => Reduced::Value(f64::NAN),
            Reducer::Mean => Reduced::Value(self.sum / self.seen as f64),
            Reducer::Extent => Reduced::Extent(min, max),
            Reducer::Min => Reduced::Value(min),
            Reducer::Max => Reduced::Value(max),
        }
    }
}

/// One aggregation bucket. Reduced groups always have `count > 0`; only
/// [`fill_cross_product`] creates `synthesized` groups with `count == 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<K> {
    pub key: K,
    pub count: usize,
    pub synthesized: bool,
    metrics: Vec<(String, Reduced)>,
}

impl<K> Group<K> {
    pub fn metric(&self, name: &str) -> Option<Reduced> {
        self.metrics.iter().find(|(n, _)| n == name).map(|(_, r)| *r)
    }

    /// Scalar value of a metric; NaN when the metric is unknown or had no data.
    pub fn value(&self, name: &str) -> f64 {
        self.metric(name).map_or(f64::NAN, |r| r.value())
    }

    pub fn metrics(&self) -> &[(String, Reduced)] {
        &self.metrics
    }
}

/// Output order of [`group_by`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupOrder {
    #[default]
    FirstSeen,
    Ascending,
}

/// Bucket `items` by `key_fn` and reduce every metric per bucket.
///
/// Exactly one group per distinct key; counts sum to the number of items.
/// Input is only read.
pub fn group_by<'r, T, K, F>(
    items: impl IntoIterator<Item = &'r T>,
    key_fn: F,
    metrics: &[Metric<'_, T>],
    order: GroupOrder,
) -> Vec<Group<K>>
where
    T: ?Sized + 'r,
    K: Eq + Hash + Ord + Clone,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<(K, usize, Vec<Accumulator>)> = Vec::new();

    for item in items {
        let key = key_fn(item);
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            buckets.push((key, 0, vec![Accumulator::EMPTY; metrics.len()]));
            buckets.len() - 1
        });
        let (_, count, accs) = &mut buckets[slot];
        *count += 1;
        for (acc, metric) in accs.iter_mut().zip(metrics) {
            if metric.reducer != Reducer::Count {
                acc.push((metric.accessor)(item));
            }
        }
    }

    let mut groups: Vec<Group<K>> = buckets
        .into_iter()
        .map(|(key, count, accs)| Group {
            key,
            count,
            synthesized: false,
            metrics: metrics
                .iter()
                .zip(&accs)
                .map(|(m, acc)| (m.name.clone(), acc.finish(m.reducer, count)))
                .collect(),
        })
        .collect();

    if order == GroupOrder::Ascending {
        groups.sort_by(|a, b| a.key.cmp(&b.key));
    }
    groups
}

/// Complete a two-level grouping over `rows × cols` (row-major order). Missing
/// pairs get a synthesized group with `count == 0` and every metric set to zero.
/// Metric names are taken from the first existing group.
pub fn fill_cross_product<A, B>(groups: Vec<Group<(A, B)>>, rows: &[A], cols: &[B]) -> Vec<Group<(A, B)>>
where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
{
    let template: Vec<(String, Reduced)> = groups
        .first()
        .map(|g| {
            g.metrics
                .iter()
                .map(|(name, r)| {
                    let zero = match r {
                        Reduced::Extent(..) => Reduced::zero(Reducer::Extent),
                        Reduced::Value(_) => Reduced::zero(Reducer::Sum),
                    };
                    (name.clone(), zero)
                })
                .collect()
        })
        .unwrap_or_default();

    let mut by_key: HashMap<(A, B), Group<(A, B)>> = groups.into_iter().map(|g| (g.key.clone(), g)).collect();
    let mut out = Vec::with_capacity(rows.len() * cols.len());
    for row in rows {
        for col in cols {
            let key = (row.clone(), col.clone());
            let group = by_key.remove(&key).unwrap_or_else(|| Group {
                key,
                count: 0,
                synthesized: true,
                metrics: template.clone(),
            });
            out.push(group);
        }
    }
    out
}

/// Sorted distinct keys.
pub fn distinct<'r, T, K, F>(items: impl IntoIterator<Item = &'r T>, key_fn: F) -> Vec<K>
where
    T: ?Sized + 'r,
    K: Ord,
    F: Fn(&T) -> K,
{
    items.into_iter().map(key_fn).collect::<BTreeSet<K>>().into_iter().collect()
}

/// `(min, max)` over the non-NaN values; `None` when there are none.
pub fn extent<'r, T, F>(items: impl IntoIterator<Item = &'r T>, accessor: F) -> Option<(f64, f64)>
where
    T: ?Sized + 'r,
    F: Fn(&T) -> f64,
{
    let mut acc = Accumulator::EMPTY;
    for item in items {
        acc.push(accessor(item));
    }
    (acc.seen > 0).then_some((acc.min, acc.max))
}

pub fn max<'r, T, F>(items: impl IntoIterator<Item = &'r T>, accessor: F) -> Option<f64>
where
    T: ?Sized + 'r,
    F: Fn(&T) -> f64,
{
    extent(items, accessor).map(|(_, hi)| hi)
}

/// The `n` most frequent keys, most frequent first; ties ordered by key.
pub fn top_by_count<'r, T, K, F>(items: impl IntoIterator<Item = &'r T>, key_fn: F, n: usize) -> Vec<K>
where
    T: ?Sized + 'r,
    K: Eq + Hash + Ord + Clone,
    F: Fn(&T) -> K,
{
    let mut groups = group_by(items, key_fn, &[], GroupOrder::Ascending);
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    groups.into_iter().take(n).map(|g| g.key).collect()
}

/// Discrete group key read from a cell's text. Numeric keys sort numerically and
/// before any non-numeric key, so generations 1..10 come out in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<f64> {
        self.0.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<std::borrow::Cow<'_, str>> for CategoryKey {
    fn from(s: std::borrow::Cow<'_, str>) -> Self {
        Self(s.into_owned())
    }
}
