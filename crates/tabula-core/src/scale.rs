// File: crates/tabula-core/src/scale.rs
// Summary: Domain-to-range scales (linear, band, point, sequential color, ordinal color) and the binder.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::color::{ColorRamp, Rgba};
use crate::error::{ChartError, Result};
use crate::record::Value;

/// Tick count used when a caller asks for "nice" without a count.
pub const DEFAULT_TICKS: usize = 10;

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Linear,
    Band,
    Point,
    Sequential,
}

/// Positional transform shared by every pixel scale.
pub trait ScaleTransform {
    /// Pixel position of a value, `None` when the value is outside a categorical domain.
    fn position(&self, value: &Value) -> Option<f64>;
    /// Output range as `(start, end)` pixels.
    fn range(&self) -> (f64, f64);
}

/// Step between "nice" ticks; negative values encode `1 / step` for steps below one,
/// which keeps decimal ticks exact.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Absolute tick step for `count` ticks over `[start, stop]`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let inc = tick_increment(lo, hi, count);
    if inc >= 0.0 { inc } else { -1.0 / inc }
}

/// Uniformly spaced round values inside `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    let mut out: Vec<f64> = if inc > 0.0 {
        let (r0, r1) = ((lo / inc).ceil() as i64, (hi / inc).floor() as i64);
        (r0..=r1).map(|i| i as f64 * inc).collect()
    } else {
        let inv = -inc;
        let (r0, r1) = ((lo * inv).ceil() as i64, (hi * inv).floor() as i64);
        (r0..=r1).map(|i| i as f64 / inv).collect()
    };
    if reverse {
        out.reverse();
    }
    out
}

/// Continuous numeric scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range, clamp: false }
    }

    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Explicit reset; callers must do this (or rebuild) whenever the records behind
    /// the domain change.
    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    /// Degenerate domains map everything to the range midpoint.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let mut t = if span == 0.0 || !span.is_finite() { 0.5 } else { (x - d0) / span };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.5 } else { (px - r0) / span };
        d0 + t * (d1 - d0)
    }

    /// Extend the domain outward to round tick values for `count` ticks.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let reverse = d1 < d0;
        let (mut start, mut stop) = if reverse { (d1, d0) } else { (d0, d1) };
        if !(start.is_finite() && stop.is_finite()) || start == stop {
            return self;
        }

        let mut prestep = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prestep {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = step;
        }

        self.domain = if reverse { (stop, start) } else { (start, stop) };
        self
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

impl ScaleTransform for LinearScale {
    fn position(&self, value: &Value) -> Option<f64> {
        let x = value.as_number();
        (!x.is_nan()).then(|| self.map(x))
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Ordinal positions with a band of width `bandwidth()` per category.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    step: f64,
    bandwidth: f64,
    offsets: Vec<f64>,
}

impl BandScale {
    /// `padding` applies to both inner and outer padding, as a fraction of the step.
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        Self::with_padding(domain, range, padding, padding)
    }

    /// Repeated categories collapse onto their first occurrence, so every slot is occupied.
    fn with_padding(mut domain: Vec<String>, range: (f64, f64), inner: f64, outer: f64) -> Self {
        let mut index = HashMap::with_capacity(domain.len());
        domain.retain(|d| {
            let next = index.len();
            match index.entry(d.clone()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(next);
                    true
                }
            }
        });
        let mut s = Self {
            domain,
            index,
            range,
            padding_inner: inner,
            padding_outer: outer,
            step: 0.0,
            bandwidth: 0.0,
            offsets: Vec::new(),
        };
        s.rescale();
        s
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        let step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        let first = start + (stop - start - step * (n - self.padding_inner)) * 0.5;
        self.step = step;
        self.bandwidth = step * (1.0 - self.padding_inner);
        self.offsets = (0..self.domain.len()).map(|i| first + step * i as f64).collect();
        if reverse {
            self.offsets.reverse();
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn set_domain(&mut self, domain: Vec<String>) {
        *self = Self::with_padding(domain, self.range, self.padding_inner, self.padding_outer);
    }

    /// Start of the category's band.
    pub fn map(&self, category: &str) -> Option<f64> {
        self.index.get(category).map(|&i| self.offsets[i])
    }

    /// Middle of the category's band.
    pub fn center(&self, category: &str) -> Option<f64> {
        self.map(category).map(|x| x + self.bandwidth * 0.5)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl ScaleTransform for BandScale {
    fn position(&self, value: &Value) -> Option<f64> {
        self.map(&value.as_text())
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Evenly spaced points, one per category; a band scale with zero bandwidth.
#[derive(Clone, Debug, PartialEq)]
pub struct PointScale {
    band: BandScale,
}

impl PointScale {
    /// `padding` is the outer padding in units of the step.
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        Self { band: BandScale::with_padding(domain, range, 1.0, padding.max(0.0)) }
    }

    pub fn domain(&self) -> &[String] {
        self.band.domain()
    }

    pub fn set_domain(&mut self, domain: Vec<String>) {
        self.band.set_domain(domain);
    }

    pub fn map(&self, category: &str) -> Option<f64> {
        self.band.map(category)
    }

    pub fn step(&self) -> f64 {
        self.band.step()
    }
}

impl ScaleTransform for PointScale {
    fn position(&self, value: &Value) -> Option<f64> {
        self.band.position(value)
    }

    fn range(&self) -> (f64, f64) {
        self.band.range
    }
}

/// Numeric domain onto a color ramp.
#[derive(Clone, Debug, PartialEq)]
pub struct SequentialScale {
    domain: (f64, f64),
    ramp: ColorRamp,
}

impl SequentialScale {
    pub fn new(domain: (f64, f64), ramp: ColorRamp) -> Self {
        Self { domain, ramp }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    /// Degenerate domains map to the middle of the ramp.
    pub fn map(&self, x: f64) -> Rgba {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (x - d0) / span };
        self.ramp.at(t)
    }
}

/// Category to color with a fixed fallback for unknown categories.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdinalScale {
    colors: HashMap<String, Rgba>,
    domain: Vec<String>,
    unknown: Rgba,
}

impl OrdinalScale {
    /// Pair `domain[i]` with `palette[i % palette.len()]`.
    pub fn new(domain: Vec<String>, palette: &[Rgba], unknown: Rgba) -> Self {
        let colors = if palette.is_empty() {
            HashMap::new()
        } else {
            domain.iter().enumerate().map(|(i, d)| (d.clone(), palette[i % palette.len()])).collect()
        };
        Self { colors, domain, unknown }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Rgba)>, unknown: Rgba) -> Self {
        let mut domain = Vec::new();
        let mut colors = HashMap::new();
        for (k, c) in pairs {
            domain.push(k.to_string());
            colors.insert(k.to_string(), c);
        }
        Self { colors, domain, unknown }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn map(&self, category: &str) -> Rgba {
        self.colors.get(category).copied().unwrap_or(self.unknown)
    }
}

/// Where a scale's domain comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainSource {
    /// Explicit ordered categories (band/point).
    Categories(Vec<String>),
    /// Numeric `[lo, hi]` (linear/sequential).
    Extent(f64, f64),
}

impl DomainSource {
    pub fn categories<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DomainSource::Categories(items.into_iter().map(Into::into).collect())
    }

    /// Extent of the non-missing values; an empty subset yields `[0, 0]`.
    pub fn extent_of<'r, T, F>(items: impl IntoIterator<Item = &'r T>, accessor: F) -> Self
    where
        T: ?Sized + 'r,
        F: Fn(&T) -> f64,
    {
        let (lo, hi) = aggregate::extent(items, accessor).unwrap_or((0.0, 0.0));
        DomainSource::Extent(lo, hi)
    }

    /// `[0, max]`; an empty subset yields `[0, 0]`.
    pub fn zero_to_max<'r, T, F>(items: impl IntoIterator<Item = &'r T>, accessor: F) -> Self
    where
        T: ?Sized + 'r,
        F: Fn(&T) -> f64,
    {
        DomainSource::Extent(0.0, aggregate::max(items, accessor).unwrap_or(0.0))
    }
}

/// Output of a scale: pixels or colors.
#[derive(Clone, Debug, PartialEq)]
pub enum Range {
    Pixels(f64, f64),
    Colors(ColorRamp),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScaleOptions {
    /// Band/point padding fraction; 0 when not given.
    pub padding: f64,
    /// Multiplicative factor applied to the upper bound before niceing.
    pub headroom: Option<f64>,
    /// Nice the domain for this many ticks.
    pub nice: Option<usize>,
    pub clamp: bool,
}

impl ScaleOptions {
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn headroom(mut self, factor: f64) -> Self {
        self.headroom = Some(factor);
        self
    }

    pub fn nice(mut self, count: usize) -> Self {
        self.nice = Some(count);
        self
    }

    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    Linear(LinearScale),
    Band(BandScale),
    Point(PointScale),
    Sequential(SequentialScale),
}

impl Scale {
    pub fn kind(&self) -> ScaleKind {
        match self {
            Scale::Linear(_) => ScaleKind::Linear,
            Scale::Band(_) => ScaleKind::Band,
            Scale::Point(_) => ScaleKind::Point,
            Scale::Sequential(_) => ScaleKind::Sequential,
        }
    }

    pub fn as_linear(&self) -> Option<&LinearScale> {
        match self {
            Scale::Linear(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_band(&self) -> Option<&BandScale> {
        match self {
            Scale::Band(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&PointScale> {
        match self {
            Scale::Point(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequential(&self) -> Option<&SequentialScale> {
        match self {
            Scale::Sequential(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_linear(self) -> Result<LinearScale> {
        match self {
            Scale::Linear(s) => Ok(s),
            other => Err(ChartError::DomainMismatch { kind: other.kind(), expected: "linear" }),
        }
    }

    pub fn into_band(self) -> Result<BandScale> {
        match self {
            Scale::Band(s) => Ok(s),
            other => Err(ChartError::DomainMismatch { kind: other.kind(), expected: "band" }),
        }
    }

    pub fn into_point(self) -> Result<PointScale> {
        match self {
            Scale::Point(s) => Ok(s),
            other => Err(ChartError::DomainMismatch { kind: other.kind(), expected: "point" }),
        }
    }

    pub fn into_sequential(self) -> Result<SequentialScale> {
        match self {
            Scale::Sequential(s) => Ok(s),
            other => Err(ChartError::DomainMismatch { kind: other.kind(), expected: "sequential" }),
        }
    }

    /// Pixel position for positional kinds; sequential scales have none.
    pub fn position(&self, value: &Value) -> Option<f64> {
        match self {
            Scale::Linear(s) => s.position(value),
            Scale::Band(s) => s.position(value),
            Scale::Point(s) => s.position(value),
            Scale::Sequential(_) => None,
        }
    }
}

/// Build a scale of `kind` from a domain source and an output range.
///
/// Scales never update incrementally: when the contributing records or the accessor
/// change, bind a new scale (or reset its domain) before any mark uses it.
pub fn bind_scale(kind: ScaleKind, domain: DomainSource, range: Range, options: &ScaleOptions) -> Result<Scale> {
    let numeric = |domain: DomainSource| match domain {
        DomainSource::Extent(lo, hi) => {
            let hi = options.headroom.map_or(hi, |f| hi * f);
            Ok((lo, hi))
        }
        DomainSource::Categories(_) => Err(ChartError::DomainMismatch { kind, expected: "numeric" }),
    };
    let categorical = |domain: DomainSource| match domain {
        DomainSource::Categories(c) => Ok(c),
        DomainSource::Extent(..) => Err(ChartError::DomainMismatch { kind, expected: "categorical" }),
    };

    match (kind, range) {
        (ScaleKind::Linear, Range::Pixels(r0, r1)) => {
            let mut scale = LinearScale::new(numeric(domain)?, (r0, r1)).with_clamp(options.clamp);
            if let Some(count) = options.nice {
                scale = scale.nice(count);
            }
            Ok(Scale::Linear(scale))
        }
        (ScaleKind::Band, Range::Pixels(r0, r1)) => {
            Ok(Scale::Band(BandScale::new(categorical(domain)?, (r0, r1), options.padding)))
        }
        (ScaleKind::Point, Range::Pixels(r0, r1)) => {
            Ok(Scale::Point(PointScale::new(categorical(domain)?, (r0, r1), options.padding)))
        }
        (ScaleKind::Sequential, Range::Colors(ramp)) => {
            let mut d = numeric(domain)?;
            if let Some(count) = options.nice {
                d = LinearScale::new(d, (0.0, 1.0)).nice(count).domain();
            }
            Ok(Scale::Sequential(SequentialScale::new(d, ramp)))
        }
        (ScaleKind::Sequential, Range::Pixels(..)) => {
            Err(ChartError::DomainMismatch { kind, expected: "color range with a numeric" })
        }
        (_, Range::Colors(_)) => Err(ChartError::DomainMismatch { kind, expected: "pixel range with a matching" }),
    }
}
