// File: crates/tabula-core/src/render.rs
// Summary: Keyed data join that binds items to marks in one layer, with in-place updates.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::canvas::{Canvas, LayerId};
use crate::mark::{Emphasis, Mark, MarkKey};

/// Outcome of one join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Live binding between a data sequence and the marks of one layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handle {
    layer: LayerId,
}

/// Draw one mark per item into `layer`, replacing whatever the layer held.
pub fn render<'d, T, K, E>(canvas: &mut Canvas, layer: LayerId, data: impl IntoIterator<Item = &'d T>, key_fn: K, encode: E) -> Handle
where
    T: ?Sized + 'd,
    K: Fn(&T) -> MarkKey,
    E: FnMut(&T) -> Mark,
{
    canvas.clear_layer(layer);
    let mut handle = Handle { layer };
    handle.update(canvas, data, key_fn, encode);
    handle
}

impl Handle {
    /// Take over `layer` with no marks; the first update enters every item.
    pub fn attach(canvas: &mut Canvas, layer: LayerId) -> Self {
        canvas.clear_layer(layer);
        Self { layer }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// Re-apply `encode` to `data`, joined to existing marks by `key_fn`.
    ///
    /// Marks whose key is still present keep their slot and take the new encoding
    /// (an active emphasis overlay survives); new keys are appended in data order;
    /// marks whose key is gone are removed. When two items share a key only the
    /// first is drawn.
    pub fn update<'d, T, K, E>(&mut self, canvas: &mut Canvas, data: impl IntoIterator<Item = &'d T>, key_fn: K, mut encode: E) -> JoinSummary
    where
        T: ?Sized + 'd,
        K: Fn(&T) -> MarkKey,
        E: FnMut(&T) -> Mark,
    {
        let mut order: Vec<MarkKey> = Vec::new();
        let mut incoming: HashMap<MarkKey, Mark> = HashMap::new();
        let mut duplicates = 0usize;
        for item in data {
            let key = key_fn(item);
            if incoming.contains_key(&key) {
                duplicates += 1;
                continue;
            }
            let mut mark = encode(item);
            mark.key = key.clone();
            order.push(key.clone());
            incoming.insert(key, mark);
        }
        if duplicates > 0 {
            warn!(duplicates, "items with duplicate mark keys were skipped");
        }

        let layer = canvas.layer_mut(self.layer);
        let mut summary = JoinSummary::default();
        let mut kept: HashSet<MarkKey> = HashSet::new();
        let mut marks = Vec::with_capacity(order.len());

        for old in layer.marks.drain(..) {
            match incoming.remove(&old.key) {
                Some(mut mark) => {
                    mark.emphasis = old.emphasis;
                    kept.insert(mark.key.clone());
                    marks.push(mark);
                    summary.updated += 1;
                }
                None => summary.exited += 1,
            }
        }
        for key in order {
            if kept.contains(&key) {
                continue;
            }
            if let Some(mark) = incoming.remove(&key) {
                marks.push(mark);
                summary.entered += 1;
            }
        }
        layer.marks = marks;

        debug!(entered = summary.entered, updated = summary.updated, exited = summary.exited, "join");
        summary
    }

    pub fn len(&self, canvas: &Canvas) -> usize {
        canvas.layer(self.layer).marks.len()
    }

    pub fn is_empty(&self, canvas: &Canvas) -> bool {
        self.len(canvas) == 0
    }

    pub fn keys(&self, canvas: &Canvas) -> Vec<MarkKey> {
        canvas.layer(self.layer).marks.iter().map(|m| m.key.clone()).collect()
    }

    pub fn mark<'c>(&self, canvas: &'c Canvas, key: &MarkKey) -> Option<&'c Mark> {
        canvas.find_mark(self.layer, key)
    }

    /// Overlay `emphasis` on the mark; `false` when no mark has that key.
    pub fn emphasize(&self, canvas: &mut Canvas, key: &MarkKey, emphasis: Emphasis) -> bool {
        match canvas.layer_mut(self.layer).find_mut(key) {
            Some(mark) => {
                mark.emphasis = Some(emphasis);
                true
            }
            None => false,
        }
    }

    /// Return the mark to its base style.
    pub fn revert(&self, canvas: &mut Canvas, key: &MarkKey) -> bool {
        match canvas.layer_mut(self.layer).find_mut(key) {
            Some(mark) => {
                mark.emphasis = None;
                true
            }
            None => false,
        }
    }

    pub fn revert_all(&self, canvas: &mut Canvas) {
        for mark in &mut canvas.layer_mut(self.layer).marks {
            mark.emphasis = None;
        }
    }
}
