//! Registry of named interactive targets.
//!
//! Targets are registered once at startup; their root nodes arrive later,
//! in arbitrary order, as the asynchronous model loads complete. A target
//! whose root is still unset is skipped by the picker entirely.

use crate::scene::{NodeId, Scene};
use fnv::FnvHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Lamp,
    Monitor,
    Naruto,
    Sasuke,
    Rasengan,
}

impl Target {
    pub fn label(self) -> &'static str {
        match self {
            Target::Lamp => "lamp",
            Target::Monitor => "monitor",
            Target::Naruto => "naruto",
            Target::Sasuke => "sasuke",
            Target::Rasengan => "rasengan",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("target '{}' is already registered", .0.label())]
    Duplicate(Target),
}

pub struct TargetRegistry {
    // Stable registration order; ties in the picker resolve to the
    // first-registered entry.
    entries: Vec<(Target, Option<NodeId>)>,
    index_of: FnvHashMap<Target, usize>,
    root_owner: FnvHashMap<NodeId, Target>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index_of: FnvHashMap::default(),
            root_owner: FnvHashMap::default(),
        }
    }

    pub fn register(&mut self, target: Target) -> Result<(), RegistryError> {
        if self.index_of.contains_key(&target) {
            return Err(RegistryError::Duplicate(target));
        }
        self.index_of.insert(target, self.entries.len());
        self.entries.push((target, None));
        Ok(())
    }

    /// Called once the owning model has finished loading.
    pub fn set_root(&mut self, target: Target, root: NodeId) {
        if let Some(i) = self.index_of.get(&target) {
            if let Some((_, slot)) = self.entries.get_mut(*i) {
                if let Some(old) = slot.take() {
                    self.root_owner.remove(&old);
                }
                *slot = Some(root);
                self.root_owner.insert(root, target);
            }
        }
    }

    pub fn root_of(&self, target: Target) -> Option<NodeId> {
        self.index_of
            .get(&target)
            .and_then(|i| self.entries.get(*i))
            .and_then(|(_, root)| *root)
    }

    /// Targets whose root node is currently set, in registration order.
    pub fn hit_testable(&self) -> impl Iterator<Item = (Target, NodeId)> + '_ {
        self.entries
            .iter()
            .filter_map(|(t, root)| root.map(|r| (*t, r)))
    }

    /// Walk ancestor links from a geometry node until a registered root is
    /// matched. `None` means the node belongs to static scenery.
    pub fn owner_of(&self, scene: &Scene, node: NodeId) -> Option<Target> {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if let Some(t) = self.root_owner.get(&c) {
                return Some(*t);
            }
            cur = scene.node(c).and_then(|n| n.parent);
        }
        None
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
