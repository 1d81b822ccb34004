use serde::{Deserialize, Serialize};

use super::entity::{Reward, TextureRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub word: String,
    pub texture: TextureRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Added,
    AlreadyPresent,
}

/// Words collected during one playthrough, in the order they were learned.
/// There is no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
}

impl Inventory {
    pub fn grant(&mut self, reward: &Reward) -> GrantOutcome {
        if self.contains(&reward.word) {
            return GrantOutcome::AlreadyPresent;
        }
        self.entries.push(InventoryEntry {
            word: reward.word.clone(),
            texture: reward.texture.clone(),
        });
        GrantOutcome::Added
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.iter().any(|entry| entry.word == word)
    }

    pub fn texture_of(&self, word: &str) -> Option<&TextureRef> {
        self.entries
            .iter()
            .find(|entry| entry.word == word)
            .map(|entry| &entry.texture)
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.word.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
