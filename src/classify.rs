use std::collections::BTreeSet;

use crate::{
    error::Error,
    shared::{BodyRole, Dataset},
};

/// Splits body ids into ordinary and distinguished (massive) bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    total_bodies: u64,
    distinguished: BTreeSet<u64>,
}

impl Classifier {
    /// Assumes the bodies form three contiguous groups of `total / 3`, each led
    /// by its black hole. The layout is not checked.
    pub fn positional(total_bodies: u64) -> Self {
        let n = total_bodies / 3;
        Self {
            total_bodies,
            distinguished: [0, n, 2 * n].into_iter().collect(),
        }
    }

    pub fn explicit(total_bodies: u64, ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            total_bodies,
            distinguished: ids.into_iter().collect(),
        }
    }

    /// `T = max(id) + 1` over the whole dataset. `overrides` replaces the positional rule.
    pub fn from_dataset(dataset: &Dataset, overrides: Option<&[u64]>) -> Result<Self, Error> {
        let max_id = dataset.max_id().ok_or(Error::EmptyDataset)?;
        let total_bodies = max_id
            .checked_add(1)
            .ok_or(Error::BodyIdOverflow { id: max_id })?;
        let classifier = match overrides {
            Some(ids) => Self::explicit(total_bodies, ids.iter().copied()),
            None => Self::positional(total_bodies),
        };
        log::info!(
            "Detected {} bodies. Black hole IDs: {:?}",
            total_bodies,
            classifier.distinguished
        );
        Ok(classifier)
    }

    pub fn total_bodies(&self) -> u64 {
        self.total_bodies
    }

    pub fn distinguished_ids(&self) -> &BTreeSet<u64> {
        &self.distinguished
    }

    pub fn role(&self, id: u64) -> BodyRole {
        if self.distinguished.contains(&id) {
            BodyRole::Distinguished
        } else {
            BodyRole::Ordinary
        }
    }
}
