use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Moment;

use super::filter::FilteredMoments;

/// Every moment found in one analysis session, across all sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentPool {
    pub primary: Vec<Moment>,
    pub other: Vec<Moment>,
}

impl MomentPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, filtered: FilteredMoments) {
        self.primary.extend(filtered.primary);
        self.other.extend(filtered.other);
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.other.is_empty()
    }

    /// Primary moments first, then the rest.
    pub fn iter(&self) -> impl Iterator<Item = &Moment> {
        self.primary.iter().chain(self.other.iter())
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        count_by_label(self.iter())
    }
}

/// Count moments per display label ("People" for the primary bucket).
pub fn count_by_label<'a, I>(moments: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a Moment>,
{
    moments
        .into_iter()
        .fold(BTreeMap::new(), |mut counts, moment| {
            *counts.entry(moment.tag.name().to_string()).or_insert(0) += 1;
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MomentTag, SceneLabel};

    fn moment(tag: MomentTag) -> Moment {
        Moment {
            start: 0.0,
            end: 2.0,
            tag,
            source_id: "c.mp4".to_string(),
        }
    }

    #[test]
    fn counts_fold_over_labels() {
        let mut pool = MomentPool::new();
        pool.extend(FilteredMoments {
            primary: vec![moment(MomentTag::Primary), moment(MomentTag::Primary)],
            other: vec![
                moment(MomentTag::Other(SceneLabel::Food)),
                moment(MomentTag::Other(SceneLabel::Vehicle)),
                moment(MomentTag::Other(SceneLabel::Food)),
            ],
            discarded: 4,
        });

        let counts = pool.counts();
        assert_eq!(pool.len(), 5);
        assert_eq!(counts.get("People"), Some(&2));
        assert_eq!(counts.get("Food Scene"), Some(&2));
        assert_eq!(counts.get("Vehicle Scene"), Some(&1));
    }

    #[test]
    fn empty_pool_has_no_counts() {
        let pool = MomentPool::new();
        assert!(pool.is_empty());
        assert!(pool.counts().is_empty());
    }
}
