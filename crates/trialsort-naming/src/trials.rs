//! Chronological trial numbering within a task.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::task::TaskCode;

/// Anything that can be ranked into a trial.
pub trait Timestamped {
    fn task(&self) -> TaskCode;
    fn timestamp(&self) -> NaiveDateTime;
}

/// An item with its 1-based trial index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbered<T> {
    pub trial: u32,
    pub item: T,
}

/// Group `items` by task and number each group by ascending timestamp.
///
/// `items` must be in listing order: equal timestamps keep that order.
/// Output is ordered by task, then trial.
pub fn assign_trials<T: Timestamped>(items: Vec<T>) -> Vec<Numbered<T>> {
    let mut groups: BTreeMap<TaskCode, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(item.task()).or_default().push(item);
    }

    let mut numbered = Vec::new();
    for (_, mut group) in groups {
        // stable
        group.sort_by_key(|item| item.timestamp());
        numbered.extend(group.into_iter().enumerate().map(|(i, item)| Numbered {
            trial: i as u32 + 1,
            item,
        }));
    }
    numbered
}
