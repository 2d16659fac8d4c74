use serde::{Deserialize, Serialize};

use crate::item::{ItemStatus, WorkItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Processing,
    Completed,
    Error,
}

impl StatusFilter {
    pub fn matches(self, status: ItemStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == ItemStatus::Pending,
            StatusFilter::Processing => status == ItemStatus::Processing,
            StatusFilter::Completed => status == ItemStatus::Completed,
            StatusFilter::Error => status == ItemStatus::Error,
        }
    }
}

/// Per-status bucket sizes. The four status buckets partition `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Pending => self.pending,
            StatusFilter::Processing => self.processing,
            StatusFilter::Completed => self.completed,
            StatusFilter::Error => self.error,
        }
    }
}

/// Items matching `filter`, in insertion order.
pub fn filtered_items(items: &[WorkItem], filter: StatusFilter) -> Vec<&WorkItem> {
    items
        .iter()
        .filter(|item| filter.matches(item.status))
        .collect()
}

pub fn status_counts(items: &[WorkItem]) -> StatusCounts {
    items.iter().fold(
        StatusCounts {
            all: items.len(),
            ..StatusCounts::default()
        },
        |mut counts, item| {
            match item.status {
                ItemStatus::Pending => counts.pending += 1,
                ItemStatus::Processing => counts.processing += 1,
                ItemStatus::Completed => counts.completed += 1,
                ItemStatus::Error => counts.error += 1,
            }
            counts
        },
    )
}
