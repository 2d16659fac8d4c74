use std::collections::BTreeSet;

use forge_logging::forge_warn;

use crate::item::{FileInfo, ItemId, ItemStatus, ProcessResult, WorkItem};
use crate::projection::{filtered_items, status_counts, StatusCounts, StatusFilter};

/// Ordered work items, the user's selection and the active status filter.
///
/// Ids are allocated here and never reused within a session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueueStore {
    items: Vec<WorkItem>,
    selected: BTreeSet<ItemId>,
    filter: StatusFilter,
    last_id: ItemId,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one pending item per file, preserving caller order.
    pub fn add(&mut self, files: Vec<FileInfo>) -> Vec<ItemId> {
        let mut ids = Vec::with_capacity(files.len());
        self.items.reserve(files.len());
        for info in files {
            let id = self.allocate_id();
            self.items.push(WorkItem::pending(id, info));
            ids.push(id);
        }
        ids
    }

    /// Appends items that already carry ids, e.g. from a restored session.
    ///
    /// Items whose id is already queued are dropped. Returns how many were accepted.
    pub fn add_items(&mut self, items: Vec<WorkItem>) -> usize {
        let mut accepted = 0;
        for item in items {
            if self.contains(item.id) {
                forge_warn!("Dropping item {} ({}): id already queued", item.id, item.name);
                continue;
            }
            self.last_id = self.last_id.max(item.id);
            self.items.push(item);
            accepted += 1;
        }
        accepted
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        self.selected.remove(&id);
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected.clear();
    }

    /// Flips selection of a queued item. Ids not in the queue cannot become selected.
    pub fn toggle_select(&mut self, id: ItemId) {
        if !self.selected.remove(&id) && self.contains(id) {
            self.selected.insert(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.items.iter().map(|item| item.id).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// Replaces the status of `id`. Unknown ids are ignored and return `false`.
    ///
    /// A result is only kept for `Completed`; every other status clears it.
    pub fn update_status(
        &mut self,
        id: ItemId,
        status: ItemStatus,
        result: Option<ProcessResult>,
    ) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.status = status;
        item.result = match status {
            ItemStatus::Completed => result,
            _ => None,
        };
        if status != ItemStatus::Processing {
            item.progress = None;
        }
        true
    }

    /// Records progress for an item that is currently processing.
    pub fn update_progress(&mut self, id: ItemId, percent: u8) -> bool {
        match self.get_mut(id) {
            Some(item) if item.status == ItemStatus::Processing => {
                item.progress = Some(percent.min(100));
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&WorkItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut WorkItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> &BTreeSet<ItemId> {
        &self.selected
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn filtered(&self) -> Vec<&WorkItem> {
        filtered_items(&self.items, self.filter)
    }

    pub fn counts(&self) -> StatusCounts {
        status_counts(&self.items)
    }

    /// Pending items visible under the active filter, in queue order.
    ///
    /// The selection set does not take part.
    pub fn batch_candidates(&self) -> Vec<&WorkItem> {
        self.filtered()
            .into_iter()
            .filter(|item| item.status == ItemStatus::Pending)
            .collect()
    }

    fn allocate_id(&mut self) -> ItemId {
        self.last_id += 1;
        self.last_id
    }
}
