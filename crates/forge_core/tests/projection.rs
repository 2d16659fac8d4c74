use std::path::PathBuf;

use forge_core::{filtered_items, status_counts, ItemStatus, StatusFilter, WorkItem};

fn item(id: u64, status: ItemStatus) -> WorkItem {
    WorkItem {
        id,
        path: PathBuf::from(format!("/in/{id}.png")),
        name: format!("{id}.png"),
        size: 1024,
        width: 10,
        height: 10,
        format: "PNG".to_string(),
        status,
        progress: None,
        result: None,
    }
}

fn mixed_queue() -> Vec<WorkItem> {
    vec![
        item(1, ItemStatus::Completed),
        item(2, ItemStatus::Pending),
        item(3, ItemStatus::Error),
        item(4, ItemStatus::Pending),
        item(5, ItemStatus::Processing),
    ]
}

#[test]
fn all_filter_preserves_insertion_order() {
    let items = mixed_queue();
    let ids: Vec<_> = filtered_items(&items, StatusFilter::All)
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn status_filter_keeps_matching_items_in_order() {
    let items = mixed_queue();
    let ids: Vec<_> = filtered_items(&items, StatusFilter::Pending)
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec![2, 4]);
    assert!(filtered_items(&[], StatusFilter::Error).is_empty());
}

#[test]
fn counts_partition_the_queue() {
    let items = mixed_queue();
    let counts = status_counts(&items);

    assert_eq!(counts.all, items.len());
    assert_eq!(
        counts.pending + counts.processing + counts.completed + counts.error,
        counts.all
    );
    assert_eq!(counts.get(StatusFilter::Pending), 2);
    assert_eq!(counts.get(StatusFilter::Processing), 1);
    assert_eq!(counts.get(StatusFilter::Completed), 1);
    assert_eq!(counts.get(StatusFilter::Error), 1);
}

#[test]
fn empty_queue_counts_are_zero() {
    let counts = status_counts(&[]);
    assert_eq!(counts, Default::default());
}
