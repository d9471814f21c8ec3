//! Debounced search driving a list view, on a paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use common::*;
use medidesk_query::domain::Patient;
use medidesk_query::{FilterValue, ListConfig, ListQuery, ListView, SearchController};

const DELAY: Duration = Duration::from_millis(300);

fn recording_controller() -> (SearchController, Arc<Mutex<Vec<String>>>) {
    let commits = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&commits);
    let controller = SearchController::new(DELAY, move |term| sink.lock().push(term));
    (controller, commits)
}

async fn settle() {
    tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_burst_commits_once_with_last_value() {
    let (controller, commits) = recording_controller();

    for text in ["j", "ja", "jan", "jane"] {
        controller.input(text);
        assert_eq!(controller.state().raw_input, text);
        assert!(controller.is_pending());
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    assert!(commits.lock().is_empty());

    settle().await;
    assert_eq!(*commits.lock(), vec!["jane".to_string()]);
    assert_eq!(controller.committed_term(), "jane");
    assert!(!controller.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_revert_to_committed_cancels_commit() {
    let (controller, commits) = recording_controller();
    controller.input("jane");
    settle().await;
    assert_eq!(commits.lock().len(), 1);

    controller.input("janes");
    assert!(controller.is_pending());
    controller.input("jane");
    assert!(!controller.is_pending());

    settle().await;
    settle().await;
    assert_eq!(commits.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clear_commits_empty_term() {
    let (controller, commits) = recording_controller();
    controller.input("maria");
    settle().await;

    controller.clear();
    assert_eq!(controller.state().raw_input, "");
    assert!(controller.is_pending());
    settle().await;
    assert_eq!(*commits.lock(), vec!["maria".to_string(), String::new()]);
}

#[tokio::test(start_paused = true)]
async fn test_committed_terms_drive_the_list() {
    let records = patient_records();
    let query = Arc::new(Mutex::new(
        ListQuery::<Patient>::new(Patient::profile(), &ListConfig::default()).with_as_of(as_of()),
    ));

    let target = Arc::clone(&query);
    let controller = SearchController::new(DELAY, move |term| {
        target.lock().set_search(term);
    });

    {
        let mut query = query.lock();
        query.view(&records);
        query.go_to_page(1);
    }

    controller.input("ja");
    controller.input("jane");
    assert_eq!(query.lock().search_term(), "");

    settle().await;
    let mut query = query.lock();
    assert_eq!(query.search_term(), "jane");
    assert_eq!(query.page_index(), 0);
    assert_page_ids(&query.view(&records), &["P-01", "P-03"]);
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_cancels_pending_search() {
    let records = patient_records();
    let query = ListQuery::<Patient>::new(Patient::profile(), &ListConfig::default()).with_as_of(as_of());
    let view = ListView::local(query, DELAY);

    view.input("jane");
    view.set_filter("gender", FilterValue::one_of(["Male"]));
    assert!(!view.search_state().is_pending);

    tokio::time::sleep(Duration::from_millis(400)).await;
    settle().await;
    assert_eq!(view.search_term(), "");

    let page = view.view(&records);
    assert_eq!(page.state.total_items, 5);
    assert!(page.items.iter().all(|p| p.gender == "Male"));
}

#[tokio::test(start_paused = true)]
async fn test_unmount_drops_pending_commit() {
    let (controller, commits) = recording_controller();
    controller.input("carlos");
    drop(controller);

    settle().await;
    assert!(commits.lock().is_empty());
}
