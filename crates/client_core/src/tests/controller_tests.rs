use super::*;
use crate::source::StaticTaskSource;

fn task(id: i64, title: &str, is_done: bool) -> Task {
    Task {
        id: TaskId(id),
        title: title.to_string(),
        is_done,
    }
}

fn controller(tasks: Vec<Task>) -> TodoController {
    TodoController::from_snapshot(tasks, ToggleAllPolicy::FlipFlop)
}

fn visible_ids(controller: &TodoController) -> Vec<i64> {
    controller.visible().iter().map(|task| task.id.0).collect()
}

fn done_flags(controller: &TodoController) -> Vec<bool> {
    controller.tasks().iter().map(|task| task.is_done).collect()
}

fn assert_view_is_fresh(controller: &TodoController) {
    let expected: Vec<i64> = derive_view(controller.tasks(), controller.filter())
        .iter()
        .map(|task| task.id.0)
        .collect();
    assert_eq!(visible_ids(controller), expected);
}

#[tokio::test]
async fn initialize_fetches_once_and_shows_everything() {
    let source = StaticTaskSource::new(vec![task(1, "a", false), task(2, "b", true)]);
    let controller = TodoController::initialize(&source, ToggleAllPolicy::FlipFlop).await;

    assert_eq!(source.fetch_count(), 1);
    assert_eq!(controller.load_state(), &LoadState::Loaded { count: 2 });
    assert_eq!(controller.filter(), Filter::All);
    assert_eq!(visible_ids(&controller), vec![1, 2]);
}

#[tokio::test]
async fn failing_source_leaves_collection_empty() {
    let source = StaticTaskSource::failing("connection refused");
    let controller = TodoController::initialize(&source, ToggleAllPolicy::FlipFlop).await;

    assert_eq!(source.fetch_count(), 1);
    assert!(controller.tasks().is_empty());
    assert!(controller.visible().is_empty());
    match controller.load_state() {
        LoadState::Unavailable { reason } => assert!(reason.contains("connection refused")),
        other => panic!("unexpected load state: {other:?}"),
    }
}

#[test]
fn add_trims_title_and_assigns_next_id() {
    let mut controller = controller(vec![task(1, "a", false), task(2, "b", true)]);

    let outcome = controller.add_or_find("  Buy milk  ");

    assert_eq!(outcome, AddOutcome::Added { task_id: TaskId(3) });
    assert_eq!(controller.tasks().last(), Some(&task(3, "Buy milk", false)));
    assert_view_is_fresh(&controller);
}

#[test]
fn blank_add_is_ignored_and_keeps_draft() {
    let mut controller = controller(vec![task(1, "a", false)]);
    controller.set_draft("   ");

    assert_eq!(
        controller.submit_draft(),
        AddOutcome::Ignored(IgnoreReason::EmptyTitle)
    );
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.draft(), "   ");
}

#[test]
fn duplicate_add_pins_existing_task_instead_of_appending() {
    let mut controller = controller(vec![
        task(1, "Buy milk", false),
        task(2, "Walk dog", true),
    ]);
    controller.set_filter(Filter::Completed);
    controller.set_draft("  bUY MILK ");

    let outcome = controller.submit_draft();

    assert_eq!(outcome, AddOutcome::Found { task_id: TaskId(1) });
    assert_eq!(controller.tasks().len(), 2);
    assert_eq!(visible_ids(&controller), vec![1]);
    assert!(controller.is_search_pinned());
    assert_eq!(controller.draft(), "");
}

#[test]
fn pinned_search_is_replaced_by_next_filter_change() {
    let mut controller = controller(vec![task(1, "Buy milk", false), task(2, "b", false)]);
    controller.add_or_find("buy milk");
    assert_eq!(visible_ids(&controller), vec![1]);

    controller.set_filter(Filter::All);

    assert!(!controller.is_search_pinned());
    assert_eq!(visible_ids(&controller), vec![1, 2]);
}

#[test]
fn pinned_search_survives_begin_edit_but_not_a_mutation() {
    let mut controller = controller(vec![task(1, "Buy milk", false), task(2, "b", false)]);
    controller.add_or_find("Buy milk");

    controller.begin_edit(TaskId(2));
    assert_eq!(visible_ids(&controller), vec![1]);

    controller.toggle_done(TaskId(2));
    assert_view_is_fresh(&controller);
    assert_eq!(visible_ids(&controller), vec![1, 2]);
}

#[test]
fn ids_stay_unique_after_deletions() {
    let mut controller = controller(Vec::new());
    controller.add_or_find("A");
    controller.add_or_find("B");
    controller.delete(TaskId(1));

    let outcome = controller.add_or_find("C");

    assert_eq!(outcome, AddOutcome::Added { task_id: TaskId(3) });
    let ids: Vec<i64> = controller.tasks().iter().map(|task| task.id.0).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn ids_continue_past_highest_fetched_id() {
    let mut controller = controller(vec![task(10, "a", false)]);

    assert_eq!(
        controller.add_or_find("b"),
        AddOutcome::Added { task_id: TaskId(11) }
    );
}

#[test]
fn commit_edit_writes_trimmed_title() {
    let mut controller = controller(vec![task(1, "old", false)]);

    assert_eq!(controller.begin_edit(TaskId(1)), Change::Applied);
    assert_eq!(controller.editing(), Some((TaskId(1), "old")));
    controller.update_edit("  new title ");

    assert_eq!(controller.commit_edit(), Change::Applied);
    assert_eq!(controller.tasks()[0].title, "new title");
    assert_eq!(controller.editing(), None);
    assert_view_is_fresh(&controller);
}

#[test]
fn editing_to_empty_keeps_title_and_clears_edit_state() {
    let mut controller = controller(vec![task(1, "keep me", false)]);
    controller.begin_edit(TaskId(1));
    controller.update_edit("   ");

    assert_eq!(
        controller.commit_edit(),
        Change::Ignored(IgnoreReason::EmptyTitle)
    );
    assert_eq!(controller.tasks()[0].title, "keep me");
    assert_eq!(controller.editing(), None);
}

#[test]
fn new_edit_discards_previous_uncommitted_edit() {
    let mut controller = controller(vec![task(1, "first", false), task(2, "second", false)]);
    controller.begin_edit(TaskId(1));
    controller.update_edit("never saved");

    controller.begin_edit(TaskId(2));
    controller.commit_edit();

    assert_eq!(controller.tasks()[0].title, "first");
    assert_eq!(controller.tasks()[1].title, "second");
}

#[test]
fn edit_operations_without_active_edit_are_ignored() {
    let mut controller = controller(vec![task(1, "a", false)]);

    assert_eq!(
        controller.commit_edit(),
        Change::Ignored(IgnoreReason::NoActiveEdit)
    );
    assert_eq!(
        controller.update_edit("x"),
        Change::Ignored(IgnoreReason::NoActiveEdit)
    );
    assert_eq!(
        controller.cancel_edit(),
        Change::Ignored(IgnoreReason::NoActiveEdit)
    );
}

#[test]
fn cancel_edit_leaves_title_untouched() {
    let mut controller = controller(vec![task(1, "a", false)]);
    controller.begin_edit(TaskId(1));
    controller.update_edit("b");

    assert_eq!(controller.cancel_edit(), Change::Applied);
    assert_eq!(controller.tasks()[0].title, "a");
    assert_eq!(controller.editing(), None);
}

#[test]
fn unknown_ids_are_ignored() {
    let mut controller = controller(vec![task(1, "a", false)]);
    let missing = TaskId(99);

    assert_eq!(
        controller.toggle_done(missing),
        Change::Ignored(IgnoreReason::NotFound(missing))
    );
    assert_eq!(
        controller.delete(missing),
        Change::Ignored(IgnoreReason::NotFound(missing))
    );
    assert_eq!(
        controller.begin_edit(missing),
        Change::Ignored(IgnoreReason::NotFound(missing))
    );
    assert_eq!(controller.tasks(), &[task(1, "a", false)]);
}

#[test]
fn toggle_done_moves_task_between_filters() {
    let mut controller = controller(vec![task(1, "a", false), task(2, "b", false)]);
    controller.set_filter(Filter::Active);

    controller.toggle_done(TaskId(1));

    assert_eq!(visible_ids(&controller), vec![2]);
    assert_eq!(controller.count_active(), 1);
    assert_view_is_fresh(&controller);
}

#[test]
fn deleting_edited_task_drops_the_edit() {
    let mut controller = controller(vec![task(1, "a", false), task(2, "b", false)]);
    controller.begin_edit(TaskId(1));

    controller.delete(TaskId(1));

    assert_eq!(controller.editing(), None);
    assert_eq!(visible_ids(&controller), vec![2]);
}

#[test]
fn toggle_all_flip_flop_follows_flag_not_task_state() {
    let mut controller = controller(vec![
        task(1, "a", true),
        task(2, "b", false),
        task(3, "c", true),
    ]);

    controller.toggle_all();
    assert_eq!(done_flags(&controller), vec![true, true, true]);

    controller.toggle_all();
    assert_eq!(done_flags(&controller), vec![false, false, false]);
}

#[test]
fn toggle_all_flip_flop_first_call_marks_done_even_when_all_done() {
    let mut controller = controller(vec![task(1, "a", true), task(2, "b", true)]);

    controller.toggle_all();
    assert_eq!(done_flags(&controller), vec![true, true]);

    controller.toggle_all();
    assert_eq!(done_flags(&controller), vec![false, false]);
}

#[test]
fn toggle_all_by_completeness_derives_target_from_tasks() {
    let mut controller = TodoController::from_snapshot(
        vec![task(1, "a", true), task(2, "b", true)],
        ToggleAllPolicy::ByCompleteness,
    );

    controller.toggle_all();
    assert_eq!(done_flags(&controller), vec![false, false]);

    controller.toggle_done(TaskId(1));
    controller.toggle_all();
    assert_eq!(done_flags(&controller), vec![true, true]);
}

#[test]
fn clear_completed_keeps_active_tasks_in_order() {
    let mut controller = controller(vec![
        task(1, "a", true),
        task(2, "b", false),
        task(3, "c", true),
        task(4, "d", false),
        task(5, "e", true),
    ]);

    controller.clear_completed();

    assert_eq!(
        controller.tasks(),
        &[task(2, "b", false), task(4, "d", false)]
    );
    assert_view_is_fresh(&controller);
}

#[test]
fn switching_filter_back_to_all_restores_full_order() {
    let mut controller = controller(vec![
        task(1, "a", true),
        task(2, "b", false),
        task(3, "c", true),
    ]);

    controller.set_filter(Filter::Active);
    assert_eq!(visible_ids(&controller), vec![2]);

    controller.set_filter(Filter::All);
    assert_eq!(visible_ids(&controller), vec![1, 2, 3]);
}

#[test]
fn count_active_on_empty_collection_is_zero() {
    let controller = controller(Vec::new());
    assert_eq!(controller.count_active(), 0);
}

#[test]
fn view_matches_fresh_derivation_after_every_mutation() {
    let mut controller = controller(vec![task(1, "a", false), task(2, "b", true)]);

    for filter in Filter::ALL {
        controller.set_filter(filter);
        assert_view_is_fresh(&controller);

        controller.add_or_find(&format!("new {filter}"));
        assert_view_is_fresh(&controller);

        controller.toggle_done(TaskId(1));
        assert_view_is_fresh(&controller);

        controller.begin_edit(TaskId(2));
        controller.update_edit(format!("renamed {filter}"));
        controller.commit_edit();
        assert_view_is_fresh(&controller);

        controller.toggle_all();
        assert_view_is_fresh(&controller);

        controller.clear_completed();
        assert_view_is_fresh(&controller);
    }
}

#[test]
fn snapshot_reports_counts_and_edit() {
    let mut controller = controller(vec![task(1, "a", false), task(2, "b", true)]);
    controller.set_filter(Filter::Completed);
    controller.begin_edit(TaskId(2));

    let snapshot = controller.snapshot();

    assert_eq!(snapshot.filter, Filter::Completed);
    assert_eq!(snapshot.visible, vec![task(2, "b", true)]);
    assert_eq!(snapshot.active_count, 1);
    assert_eq!(snapshot.total_count, 2);
    assert!(!snapshot.pinned_search);
    assert_eq!(
        snapshot.editing,
        Some(EditSnapshot {
            task_id: TaskId(2),
            working_title: "b".to_string(),
        })
    );
    assert_eq!(snapshot.items_left_label(), "1 item(s) left!");
}

#[test]
fn found_match_shows_the_matching_record_when_ids_repeat() {
    let mut controller = controller(vec![task(1, "first", false), task(1, "second", false)]);

    let outcome = controller.add_or_find("SECOND");

    assert_eq!(outcome, AddOutcome::Found { task_id: TaskId(1) });
    let titles: Vec<&str> = controller
        .visible()
        .iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(titles, vec!["second"]);
}

#[test]
fn add_refuses_to_reuse_ids_once_id_space_is_exhausted() {
    let mut controller = controller(vec![task(i64::MAX, "a", false)]);

    assert_eq!(
        controller.add_or_find("b"),
        AddOutcome::Ignored(IgnoreReason::IdsExhausted)
    );
    assert_eq!(
        controller.add_or_find("c"),
        AddOutcome::Ignored(IgnoreReason::IdsExhausted)
    );
    assert_eq!(controller.tasks(), &[task(i64::MAX, "a", false)]);
}

#[test]
fn last_id_below_max_is_handed_out_once() {
    let mut controller = controller(vec![task(i64::MAX - 1, "a", false)]);

    assert_eq!(
        controller.add_or_find("b"),
        AddOutcome::Added {
            task_id: TaskId(i64::MAX)
        }
    );
    assert_eq!(
        controller.add_or_find("c"),
        AddOutcome::Ignored(IgnoreReason::IdsExhausted)
    );
}

#[test]
fn unknown_id_still_replaces_pinned_match_with_filter_view() {
    let mut controller = controller(vec![task(1, "Buy milk", false), task(2, "b", false)]);

    controller.add_or_find("buy milk");
    controller.toggle_done(TaskId(99));
    assert!(!controller.is_search_pinned());
    assert_eq!(visible_ids(&controller), vec![1, 2]);

    controller.add_or_find("buy milk");
    controller.delete(TaskId(99));
    assert!(!controller.is_search_pinned());
    assert_view_is_fresh(&controller);
}

#[test]
fn clearing_edited_completed_task_drops_the_edit() {
    let mut controller = controller(vec![task(1, "a", true), task(2, "b", false)]);
    controller.begin_edit(TaskId(1));

    controller.clear_completed();

    assert_eq!(controller.editing(), None);
    assert_eq!(
        controller.commit_edit(),
        Change::Ignored(IgnoreReason::NoActiveEdit)
    );
    assert_eq!(visible_ids(&controller), vec![2]);
}

#[test]
fn clearing_completed_keeps_edit_of_active_task() {
    let mut controller = controller(vec![task(1, "a", true), task(2, "b", false)]);
    controller.begin_edit(TaskId(2));

    controller.clear_completed();

    assert_eq!(controller.editing(), Some((TaskId(2), "b")));
}
