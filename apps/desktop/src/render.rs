use std::fmt::Write as _;

use shared::protocol::ListSnapshot;

pub fn render_list(snapshot: &ListSnapshot) -> String {
    let mut out = String::new();
    if snapshot.pinned_search {
        out.push_str("[match]\n");
    } else {
        let _ = writeln!(out, "[{}]", snapshot.filter);
    }

    if snapshot.total_count == 0 {
        out.push_str("  (no tasks)\n");
    } else if snapshot.visible.is_empty() {
        out.push_str("  (nothing to show)\n");
    }
    for task in &snapshot.visible {
        let mark = if task.is_done { 'x' } else { ' ' };
        let _ = writeln!(out, "  [{mark}] {:>3}  {}", task.id, task.title);
    }

    out.push_str(&snapshot.items_left_label());
    out
}
