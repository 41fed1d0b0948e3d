use std::sync::Arc;

use dioxus::prelude::*;

use nobocon_core::score::{BOARD_ENTRIES, GRADE_ENTRIES, format_points, rank_for, total_score};
use nobocon_core::{Action, Snapshot, reduce};

use crate::context::AppContext;
use crate::vm::{autosave_note, storage_notice, toggle_all_label, total_line};

/// The single score-calculator page: graded counters, board toggles, the
/// derived total and rank, and the reset controls.
///
/// The snapshot signal is the one live copy of progress state. Every intent
/// runs the reducer, replaces the snapshot wholesale, and queues a debounced
/// save of the new value.
#[component]
pub fn ScoreboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let initial = ctx.initial_snapshot();
    let snapshot = use_signal(move || initial);

    let scheduler = ctx.scheduler();
    let dispatch = use_callback(move |action: Action| {
        let mut snapshot = snapshot;
        let next = {
            let current = snapshot.read();
            reduce(&current, &action)
        };
        snapshot.set(next.clone());
        scheduler.schedule(next);
    });

    let progress = ctx.progress();
    let reset_scheduler = ctx.scheduler();
    let reset = use_callback(move |_: ()| {
        // A pending debounced save would resurrect the state we are wiping.
        reset_scheduler.cancel();
        let mut snapshot = snapshot;
        snapshot.set(Snapshot::initial());
        let progress = Arc::clone(&progress);
        spawn(async move {
            if let Err(err) = progress.wipe().await {
                eprintln!("failed to clear saved progress: {err}");
            }
        });
    });

    let current = snapshot.read();
    let total = total_score(&current);
    let rank = rank_for(total);
    let all_on = current.all_boards_on();
    let toggle_label = toggle_all_label(all_on);
    let total_text = total_line(total);
    let note = autosave_note();
    let notice = storage_notice(ctx.persistence_status());

    rsx! {
        div { class: "page",
            header { class: "score-header",
                div {
                    p { class: "kicker", "nobocon calc" }
                    p { class: "total", "{total_text}" }
                    p { class: "rank-line",
                        "このスコアでランクは "
                        span { class: "rank-label", "{rank}" }
                        " になります"
                    }
                }
                button {
                    class: "reset-button",
                    r#type: "button",
                    onclick: move |_| reset.call(()),
                    "リセット"
                }
            }

            section { class: "grades",
                div { class: "section-head",
                    h2 { "級・段カウンター" }
                    span { class: "section-hint", "完登数 × 点数" }
                }
                div { class: "grade-list",
                    for (grade, points) in GRADE_ENTRIES {
                        GradeCard {
                            key: "{grade}",
                            grade,
                            points,
                            count: current.count(grade),
                            on_action: dispatch,
                        }
                    }
                }
            }

            section { class: "boards",
                div { class: "section-head",
                    h2 { "のぼコンボード" }
                    button {
                        class: "toggle-all",
                        r#type: "button",
                        onclick: move |_| dispatch.call(Action::ToggleAll),
                        "{toggle_label}"
                    }
                }
                div { class: "board-list",
                    for (board, points) in BOARD_ENTRIES {
                        BoardCard {
                            key: "{board}",
                            board,
                            points,
                            is_on: current.board_on(board),
                            on_action: dispatch,
                        }
                    }
                }
            }

            section { class: "save-note",
                p { "{note}" }
                button {
                    class: "reset-link",
                    r#type: "button",
                    onclick: move |_| reset.call(()),
                    "すべて初期化"
                }
                if let Some(message) = notice {
                    p { class: "storage-warning", "{message}" }
                }
            }
        }
    }
}

#[component]
fn GradeCard(
    grade: &'static str,
    points: u32,
    count: u32,
    on_action: Callback<Action>,
) -> Element {
    let points_text = format_points(u64::from(points));
    rsx! {
        article { class: "grade-card",
            div { class: "grade-info",
                p { class: "grade-name", "{grade}" }
                p { class: "grade-points", "{points_text} pt" }
            }
            div { class: "grade-count",
                p { class: "count-caption", "完登数" }
                p { class: "count-value", "{count}" }
            }
            div { class: "grade-controls",
                button {
                    class: "count-button",
                    r#type: "button",
                    disabled: count == 0,
                    onclick: move |_| on_action.call(Action::Decrement(grade.to_string())),
                    "-"
                }
                button {
                    class: "count-button count-button--add",
                    r#type: "button",
                    onclick: move |_| on_action.call(Action::Increment(grade.to_string())),
                    "+"
                }
            }
        }
    }
}

#[component]
fn BoardCard(
    board: &'static str,
    points: u32,
    is_on: bool,
    on_action: Callback<Action>,
) -> Element {
    let points_text = format_points(u64::from(points));
    let state_text = if is_on { "ON" } else { "OFF" };
    let marker = if is_on { "✓" } else { "·" };
    rsx! {
        button {
            class: if is_on { "board-card board-card--on" } else { "board-card" },
            r#type: "button",
            onclick: move |_| on_action.call(Action::ToggleBoard(board.to_string())),
            div { class: "board-info",
                p { class: "board-name", "{board}" }
                p { class: "board-points", "{points_text} pt" }
            }
            div { class: "board-state",
                span { class: "board-state-text", "{state_text}" }
                span {
                    class: if is_on { "board-marker board-marker--on" } else { "board-marker" },
                    "{marker}"
                }
            }
        }
    }
}
