use crate::model::Snapshot;

/// The closed set of user intents that may change progress state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Add one completion to a graded problem.
    Increment(String),
    /// Remove one completion from a graded problem, flooring at zero.
    Decrement(String),
    /// Flip one board challenge on or off.
    ToggleBoard(String),
    /// All boards on → all off; anything else → all on.
    ToggleAll,
    /// Back to the canonical all-zero/all-off snapshot.
    Reset,
    /// Replace the whole snapshot, e.g. with one restored from storage.
    Restore(Snapshot),
}

/// Pure transition function: applies `action` to `state` and returns the next
/// snapshot. The input is never mutated.
///
/// Keys that are not present in the snapshot leave it unchanged. The calling
/// surface only offers known identifiers, so that path is defensive.
#[must_use]
pub fn reduce(state: &Snapshot, action: &Action) -> Snapshot {
    match action {
        Action::Increment(key) => {
            let mut next = state.clone();
            if let Some(count) = next.counts.get_mut(key) {
                *count = count.saturating_add(1);
            }
            next
        }
        Action::Decrement(key) => {
            let mut next = state.clone();
            if let Some(count) = next.counts.get_mut(key) {
                *count = count.saturating_sub(1);
            }
            next
        }
        Action::ToggleBoard(key) => {
            let mut next = state.clone();
            if let Some(on) = next.boards.get_mut(key) {
                *on = !*on;
            }
            next
        }
        Action::ToggleAll => {
            let target = !state.all_boards_on();
            let mut next = state.clone();
            for on in next.boards.values_mut() {
                *on = target;
            }
            next
        }
        Action::Reset => Snapshot::initial(),
        Action::Restore(snapshot) => snapshot.clone(),
    }
}
