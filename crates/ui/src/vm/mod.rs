use nobocon_core::score::format_points;
use services::{PersistenceStatus, SNAPSHOT_TTL_MS};

/// Header line for the running total.
#[must_use]
pub fn total_line(total: u64) -> String {
    format!("合計 {} pt", format_points(total))
}

/// Caption for the toggle-all button: unanimously-on offers clearing,
/// anything else offers selecting all.
#[must_use]
pub fn toggle_all_label(all_on: bool) -> &'static str {
    if all_on { "全て解除" } else { "全て選択" }
}

/// Footer note about auto-save and how long a saved session is kept.
#[must_use]
pub fn autosave_note() -> String {
    format!(
        "入力は自動保存されます（保持期限 {} 時間）。",
        SNAPSHOT_TTL_MS / 3_600_000
    )
}

/// Informational message when persistence is off for the session, or `None`
/// while saves are flowing normally.
#[must_use]
pub fn storage_notice(status: &PersistenceStatus) -> Option<String> {
    status
        .reason()
        .map(|reason| format!("保存機能は無効です（{reason}）"))
}
