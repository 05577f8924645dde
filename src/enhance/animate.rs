use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::timers::TimerTask;

/// Hides every `.stat-card` and `tbody tr` and returns the staggered reveal
/// timers to schedule, as `(task, delay_ms)`.
pub(crate) fn prepare_entrance(
    dom: &mut Dom,
    stat_card_stagger_ms: i64,
    table_row_stagger_ms: i64,
) -> Result<Vec<(TimerTask, i64)>> {
    let mut reveals = Vec::new();

    for (index, card) in dom.query_selector_all(".stat-card")?.into_iter().enumerate() {
        dom.style_set(card, "opacity", "0")?;
        dom.style_set(card, "transform", "translateY(20px)")?;
        reveals.push((
            TimerTask::RevealStatCard(card),
            stagger(index, stat_card_stagger_ms),
        ));
    }

    for (index, row) in dom.query_selector_all("tbody tr")?.into_iter().enumerate() {
        dom.style_set(row, "opacity", "0")?;
        reveals.push((
            TimerTask::RevealTableRow(row),
            stagger(index, table_row_stagger_ms),
        ));
    }

    Ok(reveals)
}

fn stagger(index: usize, step_ms: i64) -> i64 {
    i64::try_from(index)
        .unwrap_or(i64::MAX)
        .saturating_mul(step_ms)
}

pub(crate) fn reveal_stat_card(dom: &mut Dom, card: NodeId) -> Result<()> {
    if !dom.is_element(card) {
        return Ok(());
    }
    dom.style_set(card, "transition", "all 0.6s ease")?;
    dom.style_set(card, "opacity", "1")?;
    dom.style_set(card, "transform", "translateY(0)")
}

pub(crate) fn reveal_table_row(dom: &mut Dom, row: NodeId) -> Result<()> {
    if !dom.is_element(row) {
        return Ok(());
    }
    dom.style_set(row, "transition", "opacity 0.3s ease")?;
    dom.style_set(row, "opacity", "1")
}
