//! Timestamp alignment across instruments.

use std::collections::BTreeSet;

use eventbt_core::types::Bar;

/// Reindex every series onto the union of all timestamps, padding gaps with
/// the instrument's previous bar.
///
/// Timestamps earlier than the latest first bar of any instrument are
/// dropped for every instrument, so each aligned step carries a price for
/// every instrument. A series that is empty leaves the input unchanged.
pub fn forward_fill(series: Vec<(String, Vec<Bar>)>) -> Vec<(String, Vec<Bar>)> {
    let Some(start) = series
        .iter()
        .map(|(_, bars)| bars.first().map(|b| b.timestamp))
        .collect::<Option<Vec<_>>>()
        .and_then(|firsts| firsts.into_iter().max())
    else {
        return series;
    };

    let timeline: BTreeSet<i64> = series
        .iter()
        .flat_map(|(_, bars)| bars.iter().map(|b| b.timestamp))
        .filter(|ts| *ts >= start)
        .collect();

    series
        .into_iter()
        .map(|(symbol, bars)| {
            let mut aligned = Vec::with_capacity(timeline.len());
            let mut pos = 0;
            let mut last: Option<Bar> = None;

            for &ts in &timeline {
                // Consume every bar up to ts; the last one at or before ts wins
                while pos < bars.len() && bars[pos].timestamp <= ts {
                    last = Some(bars[pos]);
                    pos += 1;
                }
                if let Some(bar) = last {
                    aligned.push(bar.restamped(ts));
                }
            }

            (symbol, aligned)
        })
        .collect()
}
