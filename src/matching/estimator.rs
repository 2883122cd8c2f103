use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::core::row::TableRow;
use crate::core::types::Tier;
use crate::matching::classifier::PortClassifier;

/// Tier counts in first-seen order.
///
/// Insertion order is part of the result: the arg-max keeps the first tier
/// that reaches the highest count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierHistogram {
    counts: Vec<(Tier, usize)>,
}

impl TierHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tier: Tier, count: usize) {
        match self.counts.iter_mut().find(|(t, _)| *t == tier) {
            Some((_, n)) => *n += count,
            None => self.counts.push((tier, count)),
        }
    }

    pub fn get(&self, tier: Tier) -> usize {
        self.counts
            .iter()
            .find(|(t, _)| *t == tier)
            .map_or(0, |(_, n)| *n)
    }

    pub fn remove(&mut self, tier: Tier) -> usize {
        match self.counts.iter().position(|(t, _)| *t == tier) {
            Some(i) => self.counts.remove(i).1,
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, usize)> + '_ {
        self.counts.iter().copied()
    }

    /// Fold the transient PrBoom count into the tier PrBoom+ most likely
    /// emulated: the most frequent of limit-removing, Boom and MBF (ties go
    /// to that order), or Unknown when none of them was seen.
    pub fn redistribute_prboom(&mut self) {
        let prboom = self.remove(Tier::PrBoom);
        if prboom == 0 {
            return;
        }

        let mut target: Option<(Tier, usize)> = None;
        for tier in Tier::PRBOOM_RESOLVABLE {
            let count = self.get(tier);
            if count > 0 && target.map_or(true, |(_, best)| count > best) {
                target = Some((tier, count));
            }
        }

        let tier = target.map_or(Tier::Unknown, |(tier, _)| tier);
        self.add(tier, prboom);
    }

    /// Tier with the highest count, earliest inserted on ties
    pub fn majority(&self) -> Option<Tier> {
        let mut best: Option<(Tier, usize)> = None;
        for (tier, count) in self.iter() {
            if best.map_or(true, |(_, n)| count > n) {
                best = Some((tier, count));
            }
        }
        best.map(|(tier, _)| tier)
    }
}

/// Outcome of guessing a wad's tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    pub tier: Tier,
    /// Final histogram, PrBoom already redistributed
    pub histogram: TierHistogram,
    /// Recognized ports that map to no concrete tier (Unknown or bare PrBoom)
    pub unmapped_ports: BTreeMap<String, usize>,
    /// Ports no rule recognized
    pub unrecognized_ports: BTreeMap<String, usize>,
}

/// Guesses a wad's compatibility tier from the ports its runs were recorded with
pub struct CompatEstimator<'a> {
    classifier: &'a PortClassifier,
}

impl<'a> CompatEstimator<'a> {
    pub fn new(classifier: &'a PortClassifier) -> Self {
        Self { classifier }
    }

    /// Estimate the tier of one wad from the body rows of all its pages.
    ///
    /// `source` only labels log messages.
    pub fn estimate<'r, I>(&self, rows: I, source: &str) -> Estimate
    where
        I: IntoIterator<Item = &'r TableRow>,
    {
        let mut histogram = TierHistogram::new();
        let mut unmapped_ports = BTreeMap::new();
        let mut unrecognized_ports = BTreeMap::new();

        for row in rows.into_iter().filter(|row| row.carries_run()) {
            let port = row.port();
            match self.classifier.classify(port) {
                Some(tier) => {
                    histogram.add(tier, 1);
                    if matches!(tier, Tier::Unknown | Tier::PrBoom) {
                        *unmapped_ports.entry(port.to_string()).or_insert(0) += 1;
                    }
                }
                None => *unrecognized_ports.entry(port.to_string()).or_insert(0) += 1,
            }
        }

        if !unrecognized_ports.is_empty() {
            warn!("Unrecognized ports for {source}: {unrecognized_ports:?}");
        }
        if !unmapped_ports.is_empty() {
            debug!("Unmapped ports for {source}: {unmapped_ports:?}");
        }

        histogram.redistribute_prboom();

        let tier = histogram.majority().unwrap_or_else(|| {
            // Happens when every demo of a wad was removed on request
            warn!("No compats for {source}");
            Tier::Unknown
        });

        Estimate {
            tier,
            histogram,
            unmapped_ports,
            unrecognized_ports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::row::Cell;

    fn run(port: &str) -> TableRow {
        TableRow::new(
            "row1",
            vec![
                Cell::text("Player"),
                Cell::text(port),
                Cell::link("1:00", "lmps/x.zip", ""),
            ],
        )
    }

    fn make_rows(ports: &[(&str, usize)]) -> Vec<TableRow> {
        ports
            .iter()
            .flat_map(|(port, n)| std::iter::repeat_with(move || run(port)).take(*n))
            .collect()
    }

    fn estimate(rows: &[TableRow]) -> Estimate {
        let classifier = PortClassifier::new();
        CompatEstimator::new(&classifier).estimate(rows, "test")
    }

    #[test]
    fn test_majority_tier() {
        let rows = make_rows(&[("Boom v2.02", 2), ("MBF v2.03", 3)]);
        assert_eq!(estimate(&rows).tier, Tier::Mbf);
    }

    #[test]
    fn test_prboom_tie_goes_to_limit_removing() {
        let rows = make_rows(&[("Boom v2.02", 3), ("DooM2 v1.9", 3), ("PRBoom v2.02", 5)]);
        let result = estimate(&rows);
        assert_eq!(result.tier, Tier::LimitRemoving);
        assert_eq!(result.histogram.get(Tier::LimitRemoving), 8);
        assert_eq!(result.histogram.get(Tier::Boom), 3);
    }

    #[test]
    fn test_prboom_goes_to_most_frequent_resolvable_tier() {
        let rows = make_rows(&[("DooM2 v1.9", 1), ("PRBoom-plus cl9", 2), ("PRBoom v2.02", 1)]);
        let result = estimate(&rows);
        assert_eq!(result.tier, Tier::Boom);
        assert_eq!(result.histogram.get(Tier::Boom), 3);
    }

    #[test]
    fn test_prboom_alone_becomes_unknown() {
        let rows = make_rows(&[("PRBoom v2.02", 4), ("ZDoom v2.8", 2)]);
        let result = estimate(&rows);
        assert_eq!(result.tier, Tier::Unknown);
        assert_eq!(result.histogram.get(Tier::Unknown), 4);
        assert_eq!(result.unmapped_ports.get("PRBoom v2.02"), Some(&4));
    }

    #[test]
    fn test_prboom_never_emitted() {
        for ports in [
            vec![("PRBoom v2.02", 1)],
            vec![("PRBoom-cl17", 3), ("Boom v2.02", 1)],
            vec![("PRBoom v2.02", 2), ("Legacy v1.4", 2)],
        ] {
            let result = estimate(&make_rows(&ports));
            assert_ne!(result.tier, Tier::PrBoom);
            assert_eq!(result.histogram.get(Tier::PrBoom), 0);
        }
    }

    #[test]
    fn test_majority_tie_keeps_first_seen() {
        let rows = make_rows(&[("ZDoom v2.8", 2), ("ZDaemon v1.09", 2)]);
        assert_eq!(estimate(&rows).tier, Tier::GzDoom);

        let rows = make_rows(&[("ZDaemon v1.09", 2), ("ZDoom v2.8", 2)]);
        assert_eq!(estimate(&rows).tier, Tier::ZDaemon);
    }

    #[test]
    fn test_empty_table_is_unknown() {
        let result = estimate(&[]);
        assert_eq!(result.tier, Tier::Unknown);
        assert!(result.histogram.is_empty());
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let mut rows = make_rows(&[("Boom v2.02", 1)]);
        rows.push(TableRow::new("row2", vec![Cell::text(""), Cell::text("MBF v2.03")]));
        rows.push(TableRow::new("row2", vec![Cell::text("MBF v2.03")]));
        let result = estimate(&rows);
        assert_eq!(result.tier, Tier::Boom);
        assert_eq!(result.histogram.get(Tier::Mbf), 0);
    }

    #[test]
    fn test_unrecognized_ports_are_listed() {
        let rows = make_rows(&[("Boom v2.02", 1), ("Mystery 1.0", 2)]);
        let result = estimate(&rows);
        assert_eq!(result.tier, Tier::Boom);
        assert_eq!(result.unrecognized_ports.get("Mystery 1.0"), Some(&2));
    }

    #[test]
    fn test_estimate_is_repeatable() {
        let rows = make_rows(&[("PRBoom v2.02", 3), ("MBF v2.03", 1), ("Boom v2.02", 1)]);
        let classifier = PortClassifier::new();
        let estimator = CompatEstimator::new(&classifier);
        let first = estimator.estimate(&rows, "test");
        let second = estimator.estimate(&rows, "test");
        assert_eq!(first, second);
        assert_eq!(first.tier, Tier::Boom);
    }
}
