// In crates/engine/src/reconciler.rs

use chrono::{DateTime, FixedOffset};
use core_types::{Signal, SignalStatus, Symbol};
use std::collections::{HashMap, HashSet};

/// Merges this cycle's signals with the set read from the store.
///
/// The result starts with every fresh signal (active), followed by the
/// previous entries that are still worth keeping, forced inactive:
/// - a previous entry whose symbol and timestamp match a fresh signal is the
///   same observation and is dropped;
/// - any other previous entry, whether its symbol is absent from `fresh` or has
///   moved on to a newer bar, is retained as inactive.
///
/// Retained entries are kept once per (symbol, timestamp), so an already
/// inactive row and a stale active copy of it collapse into a single row.
pub fn reconcile(fresh: Vec<Signal>, previous: &[Signal]) -> Vec<Signal> {
    let fresh_keys: HashMap<&Symbol, HashSet<DateTime<FixedOffset>>> =
        fresh.iter().fold(HashMap::new(), |mut keys, signal| {
            keys.entry(&signal.symbol).or_default().insert(signal.timestamp);
            keys
        });

    let mut retained_keys = HashSet::new();
    let retained: Vec<Signal> = previous
        .iter()
        .filter(|old| {
            !fresh_keys
                .get(&old.symbol)
                .is_some_and(|timestamps| timestamps.contains(&old.timestamp))
        })
        .filter(|old| retained_keys.insert((old.symbol.clone(), old.timestamp)))
        .map(Signal::deactivated)
        .collect();

    let mut merged: Vec<Signal> = fresh
        .into_iter()
        .map(|signal| Signal { status: SignalStatus::Active, ..signal })
        .collect();
    merged.extend(retained);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::Action;

    fn at(minute: u32) -> DateTime<FixedOffset> {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        Utc.with_ymd_and_hms(2025, 3, 14, 4, minute, 0).unwrap().with_timezone(&ist)
    }

    fn signal(symbol: &str, minute: u32, action: Action, price: f64, status: SignalStatus) -> Signal {
        Signal { symbol: Symbol::from(symbol), timestamp: at(minute), action, price, status }
    }

    use SignalStatus::{Active, Inactive};

    #[test]
    fn test_superseded_and_missing_symbols_become_inactive() {
        let fresh = vec![signal("A", 30, Action::Buy, 10.0, Active)];
        let previous = vec![
            signal("A", 15, Action::Sell, 9.0, Active),
            signal("B", 0, Action::Hold, 5.0, Active),
        ];

        let merged = reconcile(fresh, &previous);

        assert_eq!(
            merged,
            vec![
                signal("A", 30, Action::Buy, 10.0, Active),
                signal("A", 15, Action::Sell, 9.0, Inactive),
                signal("B", 0, Action::Hold, 5.0, Inactive),
            ]
        );
    }

    #[test]
    fn test_reconciling_against_own_output_adds_nothing() {
        let fresh = vec![signal("A", 30, Action::Buy, 10.0, Active)];
        let previous = vec![
            signal("A", 15, Action::Sell, 9.0, Active),
            signal("B", 0, Action::Hold, 5.0, Active),
        ];

        let first = reconcile(fresh.clone(), &previous);
        let second = reconcile(fresh, &first);

        assert_eq!(second, first);
    }

    #[test]
    fn test_same_observation_takes_the_fresh_copy() {
        let fresh = vec![signal("X", 45, Action::Sell, 12.0, Active)];
        let previous = vec![signal("X", 45, Action::Buy, 11.5, Active)];

        assert_eq!(reconcile(fresh.clone(), &previous), fresh);
    }

    #[test]
    fn test_empty_previous_returns_fresh_unchanged() {
        let fresh = vec![
            signal("A", 30, Action::Buy, 10.0, Active),
            signal("B", 30, Action::Hold, 5.0, Active),
        ];
        assert_eq!(reconcile(fresh.clone(), &[]), fresh);
    }

    #[test]
    fn test_empty_fresh_deactivates_everything() {
        let previous = vec![
            signal("A", 30, Action::Buy, 10.0, Active),
            signal("A", 15, Action::Sell, 9.0, Inactive),
        ];

        let merged = reconcile(Vec::new(), &previous);

        assert_eq!(
            merged,
            vec![
                signal("A", 30, Action::Buy, 10.0, Inactive),
                signal("A", 15, Action::Sell, 9.0, Inactive),
            ]
        );
    }

    #[test]
    fn test_at_most_one_active_signal_per_symbol() {
        let fresh = vec![signal("A", 45, Action::Buy, 10.0, Active)];
        // Duplicated active rows with different timestamps left by an older writer.
        let previous = vec![
            signal("A", 15, Action::Sell, 9.0, Active),
            signal("A", 30, Action::Hold, 9.5, Active),
            signal("A", 30, Action::Hold, 9.5, Inactive),
        ];

        let merged = reconcile(fresh, &previous);

        let active: Vec<_> = merged.iter().filter(|s| s.symbol.0 == "A" && s.is_active()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].timestamp, at(45));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_fresh_status_is_forced_active() {
        let fresh = vec![signal("A", 30, Action::Buy, 10.0, Inactive)];
        assert!(reconcile(fresh, &[])[0].is_active());
    }
}
