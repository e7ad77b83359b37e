//! Damage mitigation pipeline.
//!
//! # Formula
//!
//! ```text
//! after_base = round(raw × mitigation)        (mitigation = surviving multiplier)
//! for shield in ledger (oldest first):
//!     absorbed = min(shield.remaining, amount)
//!     shield.remaining -= absorbed
//!     amount           -= absorbed
//!     stop once amount == 0
//! applied = amount
//! ```
//!
//! The function is pure: it reads a ledger and returns an updated copy with
//! depleted shields removed. The caller writes the result back.

use crate::state::BuffInstanceId;

/// Absorption left on one shield buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldEntry {
    pub buff: BuffInstanceId,
    pub remaining: u32,
}

/// Ordered damage-absorption stack of one combatant.
///
/// Entries are kept in insertion order (oldest first) and are never
/// reordered by remaining value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldLedger {
    entries: Vec<ShieldEntry>,
}

impl ShieldLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shield behind every existing one.
    pub fn push(&mut self, buff: BuffInstanceId, remaining: u32) {
        self.entries.push(ShieldEntry { buff, remaining });
    }

    /// Sum of remaining absorption.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.remaining).sum()
    }

    pub fn get(&self, buff: BuffInstanceId) -> Option<&ShieldEntry> {
        self.entries.iter().find(|e| e.buff == buff)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShieldEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ShieldEntry> for ShieldLedger {
    fn from_iter<I: IntoIterator<Item = ShieldEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Result of running an incoming amount through the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mitigation {
    /// Raw incoming amount.
    pub incoming: u32,
    /// Amount after the base mitigation multiplier.
    pub after_base: u32,
    /// Amount soaked by shields.
    pub absorbed: u32,
    /// Amount that reaches health.
    pub applied: u32,
    /// Ledger after absorption, depleted shields removed.
    pub ledger: ShieldLedger,
    /// Shields that reached zero in this pass, oldest first.
    pub depleted: Vec<BuffInstanceId>,
}

/// Runs `raw` through base mitigation and the shield ledger.
///
/// `mitigation` is the surviving multiplier (1.0 = no mitigation); negative
/// values are treated as 0.
pub fn mitigate(raw: u32, mitigation: f32, ledger: &ShieldLedger) -> Mitigation {
    let scaled = (f64::from(raw) * f64::from(mitigation.max(0.0))).round();
    let after_base = scaled.min(f64::from(u32::MAX)) as u32;

    let mut amount = after_base;
    let mut absorbed = 0;
    let mut depleted = Vec::new();
    let mut entries = Vec::with_capacity(ledger.len());

    for entry in ledger.iter() {
        if amount == 0 {
            entries.push(*entry);
            continue;
        }

        let soaked = entry.remaining.min(amount);
        amount -= soaked;
        absorbed += soaked;

        let remaining = entry.remaining - soaked;
        if remaining == 0 {
            depleted.push(entry.buff);
        } else {
            entries.push(ShieldEntry {
                buff: entry.buff,
                remaining,
            });
        }
    }

    Mitigation {
        incoming: raw,
        after_base,
        absorbed,
        applied: amount,
        ledger: ShieldLedger { entries },
        depleted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(values: &[u32]) -> ShieldLedger {
        values
            .iter()
            .enumerate()
            .map(|(i, &remaining)| ShieldEntry {
                buff: BuffInstanceId(i as u64),
                remaining,
            })
            .collect()
    }

    #[test]
    fn base_mitigation_without_shields() {
        let result = mitigate(100, 0.5, &ShieldLedger::new());

        assert_eq!(result.after_base, 50);
        assert_eq!(result.applied, 50);
        assert_eq!(result.absorbed, 0);
    }

    #[test]
    fn single_shield_is_depleted_and_removed() {
        let result = mitigate(100, 0.5, &ledger(&[30]));

        assert_eq!(result.after_base, 50);
        assert_eq!(result.applied, 20);
        assert_eq!(result.absorbed, 30);
        assert!(result.ledger.is_empty());
        assert_eq!(result.depleted, vec![BuffInstanceId(0)]);
    }

    #[test]
    fn shields_are_consumed_oldest_first() {
        // Newer shield is larger but must not be touched before the older one.
        let result = mitigate(25, 1.0, &ledger(&[10, 100]));

        assert_eq!(result.applied, 0);
        assert_eq!(result.depleted, vec![BuffInstanceId(0)]);
        assert_eq!(
            result.ledger.iter().copied().collect::<Vec<_>>(),
            vec![ShieldEntry {
                buff: BuffInstanceId(1),
                remaining: 85,
            }]
        );
    }

    #[test]
    fn stops_early_and_leaves_later_shields_untouched() {
        let result = mitigate(5, 1.0, &ledger(&[20, 30, 40]));

        assert_eq!(result.applied, 0);
        assert!(result.depleted.is_empty());
        assert_eq!(
            result.ledger.iter().map(|e| e.remaining).collect::<Vec<_>>(),
            vec![15, 30, 40]
        );
    }

    #[test]
    fn total_absorbed_never_exceeds_post_base_amount() {
        let result = mitigate(60, 0.5, &ledger(&[100, 100]));

        assert_eq!(result.after_base, 30);
        assert_eq!(result.absorbed, 30);
        assert_eq!(result.ledger.total(), 170);
    }

    #[test]
    fn mitigation_rounds_to_nearest() {
        assert_eq!(mitigate(5, 0.5, &ShieldLedger::new()).applied, 3);
        assert_eq!(mitigate(7, 0.3, &ShieldLedger::new()).applied, 2);
    }
}
