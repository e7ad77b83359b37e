//! Damage resolution.
//!
//! Pure functions only. Applying results to a combatant and announcing them
//! is the engine's job.
//!
//! - `mitigate`: base mitigation followed by the ordered shield ledger
//! - `threat_for`: threat attributed to a caster for a damaging effect

pub mod mitigation;

pub use mitigation::{Mitigation, ShieldEntry, ShieldLedger, mitigate};

/// Threat generated by `amount` damage with the given modifier (truncated).
pub fn threat_for(amount: u32, threat_modifier: f32) -> u32 {
    (amount as f32 * threat_modifier.max(0.0)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_scales_raw_amount() {
        assert_eq!(threat_for(40, 1.5), 60);
        assert_eq!(threat_for(10, 0.25), 2);
        assert_eq!(threat_for(10, -1.0), 0);
    }
}
