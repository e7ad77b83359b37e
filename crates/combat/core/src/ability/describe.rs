//! Player-facing text for ability templates (tooltips and combat labels).

use crate::buff::{BuffDefinition, BuffEffect, StatDeltas};

use super::definition::{AbilityCategory, AbilityDefinition};

impl AbilityDefinition {
    /// Multi-line tooltip: name, target and effect, range, cost, cast time.
    pub fn description(&self) -> String {
        let mut lines = Vec::with_capacity(5);
        lines.push(self.name.clone());

        let target = if self.is_only_self_cast() {
            "self".to_string()
        } else {
            self.targeting.to_string()
        };
        let detail = self.detail();
        if detail.is_empty() {
            lines.push(format!("Cast spell on {target}."));
        } else {
            lines.push(format!("Cast spell on {target} {detail}"));
        }

        if self.range > 0.0 && !self.is_only_self_cast() {
            lines.push(format!("Range: {}", self.range));
        }
        lines.push(format!("Costs {} to cast spell.", self.resource_cost));

        if self.is_instant_cast() {
            lines.push("Spell is instant cast.".to_string());
        } else {
            let moving = if self.is_castable_while_moving() {
                "Is castable while moving."
            } else {
                "Is not castable while moving."
            };
            lines.push(format!(
                "Spell takes {} seconds to cast. {moving}",
                self.cast_time
            ));
        }

        lines.join("\n")
    }

    /// Short label shown with the hit, e.g. `"40 - Interrupt"`.
    pub fn hit_text(&self) -> String {
        let mut text = String::new();
        if self.amount > 0 {
            text.push_str(&self.amount.to_string());
        }
        match self.category {
            AbilityCategory::DamageOverTime => text.push_str(&format!(" - DOT {}", self.name)),
            AbilityCategory::HealOverTime => text.push_str(&format!(" - HOT {}", self.name)),
            AbilityCategory::Interrupt => text.push_str(" - Interrupt"),
            AbilityCategory::Slow => text.push_str(" - Slow"),
            AbilityCategory::Taunt => text.push_str(" - Taunt"),
            AbilityCategory::Resurrect => text.push_str(" - Resurrect"),
            _ => {}
        }
        text
    }

    fn detail(&self) -> String {
        match self.category {
            AbilityCategory::Damage => format!("to deal {} damage.", self.amount),
            AbilityCategory::Heal => format!("to heal {} damage.", self.amount),
            AbilityCategory::Interrupt if self.amount > 0 => format!(
                "to deal {} damage and interrupt any spellcast.",
                self.amount
            ),
            AbilityCategory::Interrupt => "to interrupt any spellcast.".to_string(),
            AbilityCategory::Taunt => "to force the target to attack you.".to_string(),
            AbilityCategory::Resurrect => "to resurrect the target.".to_string(),
            AbilityCategory::Special => String::new(),
            AbilityCategory::Buff
            | AbilityCategory::DamageOverTime
            | AbilityCategory::HealOverTime
            | AbilityCategory::Shield
            | AbilityCategory::Slow => self.buff.as_ref().map(buff_detail).unwrap_or_default(),
        }
    }
}

fn buff_detail(buff: &BuffDefinition) -> String {
    let mut clauses = stat_clauses(&buff.deltas);
    let seconds = format!("{:.0} seconds", buff.duration);

    let tail = match buff.effect {
        BuffEffect::Stat => {
            if clauses.is_empty() {
                return String::new();
            }
            return format!("to {} for {seconds}.", clauses.join(", and "));
        }
        BuffEffect::DamageOverTime { total } => format!("deal {total} damage over {seconds}"),
        BuffEffect::HealOverTime { total } => format!("heal {total} damage over {seconds}"),
        BuffEffect::Shield { capacity } => {
            format!("place a shield that will absorb {capacity} damage for {seconds}")
        }
    };
    clauses.push(tail);
    format!("to {}.", clauses.join(", and "))
}

fn stat_clauses(deltas: &StatDeltas) -> Vec<String> {
    let entries = [
        (deltas.movement_speed, "increase movement speed", "reduce movement speed"),
        (deltas.attack_speed, "increase attack speed", "reduce attack speed"),
        (deltas.damage_mitigation, "reduce damage taken", "increase damage taken"),
        (deltas.damage_increase, "increase damage dealt", "reduce damage dealt"),
    ];

    entries
        .into_iter()
        .filter(|(delta, _, _)| *delta != 0.0)
        .map(|(delta, up, down)| {
            let verb = if delta > 0.0 { up } else { down };
            format!("{verb} by {:.0}%", (delta * 100.0).abs())
        })
        .collect()
}
