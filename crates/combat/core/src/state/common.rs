use std::fmt;

/// Unique identifier for any combatant tracked in the state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of one in-flight ability execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityInstanceId(pub u64);

impl fmt::Display for AbilityInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability:{}", self.0)
    }
}

/// Identifier of one buff application.
///
/// Unique across the whole simulation, not only per combatant, so shield
/// ledger entries can be matched back to their buff unambiguously.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffInstanceId(pub u64);

impl fmt::Display for BuffInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buff:{}", self.0)
    }
}

/// Continuous world position in simulation units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to `other`.
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Moves toward `target` by at most `max_step`, never past it.
    pub fn step_toward(&self, target: &Position, max_step: f32) -> Position {
        let distance = self.distance(target);
        if distance <= f32::EPSILON || max_step >= distance {
            return *target;
        }
        let scale = max_step.max(0.0) / distance;
        Position {
            x: self.x + (target.x - self.x) * scale,
            y: self.y + (target.y - self.y) * scale,
            z: self.z + (target.z - self.z) * scale,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Integer resource meter (health, mana) tracked per combatant.
///
/// Deserialized meters are clamped the same way [`ResourceMeter::new`] clamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "MeterParts"))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MeterParts {
    current: u32,
    maximum: u32,
}

#[cfg(feature = "serde")]
impl From<MeterParts> for ResourceMeter {
    fn from(parts: MeterParts) -> Self {
        Self::new(parts.current, parts.maximum)
    }
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    /// A meter filled to `maximum`.
    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Current value as a fraction of maximum (0.0 when maximum is zero).
    pub fn fraction(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }

    /// Removes up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding maximum, returning what was added.
    pub fn fill(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.maximum.saturating_sub(self.current));
        self.current += added;
        added
    }

    /// Changes the maximum, clamping current into the new range.
    pub fn set_maximum(&mut self, maximum: u32) {
        self.maximum = maximum;
        self.current = self.current.min(maximum);
    }
}

impl fmt::Display for ResourceMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_toward_never_overshoots() {
        let from = Position::ORIGIN;
        let to = Position::new(3.0, 0.0, 0.0);

        assert_eq!(from.step_toward(&to, 5.0), to);
        assert_eq!(from.step_toward(&to, 1.0), Position::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn meter_clamps_both_directions() {
        let mut meter = ResourceMeter::full(10);

        assert_eq!(meter.drain(25), 10);
        assert_eq!(meter.current, 0);
        assert_eq!(meter.fill(4), 4);
        assert_eq!(meter.fill(40), 6);
        assert_eq!(meter.current, 10);

        meter.set_maximum(3);
        assert_eq!(meter.to_string(), "3/3");
    }

    #[test]
    fn overfull_meter_fills_nothing() {
        let mut meter = ResourceMeter {
            current: 12,
            maximum: 10,
        };

        assert_eq!(meter.fill(5), 0);
        assert_eq!(meter.current, 12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_meter_is_clamped() {
        let meter: ResourceMeter =
            serde_json::from_str(r#"{"current": 80, "maximum": 50}"#).unwrap();

        assert_eq!(meter, ResourceMeter::full(50));
    }
}
