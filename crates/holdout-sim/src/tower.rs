//! The defended structure.

use holdout_core::interfaces::DefendedStructure;
use holdout_core::types::Position;

/// In-memory structure with regeneration and a resizable health pool.
#[derive(Debug, Clone)]
pub struct Tower {
    position: Position,
    max_health: f64,
    health: f64,
    destroyed: bool,
}

impl Tower {
    pub fn new(position: Position, max_health: f64) -> Self {
        let max_health = max_health.max(1.0);
        Self {
            position,
            max_health,
            health: max_health,
            destroyed: false,
        }
    }

    pub fn health_fraction(&self) -> f64 {
        self.health / self.max_health
    }
}

impl DefendedStructure for Tower {
    fn position(&self) -> Position {
        self.position
    }

    fn take_damage(&mut self, amount: f64) {
        if self.destroyed || amount <= 0.0 {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.destroyed = true;
        }
    }

    fn heal(&mut self, amount: f64) {
        if self.destroyed || amount <= 0.0 {
            return;
        }
        self.health = (self.health + amount).min(self.max_health);
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn health(&self) -> f64 {
        self.health
    }

    fn max_health(&self) -> f64 {
        self.max_health
    }

    fn set_max_health(&mut self, max_health: f64) {
        let fraction = self.health_fraction();
        self.max_health = max_health.max(1.0);
        self.health = self.max_health * fraction;
    }

    fn restore(&mut self) {
        self.destroyed = false;
        self.health = self.max_health;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_destroys_at_zero() {
        let mut t = Tower::new(Position::default(), 100.0);
        t.take_damage(60.0);
        assert_eq!(t.health(), 40.0);
        assert!(!t.is_destroyed());
        t.take_damage(60.0);
        assert_eq!(t.health(), 0.0);
        assert!(t.is_destroyed());
        t.heal(50.0);
        assert_eq!(t.health(), 0.0, "destroyed tower does not heal");
    }

    #[test]
    fn heal_caps_at_max() {
        let mut t = Tower::new(Position::default(), 100.0);
        t.take_damage(10.0);
        t.heal(25.0);
        assert_eq!(t.health(), 100.0);
    }

    #[test]
    fn set_max_health_keeps_fraction() {
        let mut t = Tower::new(Position::default(), 100.0);
        t.take_damage(50.0);
        t.set_max_health(150.0);
        assert_eq!(t.max_health(), 150.0);
        assert_eq!(t.health(), 75.0);
    }

    #[test]
    fn restore_revives() {
        let mut t = Tower::new(Position::default(), 100.0);
        t.take_damage(500.0);
        t.restore();
        assert!(!t.is_destroyed());
        assert_eq!(t.health(), 100.0);
    }
}
