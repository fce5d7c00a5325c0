//! Session registry configuration.

use serde::{Deserialize, Serialize};

use crate::game::GameSettings;

/// Where the bullet goes when a new game is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletSource {
    /// Fresh draw from the thread RNG for every game.
    Random,
    /// Draws from one RNG seeded once for the whole registry, so a replay
    /// of the same command stream loads the same cylinders.
    Seeded(u64),
    /// Every game loads the bullet into this chamber.
    Fixed(usize),
}

impl std::fmt::Display for BulletSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulletSource::Random => write!(f, "random"),
            BulletSource::Seeded(seed) => write!(f, "seeded({seed})"),
            BulletSource::Fixed(chamber) => write!(f, "fixed({chamber})"),
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Settings applied to every new game
    pub game: GameSettings,

    /// Bullet placement strategy
    pub bullets: BulletSource,

    /// Capacity of each session actor's inbox (default: 64)
    pub inbox_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            bullets: BulletSource::Random,
            inbox_capacity: 64,
        }
    }
}

impl RegistryConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.game.validate()?;

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be greater than 0".to_string());
        }

        if let BulletSource::Fixed(chamber) = self.bullets
            && chamber >= self.game.chambers
        {
            return Err(format!(
                "Fixed bullet chamber {} is outside the {}-chamber cylinder",
                chamber, self.game.chambers
            ));
        }

        Ok(())
    }
}
