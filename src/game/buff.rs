//! Between-level stat upgrades and the archetype roster they act on.

use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::config::{Config, SideLimits};
use crate::game::random::{biased_int, chance};
use crate::game::{Archetype, Side};

/// Stat a buff improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Shorter move cooldown.
    Speed,
    /// Shorter attack cooldown.
    AttackCooldown,
    /// More hit points.
    Hp,
    /// More damage per projectile.
    AttackPower,
}

impl BuffKind {
    const ALL: [Self; 4] = [Self::Speed, Self::AttackCooldown, Self::Hp, Self::AttackPower];

    /// Largest fixed amount rolled for this kind.
    const fn max_fixed(self) -> i32 {
        match self {
            Self::AttackPower => 1,
            Self::Hp => 2,
            Self::Speed | Self::AttackCooldown => 3,
        }
    }

    /// Largest amount a per-archetype random roll can give.
    const fn max_random(self) -> u32 {
        match self {
            Self::Speed | Self::AttackCooldown => 3,
            Self::Hp | Self::AttackPower => 1,
        }
    }
}

impl fmt::Display for BuffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Speed => "speed",
            Self::AttackCooldown => "attack speed",
            Self::Hp => "HP",
            Self::AttackPower => "ATK",
        })
    }
}

/// How much a buff adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffAmount {
    /// The same amount for every archetype. Zero is allowed.
    Fixed(u32),
    /// A separate small roll for each archetype.
    Random,
}

/// A stat upgrade applied to every archetype of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Buff {
    /// Stat affected.
    pub kind: BuffKind,
    /// Size of the change.
    pub amount: BuffAmount,
}

impl Buff {
    /// Create a buff.
    #[must_use]
    pub const fn new(kind: BuffKind, amount: BuffAmount) -> Self {
        Self { kind, amount }
    }

    /// Draw a buff for the level about to start.
    ///
    /// Cooldown kinds come up most often and ATK least. From level 8 on,
    /// fixed amounts lean toward their maximum; before level 6 they lean
    /// toward zero.
    pub fn roll<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Self {
        let index = biased_int(rng, 0, 3, -1);
        let kind = BuffKind::ALL[usize::try_from(index).unwrap_or(0)];
        if chance(rng, 1, 3) {
            return Self::new(kind, BuffAmount::Random);
        }
        let skew = i32::try_from(level / 2).unwrap_or(i32::MAX) - 3;
        let value = biased_int(rng, 0, kind.max_fixed(), skew);
        Self::new(kind, BuffAmount::Fixed(value.unsigned_abs()))
    }

    /// Upgrade every archetype of `side` in `roster`, staying inside `limits`.
    pub fn apply<R: Rng + ?Sized>(&self, roster: &mut Roster, side: Side, limits: &SideLimits, rng: &mut R) {
        for archetype in roster.archetypes.iter_mut().filter(|a| a.side == side) {
            let delta = match self.amount {
                BuffAmount::Fixed(n) => n,
                BuffAmount::Random => rng.gen_range(0..=self.kind.max_random()),
            };
            let gain = i32::try_from(delta).unwrap_or(i32::MAX);
            match self.kind {
                BuffKind::Speed => {
                    archetype.move_cooldown = archetype
                        .move_cooldown
                        .saturating_sub(delta)
                        .max(limits.min_move_cooldown);
                }
                BuffKind::AttackCooldown => {
                    archetype.attack_cooldown = archetype
                        .attack_cooldown
                        .saturating_sub(delta)
                        .max(limits.min_attack_cooldown);
                }
                BuffKind::Hp => {
                    archetype.hp = archetype.hp.saturating_add(gain).min(limits.max_hp);
                }
                BuffKind::AttackPower => {
                    archetype.attack_power = archetype.attack_power.saturating_add(gain).min(limits.max_attack_power);
                }
            }
        }
        info!(?side, buff = %self, "buff applied");
    }
}

impl fmt::Display for Buff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount {
            BuffAmount::Fixed(n) => write!(f, "Add {n} {}", self.kind),
            BuffAmount::Random => write!(f, "Add [RANDOM] {}", self.kind),
        }
    }
}

/// Which halves of an offer are shown before choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Both buffs are shown.
    Both,
    /// Only the player's buff is shown.
    PlayerOnly,
    /// Only the enemy's buff is shown.
    EnemyOnly,
    /// Neither buff is shown.
    Hidden,
}

/// One choice on the buff screen: a buff for each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuffOffer {
    /// Buff the player's archetype receives.
    pub player: Buff,
    /// Buff every enemy archetype receives.
    pub enemy: Buff,
    /// What the screen reveals.
    pub visibility: Visibility,
}

impl BuffOffer {
    /// Number of offers on the buff screen.
    pub const COUNT: usize = 4;

    /// Draw the four offers for `level`, one per visibility.
    pub fn roll_set<R: Rng + ?Sized>(level: u32, rng: &mut R) -> [Self; Self::COUNT] {
        [
            Visibility::Both,
            Visibility::PlayerOnly,
            Visibility::EnemyOnly,
            Visibility::Hidden,
        ]
        .map(|visibility| {
            let enemy = Buff::roll(level, rng);
            let player = Buff::roll(level, rng);
            Self {
                player,
                enemy,
                visibility,
            }
        })
    }

    /// The player's buff, if the screen shows it.
    #[must_use]
    pub const fn shown_player(&self) -> Option<Buff> {
        match self.visibility {
            Visibility::Both | Visibility::PlayerOnly => Some(self.player),
            Visibility::EnemyOnly | Visibility::Hidden => None,
        }
    }

    /// The enemy's buff, if the screen shows it.
    #[must_use]
    pub const fn shown_enemy(&self) -> Option<Buff> {
        match self.visibility {
            Visibility::Both | Visibility::EnemyOnly => Some(self.enemy),
            Visibility::PlayerOnly | Visibility::Hidden => None,
        }
    }

    /// Apply both halves, enemy first.
    pub fn apply<R: Rng + ?Sized>(&self, roster: &mut Roster, config: &Config, rng: &mut R) {
        self.enemy.apply(roster, Side::Enemy, &config.limits(Side::Enemy), rng);
        self.player.apply(roster, Side::Player, &config.limits(Side::Player), rng);
    }
}

/// Archetypes the next level spawns from, player first.
///
/// Buffs accumulate here across levels; the roster is only rebuilt on a
/// full game reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    archetypes: Vec<Archetype>,
}

impl Roster {
    /// One player archetype and `config.enemies` enemy archetypes, all with
    /// base stats.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let player = Archetype::from_stats(Side::Player, &config.player);
        let enemy = Archetype::from_stats(Side::Enemy, &config.enemy);
        let enemies = usize::try_from(config.enemies).unwrap_or(0);
        let mut archetypes = Vec::with_capacity(enemies + 1);
        archetypes.push(player);
        archetypes.extend(std::iter::repeat_n(enemy, enemies));
        Self { archetypes }
    }

    /// Every archetype in spawn order.
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Enemy archetypes in the roster.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.archetypes.iter().filter(|a| a.side == Side::Enemy).count()
    }

    /// Add a base-stat enemy on every third level, up to the enemy cap.
    ///
    /// Returns whether an archetype was added.
    pub fn grow_enemies(&mut self, level: u32, config: &Config) -> bool {
        let cap = usize::try_from(config.enemy_limit).unwrap_or(usize::MAX);
        if level <= 1 || level % 3 != 1 || self.enemy_count() >= cap {
            return false;
        }
        self.archetypes.push(Archetype::from_stats(Side::Enemy, &config.enemy));
        info!(level, enemies = self.enemy_count(), "enemy roster grew");
        true
    }
}
