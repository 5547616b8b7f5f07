//! The per-tick state machine.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::arena::Handle;
use crate::config::Config;
use crate::error::{GameError, SpawnError};
use crate::game::world::Terrain;
use crate::game::{BuffOffer, Impact, Roster, Side, Tank, World, decide_attack, decide_move};
use crate::geometry::Vector;
use crate::render::{Palette, RenderBuffer};

/// Key code of Escape.
pub const ESC: char = '\u{1b}';

/// How a level ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every enemy unit was destroyed.
    Won,
    /// The player unit was destroyed.
    Lost,
}

/// State of the loop between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Ticks advance the world.
    Running,
    /// Ticks only count down cooldowns and read keys.
    Paused,
    /// The level is over; ticks do nothing until the caller moves on.
    Resolved(Outcome),
}

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tick {
    /// Keep looping.
    Continue,
    /// The level ended; show the result and call
    /// [`Game::next_level`] or [`Game::reset`].
    Resolved(Outcome),
    /// The level was rebuilt from the pause menu.
    Restarted,
    /// The player asked to quit.
    Quit,
}

/// A player action decoded from one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Turn to face a cardinal direction and schedule a step.
    Face(Vector),
    /// Shoot from the gun.
    Fire,
    /// Enter the pause menu.
    Pause,
    /// Leave the pause menu.
    Resume,
    /// Rebuild the level (or the whole game once play has begun).
    Restart,
    /// Leave the game.
    Quit,
}

impl Command {
    /// Decode a lowercase key in `mode`. Unbound keys yield `None`.
    #[must_use]
    pub const fn from_key(key: char, mode: Mode) -> Option<Self> {
        match mode {
            Mode::Running => match key {
                'w' => Some(Self::Face(Vector::UP)),
                's' => Some(Self::Face(Vector::DOWN)),
                'a' => Some(Self::Face(Vector::LEFT)),
                'd' => Some(Self::Face(Vector::RIGHT)),
                'j' => Some(Self::Fire),
                ':' => Some(Self::Pause),
                ESC => Some(Self::Quit),
                _ => None,
            },
            Mode::Paused => match key {
                'c' => Some(Self::Resume),
                'r' => Some(Self::Restart),
                'q' | ESC => Some(Self::Quit),
                _ => None,
            },
            Mode::Resolved(_) => None,
        }
    }
}

/// A whole game: the level in play, the roster it was built from, and the
/// frame being drawn.
#[derive(Debug, Clone)]
pub struct Game<R = ChaCha8Rng> {
    config: Config,
    world: World,
    buffer: RenderBuffer,
    roster: Roster,
    palette: Palette,
    rng: R,
    mode: Mode,
    level: u32,
    has_started: bool,
    ticks: u64,
}

impl Game<ChaCha8Rng> {
    /// A new game driven by a seeded ChaCha generator.
    ///
    /// # Errors
    ///
    /// See [`Game::new`].
    pub fn seeded(config: Config, seed: u64) -> Result<Self, GameError> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    /// Validate `config` and start a fresh game at level 1, paused.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or the first level cannot be
    /// populated.
    pub fn new(config: Config, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let mut game = Self {
            world: World::new(config.map_width, config.map_height),
            buffer: RenderBuffer::new(config.map_width, config.map_height),
            roster: Roster::from_config(&config),
            palette: Palette::default(),
            config,
            rng,
            mode: Mode::Paused,
            level: 1,
            has_started: false,
            ticks: 0,
        };
        game.reset()?;
        Ok(game)
    }

    /// The configuration in force.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Live entities.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Live entities, for setting up positions directly.
    pub const fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The frame being drawn.
    #[must_use]
    pub const fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    /// The frame being drawn, for flushing.
    pub const fn buffer_mut(&mut self) -> &mut RenderBuffer {
        &mut self.buffer
    }

    /// Archetypes the next level spawns from.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Colours of the two sides.
    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Current state of the loop.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Level number, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Whether play has been resumed at least once this level.
    #[must_use]
    pub const fn has_started(&self) -> bool {
        self.has_started
    }

    /// Ticks processed since the game was created.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start over from level 1 with fresh colours and base-stat archetypes.
    ///
    /// # Errors
    ///
    /// Returns an error if the level cannot be populated.
    pub fn reset(&mut self) -> Result<(), SpawnError> {
        self.level = 1;
        self.palette = Palette::random(&mut self.rng);
        self.roster = Roster::from_config(&self.config);
        debug!("game reset");
        self.init_level()
    }

    /// Lay out a new map for the current level from the roster and pause.
    ///
    /// # Errors
    ///
    /// Returns an error if the map fills up before every unit and cluster
    /// is placed.
    pub fn init_level(&mut self) -> Result<(), SpawnError> {
        self.world.clear();
        let clusters = [
            (Terrain::Solid, self.config.solid_clusters),
            (Terrain::Dirt, self.config.dirt_clusters),
        ];
        self.world.populate(
            self.roster.archetypes(),
            &clusters,
            self.config.spawn_attempts,
            &mut self.rng,
        )?;
        self.mode = Mode::Paused;
        self.has_started = false;

        self.buffer.reset();
        for wall in &self.world.walls {
            self.buffer.draw_wall(wall);
        }
        self.draw_objects();
        debug!(level = self.level, tanks = self.world.tanks.len(), "level initialised");
        Ok(())
    }

    /// Four buff pairs to choose from before the next level.
    pub fn roll_offers(&mut self) -> [BuffOffer; BuffOffer::COUNT] {
        BuffOffer::roll_set(self.level + 1, &mut self.rng)
    }

    /// Advance to the next level after a win: apply the chosen buffs, grow the
    /// enemy roster when due, and lay out the new map.
    ///
    /// # Errors
    ///
    /// Returns an error if the new level cannot be populated.
    pub fn next_level(&mut self, offer: &BuffOffer) -> Result<(), SpawnError> {
        self.level += 1;
        offer.apply(&mut self.roster, &self.config, &mut self.rng);
        self.roster.grow_enemies(self.level, &self.config);
        info!(level = self.level, enemies = self.roster.enemy_count(), "next level");
        self.init_level()
    }

    /// Advance the state machine by one tick, consuming at most one key.
    ///
    /// # Errors
    ///
    /// Returns an error only when a restart cannot populate the new map.
    pub fn update(&mut self, key: Option<char>) -> Result<Tick, SpawnError> {
        self.ticks += 1;
        if let Mode::Resolved(outcome) = self.mode {
            return Ok(Tick::Resolved(outcome));
        }

        for tank in self.world.tanks.iter_mut() {
            tank.cool_down();
        }

        if let Some(command) = key.and_then(|k| Command::from_key(k, self.mode)) {
            if let Some(tick) = self.execute(command)? {
                return Ok(tick);
            }
        }
        if self.mode == Mode::Paused {
            return Ok(Tick::Continue);
        }

        self.erase_mobiles();
        self.enemies_decide();
        self.advance_bullets();
        self.move_tanks();

        let lost = self.world.count(Side::Player) == 0;
        let won = self.world.count(Side::Enemy) == 0;
        self.draw_objects();

        let tick = if lost {
            self.resolve(Outcome::Lost)
        } else if won {
            self.resolve(Outcome::Won)
        } else {
            Tick::Continue
        };
        trace!(
            tick = self.ticks,
            tanks = self.world.tanks.len(),
            bullets = self.world.bullets.len(),
            "tick"
        );
        Ok(tick)
    }

    fn execute(&mut self, command: Command) -> Result<Option<Tick>, SpawnError> {
        match command {
            Command::Face(dir) => {
                if let Some(tank) = self.player_mut() {
                    if tank.move_countdown == 0 {
                        tank.dir = dir;
                        tank.move_countdown = tank.move_cooldown;
                    }
                }
            }
            Command::Fire => {
                let player = self.world.player().map(|(h, _)| h);
                if let Some(handle) = player {
                    self.try_fire(handle);
                }
            }
            Command::Pause => {
                self.mode = Mode::Paused;
                debug!("paused");
            }
            Command::Resume => {
                self.mode = Mode::Running;
                self.has_started = true;
                debug!("resumed");
            }
            Command::Restart => {
                if self.has_started {
                    self.reset()?;
                } else {
                    self.init_level()?;
                }
                return Ok(Some(Tick::Restarted));
            }
            Command::Quit => return Ok(Some(Tick::Quit)),
        }
        Ok(None)
    }

    fn player_mut(&mut self) -> Option<&mut Tank> {
        self.world.tanks.iter_mut().find(|t| t.is_player())
    }

    /// Fire if the unit's attack countdown has run out, then restart it.
    fn try_fire(&mut self, handle: Handle<Tank>) {
        let ready = self.world.tanks.get(handle).is_some_and(|t| t.attack_countdown == 0);
        if ready {
            self.world.fire(handle);
            if let Some(tank) = self.world.tanks.get_mut(handle) {
                tank.attack_countdown = tank.attack_cooldown;
            }
        }
    }

    fn erase_mobiles(&mut self) {
        for tank in &self.world.tanks {
            self.buffer.erase(tank);
        }
        for bullet in &self.world.bullets {
            self.buffer.erase(bullet);
        }
    }

    fn enemies_decide(&mut self) {
        let target = self.world.player().map_or(Vector::ZERO, |(_, t)| t.pos);
        let enemies: Vec<Handle<Tank>> = self
            .world
            .tanks
            .iter_handles()
            .filter(|(_, t)| !t.is_player())
            .map(|(h, _)| h)
            .collect();

        for handle in enemies {
            let Some(tank) = self.world.tanks.get_mut(handle) else {
                continue;
            };
            if tank.move_countdown == 0 {
                if let Some(dir) = decide_move(tank, target, &mut self.rng) {
                    tank.dir = dir;
                    tank.move_countdown = tank.move_cooldown;
                }
            }
            if tank.attack_countdown == 0 && decide_attack(tank, target, &mut self.rng) {
                self.try_fire(handle);
            }
        }
    }

    fn advance_bullets(&mut self) {
        let mut cursor = self.world.bullets.first();
        while let Some(handle) = cursor {
            let bullet = {
                let bullet = &mut self.world.bullets[handle];
                bullet.advance();
                *bullet
            };
            let impact = self.world.resolve_impact(&bullet);
            match &impact {
                Impact::Obstacle {
                    destroyed: Some(wall), ..
                } => self.buffer.erase(wall),
                Impact::Hit {
                    killed: Some(tank), ..
                } => {
                    self.buffer.erase(tank);
                    debug!(side = ?tank.side, pos = ?tank.pos, "unit destroyed");
                }
                _ => {}
            }
            cursor = if impact.consumes() {
                self.world.bullets.erase(handle)
            } else {
                self.world.bullets.next(handle)
            };
        }
    }

    fn move_tanks(&mut self) {
        let movers: Vec<Handle<Tank>> = self
            .world
            .tanks
            .iter_handles()
            .filter(|(_, t)| t.wants_to_move())
            .map(|(h, _)| h)
            .collect();
        for handle in movers {
            if self.world.can_tank_move(handle) {
                self.world.move_tank(handle);
            }
        }
    }

    fn draw_objects(&mut self) {
        for tank in &self.world.tanks {
            self.buffer.draw_tank(tank, self.palette.color(tank.side));
        }
        for bullet in &self.world.bullets {
            self.buffer.draw_bullet(bullet, self.palette.color(bullet.side));
        }
    }

    fn resolve(&mut self, outcome: Outcome) -> Tick {
        self.mode = Mode::Resolved(outcome);
        info!(?outcome, level = self.level, ticks = self.ticks, "level resolved");
        Tick::Resolved(outcome)
    }
}
