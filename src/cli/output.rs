//! Output formatting utilities for CLI.

use serde::Serialize;
use tankgrid::game::{Game, Mode, Outcome, Side};

/// How a headless run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum RunOutcome {
    /// Every enemy was destroyed.
    Won,
    /// The player was destroyed.
    Lost,
    /// The tick limit ran out first.
    Unresolved,
}

/// JSON-serializable result of a headless run.
#[derive(Debug, Serialize)]
pub(super) struct SimulationReport {
    /// Random seed used.
    pub(super) seed: u64,
    /// Level that was played.
    pub(super) level: u32,
    /// How the level ended.
    pub(super) outcome: RunOutcome,
    /// Ticks processed.
    pub(super) ticks: u64,
    /// Player units still alive.
    pub(super) players: usize,
    /// Enemy units still alive.
    pub(super) enemies: usize,
    /// Projectiles still in flight.
    pub(super) bullets: usize,
}

impl SimulationReport {
    /// Summarise a game after its run.
    pub(super) fn from_game(seed: u64, game: &Game) -> Self {
        let outcome = match game.mode() {
            Mode::Resolved(Outcome::Won) => RunOutcome::Won,
            Mode::Resolved(Outcome::Lost) => RunOutcome::Lost,
            Mode::Running | Mode::Paused => RunOutcome::Unresolved,
        };
        let world = game.world();
        Self {
            seed,
            level: game.level(),
            outcome,
            ticks: game.ticks(),
            players: world.count(Side::Player),
            enemies: world.count(Side::Enemy),
            bullets: world.bullets.len(),
        }
    }
}

/// Format a run report as human-readable text.
pub(super) fn format_text(report: &SimulationReport) -> String {
    let outcome = match report.outcome {
        RunOutcome::Won => "won",
        RunOutcome::Lost => "lost",
        RunOutcome::Unresolved => "unresolved",
    };
    let mut output = String::new();
    output.push_str(&format!("Simulation (seed: {})\n", report.seed));
    output.push_str(&format!("  Level: {}\n", report.level));
    output.push_str(&format!("  Outcome: {outcome}\n"));
    output.push_str(&format!("  Ticks: {}\n", report.ticks));
    output.push_str(&format!("  Player units: {}\n", report.players));
    output.push_str(&format!("  Enemy units: {}\n", report.enemies));
    output.push_str(&format!("  Bullets in flight: {}\n", report.bullets));
    output
}
