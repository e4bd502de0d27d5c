//! Battleship: a setup phase where both sides place a fleet, then a
//! battle phase of alternating shots on a 10×10 grid.
//!
//! Each side's ships and the shots that side has *fired* are stored
//! separately. The creator plays `X`, the opponent `O`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tabletop_protocol::{BattleshipMove, GameType, Mark, Ship};

use crate::cell::grid_index;
use crate::{GameRules, MoveError, NextTurn, Outcome};

pub const GRID: usize = 10;

/// The standard fleet: every side places exactly these ships.
pub const FLEET: [(&str, i32); 5] = [
    ("Carrier", 5),
    ("Battleship", 4),
    ("Cruiser", 3),
    ("Submarine", 3),
    ("Destroyer", 2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Setup,
    Battle,
}

/// Full persisted state of a Battleship room.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleshipState {
    pub phase: Phase,
    pub creator_ready: bool,
    pub opponent_ready: bool,
    pub creator_ships: Vec<Ship>,
    pub opponent_ships: Vec<Ship>,
    /// Shots fired by the creator at the opponent's grid.
    pub creator_shots: Vec<[i32; 2]>,
    /// Shots fired by the opponent at the creator's grid.
    pub opponent_shots: Vec<[i32; 2]>,
}

/// What a shot did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotOutcome {
    pub hit: bool,
    /// Name of the ship this shot finished off, if any.
    pub sunk: Option<String>,
}

/// Checks that `ships` is exactly the standard fleet, laid out inside the
/// grid without overlaps.
pub fn validate_fleet(ships: &[Ship]) -> Result<(), MoveError> {
    if ships.len() != FLEET.len() {
        return Err(MoveError::InvalidFleet(format!(
            "expected {} ships, got {}",
            FLEET.len(),
            ships.len()
        )));
    }

    let expected: HashMap<&str, i32> = FLEET.into_iter().collect();
    let mut names = HashSet::new();
    let mut occupied = HashSet::new();

    for ship in ships {
        let Some(&size) = expected.get(ship.name.as_str()) else {
            return Err(MoveError::InvalidFleet(format!("unknown ship {:?}", ship.name)));
        };
        if !names.insert(ship.name.as_str()) {
            return Err(MoveError::InvalidFleet(format!("duplicate ship {:?}", ship.name)));
        }
        if ship.size != size {
            return Err(MoveError::InvalidFleet(format!(
                "{} has wrong size {} (expected {size})",
                ship.name, ship.size
            )));
        }
        for (row, col) in ship.cells() {
            if !on_grid(row, col) {
                return Err(MoveError::InvalidFleet(format!("{} is out of bounds", ship.name)));
            }
            if !occupied.insert((row, col)) {
                return Err(MoveError::InvalidFleet(format!(
                    "{} would overlap another ship at ({row}, {col})",
                    ship.name
                )));
            }
        }
    }
    Ok(())
}

/// `true` iff every cell of every ship is in `shots`. An empty fleet is
/// never sunk, and neither is a ship with any cell off the grid.
pub fn fleet_sunk(ships: &[Ship], shots: &[[i32; 2]]) -> bool {
    if ships.is_empty() {
        return false;
    }
    let hits: HashSet<(i32, i32)> = shots.iter().map(|&[r, c]| (r, c)).collect();
    ships
        .iter()
        .flat_map(|ship| ship.cells())
        .all(|(row, col)| on_grid(row, col) && hits.contains(&(row, col)))
}

fn on_grid(row: i32, col: i32) -> bool {
    grid_index(row, col, GRID, GRID).is_some()
}

impl BattleshipState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ships(&self, side: Mark) -> &[Ship] {
        match side {
            Mark::X => &self.creator_ships,
            Mark::O => &self.opponent_ships,
        }
    }

    /// Shots fired by `side`.
    pub fn shots(&self, side: Mark) -> &[[i32; 2]] {
        match side {
            Mark::X => &self.creator_shots,
            Mark::O => &self.opponent_shots,
        }
    }

    pub fn is_ready(&self, side: Mark) -> bool {
        match side {
            Mark::X => self.creator_ready,
            Mark::O => self.opponent_ready,
        }
    }

    /// Places `side`'s whole fleet. Once both fleets are down the battle
    /// starts and the creator shoots first.
    pub fn place_ships(&mut self, side: Mark, ships: &[Ship]) -> Result<NextTurn, MoveError> {
        if self.phase != Phase::Setup {
            return Err(MoveError::NotInSetup);
        }
        if self.is_ready(side) {
            return Err(MoveError::FleetAlreadyPlaced);
        }
        validate_fleet(ships)?;

        match side {
            Mark::X => {
                self.creator_ships = ships.to_vec();
                self.creator_ready = true;
            }
            Mark::O => {
                self.opponent_ships = ships.to_vec();
                self.opponent_ready = true;
            }
        }

        if self.creator_ready && self.opponent_ready {
            self.phase = Phase::Battle;
            tracing::debug!("both fleets placed, battle begins");
            Ok(NextTurn::Player(Mark::X))
        } else {
            Ok(NextTurn::Unchanged)
        }
    }

    /// Fires a shot by `side` at the other side's grid.
    pub fn fire(&mut self, side: Mark, row: i32, col: i32) -> Result<ShotOutcome, MoveError> {
        if self.phase != Phase::Battle {
            return Err(MoveError::SetupPhase);
        }
        if grid_index(row, col, GRID, GRID).is_none() {
            return Err(MoveError::OffBoard { row, col });
        }
        if self.shots(side).contains(&[row, col]) {
            return Err(MoveError::AlreadyShot { row, col });
        }

        match side {
            Mark::X => self.creator_shots.push([row, col]),
            Mark::O => self.opponent_shots.push([row, col]),
        }

        let target = self.ships(side.opponent());
        let shots = self.shots(side);
        let struck = target
            .iter()
            .find(|ship| {
                ship.cells()
                    .take_while(|&(r, c)| on_grid(r, c))
                    .any(|cell| cell == (row, col))
            });

        Ok(match struck {
            None => ShotOutcome { hit: false, sunk: None },
            Some(ship) => {
                let sunk = fleet_sunk(std::slice::from_ref(ship), shots);
                ShotOutcome {
                    hit: true,
                    sunk: sunk.then(|| ship.name.clone()),
                }
            }
        })
    }

    /// Ongoing throughout setup. In battle, whoever sinks the other
    /// fleet first wins.
    pub fn evaluate(&self) -> Outcome {
        if self.phase != Phase::Battle {
            return Outcome::Ongoing;
        }
        if fleet_sunk(&self.opponent_ships, &self.creator_shots) {
            return Outcome::Winner(Mark::X);
        }
        if fleet_sunk(&self.creator_ships, &self.opponent_shots) {
            return Outcome::Winner(Mark::O);
        }
        Outcome::Ongoing
    }
}

impl GameRules for BattleshipState {
    type Move = BattleshipMove;

    const GAME_TYPE: GameType = GameType::Battleship;

    fn initial() -> Self {
        Self::new()
    }

    fn apply(&mut self, mark: Mark, mv: &BattleshipMove) -> Result<NextTurn, MoveError> {
        match mv {
            BattleshipMove::PlaceShips { ships } => self.place_ships(mark, ships),
            BattleshipMove::Shot { row, col } => {
                let shot = self.fire(mark, *row, *col)?;
                tracing::trace!(hit = shot.hit, sunk = ?shot.sunk, "shot fired");
                Ok(NextTurn::Opponent)
            }
        }
    }

    fn evaluate(&self) -> Outcome {
        BattleshipState::evaluate(self)
    }

    /// Both sides place their fleets independently.
    fn requires_turn(mv: &BattleshipMove) -> bool {
        !matches!(mv, BattleshipMove::PlaceShips { .. })
    }
}
