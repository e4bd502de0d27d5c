//! Board state, move rules and win detection for Tabletop's four games.
//!
//! Each game lives in its own module and implements [`GameRules`] on its
//! state type:
//!
//! | game | state | module |
//! |---|---|---|
//! | Connect Four | [`ConnectFourBoard`] | [`connect_four`] |
//! | Othello | [`OthelloBoard`] | [`othello`] |
//! | Battleship | [`BattleshipState`] | [`battleship`] |
//! | Checkers | [`CheckersState`] | [`checkers`] |
//!
//! [`Board`] wraps all four and is what the room layer works with: it
//! decodes a persisted state blob, routes a [`MovePayload`] to the right
//! rules, evaluates the result and encodes the state again.
//!
//! Everything here is pure and synchronous. Nothing touches I/O.
//!
//! [`MovePayload`]: tabletop_protocol::MovePayload

pub mod battleship;
mod board;
mod cell;
pub mod checkers;
pub mod connect_four;
mod error;
pub mod othello;
mod outcome;
mod rules;

pub use battleship::{BattleshipState, Phase, ShotOutcome};
pub use board::Board;
pub use cell::Cell;
pub use checkers::{CheckersState, Piece};
pub use connect_four::ConnectFourBoard;
pub use error::MoveError;
pub use othello::OthelloBoard;
pub use outcome::Outcome;
pub use rules::{GameRules, NextTurn};
