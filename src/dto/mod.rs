//! Wire shapes of the party-games server, one module per game.

pub mod bingo;
pub mod bluff;
pub mod common;
pub mod deck;
pub mod estimates;
pub mod taboo;
pub mod thirty_seconds;
pub mod validation;
pub mod year;
