pub mod board;
pub mod clock;
pub mod game;
pub mod generator;
pub mod persistence;
pub mod piece;
pub mod position;
pub mod record;
pub mod rules;
pub mod square;
