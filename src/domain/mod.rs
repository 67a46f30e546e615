pub mod ai;
pub mod being;
pub mod board;
pub mod entity;
pub mod rules;
