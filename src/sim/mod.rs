pub mod event;
pub mod level;
pub mod scores;
pub mod step;
pub mod world;
