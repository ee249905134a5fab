//! Checkpoint store seam: the append-and-replay turn log.

pub mod repository;

pub use repository::CheckpointRepository;
