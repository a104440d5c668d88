use thiserror::Error;

use crate::core::types::CellCoord;

#[derive(Error, Debug)]
pub enum WarroomError {
    #[error("cell {cell:?} is out of bounds for a {width}x{height} map")]
    OutOfBounds {
        cell: CellCoord,
        width: usize,
        height: usize,
    },

    #[error("invalid terrain data: {0}")]
    InvalidTerrain(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WarroomError>;
