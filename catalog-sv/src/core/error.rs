use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Movie,
    Genre,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Movie => write!(f, "movie"),
            Entity::Genre => write!(f, "genre"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("error reading file: {0}")]
    ReadFileError(#[from] std::io::Error),
    #[error("error parsing date: {0}")]
    DateParseError(#[from] chrono::ParseError),
    #[error("error querying database: {0}")]
    DBQueryError(#[from] diesel::result::Error),
    #[error("error getting database connection: {0}")]
    PoolError(#[from] r2d2::Error),
    #[error("error running blocking task: {0}")]
    BlockingError(#[from] actix_web::error::BlockingError),
    #[error("error serializing/deserializing json: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("genre name is required")]
    MissingGenreName,
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{0} already exists")]
    Conflict(Entity),
}
