use crate::core::{Genre, Movie, MovieChangeset, MovieDetails, MovieQuery, NewGenre, NewMovie};
use crate::core::error::Error;

/// Data access used by the actions. Implementations must enforce title and
/// genre-name uniqueness case-insensitively themselves.
pub trait CatalogStore: Send + Sync {
    fn find_movies(&self, query: &MovieQuery) -> Result<Vec<MovieDetails>, Error>;

    /// `None` when another movie already holds the title.
    fn create_movie(&self, movie: NewMovie) -> Result<Option<Movie>, Error>;

    /// `None` when there is no movie with that id. Fails with
    /// [`Error::Conflict`] when the new title is taken.
    fn update_movie(&self, movie_id: i32, changes: MovieChangeset) -> Result<Option<Movie>, Error>;

    /// Whether a movie was actually removed.
    fn delete_movie(&self, movie_id: i32) -> Result<bool, Error>;

    fn find_genres(&self) -> Result<Vec<Genre>, Error>;

    /// `None` when another genre already holds the name.
    fn create_genre(&self, genre: NewGenre) -> Result<Option<Genre>, Error>;

    /// `None` when there is no genre with that id. Fails with
    /// [`Error::Conflict`] when another genre holds the name.
    fn rename_genre(&self, genre_id: i32, name: String) -> Result<Option<Genre>, Error>;

    fn delete_genre(&self, genre_id: i32) -> Result<bool, Error>;
}
