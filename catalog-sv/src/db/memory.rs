use std::sync::Mutex;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::core::{Genre, Language, Movie, MovieChangeset, MovieDetails, MovieQuery, NewGenre, NewMovie, SortKey};
use crate::core::error::{Entity, Error};
use crate::core::error::Error::{Conflict, DBQueryError};
use crate::core::store::CatalogStore;

/// In-memory store with the same uniqueness, foreign key, join and ordering
/// behavior as the Postgres schema.
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    movies: Vec<Movie>,
    genres: Vec<Genre>,
    languages: Vec<Language>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.movies.iter()
            .any(|m| Some(m.id) != except && same_name(&m.title, title))
    }

    fn genre_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.genres.iter()
            .any(|g| Some(g.id) != except && same_name(&g.name, name))
    }

    fn check_references(&self, genre_id: i32, language_id: i32) -> Result<(), Error> {
        if self.genres.iter().any(|g| g.id == genre_id) && self.languages.iter().any(|l| l.id == language_id) {
            Ok(())
        } else {
            Err(violation(DatabaseErrorKind::ForeignKeyViolation, "movie references a missing genre or language"))
        }
    }

    fn details(&self, movie: &Movie) -> Option<MovieDetails> {
        let genre = self.genres.iter().find(|g| g.id == movie.genre_id)?;
        let language = self.languages.iter().find(|l| l.id == movie.language_id)?;
        Some(MovieDetails {
            movie: movie.clone(),
            genre: genre.clone(),
            language: language.clone(),
        })
    }
}

fn violation(kind: DatabaseErrorKind, message: &str) -> Error {
    DBQueryError(DieselError::DatabaseError(kind, Box::new(message.to_string())))
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl MemoryCatalog {
    /// Genre 1 "Action", languages 1 "English" and 2 "Portuguese".
    pub fn seeded() -> Self {
        let catalog = MemoryCatalog::default();
        {
            let mut state = catalog.lock();
            let action = state.next_id();
            state.genres.push(Genre { id: action, name: "Action".to_string() });
            state.languages.push(Language { id: 1, name: "English".to_string() });
            state.languages.push(Language { id: 2, name: "Portuguese".to_string() });
        }
        catalog
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl CatalogStore for MemoryCatalog {
    fn find_movies(&self, query: &MovieQuery) -> Result<Vec<MovieDetails>, Error> {
        let state = self.lock();
        let mut found: Vec<MovieDetails> = state.movies.iter()
            .filter_map(|m| state.details(m))
            .filter(|d| query.genre.as_ref().map_or(true, |g| same_name(&d.genre.name, g)))
            .filter(|d| query.language.as_ref().map_or(true, |l| same_name(&d.language.name, l)))
            .collect();

        match query.sort {
            Some(SortKey::Title) => found.sort_by(|a, b| a.movie.title.cmp(&b.movie.title)),
            Some(SortKey::ReleaseDate) => found.sort_by_key(|d| d.movie.release_date),
            None => {}
        }

        Ok(found)
    }

    fn create_movie(&self, movie: NewMovie) -> Result<Option<Movie>, Error> {
        let mut state = self.lock();
        state.check_references(movie.genre_id, movie.language_id)?;
        if state.title_taken(&movie.title, None) {
            return Ok(None);
        }

        let created = Movie {
            id: state.next_id(),
            title: movie.title,
            genre_id: movie.genre_id,
            language_id: movie.language_id,
            oscar_count: movie.oscar_count,
            release_date: movie.release_date,
            duration: movie.duration,
        };
        state.movies.push(created.clone());
        Ok(Some(created))
    }

    fn update_movie(&self, movie_id: i32, changes: MovieChangeset) -> Result<Option<Movie>, Error> {
        let mut state = self.lock();
        let mut updated = match state.movies.iter().find(|m| m.id == movie_id) {
            Some(m) => m.clone(),
            None => return Ok(None),
        };
        changes.apply(&mut updated);

        state.check_references(updated.genre_id, updated.language_id)?;
        if state.title_taken(&updated.title, Some(movie_id)) {
            return Err(Conflict(Entity::Movie));
        }

        if let Some(slot) = state.movies.iter_mut().find(|m| m.id == movie_id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    fn delete_movie(&self, movie_id: i32) -> Result<bool, Error> {
        let mut state = self.lock();
        let before = state.movies.len();
        state.movies.retain(|m| m.id != movie_id);
        Ok(state.movies.len() < before)
    }

    fn find_genres(&self) -> Result<Vec<Genre>, Error> {
        let mut genres = self.lock().genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    fn create_genre(&self, genre: NewGenre) -> Result<Option<Genre>, Error> {
        let mut state = self.lock();
        if state.genre_taken(&genre.name, None) {
            return Ok(None);
        }

        let created = Genre {
            id: state.next_id(),
            name: genre.name,
        };
        state.genres.push(created.clone());
        Ok(Some(created))
    }

    fn rename_genre(&self, genre_id: i32, name: String) -> Result<Option<Genre>, Error> {
        let mut state = self.lock();
        if !state.genres.iter().any(|g| g.id == genre_id) {
            return Ok(None);
        }
        if state.genre_taken(&name, Some(genre_id)) {
            return Err(Conflict(Entity::Genre));
        }

        let genre = state.genres.iter_mut()
            .find(|g| g.id == genre_id)
            .map(|g| {
                g.name = name;
                g.clone()
            });
        Ok(genre)
    }

    fn delete_genre(&self, genre_id: i32) -> Result<bool, Error> {
        let mut state = self.lock();
        if state.movies.iter().any(|m| m.genre_id == genre_id) {
            return Err(violation(DatabaseErrorKind::ForeignKeyViolation, "genre is still referenced by movies"));
        }

        let before = state.genres.len();
        state.genres.retain(|g| g.id != genre_id);
        Ok(state.genres.len() < before)
    }
}
