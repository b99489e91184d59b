use log::{debug, info};

use crate::core::{CreateMovieParams, Genre, GenreParams, MovieDetails, MovieListing, MovieQuery, NewGenre, SortKey, UpdateMovieParams};
use crate::core::error::Error;
use crate::core::error::Error::{Conflict, NotFound};
use crate::core::error::Entity;
use crate::core::store::CatalogStore;

pub fn list_movies(store: &dyn CatalogStore, query: MovieQuery) -> Result<MovieListing, Error> {
    let query = MovieQuery {
        sort: Some(SortKey::Title),
        ..query
    };
    info!("listing movies {:?}", query);
    let movies = store.find_movies(&query)?;
    Ok(MovieListing::from_movies(movies))
}

pub fn find_movies(store: &dyn CatalogStore, query: MovieQuery) -> Result<Vec<MovieDetails>, Error> {
    info!("finding movies {:?}", query);
    store.find_movies(&query)
}

pub fn create_movie(store: &dyn CatalogStore, movie: CreateMovieParams) -> Result<(), Error> {
    info!("creating movie {:?}", movie);
    let created = store.create_movie(movie.create()?)?
        .ok_or(Conflict(Entity::Movie))?;

    debug!("created movie id={}", created.id);
    Ok(())
}

pub fn update_movie(store: &dyn CatalogStore, id: i32, movie: UpdateMovieParams) -> Result<(), Error> {
    info!("updating movie id={} {:?}", id, movie);
    store.update_movie(id, movie.update()?)?
        .ok_or(NotFound(Entity::Movie))
        .map(|_| ())
}

pub fn delete_movie(store: &dyn CatalogStore, id: i32) -> Result<(), Error> {
    info!("deleting movie id={}", id);
    if store.delete_movie(id)? {
        Ok(())
    } else {
        Err(NotFound(Entity::Movie))
    }
}

pub fn find_genres(store: &dyn CatalogStore) -> Result<Vec<Genre>, Error> {
    info!("finding genres");
    store.find_genres()
}

pub fn create_genre(store: &dyn CatalogStore, genre: GenreParams) -> Result<Genre, Error> {
    let name = genre.name()?;
    info!("creating genre name={}", name);
    store.create_genre(NewGenre { name })?
        .ok_or(Conflict(Entity::Genre))
}

pub fn update_genre(store: &dyn CatalogStore, id: i32, genre: GenreParams) -> Result<Genre, Error> {
    let name = genre.name()?;
    info!("renaming genre id={} name={}", id, name);
    store.rename_genre(id, name)?
        .ok_or(NotFound(Entity::Genre))
}

pub fn delete_genre(store: &dyn CatalogStore, id: i32) -> Result<(), Error> {
    info!("deleting genre id={}", id);
    if store.delete_genre(id)? {
        Ok(())
    } else {
        Err(NotFound(Entity::Genre))
    }
}
