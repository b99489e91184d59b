use diesel::dsl;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::LoadQuery;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::DatabaseErrorKind;
use diesel::sql_types::Text;
use log::debug;
use r2d2::Pool;

use crate::core::{Genre, Language, Movie, MovieChangeset, MovieDetails, MovieQuery, NewGenre, NewMovie, SortKey};
use crate::core::error::{Entity, Error};
use crate::core::error::Error::{Conflict, DBQueryError};
use crate::core::store::CatalogStore;

pub mod schema;
#[cfg(test)]
pub mod memory;

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;
pub type DbConnectionPool = Pool<ConnectionManager<PgConnection>>;

diesel::define_sql_function!(fn lower(x: Text) -> Text);

type MovieSource = dsl::InnerJoin<dsl::InnerJoin<schema::movies::table, schema::genres::table>, schema::languages::table>;
type MovieColumns = (dsl::AsSelect<Movie, Pg>, dsl::AsSelect<Genre, Pg>, dsl::AsSelect<Language, Pg>);
type MoviesQuery = dsl::IntoBoxed<'static, dsl::Select<MovieSource, MovieColumns>, Pg>;

pub fn connect(database_url: &str, max_size: u32) -> Result<DbConnectionPool, Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::builder()
        .max_size(max_size)
        .build(manager)?)
}

/// Titles and genre names are unique on `lower(..)`; a violation on update
/// surfaces as a conflict instead of a query error.
fn conflict_on_unique(entity: Entity) -> impl FnOnce(diesel::result::Error) -> Error {
    move |e| match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Conflict(entity),
        other => DBQueryError(other),
    }
}

/// Movies joined with their genre and language, filtered on `lower(name)`.
fn movies_query(query: &MovieQuery) -> MoviesQuery {
    let mut q = schema::movies::table
        .inner_join(schema::genres::table)
        .inner_join(schema::languages::table)
        .select((Movie::as_select(), Genre::as_select(), Language::as_select()))
        .into_boxed();

    if let Some(genre) = &query.genre {
        q = q.filter(lower(schema::genres::name).eq(lower(genre.clone())));
    }

    if let Some(language) = &query.language {
        q = q.filter(lower(schema::languages::name).eq(lower(language.clone())));
    }

    match query.sort {
        Some(SortKey::Title) => q.order(schema::movies::title.asc()),
        Some(SortKey::ReleaseDate) => q.order(schema::movies::release_date.asc()),
        None => q,
    }
}

pub fn find_movies(conn: &mut PgConnection, query: &MovieQuery) -> Result<Vec<MovieDetails>, Error> {
    let q = movies_query(query);

    debug!("{}", diesel::debug_query::<Pg, _>(&q));

    let rows = q
        .load::<(Movie, Genre, Language)>(conn)
        .map_err(DBQueryError)?;

    debug!("found movies count={}", rows.len());

    Ok(rows.into_iter().map(MovieDetails::from).collect())
}

pub fn find_one_movie(conn: &mut PgConnection, movie_id: i32) -> Result<Option<Movie>, Error> {
    use schema::movies::dsl::*;

    movies.find(movie_id)
        .first(conn)
        .optional()
        .map_err(DBQueryError)
}

/// A clash on the title index inserts nothing and returns no row.
fn insert_movie(movie: NewMovie) -> impl RunQueryDsl<PgConnection> + LoadQuery<'static, PgConnection, Movie> + QueryFragment<Pg> {
    diesel::insert_into(schema::movies::table)
        .values(movie)
        .on_conflict_do_nothing()
}

pub fn create_movie(conn: &mut PgConnection, movie: NewMovie) -> Result<Option<Movie>, Error> {
    let query = insert_movie(movie);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(DBQueryError)
}

pub fn update_movie(conn: &mut PgConnection, movie_id: i32, changes: MovieChangeset) -> Result<Option<Movie>, Error> {
    use schema::movies;

    // diesel refuses an UPDATE with nothing to SET
    if changes.is_empty() {
        return find_one_movie(conn, movie_id);
    }

    let query = diesel::update(movies::table.find(movie_id))
        .set(&changes);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(conflict_on_unique(Entity::Movie))
}

pub fn delete_movie(conn: &mut PgConnection, movie_id: i32) -> Result<bool, Error> {
    use schema::movies;

    let query = diesel::delete(movies::table.find(movie_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(DBQueryError)
        .map(|r| r > 0)
}

pub fn find_genres(conn: &mut PgConnection) -> Result<Vec<Genre>, Error> {
    use schema::genres::dsl::*;

    let query = genres.order(name.asc());

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .load(conn)
        .map_err(DBQueryError)
}

fn insert_genre(genre: NewGenre) -> impl RunQueryDsl<PgConnection> + LoadQuery<'static, PgConnection, Genre> + QueryFragment<Pg> {
    diesel::insert_into(schema::genres::table)
        .values(genre)
        .on_conflict_do_nothing()
}

pub fn create_genre(conn: &mut PgConnection, genre: NewGenre) -> Result<Option<Genre>, Error> {
    let query = insert_genre(genre);

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(DBQueryError)
}

pub fn rename_genre(conn: &mut PgConnection, genre_id: i32, new_name: String) -> Result<Option<Genre>, Error> {
    use schema::genres;

    let query = diesel::update(genres::table.find(genre_id))
        .set(genres::name.eq(new_name));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .get_result(conn)
        .optional()
        .map_err(conflict_on_unique(Entity::Genre))
}

pub fn delete_genre(conn: &mut PgConnection, genre_id: i32) -> Result<bool, Error> {
    use schema::genres;

    let query = diesel::delete(genres::table.find(genre_id));

    debug!("{}", diesel::debug_query::<Pg, _>(&query));

    query
        .execute(conn)
        .map_err(DBQueryError)
        .map(|r| r > 0)
}

/// Postgres-backed store. Every call checks a connection out of the pool.
pub struct PgCatalog {
    pool: DbConnectionPool,
}

impl PgCatalog {
    pub fn new(pool: DbConnectionPool) -> Self {
        PgCatalog { pool }
    }

    fn conn(&self) -> Result<DbConnection, Error> {
        Ok(self.pool.get()?)
    }
}

impl CatalogStore for PgCatalog {
    fn find_movies(&self, query: &MovieQuery) -> Result<Vec<MovieDetails>, Error> {
        find_movies(&mut *self.conn()?, query)
    }

    fn create_movie(&self, movie: NewMovie) -> Result<Option<Movie>, Error> {
        create_movie(&mut *self.conn()?, movie)
    }

    fn update_movie(&self, movie_id: i32, changes: MovieChangeset) -> Result<Option<Movie>, Error> {
        update_movie(&mut *self.conn()?, movie_id, changes)
    }

    fn delete_movie(&self, movie_id: i32) -> Result<bool, Error> {
        delete_movie(&mut *self.conn()?, movie_id)
    }

    fn find_genres(&self) -> Result<Vec<Genre>, Error> {
        find_genres(&mut *self.conn()?)
    }

    fn create_genre(&self, genre: NewGenre) -> Result<Option<Genre>, Error> {
        create_genre(&mut *self.conn()?, genre)
    }

    fn rename_genre(&self, genre_id: i32, name: String) -> Result<Option<Genre>, Error> {
        rename_genre(&mut *self.conn()?, genre_id, name)
    }

    fn delete_genre(&self, genre_id: i32) -> Result<bool, Error> {
        delete_genre(&mut *self.conn()?, genre_id)
    }
}
