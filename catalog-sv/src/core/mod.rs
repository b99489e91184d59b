use chrono::{DateTime, NaiveDate, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::Error;
use crate::core::error::Error::{DateParseError, MissingGenreName};
use crate::db::schema::{genres, languages, movies};

pub mod action;
pub mod error;
pub mod messages;
pub mod store;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Title,
    ReleaseDate,
}

impl SortKey {
    /// Unknown keys are not an error, they just leave the order to the store.
    pub fn parse(raw: Option<&str>) -> Option<SortKey> {
        match raw {
            Some("title") => Some(SortKey::Title),
            Some("release_date") => Some(SortKey::ReleaseDate),
            _ => None,
        }
    }
}

/// What a movie listing is narrowed and ordered by. Name matches are
/// case-insensitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieQuery {
    pub genre: Option<String>,
    pub language: Option<String>,
    pub sort: Option<SortKey>,
}

impl MovieQuery {
    pub fn by_genre(name: String) -> Self {
        MovieQuery {
            genre: Some(name),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterParameters {
    /// Language name, matched case-insensitively.
    pub language: Option<String>,
    /// Genre name, matched case-insensitively.
    pub genre: Option<String>,
    /// `title` or `release_date`; anything else keeps the default order.
    pub sort: Option<String>,
}

impl FilterParameters {
    pub fn into_query(self) -> MovieQuery {
        MovieQuery {
            genre: non_empty(self.genre),
            language: non_empty(self.language),
            sort: SortKey::parse(self.sort.as_deref()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = languages)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = genres)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Queryable, Selectable, ToSchema)]
#[diesel(table_name = movies)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
    /// Minutes.
    pub duration: i32,
}

/// A movie with its genre and language joined in.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub genre: Genre,
    pub language: Language,
}

impl From<(Movie, Genre, Language)> for MovieDetails {
    fn from((movie, genre, language): (Movie, Genre, Language)) -> Self {
        MovieDetails { movie, genre, language }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieListing {
    pub total_movies: usize,
    pub average_duration: f64,
    pub movies: Vec<MovieDetails>,
}

impl MovieListing {
    pub fn from_movies(movies: Vec<MovieDetails>) -> MovieListing {
        let total_movies = movies.len();
        let total_duration: i64 = movies.iter().map(|m| i64::from(m.movie.duration)).sum();
        let average_duration = if total_movies > 0 {
            total_duration as f64 / total_movies as f64
        } else {
            0.0
        };

        MovieListing {
            total_movies,
            average_duration,
            movies,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[diesel(table_name = movies)]
pub struct NewMovie {
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
    pub duration: i32,
}

#[derive(Clone, Debug, Default, PartialEq, AsChangeset)]
#[diesel(table_name = movies)]
pub struct MovieChangeset {
    pub title: Option<String>,
    pub genre_id: Option<i32>,
    pub language_id: Option<i32>,
    pub oscar_count: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub duration: Option<i32>,
}

impl MovieChangeset {
    pub fn is_empty(&self) -> bool {
        *self == MovieChangeset::default()
    }

    pub fn apply(&self, movie: &mut Movie) {
        if let Some(title) = &self.title {
            movie.title = title.clone();
        }
        if let Some(genre_id) = self.genre_id {
            movie.genre_id = genre_id;
        }
        if let Some(language_id) = self.language_id {
            movie.language_id = language_id;
        }
        if let Some(oscar_count) = self.oscar_count {
            movie.oscar_count = oscar_count;
        }
        if let Some(release_date) = self.release_date {
            movie.release_date = release_date;
        }
        if let Some(duration) = self.duration {
            movie.duration = duration;
        }
    }
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, which is
/// reduced to its UTC date.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(DateParseError)
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateMovieParams {
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    /// ISO date, e.g. `2009-05-29`.
    pub release_date: String,
    pub duration: i32,
}

impl CreateMovieParams {
    fn create(&self) -> Result<NewMovie, Error> {
        Ok(NewMovie {
            title: self.title.clone(),
            genre_id: self.genre_id,
            language_id: self.language_id,
            oscar_count: self.oscar_count,
            release_date: parse_release_date(&self.release_date)?,
            duration: self.duration,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMovieParams {
    pub title: Option<String>,
    pub genre_id: Option<i32>,
    pub language_id: Option<i32>,
    pub oscar_count: Option<i32>,
    pub release_date: Option<String>,
    pub duration: Option<i32>,
}

impl UpdateMovieParams {
    fn update(&self) -> Result<MovieChangeset, Error> {
        let release_date = self.release_date.as_deref()
            .filter(|raw| !raw.is_empty())
            .map(parse_release_date)
            .transpose()?;

        Ok(MovieChangeset {
            title: self.title.clone(),
            genre_id: self.genre_id,
            language_id: self.language_id,
            oscar_count: self.oscar_count,
            release_date,
            duration: self.duration,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[diesel(table_name = genres)]
pub struct NewGenre {
    pub name: String,
}

/// Body of both genre create and genre rename.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct GenreParams {
    pub name: Option<String>,
}

impl GenreParams {
    fn name(self) -> Result<String, Error> {
        self.name
            .filter(|n| !n.is_empty())
            .ok_or(MissingGenreName)
    }
}
