use chrono::NaiveDate;
use log::debug;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CatalogError::{BadRequest, Conflict, UnexpectedStatusCode};

pub struct CatalogConfig {
    pub url: String,
}

impl CatalogConfig {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub genre: Genre,
    pub language: Language,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListing {
    pub total_movies: usize,
    pub average_duration: f64,
    pub movies: Vec<Movie>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
    pub duration: i32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateMovieRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oscar_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    Title,
    ReleaseDate,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MovieFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

#[derive(Debug, Serialize)]
struct GenreRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("error calling server: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("rejected by server: {0}")]
    BadRequest(String),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("unexpected status code {0}: {1}")]
    UnexpectedStatusCode(StatusCode, String),
}

async fn rejection(res: Response) -> CatalogError {
    let status = res.status();
    let message = res.json::<MessageBody>()
        .await
        .map(|b| b.message)
        .unwrap_or_default();

    debug!("catalog rejected request status={} message={}", status, message);

    match status {
        StatusCode::BAD_REQUEST => BadRequest(message),
        StatusCode::CONFLICT => Conflict(message),
        unexpected => UnexpectedStatusCode(unexpected, message),
    }
}

async fn send(req: RequestBuilder) -> Result<Response, CatalogError> {
    Ok(req
        .header("Accept", "application/json")
        .send()
        .await?)
}

fn genre_path(genre_name: &str) -> String {
    format!("/movies/{}", utf8_percent_encode(genre_name, NON_ALPHANUMERIC))
}

async fn movie_list(req: RequestBuilder) -> Result<Vec<Movie>, CatalogError> {
    let res = send(req).await?;

    match res.status() {
        StatusCode::OK => Ok(res.json().await?),
        _ => Err(rejection(res).await),
    }
}

/// All movies by title, with count and average duration.
pub async fn list_movies(
    cfg: &CatalogConfig,
    filter: &MovieFilter,
) -> Result<MovieListing, CatalogError> {
    let res = send(reqwest::Client::new()
        .get(cfg.endpoint("/movies"))
        .query(filter))
        .await?;

    match res.status() {
        StatusCode::OK => Ok(res.json().await?),
        _ => Err(rejection(res).await),
    }
}

pub async fn create_movie(
    cfg: &CatalogConfig,
    req: &CreateMovieRequest,
) -> Result<(), CatalogError> {
    let res = send(reqwest::Client::new()
        .post(cfg.endpoint("/movies"))
        .json(req))
        .await?;

    match res.status() {
        StatusCode::CREATED => Ok(()),
        _ => Err(rejection(res).await),
    }
}

/// `false` when there is no movie with that id.
pub async fn update_movie(
    cfg: &CatalogConfig,
    id: i32,
    req: &UpdateMovieRequest,
) -> Result<bool, CatalogError> {
    let res = send(reqwest::Client::new()
        .put(cfg.endpoint(&format!("/movies/{}", id)))
        .json(req))
        .await?;

    match res.status() {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        _ => Err(rejection(res).await),
    }
}

/// `false` when there is no movie with that id.
pub async fn delete_movie(
    cfg: &CatalogConfig,
    id: i32,
) -> Result<bool, CatalogError> {
    let res = send(reqwest::Client::new()
        .delete(cfg.endpoint(&format!("/movies/{}", id))))
        .await?;

    match res.status() {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        _ => Err(rejection(res).await),
    }
}

pub async fn movies_by_genre(
    cfg: &CatalogConfig,
    genre_name: &str,
) -> Result<Vec<Movie>, CatalogError> {
    movie_list(reqwest::Client::new()
        .get(cfg.endpoint(&genre_path(genre_name))))
        .await
}

pub async fn sort_movies(
    cfg: &CatalogConfig,
    sort: Option<Sort>,
) -> Result<Vec<Movie>, CatalogError> {
    let filter = MovieFilter {
        sort,
        ..Default::default()
    };
    movie_list(reqwest::Client::new()
        .get(cfg.endpoint("/movies/sort"))
        .query(&filter))
        .await
}

pub async fn movies_by_language(
    cfg: &CatalogConfig,
    language: Option<&str>,
) -> Result<Vec<Movie>, CatalogError> {
    let filter = MovieFilter {
        language: language.map(str::to_string),
        ..Default::default()
    };
    movie_list(reqwest::Client::new()
        .get(cfg.endpoint("/movies/language"))
        .query(&filter))
        .await
}

pub async fn filter_movies(
    cfg: &CatalogConfig,
    filter: &MovieFilter,
) -> Result<Vec<Movie>, CatalogError> {
    movie_list(reqwest::Client::new()
        .get(cfg.endpoint("/movies/filter"))
        .query(filter))
        .await
}

pub async fn list_genres(
    cfg: &CatalogConfig,
) -> Result<Vec<Genre>, CatalogError> {
    let res = send(reqwest::Client::new()
        .get(cfg.endpoint("/genres")))
        .await?;

    match res.status() {
        StatusCode::OK => Ok(res.json().await?),
        _ => Err(rejection(res).await),
    }
}

pub async fn create_genre(
    cfg: &CatalogConfig,
    name: &str,
) -> Result<Genre, CatalogError> {
    let res = send(reqwest::Client::new()
        .post(cfg.endpoint("/genres"))
        .json(&GenreRequest { name }))
        .await?;

    match res.status() {
        StatusCode::CREATED => Ok(res.json().await?),
        _ => Err(rejection(res).await),
    }
}

/// `None` when there is no genre with that id.
pub async fn update_genre(
    cfg: &CatalogConfig,
    id: i32,
    name: &str,
) -> Result<Option<Genre>, CatalogError> {
    let res = send(reqwest::Client::new()
        .put(cfg.endpoint(&format!("/genres/{}", id)))
        .json(&GenreRequest { name }))
        .await?;

    match res.status() {
        StatusCode::OK => Ok(Some(res.json().await?)),
        StatusCode::NOT_FOUND => Ok(None),
        _ => Err(rejection(res).await),
    }
}

/// `false` when there is no genre with that id.
pub async fn delete_genre(
    cfg: &CatalogConfig,
    id: i32,
) -> Result<bool, CatalogError> {
    let res = send(reqwest::Client::new()
        .delete(cfg.endpoint(&format!("/genres/{}", id))))
        .await?;

    match res.status() {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        _ => Err(rejection(res).await),
    }
}
