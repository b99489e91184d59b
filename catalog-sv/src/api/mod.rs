use std::fmt;

use actix_web::{delete, get, post, put, HttpRequest, HttpResponse, Responder, ResponseError, web};
use actix_web::http::Method;
use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path, Query};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::{CreateMovieParams, FilterParameters, Genre, GenreParams, MovieQuery, SortKey, UpdateMovieParams};
use crate::core::action;
use crate::core::error::{Entity, Error};
use crate::core::messages::Messages;
use crate::core::store::CatalogStore;

pub mod docs;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    /// Client mistakes get their own message; anything else is logged and
    /// answered with `failure`.
    pub fn reject(err: Error, messages: &Messages, failure: &str) -> Self {
        let (status, message) = match &err {
            Error::MissingGenreName => (StatusCode::BAD_REQUEST, messages.genre_name_required.as_str()),
            Error::DateParseError(_) => (StatusCode::BAD_REQUEST, messages.invalid_release_date.as_str()),
            Error::NotFound(Entity::Movie) => (StatusCode::NOT_FOUND, messages.movie_not_found.as_str()),
            Error::NotFound(Entity::Genre) => (StatusCode::NOT_FOUND, messages.genre_not_found.as_str()),
            Error::Conflict(Entity::Movie) => (StatusCode::CONFLICT, messages.movie_title_conflict.as_str()),
            Error::Conflict(Entity::Genre) => (StatusCode::CONFLICT, messages.genre_name_conflict.as_str()),
            _ => {
                error!("{}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        };

        debug!("rejecting request status={} cause={}", status, err);
        ApiError::new(status, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(MessageBody {
            message: self.message.clone(),
        })
    }
}

/// Malformed or mistyped JSON bodies are answered with 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        debug!("rejecting body: {}", err);
        let message = req.app_data::<Data<Messages>>()
            .map(|m| m.invalid_body.clone())
            .unwrap_or_else(|| err.to_string());
        ApiError::new(StatusCode::BAD_REQUEST, message).into()
    })
}

/// Text for an id that is missing, or that is not a number at all.
fn not_found_message(messages: &Messages, req: &HttpRequest) -> String {
    let message = if req.path().starts_with("/genres") {
        if req.method() == Method::PUT { &messages.genre_rename_not_found } else { &messages.genre_not_found }
    } else if req.method() == Method::DELETE {
        &messages.movie_delete_not_found
    } else {
        &messages.movie_not_found
    };
    message.clone()
}

/// Ids that don't parse are answered like unknown ids: 404 with a JSON body.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        debug!("rejecting path {}: {}", req.path(), err);
        let message = req.app_data::<Data<Messages>>()
            .map(|m| not_found_message(m, req))
            .unwrap_or_else(|| err.to_string());
        ApiError::new(StatusCode::NOT_FOUND, message).into()
    })
}

/// Registers every route. Literal `/movies/*` paths go before
/// `/movies/{genre_name}` so they are never read as genre names.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health)
        .service(get_movies)
        .service(post_movie)
        .service(sort_movies)
        .service(movies_by_language)
        .service(filter_movies)
        .service(movies_by_genre)
        .service(put_movie)
        .service(delete_movie)
        .service(get_genres)
        .service(post_genre)
        .service(put_genre)
        .service(delete_genre)
        .service(web::redirect("/docs", "/docs/"))
        .service(docs::swagger_ui());
}

/// Runs a store call on the blocking pool, diesel being synchronous.
async fn blocking<T, F>(store: &Data<dyn CatalogStore>, f: F) -> Result<T, Error>
    where
        F: FnOnce(&dyn CatalogStore) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
{
    let store = store.clone();
    web::block(move || f(store.get_ref())).await?
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok()
}

#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    params(
        ("language" = Option<String>, Query, description = "Only movies in this language (case-insensitive)"),
        ("genre" = Option<String>, Query, description = "Only movies of this genre (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Movies ordered by title, with totals", body = MovieListing),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[get("/movies")]
pub async fn get_movies(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    filter: Query<FilterParameters>,
) -> Result<HttpResponse, ApiError> {
    let query = filter.into_inner().into_query();

    let listing = blocking(&store, move |s| action::list_movies(s, query))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.movie_list_failed))?;

    Ok(HttpResponse::Ok().json(listing))
}

#[utoipa::path(
    post,
    path = "/movies",
    tag = "movies",
    request_body = CreateMovieParams,
    responses(
        (status = 201, description = "Movie created"),
        (status = 400, description = "Malformed body or release date", body = MessageBody),
        (status = 409, description = "Title already taken", body = MessageBody),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[post("/movies")]
pub async fn post_movie(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    req: Json<CreateMovieParams>,
) -> Result<HttpResponse, ApiError> {
    let movie = req.into_inner();

    blocking(&store, move |s| action::create_movie(s, movie))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.movie_create_failed))?;

    Ok(HttpResponse::Created().finish())
}

#[utoipa::path(
    get,
    path = "/movies/sort",
    tag = "movies",
    params(
        ("sort" = Option<String>, Query, description = "`title` or `release_date`; anything else keeps the default order")
    ),
    responses(
        (status = 200, description = "All movies", body = [MovieDetails]),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[get("/movies/sort")]
pub async fn sort_movies(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    filter: Query<FilterParameters>,
) -> Result<HttpResponse, ApiError> {
    let query = MovieQuery {
        sort: SortKey::parse(filter.sort.as_deref()),
        ..Default::default()
    };

    let movies = blocking(&store, move |s| action::find_movies(s, query))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.movie_list_failed))?;

    Ok(HttpResponse::Ok().json(movies))
}

#[utoipa::path(
    get,
    path = "/movies/language",
    tag = "movies",
    params(
        ("language" = Option<String>, Query, description = "Language name (case-insensitive); all movies when absent")
    ),
    responses(
        (status = 200, description = "Matching movies", body = [MovieDetails]),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[get("/movies/language")]
pub async fn movies_by_language(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    filter: Query<FilterParameters>,
) -> Result<HttpResponse, ApiError> {
    let query = FilterParameters {
        language: filter.into_inner().language,
        ..Default::default()
    }.into_query();

    let movies = blocking(&store, move |s| action::find_movies(s, query))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.movie_list_failed))?;

    Ok(HttpResponse::Ok().json(movies))
}

#[utoipa::path(
    get,
    path = "/movies/filter",
    tag = "movies",
    params(FilterParameters),
    responses(
        (status = 200, description = "Matching movies", body = [MovieDetails]),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[get("/movies/filter")]
pub async fn filter_movies(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    filter: Query<FilterParameters>,
) -> Result<HttpResponse, ApiError> {
    let query = filter.into_inner().into_query();

    let movies = blocking(&store, move |s| action::find_movies(s, query))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.movie_list_failed))?;

    Ok(HttpResponse::Ok().json(movies))
}

#[utoipa::path(
    get,
    path = "/movies/{genre_name}",
    tag = "movies",
    params(
        ("genre_name" = String, Path, description = "Genre name (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Movies of the genre", body = [MovieDetails]),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[get("/movies/{genre_name}")]
pub async fn movies_by_genre(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    genre_name: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let query = MovieQuery::by_genre(genre_name.into_inner());

    let movies = blocking(&store, move |s| action::find_movies(s, query))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.movie_genre_filter_failed))?;

    Ok(HttpResponse::Ok().json(movies))
}

#[utoipa::path(
    put,
    path = "/movies/{movie_id}",
    tag = "movies",
    params(
        ("movie_id" = i32, Path, description = "Movie id")
    ),
    request_body = UpdateMovieParams,
    responses(
        (status = 200, description = "Movie updated"),
        (status = 400, description = "Malformed body or release date", body = MessageBody),
        (status = 404, description = "No such movie", body = MessageBody),
        (status = 409, description = "Title already taken", body = MessageBody),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[put("/movies/{movie_id}")]
pub async fn put_movie(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    movie_id: Path<i32>,
    req: Json<UpdateMovieParams>,
) -> Result<HttpResponse, ApiError> {
    let id = movie_id.into_inner();
    let changes = req.into_inner();

    blocking(&store, move |s| action::update_movie(s, id, changes))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.movie_update_failed))?;

    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    delete,
    path = "/movies/{movie_id}",
    tag = "movies",
    params(
        ("movie_id" = i32, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "Movie removed"),
        (status = 404, description = "No such movie", body = MessageBody),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[delete("/movies/{movie_id}")]
pub async fn delete_movie(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    movie_id: Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = movie_id.into_inner();

    blocking(&store, move |s| action::delete_movie(s, id))
        .await
        .map_err(|e| match e {
            Error::NotFound(Entity::Movie) => ApiError::new(StatusCode::NOT_FOUND, messages.movie_delete_not_found.as_str()),
            e => ApiError::reject(e, &messages, &messages.movie_delete_failed),
        })?;

    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genres ordered by name", body = [Genre]),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[get("/genres")]
pub async fn get_genres(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
) -> Result<HttpResponse, ApiError> {
    let genres = blocking(&store, action::find_genres)
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.genre_list_failed))?;

    Ok(HttpResponse::Ok().json(genres))
}

#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    request_body = GenreParams,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Name missing", body = MessageBody),
        (status = 409, description = "Name already taken", body = MessageBody),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[post("/genres")]
pub async fn post_genre(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    req: Json<GenreParams>,
) -> Result<HttpResponse, ApiError> {
    let genre = req.into_inner();

    let created = blocking(&store, move |s| action::create_genre(s, genre))
        .await
        .map_err(|e| match e {
            Error::MissingGenreName => ApiError::new(StatusCode::BAD_REQUEST, messages.genre_name_missing_on_create.as_str()),
            e => ApiError::reject(e, &messages, &messages.genre_create_failed),
        })?;

    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    put,
    path = "/genres/{genre_id}",
    tag = "genres",
    params(
        ("genre_id" = i32, Path, description = "Genre id")
    ),
    request_body = GenreParams,
    responses(
        (status = 200, description = "Genre renamed", body = Genre),
        (status = 400, description = "Name missing", body = MessageBody),
        (status = 404, description = "No such genre", body = MessageBody),
        (status = 409, description = "Name held by another genre", body = MessageBody),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[put("/genres/{genre_id}")]
pub async fn put_genre(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    genre_id: Path<i32>,
    req: Json<GenreParams>,
) -> Result<HttpResponse, ApiError> {
    let id = genre_id.into_inner();
    let genre = req.into_inner();

    let renamed: Genre = blocking(&store, move |s| action::update_genre(s, id, genre))
        .await
        .map_err(|e| match e {
            Error::NotFound(Entity::Genre) => ApiError::new(StatusCode::NOT_FOUND, messages.genre_rename_not_found.as_str()),
            Error::Conflict(Entity::Genre) => ApiError::new(StatusCode::CONFLICT, messages.genre_rename_conflict.as_str()),
            e => ApiError::reject(e, &messages, &messages.genre_update_failed),
        })?;

    Ok(HttpResponse::Ok().json(renamed))
}

#[utoipa::path(
    delete,
    path = "/genres/{genre_id}",
    tag = "genres",
    params(
        ("genre_id" = i32, Path, description = "Genre id")
    ),
    responses(
        (status = 200, description = "Genre removed", body = MessageBody),
        (status = 404, description = "No such genre", body = MessageBody),
        (status = 500, description = "Store failure", body = MessageBody)
    )
)]
#[delete("/genres/{genre_id}")]
pub async fn delete_genre(
    store: Data<dyn CatalogStore>,
    messages: Data<Messages>,
    genre_id: Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = genre_id.into_inner();

    blocking(&store, move |s| action::delete_genre(s, id))
        .await
        .map_err(|e| ApiError::reject(e, &messages, &messages.genre_delete_failed))?;

    Ok(HttpResponse::Ok().json(MessageBody {
        message: messages.genre_deleted.clone(),
    }))
}
