use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::MessageBody;
use crate::core::{CreateMovieParams, Genre, GenreParams, Language, Movie, MovieDetails, MovieListing, UpdateMovieParams};

#[derive(OpenApi)]
#[openapi(
    info(title = "Movie catalog", description = "Movies, genres and languages"),
    paths(
        crate::api::get_movies,
        crate::api::post_movie,
        crate::api::sort_movies,
        crate::api::movies_by_language,
        crate::api::filter_movies,
        crate::api::movies_by_genre,
        crate::api::put_movie,
        crate::api::delete_movie,
        crate::api::get_genres,
        crate::api::post_genre,
        crate::api::put_genre,
        crate::api::delete_genre
    ),
    components(schemas(
        Movie,
        Genre,
        Language,
        MovieDetails,
        MovieListing,
        CreateMovieParams,
        UpdateMovieParams,
        GenreParams,
        MessageBody
    )),
    tags(
        (name = "movies", description = "Movie catalog"),
        (name = "genres", description = "Genre maintenance")
    )
)]
pub struct ApiDoc;

pub const OPENAPI_PATH: &str = "/docs/openapi.json";

/// Swagger UI under `/docs/`, with its bundled assets, reading the generated
/// document from `/docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs/{_:.*}").url(OPENAPI_PATH, ApiDoc::openapi())
}
