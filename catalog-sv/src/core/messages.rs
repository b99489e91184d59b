use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;

/// User-facing response texts. Defaults are Portuguese; a JSON file can
/// override any subset of the keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub invalid_body: String,
    pub invalid_release_date: String,
    pub movie_list_failed: String,
    pub movie_create_failed: String,
    pub movie_title_conflict: String,
    pub movie_not_found: String,
    pub movie_update_failed: String,
    pub movie_delete_not_found: String,
    pub movie_delete_failed: String,
    pub movie_genre_filter_failed: String,
    /// `PUT /genres/{id}` without a name.
    pub genre_name_required: String,
    /// `POST /genres` without a name.
    pub genre_name_missing_on_create: String,
    pub genre_name_conflict: String,
    pub genre_rename_conflict: String,
    pub genre_not_found: String,
    pub genre_rename_not_found: String,
    pub genre_list_failed: String,
    pub genre_create_failed: String,
    pub genre_update_failed: String,
    pub genre_deleted: String,
    pub genre_delete_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            invalid_body: "Corpo da requisição inválido.".to_string(),
            invalid_release_date: "Data de lançamento inválida.".to_string(),
            movie_list_failed: "Houve um problema ao buscar os filmes.".to_string(),
            movie_create_failed: "Falha ao cadastar um filme".to_string(),
            movie_title_conflict: "Já existe um filme cadastrado com este titulo.".to_string(),
            movie_not_found: "Filme não encontrado.".to_string(),
            movie_update_failed: "Falha ao atualizar o registro do filme.".to_string(),
            movie_delete_not_found: "O filme não foi encontrado".to_string(),
            movie_delete_failed: "Não foi possível remover o filme.".to_string(),
            movie_genre_filter_failed: "Falha ao filtrar filmes por gênero.".to_string(),
            genre_name_required: "O nome do gênero é obrigatório.".to_string(),
            genre_name_missing_on_create: "Por favor, informe o nome do gênero.".to_string(),
            genre_name_conflict: "Este gênero já existe.".to_string(),
            genre_rename_conflict: "Este nome de gênero já existe.".to_string(),
            genre_not_found: "Gênero não encontrado.".to_string(),
            genre_rename_not_found: "Gênero não encontrado".to_string(),
            genre_list_failed: "Erro ao listar gêneros.".to_string(),
            genre_create_failed: "Erro ao cadastar gênero.".to_string(),
            genre_update_failed: "Houve um problema ao atualizar o gênero.".to_string(),
            genre_deleted: "Gênero excluído com sucesso !".to_string(),
            genre_delete_failed: "Houve um problema ao remover o gênero.".to_string(),
        }
    }
}

impl Messages {
    pub fn load(path: &Path) -> Result<Messages, Error> {
        let raw = fs::read_to_string(path)?;
        Messages::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Messages, Error> {
        Ok(serde_json::from_str(raw)?)
    }
}
