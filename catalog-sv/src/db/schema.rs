diesel::table! {
    genres (id) {
        id -> Int4,
        name -> Text,
    }
}

diesel::table! {
    languages (id) {
        id -> Int4,
        name -> Text,
    }
}

diesel::table! {
    movies (id) {
        id -> Int4,
        title -> Text,
        genre_id -> Int4,
        language_id -> Int4,
        oscar_count -> Int4,
        release_date -> Date,
        duration -> Int4,
    }
}

diesel::joinable!(movies -> genres (genre_id));
diesel::joinable!(movies -> languages (language_id));

diesel::allow_tables_to_appear_in_same_query!(
    genres,
    languages,
    movies,
);
