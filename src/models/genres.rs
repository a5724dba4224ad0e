use super::ContentType;

/// TMDB movie genre ids and display names
pub const MOVIE_GENRES: &[(i64, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// TMDB TV genre ids and display names
pub const TV_GENRES: &[(i64, &str)] = &[
    (10759, "Action & Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (10762, "Kids"),
    (9648, "Mystery"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
    (37, "Western"),
];

/// Genres whose catalog population is small or low-rated under strict
/// quality filters: documentaries, animation, TV movies, news, reality,
/// talk shows. These get looser thresholds and a lower minimum result
/// count before fallback.
pub const RARE_GENRES: &[i64] = &[99, 16, 10770, 10763, 10764, 10767];

/// Genre table for the given content type
pub fn genres_for(content_type: ContentType) -> &'static [(i64, &'static str)] {
    match content_type {
        ContentType::Movie => MOVIE_GENRES,
        ContentType::Tv => TV_GENRES,
    }
}

/// Display name for a genre id, if known for this content type
pub fn genre_name(content_type: ContentType, genre_id: i64) -> Option<&'static str> {
    genres_for(content_type)
        .iter()
        .find(|(id, _)| *id == genre_id)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_name_lookup() {
        assert_eq!(genre_name(ContentType::Movie, 99), Some("Documentary"));
        assert_eq!(genre_name(ContentType::Tv, 10767), Some("Talk"));
        assert_eq!(genre_name(ContentType::Movie, 10767), None);
        assert_eq!(genre_name(ContentType::Movie, 12345), None);
    }

    #[test]
    fn test_rare_genres_contains_documentary() {
        assert!(RARE_GENRES.contains(&99));
        assert!(!RARE_GENRES.contains(&28));
    }
}
