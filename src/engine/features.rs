use crate::models::Movie;

/// Merges a movie's text fields into one blob plus its rating.
///
/// The field order (genres, overview, director, cast, keywords) is fixed so
/// that vocabulary weighting is reproducible across builds. Missing fields
/// are empty strings and simply contribute nothing to the blob; the caller
/// never sees a null. Pure function over catalog rows.
pub fn compose(movie: &Movie) -> (String, Option<f64>) {
    let blob = [
        movie.genres.join(" "),
        movie.overview.clone(),
        movie.director.clone(),
        movie.top_cast.clone(),
        movie.keywords.clone(),
    ]
    .join(" ");

    (blob, movie.vote_average)
}
