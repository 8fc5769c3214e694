//! Data structures shared across MovieMind
//!
//! Organized by domain:
//! - **Listing**: movies as returned by search, autocomplete, trending and
//!   recommendation endpoints
//! - **Detail**: full movie record with credits, genres and studios
//! - **Parameters**: trending window and search type selectors

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Base URL for full-size backdrop images
pub const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Base URL for cast profile thumbnails
pub const PROFILE_BASE_URL: &str = "https://image.tmdb.org/t/p/w185";

// =============================================================================
// Listing Models
// =============================================================================

/// Movie record as returned by every listing endpoint.
///
/// Autocomplete returns a trimmed record (`id`, `title`, `year`,
/// `poster_url`); the other endpoints return the full TMDB shape. Every
/// field besides `id` and `title` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<u16>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl Movie {
    /// Release year, from the explicit `year` field or the release date
    pub fn display_year(&self) -> Option<u16> {
        self.year
            .or_else(|| self.release_date.as_deref().and_then(extract_year))
    }

    /// Rating, treating a missing value as unrated
    pub fn rating(&self) -> f32 {
        self.vote_average.unwrap_or(0.0)
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_year() {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}

/// `{results: [...]}` envelope shared by listing endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieList {
    #[serde(default)]
    pub results: Vec<Movie>,
}

/// One page of search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
}

// =============================================================================
// Detail Models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl CastMember {
    /// Full profile image URL, if the person has one
    pub fn profile_url(&self) -> Option<String> {
        self.profile_path
            .as_ref()
            .map(|p| format!("{}{}", PROFILE_BASE_URL, p))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub name: String,
}

/// Full movie record from `/movie/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
}

impl MovieDetail {
    pub fn title(&self) -> &str {
        &self.movie.title
    }

    /// First credited director
    pub fn director(&self) -> Option<&CrewMember> {
        self.credits
            .as_ref()
            .and_then(|c| c.crew.iter().find(|p| p.job == "Director"))
    }

    /// First listed production company
    pub fn studio(&self) -> Option<&str> {
        self.production_companies.first().map(|c| c.name.as_str())
    }

    /// Top-billed cast, at most `limit` people
    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        match &self.credits {
            Some(credits) => &credits.cast[..credits.cast.len().min(limit)],
            None => &[],
        }
    }

    /// Runtime formatted as "2h 19m"; `None` when unknown or zero
    pub fn runtime_str(&self) -> Option<String> {
        match self.runtime {
            Some(mins) if mins > 0 => Some(format!("{}h {}m", mins / 60, mins % 60)),
            _ => None,
        }
    }

    pub fn backdrop_url(&self) -> Option<String> {
        self.movie
            .backdrop_path
            .as_ref()
            .map(|p| format!("{}{}", BACKDROP_BASE_URL, p))
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.movie)?;
        if let Some(runtime) = self.runtime_str() {
            write!(f, " - {}", runtime)?;
        }
        if self.movie.rating() > 0.0 {
            write!(f, " - ★ {:.1}", self.movie.rating())?;
        }
        Ok(())
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Trending window accepted by `/trending`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a search query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Movie,
    Person,
}

impl SearchType {
    pub fn toggled(self) -> Self {
        match self {
            SearchType::Movie => SearchType::Person,
            SearchType::Person => SearchType::Movie,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Extract year from a date string like "1999-10-15"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

/// Accepts `1999`, `"1999"`, `""` and `null` for the year field
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<RawYear>::deserialize(deserializer)? {
        Some(RawYear::Number(n)) => u16::try_from(n).ok(),
        Some(RawYear::Text(s)) => extract_year(s.trim()),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("1999-10-15"), Some(1999));
        assert_eq!(extract_year("2008"), Some(2008));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("abc"), None);
    }

    #[test]
    fn test_year_accepts_number_and_string() {
        let numeric: Movie = serde_json::from_str(r#"{"id": 550, "title": "Fight Club", "year": 1999}"#).unwrap();
        assert_eq!(numeric.year, Some(1999));

        let text: Movie = serde_json::from_str(r#"{"id": 550, "title": "Fight Club", "year": "1999"}"#).unwrap();
        assert_eq!(text.year, Some(1999));

        let empty: Movie = serde_json::from_str(r#"{"id": 1, "title": "Untitled", "year": ""}"#).unwrap();
        assert_eq!(empty.year, None);

        let null: Movie = serde_json::from_str(r#"{"id": 1, "title": "Untitled", "year": null}"#).unwrap();
        assert_eq!(null.year, None);
    }

    #[test]
    fn test_display_year_falls_back_to_release_date() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 603, "title": "The Matrix", "release_date": "1999-03-30", "vote_average": 8.2}"#,
        )
        .unwrap();
        assert_eq!(movie.year, None);
        assert_eq!(movie.display_year(), Some(1999));
        assert_eq!(movie.to_string(), "The Matrix (1999)");
    }

    #[test]
    fn test_movie_display_without_year() {
        let movie: Movie = serde_json::from_str(r#"{"id": 1, "title": "Unknown"}"#).unwrap();
        assert_eq!(movie.to_string(), "Unknown");
    }

    #[test]
    fn test_detail_derived_fields() {
        let detail: MovieDetail = serde_json::from_str(
            r#"{
                "id": 550,
                "title": "Fight Club",
                "release_date": "1999-10-15",
                "runtime": 139,
                "vote_average": 8.4,
                "backdrop_path": "/hZkgoQYus5vegHoetLkCJzb17zJ.jpg",
                "genres": [{"id": 18, "name": "Drama"}],
                "credits": {
                    "crew": [
                        {"id": 1, "name": "Jim Uhls", "job": "Screenplay"},
                        {"id": 7467, "name": "David Fincher", "job": "Director"}
                    ],
                    "cast": [{"id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": "/8nytsqL59SFJTVYVrN72k6qkGgJ.jpg"}]
                },
                "production_companies": [{"name": "Regency Enterprises"}, {"name": "Fox 2000 Pictures"}]
            }"#,
        )
        .unwrap();

        assert_eq!(detail.title(), "Fight Club");
        assert_eq!(detail.director().map(|d| d.name.as_str()), Some("David Fincher"));
        assert_eq!(detail.studio(), Some("Regency Enterprises"));
        assert_eq!(detail.runtime_str().as_deref(), Some("2h 19m"));
        assert_eq!(
            detail.backdrop_url().as_deref(),
            Some("https://image.tmdb.org/t/p/original/hZkgoQYus5vegHoetLkCJzb17zJ.jpg")
        );
        assert_eq!(
            detail.top_cast(12)[0].profile_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w185/8nytsqL59SFJTVYVrN72k6qkGgJ.jpg")
        );
        assert_eq!(detail.genre_names(), vec!["Drama"]);
    }

    #[test]
    fn test_detail_without_credits() {
        let detail: MovieDetail =
            serde_json::from_str(r#"{"id": 2, "title": "Bare", "runtime": 0}"#).unwrap();
        assert!(detail.director().is_none());
        assert!(detail.studio().is_none());
        assert!(detail.top_cast(12).is_empty());
        assert!(detail.runtime_str().is_none());
    }

    #[test]
    fn test_search_page_defaults() {
        let page: SearchPage = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_search_type_toggle() {
        assert_eq!(SearchType::Movie.toggled(), SearchType::Person);
        assert_eq!(SearchType::Person.toggled(), SearchType::Movie);
    }
}
