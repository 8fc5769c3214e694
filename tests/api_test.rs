//! MovieMind API client tests
//!
//! Tests request shapes, response decoding, and error handling against a
//! mocked backend.

use std::time::Duration;

use mockito::{Matcher, Server};
use moviemind::api::{Endpoint, MovieApiClient};
use moviemind::models::TimeWindow;

fn client(server: &Server) -> MovieApiClient {
    MovieApiClient::new(server.url(), Duration::from_secs(5)).unwrap()
}

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_parses_page() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "blade runner".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "results": [
                    {"id": 78, "title": "Blade Runner", "release_date": "1982-06-25", "vote_average": 7.9},
                    {"id": 335984, "title": "Blade Runner 2049", "release_date": "2017-10-04"}
                ],
                "total_pages": 3
            }"#,
        )
        .create_async()
        .await;

    let page = client(&server).search("blade runner", 2).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].title, "Blade Runner");
    assert_eq!(page.results[0].display_year(), Some(1982));
    assert_eq!(page.results[1].id, 335984);
}

#[tokio::test]
async fn test_search_encodes_special_characters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "amélie & co".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"results": [], "total_pages": 0}"#)
        .create_async()
        .await;

    let page = client(&server).search("amélie & co", 1).await.unwrap();

    mock.assert_async().await;
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn test_search_missing_fields_default() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let page = client(&server).search("nothing", 1).await.unwrap();
    assert!(page.results.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_search_server_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error": "boom"}"#)
        .create_async()
        .await;

    let err = client(&server).search("heat", 1).await.unwrap_err();
    assert_eq!(err.endpoint, Endpoint::Search);
    assert_eq!(err.to_string(), "Failed to search movies");
    assert_eq!(err.cause.to_string(), "HTTP status 500");
}

// =============================================================================
// Autocomplete Tests
// =============================================================================

#[tokio::test]
async fn test_autocomplete_accepts_string_year() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/autocomplete")
        .match_query(Matcher::UrlEncoded("query".into(), "fig".into()))
        .with_status(200)
        .with_body(
            r#"{"results": [
                {"id": 550, "title": "Fight Club", "year": "1999", "poster_url": "https://img.test/fc.jpg"},
                {"id": 1, "title": "Fig", "year": null}
            ]}"#,
        )
        .create_async()
        .await;

    let movies = client(&server).autocomplete("fig").await.unwrap();

    mock.assert_async().await;
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].to_string(), "Fight Club (1999)");
    assert_eq!(movies[0].poster_url.as_deref(), Some("https://img.test/fc.jpg"));
    assert_eq!(movies[1].year, None);
}

#[tokio::test]
async fn test_autocomplete_short_query_makes_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/autocomplete")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let movies = client(&server).autocomplete("f").await.unwrap();

    mock.assert_async().await;
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_autocomplete_invalid_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/autocomplete")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client(&server).autocomplete("matrix").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to get suggestions");
    assert!(err.cause.to_string().starts_with("Invalid response"));
}

// =============================================================================
// Detail Tests
// =============================================================================

#[tokio::test]
async fn test_movie_detail() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/550")
        .with_status(200)
        .with_body(
            r#"{
                "id": 550,
                "title": "Fight Club",
                "tagline": "Mischief. Mayhem. Soap.",
                "release_date": "1999-10-15",
                "runtime": 139,
                "genres": [{"id": 18, "name": "Drama"}],
                "credits": {
                    "cast": [{"id": 819, "name": "Edward Norton", "character": "The Narrator"}],
                    "crew": [{"id": 7467, "name": "David Fincher", "job": "Director"}]
                },
                "production_companies": [{"name": "Fox 2000 Pictures"}]
            }"#,
        )
        .create_async()
        .await;

    let detail = client(&server).movie_detail(550).await.unwrap();

    mock.assert_async().await;
    assert_eq!(detail.title(), "Fight Club");
    assert_eq!(detail.tagline.as_deref(), Some("Mischief. Mayhem. Soap."));
    assert_eq!(detail.director().map(|d| d.name.as_str()), Some("David Fincher"));
    assert_eq!(detail.studio(), Some("Fox 2000 Pictures"));
    assert_eq!(detail.top_cast(12).len(), 1);
}

#[tokio::test]
async fn test_movie_detail_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/999999")
        .with_status(404)
        .create_async()
        .await;

    let err = client(&server).movie_detail(999999).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch movie details");
}

// =============================================================================
// Recommendation Tests
// =============================================================================

#[tokio::test]
async fn test_recommendations_sends_limit() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/recommendations/movie/550")
        .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
        .with_status(200)
        .with_body(r#"{"results": [{"id": 807, "title": "Se7en", "release_date": "1995-09-22"}]}"#)
        .create_async()
        .await;

    let movies = client(&server).recommendations(550, 5).await.unwrap();

    mock.assert_async().await;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Se7en");
}

#[tokio::test]
async fn test_recommendations_missing_results_is_empty() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/recommendations/movie/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let movies = client(&server).recommendations(1, 10).await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_hybrid_joins_ids_with_commas() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/recommendations/hybrid")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("movie_ids".into(), "550,603,13".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"results": [{"id": 680, "title": "Pulp Fiction"}]}"#)
        .create_async()
        .await;

    let movies = client(&server)
        .hybrid_recommendations(&[550, 603, 13], 10)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(movies[0].id, 680);
}

#[tokio::test]
async fn test_hybrid_failure_message() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/recommendations/hybrid")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let err = client(&server)
        .hybrid_recommendations(&[550], 10)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to get hybrid recommendations");
}

// =============================================================================
// Trending Tests
// =============================================================================

#[tokio::test]
async fn test_trending_window() {
    let mut server = Server::new_async().await;

    let day = server
        .mock("GET", "/trending")
        .match_query(Matcher::UrlEncoded("time_window".into(), "day".into()))
        .with_status(200)
        .with_body(r#"{"results": [{"id": 27205, "title": "Inception"}]}"#)
        .create_async()
        .await;
    let week = server
        .mock("GET", "/trending")
        .match_query(Matcher::UrlEncoded("time_window".into(), "week".into()))
        .with_status(200)
        .with_body(r#"{"results": [{"id": 155, "title": "The Dark Knight"}, {"id": 27205, "title": "Inception"}]}"#)
        .create_async()
        .await;

    let client = client(&server);
    let today = client.trending(TimeWindow::Day).await.unwrap();
    let this_week = client.trending(TimeWindow::Week).await.unwrap();

    day.assert_async().await;
    week.assert_async().await;
    assert_eq!(today.len(), 1);
    assert_eq!(this_week.len(), 2);
}

#[tokio::test]
async fn test_trending_unreachable_backend() {
    // Nothing listens on port 1
    let client = MovieApiClient::new("http://127.0.0.1:1/api", Duration::from_secs(2)).unwrap();
    let err = client.trending(TimeWindow::Week).await.unwrap_err();
    assert_eq!(err.endpoint, Endpoint::Trending);
    assert_eq!(err.to_string(), "Failed to get trending movies");
}
