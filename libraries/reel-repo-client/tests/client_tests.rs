//! Tests for the repository contents client.
//!
//! These tests use mock servers to verify client behavior without
//! touching the real contents API.

use reel_repo_client::{EntryKind, RepoClient, RepoClientError, RepoConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> RepoConfig {
    RepoConfig::new("octocat", "jukebox", "main")
}

async fn mock_client() -> (MockServer, RepoClient) {
    let mock_server = MockServer::start().await;
    let client = RepoClient::with_endpoints(test_config(), mock_server.uri(), mock_server.uri())
        .expect("valid test config");
    (mock_server, client)
}

// =============================================================================
// Listing Tests
// =============================================================================

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_root_entries_in_order() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Chill", "path": "Chill", "type": "dir"},
                {"name": "intro.mp3", "path": "intro.mp3", "type": "file"},
                {"name": "README.md", "path": "README.md", "type": "file"}
            ])))
            .mount(&mock_server)
            .await;

        let entries = client.list_entries("").await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Chill");
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[1].name, "intro.mp3");
        assert!(entries[1].is_file());
        assert_eq!(entries[2].path, "README.md");
    }

    #[tokio::test]
    async fn lists_subdirectory_by_path() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/Chill"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "a.mp3", "path": "Chill/a.mp3", "type": "file"}
            ])))
            .mount(&mock_server)
            .await;

        let entries = client.list_entries("Chill").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "Chill/a.mp3");
    }

    #[tokio::test]
    async fn pins_listings_to_the_configured_branch() {
        let mock_server = MockServer::start().await;
        let client = RepoClient::with_endpoints(
            RepoConfig::new("octocat", "jukebox", "archive/2023"),
            mock_server.uri(),
            mock_server.uri(),
        )
        .unwrap();

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .and(query_param("ref", "archive/2023"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let entries = client.list_entries("").await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn ignores_unknown_payload_fields() {
        let (mock_server, client) = mock_client().await;

        // The real API sends far more fields than the client models.
        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": "song.mp3",
                    "path": "song.mp3",
                    "type": "file",
                    "sha": "abc123",
                    "size": 4_194_304,
                    "download_url": "https://example.com/song.mp3",
                    "_links": {"self": "https://example.com"}
                }
            ])))
            .mount(&mock_server)
            .await;

        let entries = client.list_entries("").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "song.mp3");
    }

    #[tokio::test]
    async fn surfaces_symlinks_and_submodules_as_other() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "link", "path": "link", "type": "symlink"},
                {"name": "vendored", "path": "vendored", "type": "submodule"}
            ])))
            .mount(&mock_server)
            .await;

        let entries = client.list_entries("").await.unwrap();
        assert!(entries.iter().all(|e| e.kind == EntryKind::Other));
    }
}

// =============================================================================
// Error Taxonomy Tests
// =============================================================================

mod errors {
    use super::*;

    #[tokio::test]
    async fn missing_path_maps_to_not_found() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/Nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found"
            })))
            .mount(&mock_server)
            .await;

        let result = client.list_entries("Nope").await;
        match result.unwrap_err() {
            RepoClientError::NotFound(path) => assert_eq!(path, "Nope"),
            e => panic!("Expected NotFound, got: {e:?}"),
        }
    }

    #[tokio::test]
    async fn forbidden_maps_to_rate_limited() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "message": "API rate limit exceeded"
            })))
            .mount(&mock_server)
            .await;

        let result = client.list_entries("").await;
        match result.unwrap_err() {
            RepoClientError::RateLimited { retry_after_secs } => {
                assert!(retry_after_secs.is_none());
            }
            e => panic!("Expected RateLimited, got: {e:?}"),
        }
    }

    #[tokio::test]
    async fn too_many_requests_carries_retry_after() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("Retry-After", "120")
                    .set_body_string("Too many requests"),
            )
            .mount(&mock_server)
            .await;

        let result = client.list_entries("").await;
        match result.unwrap_err() {
            RepoClientError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, Some(120));
            }
            e => panic!("Expected RateLimited, got: {e:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let result = client.list_entries("").await;
        match result.unwrap_err() {
            RepoClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("Internal Server Error"));
            }
            e => panic!("Expected Api, got: {e:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let (mock_server, client) = mock_client().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/jukebox/contents/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let result = client.list_entries("").await;
        match result.unwrap_err() {
            RepoClientError::Parse(_) => {}
            e => panic!("Expected Parse, got: {e:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_maps_to_request_error() {
        let client = RepoClient::with_endpoints(
            test_config(),
            "http://127.0.0.1:1",
            "http://127.0.0.1:1",
        )
        .unwrap();

        let result = client.list_entries("").await;
        match result.unwrap_err() {
            RepoClientError::Request(_) => {}
            e => panic!("Expected Request, got: {e:?}"),
        }
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RepoClientError>();
    }
}

// =============================================================================
// Raw URL Tests
// =============================================================================

mod raw_urls {
    use super::*;

    #[test]
    fn resolves_against_default_raw_host() {
        let client = RepoClient::new(test_config()).unwrap();
        assert_eq!(
            client.raw_url("Chill/a.mp3"),
            "https://raw.githubusercontent.com/octocat/jukebox/main/Chill/a.mp3"
        );
    }

    #[tokio::test]
    async fn resolves_against_overridden_raw_host() {
        let (mock_server, client) = mock_client().await;
        let url = client.raw_url("song.mp3");
        assert_eq!(url, format!("{}/octocat/jukebox/main/song.mp3", mock_server.uri()));
    }
}
