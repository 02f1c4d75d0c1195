//! Tests for library resolution against a mock contents API.

use reel_core::ROOT_PLAYLIST;
use reel_library::{LibraryError, LibraryOutcome, LibraryResolver};
use reel_repo_client::{RepoClient, RepoClientError, RepoConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn resolver_against(mock_server: &MockServer) -> LibraryResolver {
    let client = RepoClient::with_endpoints(
        RepoConfig::new("octocat", "jukebox", "main"),
        mock_server.uri(),
        mock_server.uri(),
    )
    .expect("valid test config");
    LibraryResolver::new(client)
}

fn file(name: &str, path: &str) -> serde_json::Value {
    serde_json::json!({"name": name, "path": path, "type": "file"})
}

fn dir(name: &str) -> serde_json::Value {
    serde_json::json!({"name": name, "path": name, "type": "dir"})
}

async fn mount_listing(mock_server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octocat/jukebox/contents/{at}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn root_files_form_first_playlist_then_directories_in_listing_order() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        "",
        serde_json::json!([
            dir("Chill"),
            file("loose.mp3", "loose.mp3"),
            dir("Workout"),
            file("README.md", "README.md"),
        ]),
    )
    .await;
    mount_listing(
        &mock_server,
        "Chill",
        serde_json::json!([file("a.mp3", "Chill/a.mp3"), file("b.ogg", "Chill/b.ogg")]),
    )
    .await;
    mount_listing(
        &mock_server,
        "Workout",
        serde_json::json!([file("run.m4a", "Workout/run.m4a")]),
    )
    .await;

    let resolver = resolver_against(&mock_server).await;
    let library = resolver.build().await.unwrap().into_library().unwrap();

    assert_eq!(
        library.names().collect::<Vec<_>>(),
        vec![ROOT_PLAYLIST, "Chill", "Workout"]
    );
    assert_eq!(library.playlist(ROOT_PLAYLIST).unwrap().len(), 1);
    assert_eq!(library.playlist("Chill").unwrap().len(), 2);

    // Track order within a playlist matches the listing order.
    let chill = library.playlist("Chill").unwrap();
    assert_eq!(chill.tracks[0].name, "a.mp3");
    assert_eq!(chill.tracks[1].name, "b.ogg");
}

#[tokio::test]
async fn resolves_streamable_urls_for_each_track() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "", serde_json::json!([dir("Chill")])).await;
    mount_listing(
        &mock_server,
        "Chill",
        serde_json::json!([file("a song.mp3", "Chill/a song.mp3")]),
    )
    .await;

    let resolver = resolver_against(&mock_server).await;
    let library = resolver.build().await.unwrap().into_library().unwrap();

    let track = library.track("Chill", 0).unwrap();
    assert_eq!(track.path, "Chill/a song.mp3");
    assert_eq!(
        track.url,
        format!("{}/octocat/jukebox/main/Chill/a%20song.mp3", mock_server.uri())
    );
}

#[tokio::test]
async fn directories_without_audio_are_omitted() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "", serde_json::json!([dir("A"), dir("B")])).await;
    mount_listing(
        &mock_server,
        "A",
        serde_json::json!([file("notes.txt", "A/notes.txt")]),
    )
    .await;
    mount_listing(
        &mock_server,
        "B",
        serde_json::json!([file("song.mp3", "B/song.mp3")]),
    )
    .await;

    let resolver = resolver_against(&mock_server).await;
    let library = resolver.build().await.unwrap().into_library().unwrap();

    assert_eq!(library.names().collect::<Vec<_>>(), vec!["B"]);
}

#[tokio::test]
async fn extension_filter_is_case_insensitive() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        "",
        serde_json::json!([
            file("LOUD.MP3", "LOUD.MP3"),
            file("quiet.Wav", "quiet.Wav"),
            file("cover.png", "cover.png"),
        ]),
    )
    .await;

    let resolver = resolver_against(&mock_server).await;
    let library = resolver.build().await.unwrap().into_library().unwrap();

    assert_eq!(library.playlist(ROOT_PLAYLIST).unwrap().len(), 2);
}

#[tokio::test]
async fn failed_subdirectory_listing_skips_only_that_directory() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        "",
        serde_json::json!([dir("Broken"), dir("Fine")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/jukebox/contents/Broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;
    mount_listing(
        &mock_server,
        "Fine",
        serde_json::json!([file("ok.mp3", "Fine/ok.mp3")]),
    )
    .await;

    let resolver = resolver_against(&mock_server).await;
    let library = resolver.build().await.unwrap().into_library().unwrap();

    assert_eq!(library.names().collect::<Vec<_>>(), vec!["Fine"]);
}

#[tokio::test]
async fn nested_subdirectories_are_not_explored() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, "", serde_json::json!([dir("Top")])).await;
    mount_listing(
        &mock_server,
        "Top",
        serde_json::json!([
            file("one.mp3", "Top/one.mp3"),
            {"name": "Nested", "path": "Top/Nested", "type": "dir"},
        ]),
    )
    .await;
    let resolver = resolver_against(&mock_server).await;
    let library = resolver.build().await.unwrap().into_library().unwrap();

    assert_eq!(library.playlist("Top").unwrap().len(), 1);

    // Depth is fixed at two levels: no request ever targets Top/Nested.
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().contains("Nested")));
}

#[tokio::test]
async fn repository_without_audio_resolves_to_empty() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        "",
        serde_json::json!([file("README.md", "README.md"), dir("Docs")]),
    )
    .await;
    mount_listing(
        &mock_server,
        "Docs",
        serde_json::json!([file("guide.md", "Docs/guide.md")]),
    )
    .await;

    let resolver = resolver_against(&mock_server).await;
    let outcome = resolver.build().await.unwrap();

    assert!(matches!(outcome, LibraryOutcome::Empty));
}

#[tokio::test]
async fn missing_root_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/jukebox/contents/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let resolver = resolver_against(&mock_server).await;
    let result = resolver.build().await;

    match result.unwrap_err() {
        LibraryError::Root(RepoClientError::NotFound(path)) => assert_eq!(path, ""),
        e => panic!("Expected Root(NotFound), got: {e:?}"),
    }
}

#[tokio::test]
async fn rate_limited_root_is_fatal_and_preserved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/jukebox/contents/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limit exceeded"))
        .mount(&mock_server)
        .await;

    let resolver = resolver_against(&mock_server).await;
    let result = resolver.build().await;

    assert!(matches!(
        result.unwrap_err(),
        LibraryError::Root(RepoClientError::RateLimited { .. })
    ));
}
