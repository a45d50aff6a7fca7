use limericks::error::SearchError;
use limericks::semantic::{
    CachedRhymeService, DatamuseRhymes, ReliableRhymeService, lookup_rhymes,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DatamuseRhymes {
    DatamuseRhymes::new(&format!("{}/words", server.uri()), 5, 2)
}

#[tokio::test]
async fn datamuse_words_are_lowercased_in_service_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words"))
        .and(query_param("rel_rhy", "moon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"word": "June", "score": 3000, "numSyllables": 1},
            {"word": "spoon", "score": 2500, "numSyllables": 1},
            {"word": "afternoon", "score": 2000, "numSyllables": 3}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rhymes = lookup_rhymes(&client(&server), "moon").await.unwrap();
    let words: Vec<&str> = rhymes.iter().collect();
    assert_eq!(words, ["june", "spoon", "afternoon"]);
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let service = ReliableRhymeService::new(client(&server), 3, 10);
    let err = lookup_rhymes(&service, "moon").await.unwrap_err();
    assert!(matches!(
        err,
        SearchError::ServiceUnavailable { ref service, .. } if service == "datamuse"
    ));
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/words"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"word": "night"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = ReliableRhymeService::new(client(&server), 2, 10);
    let rhymes = lookup_rhymes(&service, "light").await.unwrap();
    assert!(rhymes.contains("night"));
}

#[tokio::test]
async fn exhausted_retries_report_every_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let service = ReliableRhymeService::new(client(&server), 2, 10);
    let err = lookup_rhymes(&service, "moon").await.unwrap_err();
    match err {
        SearchError::ServiceUnavailable { message, .. } => {
            assert!(message.contains("attempt 3/3"));
        }
        other => panic!("expected ServiceUnavailable, got {other}"),
    }
}

#[tokio::test]
async fn cache_hits_skip_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{"word": "spoon"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = CachedRhymeService::new(ReliableRhymeService::new(client(&server), 1, 10));
    for _ in 0..3 {
        let rhymes = lookup_rhymes(&service, "moon").await.unwrap();
        assert!(rhymes.contains("spoon"));
    }
    assert_eq!(service.cached_words(), 1);
}
