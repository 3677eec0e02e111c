mod common;

use common::{client, ok, question_json, Reply, ScriptedTransport};
use paperplay_quiz::error::{ApiError, FetchError};
use paperplay_quiz::models::QuestionContent;
use paperplay_quiz::services::QuestionPairLoader;
use paperplay_quiz::Method;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn paper_and_level_lookups() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::Get,
        "/api/v1/papers/p1",
        ok(json!({ "id": "p1", "subject_id": "s1", "title": "Attention Is All You Need" })),
    );
    transport.on(
        Method::Get,
        "/api/v1/levels/l1",
        ok(json!({ "id": "l1", "paper_id": "p1", "name": "第一关" })),
    );
    let client = client(&transport);

    let paper = assert_ok!(assert_ok!(client.get_paper("p1").await).into_data("papers/p1"));
    assert_eq!(paper.title, "Attention Is All You Need");

    let level = assert_ok!(assert_ok!(client.get_level("l1").await).into_data("levels/l1"));
    assert_eq!(level.paper_id, "p1");
    assert!(level.citation_count.is_none());
}

#[tokio::test]
async fn question_payloads_are_decoded_once() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Get, "/api/v1/questions/q1", ok(question_json("q1", "l1", "C")));
    let client = client(&transport);

    let question = assert_ok!(
        assert_ok!(client.get_question("q1").await).into_data("questions/q1")
    );

    assert_eq!(question.answer.correct_letter(), Some("C"));
    match &question.content {
        QuestionContent::Parsed { concept_name, options } => {
            assert_eq!(concept_name, "概念 q1");
            assert_eq!(options.len(), 4);
        }
        other => panic!("unexpected content: {:?}", other),
    }
}

#[tokio::test]
async fn unauthorized_surfaces_as_api_error() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Get, "/api/v1/papers/p1/level", Reply::Unauthorized);

    let err = assert_err!(client(&transport).get_paper_level("p1").await);
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[tokio::test]
async fn pair_load_issues_both_lookups_even_when_one_fails() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Get, "/api/v1/questions/q2", ok(question_json("q2", "l1", "A")));
    let loader = QuestionPairLoader::new(client(&transport));
    let pair = paperplay_quiz::QuestionPair {
        lead_in_id: "q1".to_string(),
        concept_id: "q2".to_string(),
    };

    let err = assert_err!(loader.load_pair(&pair).await);

    assert!(matches!(err, FetchError::Api(ApiError::RequestFailed { .. })));
    assert_eq!(transport.count(Method::Get, "/api/v1/questions/q1"), 1);
    assert_eq!(transport.count(Method::Get, "/api/v1/questions/q2"), 1);
}
