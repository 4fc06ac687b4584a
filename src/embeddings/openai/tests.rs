use super::*;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const TEST_DIMENSION: usize = 64;

/// Answers every embeddings request with one vector per input, in reverse order,
/// whose first component is the input's length
struct EchoEmbeddings;

impl Respond for EchoEmbeddings {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = request.body_json().expect("request body should be JSON");
        let inputs = body["input"].as_array().cloned().unwrap_or_default();

        let data: Vec<Value> = inputs
            .iter()
            .enumerate()
            .rev()
            .map(|(index, input)| {
                let mut embedding = vec![0.0_f32; TEST_DIMENSION];
                embedding[0] = input.as_str().map_or(0, str::len) as f32;
                json!({"object": "embedding", "index": index, "embedding": embedding})
            })
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": data,
            "model": body["model"],
        }))
    }
}

fn test_config(server: &MockServer, batch_size: u32) -> ProviderConfig {
    ProviderConfig {
        base_url: format!("{}/v1", server.uri()),
        embedding_dimension: TEST_DIMENSION as u32,
        batch_size,
        ..ProviderConfig::default()
    }
}

fn test_embeddings(config: &ProviderConfig) -> OpenAiEmbeddings {
    let client =
        ApiClient::with_api_key(config, "sk-test".to_string()).expect("client should build");
    OpenAiEmbeddings::with_client(client, config)
}

#[test]
fn client_configuration() {
    let config = ProviderConfig {
        embedding_model: "text-embedding-3-small".to_string(),
        embedding_dimension: 512,
        ..ProviderConfig::default()
    };
    let embeddings = test_embeddings(&config);

    assert_eq!(embeddings.model(), "text-embedding-3-small");
    assert_eq!(embeddings.dimension(), 512);
    assert_eq!(embeddings.batch_size, 256);
}

#[test]
fn empty_input_makes_no_request() {
    // Nothing listens on this port; any request would fail
    let config = ProviderConfig {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        ..ProviderConfig::default()
    };
    let result = test_embeddings(&config).embed_documents(&[]);

    assert!(result.expect("empty input should succeed").is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn documents_are_batched_and_reordered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(EchoEmbeddings)
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&server, 2);
    let texts = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];
    let result = tokio::task::spawn_blocking(move || test_embeddings(&config).embed_documents(&texts))
        .await
        .expect("blocking task should finish");

    let embeddings = result.expect("embedding should succeed");
    let firsts: Vec<f32> = embeddings.iter().map(|e| e[0]).collect();
    assert_eq!(firsts, vec![1.0, 2.0, 3.0]);
    assert!(embeddings.iter().all(|e| e.len() == TEST_DIMENSION));

    let requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    let first_body: Value = requests[0].body_json().expect("body is JSON");
    assert_eq!(first_body["model"], "text-embedding-ada-002");
    assert_eq!(first_body["input"], json!(["a", "bb"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn query_embedding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(EchoEmbeddings)
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, 16);
    let result = tokio::task::spawn_blocking(move || {
        test_embeddings(&config).embed_query("What is X?")
    })
    .await
    .expect("blocking task should finish");

    let embedding = result.expect("query embedding should succeed");
    assert_eq!(embedding.len(), TEST_DIMENSION);
    assert_eq!(embedding[0], 10.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_dimension_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [0.1, 0.2, 0.3]}]
        })))
        .mount(&server)
        .await;

    let config = test_config(&server, 16);
    let result = tokio::task::spawn_blocking(move || test_embeddings(&config).embed_query("hi"))
        .await
        .expect("blocking task should finish");

    assert!(matches!(result, Err(PdfChatError::Embedding(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn count_mismatch_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": vec![0.0_f32; TEST_DIMENSION]}]
        })))
        .mount(&server)
        .await;

    let config = test_config(&server, 16);
    let texts = vec!["one".to_string(), "two".to_string()];
    let result = tokio::task::spawn_blocking(move || test_embeddings(&config).embed_documents(&texts))
        .await
        .expect("blocking task should finish");

    match result {
        Err(PdfChatError::Embedding(message)) => assert!(message.contains("2 vs 1")),
        other => panic!("expected embedding error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn auth_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, 16);
    let result = tokio::task::spawn_blocking(move || test_embeddings(&config).embed_query("hi"))
        .await
        .expect("blocking task should finish");

    assert!(matches!(
        result,
        Err(PdfChatError::Provider { status: 401, .. })
    ));
}
