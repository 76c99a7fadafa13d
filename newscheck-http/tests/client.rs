use newscheck_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde_json::{Value, json};
use std::borrow::Cow;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn query_auth_is_appended_to_the_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/m:generateContent"))
        .and(query_param("key", "abc"))
        .and(body_json(json!({ "hello": "world" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/v1beta/", server.uri())).unwrap();
    let got: Value = client
        .post_json_opts(
            "models/m:generateContent",
            &json!({ "hello": "world" }),
            RequestOpts {
                auth: Some(Auth::Query {
                    name: "key",
                    value: Cow::Borrowed("abc"),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got["ok"], json!(true));
}

#[tokio::test]
async fn bearer_auth_hits_the_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "hi" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/api/generate", server.uri())).unwrap();
    let got: Value = client
        .post_json_opts(
            "",
            &json!({}),
            RequestOpts {
                auth: Some(Auth::Bearer("tok")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got["text"], json!("hi"));
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json_opts::<_, Value>("", &json!({}), RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status, message, ..
        } => {
            assert_eq!(status.as_u16(), 403);
            assert!(message.contains("Permission denied"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let err = client
        .post_json_opts::<_, Value>("", &json!({}), RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn html_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json_opts::<_, Value>("", &json!({}), RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Decode(_, snippet) => assert!(snippet.contains("oops")),
        other => panic!("expected decode error, got {other:?}"),
    }
}
