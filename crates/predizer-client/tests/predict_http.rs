use std::time::Duration;

use httpmock::prelude::*;
use predizer_client::{
    EndpointUrl, HttpPredictor, PredictError, PredictHttpConfig, PredictionOutcome, Predictor,
    parse_features,
};
use serde_json::json;

fn predictor_for(server: &MockServer) -> HttpPredictor {
    let endpoint: EndpointUrl = server.url("/predizer").parse().expect("mock url");
    HttpPredictor::new(PredictHttpConfig::new(endpoint))
}

#[tokio::test]
async fn posts_features_and_reads_prediction() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/predizer")
            .header("content-type", "application/json")
            .json_body(json!({ "features": [1.0, 2.0, 3.0] }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "prediction": 7 }));
    });

    let out = predictor_for(&server)
        .predict(&parse_features("1,2,3"))
        .await
        .expect("prediction");
    m.assert();
    assert_eq!(out, PredictionOutcome::Prediction(json!(7)));
}

#[tokio::test]
async fn non_success_status_reads_detail() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/predizer");
        then.status(400).json_body(json!({ "detail": "invalid input" }));
    });

    let out = predictor_for(&server)
        .predict(&parse_features("1,2,3"))
        .await
        .expect("outcome");
    assert_eq!(
        out,
        PredictionOutcome::Failure {
            status: 400,
            detail: json!("invalid input")
        }
    );
}

#[tokio::test]
async fn not_a_number_is_forwarded_as_null() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/predizer")
            .json_body(json!({ "features": [1.0, null, 3.0] }));
        then.status(200).json_body(json!({ "prediction": "ok" }));
    });

    let out = predictor_for(&server)
        .predict(&parse_features("1,x,3"))
        .await
        .expect("prediction");
    m.assert();
    assert_eq!(out, PredictionOutcome::Prediction(json!("ok")));
}

#[tokio::test]
async fn non_json_error_body_is_not_a_transport_failure() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/predizer");
        then.status(500).body("Internal Server Error");
    });

    let err = predictor_for(&server)
        .predict(&parse_features("1"))
        .await
        .expect_err("unparseable body");
    assert!(!err.is_transport());
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn connection_refused_is_transport_failure() {
    // Reserve a port, then free it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let endpoint: EndpointUrl = format!("http://127.0.0.1:{port}/predizer")
        .parse()
        .expect("url");
    let predictor = HttpPredictor::new(PredictHttpConfig::new(endpoint));

    let err = predictor
        .predict(&parse_features("1,2"))
        .await
        .expect_err("nothing listening");
    match err {
        PredictError::Request {
            message,
            url,
            is_timeout,
        } => {
            assert!(!message.is_empty());
            assert!(!is_timeout);
            assert!(url.is_some_and(|u| u.ends_with("/predizer")));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn configured_timeout_turns_hang_into_transport_failure() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST).path("/predizer");
        then.status(200)
            .delay(Duration::from_millis(800))
            .json_body(json!({ "prediction": 1 }));
    });
    let endpoint: EndpointUrl = server.url("/predizer").parse().expect("mock url");
    let cfg = PredictHttpConfig::new(endpoint).with_timeout(Some(Duration::from_millis(50)));

    let err = HttpPredictor::new(cfg)
        .predict(&parse_features("1"))
        .await
        .expect_err("timed out");
    assert!(matches!(err, PredictError::Request { is_timeout: true, .. }));
}
