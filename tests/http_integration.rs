// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Yeti HTTP API using wiremock.

use std::time::{Duration, Instant};

use goalzero_lib::protocol::{RequestGate, YETI_APP_USER_AGENT};
use goalzero_lib::types::{Output, PowerState};
use goalzero_lib::{ConnectSource, DeviceManager, Error, Yeti};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn yeti_for(mock_server: &MockServer) -> Yeti {
    Yeti::builder(mock_server.address().to_string())
        .build_without_probe()
        .unwrap()
}

async fn mount_state(mock_server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

// ============================================================================
// Queries
// ============================================================================

mod queries {
    use super::*;

    #[tokio::test]
    async fn fetch_state_clamps_soc_percent() {
        let mock_server = MockServer::start().await;
        mount_state(
            &mock_server,
            json!({"thingName": "yeti123", "socPercent": 105}),
        )
        .await;

        let yeti = yeti_for(&mock_server);
        yeti.fetch_state().await.unwrap();

        assert_eq!(
            serde_json::to_value(yeti.state()).unwrap(),
            json!({"thingName": "yeti123", "socPercent": 100})
        );
    }

    #[tokio::test]
    async fn fetch_state_keeps_in_range_percent() {
        let mock_server = MockServer::start().await;
        mount_state(
            &mock_server,
            json!({"thingName": "yeti123", "socPercent": 64, "wattsOut": 12}),
        )
        .await;

        let yeti = yeti_for(&mock_server);
        yeti.fetch_state().await.unwrap();

        let state = yeti.state();
        assert_eq!(state.soc_percent(), Some(64.0));
        assert_eq!(state.watts_out(), Some(12.0));
    }

    #[tokio::test]
    async fn fetch_state_with_text_percent_is_connect_error() {
        let mock_server = MockServer::start().await;
        mount_state(&mock_server, json!({"thingName": "y", "socPercent": "105"})).await;

        let yeti = yeti_for(&mock_server);
        let err = yeti.fetch_state().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Connect {
                source: ConnectSource::InvalidSocPercent(_)
            }
        ));
        assert!(yeti.state().is_empty());
        assert!(!yeti.gate().is_busy());
    }

    #[tokio::test]
    async fn fetch_state_without_thing_name_is_invalid_host() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thingName": "yeti123", "socPercent": 50})),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.fetch_state().await.unwrap();
        let before = yeti.state();

        let err = yeti.fetch_state().await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidHost {
                endpoint: "/state",
                missing_key: "thingName"
            }
        ));
        assert_eq!(yeti.state(), before);
    }

    #[tokio::test]
    async fn fetch_sysinfo_accepts_any_object() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sysinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"model": "Yeti 1400"})))
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.fetch_sysinfo().await.unwrap();

        assert_eq!(yeti.sysinfo().model(), Some("Yeti 1400"));
        assert_eq!(yeti.sysinfo().name(), None);
    }

    #[tokio::test]
    async fn sysinfo_and_state_are_isolated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sysinfo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "yeti123", "socPercent": 250})),
            )
            .mount(&mock_server)
            .await;
        mount_state(
            &mock_server,
            json!({"thingName": "yeti123", "socPercent": 80}),
        )
        .await;

        let yeti = yeti_for(&mock_server);

        yeti.fetch_sysinfo().await.unwrap();
        assert!(yeti.state().is_empty());

        yeti.fetch_state().await.unwrap();
        assert_eq!(yeti.sysinfo().get("socPercent"), Some(&json!(250)));
        assert_eq!(yeti.state().soc_percent(), Some(80.0));
    }

    #[tokio::test]
    async fn init_connect_fetches_sysinfo_then_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sysinfo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "yeti123", "macAddress": "a4cf12aabbcc"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thingName": "yeti123", "socPercent": 99})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let yeti = Yeti::builder(mock_server.address().to_string())
            .build()
            .await
            .unwrap();

        assert_eq!(yeti.sysinfo().mac_address(), Some("a4cf12aabbcc"));
        assert_eq!(yeti.state().thing_name(), Some("yeti123"));

        let paths: Vec<String> = mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(paths, ["/sysinfo", "/state"]);
    }

    #[tokio::test]
    async fn init_connect_keeps_sysinfo_when_state_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sysinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "printer"})))
            .mount(&mock_server)
            .await;
        mount_state(&mock_server, json!({"paper": "A4"})).await;

        let yeti = yeti_for(&mock_server);
        let err = yeti.init_connect().await.unwrap_err();

        assert!(err.is_invalid_host());
        assert_eq!(yeti.sysinfo().name(), Some("printer"));
        assert!(yeti.state().is_empty());
    }

    #[tokio::test]
    async fn fetch_log_level_requires_app_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/loglevel"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"app": 2, "mongoose": 1})),
            )
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.fetch_log_level().await.unwrap();

        assert_eq!(yeti.state().get("app"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn get_endpoints_hit_expected_paths() {
        let mock_server = MockServer::start().await;

        for endpoint in ["/wifi", "/rpc/Sys.Reboot", "/factory-reset"] {
            Mock::given(method("GET"))
                .and(path(endpoint))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"thingName": "yeti123", "path": endpoint})),
                )
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let yeti = yeti_for(&mock_server);

        yeti.wifi().await.unwrap();
        assert_eq!(yeti.state().get("path"), Some(&json!("/wifi")));

        yeti.reboot().await.unwrap();
        assert_eq!(yeti.state().get("path"), Some(&json!("/rpc/Sys.Reboot")));

        yeti.factory_reset().await.unwrap();
        assert_eq!(yeti.state().get("path"), Some(&json!("/factory-reset")));
    }

    #[tokio::test]
    async fn get_sends_no_app_headers() {
        let mock_server = MockServer::start().await;
        mount_state(&mock_server, json!({"thingName": "yeti123"})).await;

        let yeti = yeti_for(&mock_server);
        yeti.fetch_state().await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("user-agent").is_none());
        assert!(requests[0].headers.get("cache-control").is_none());
    }
}

// ============================================================================
// Settings and network operations
// ============================================================================

mod posts {
    use super::*;

    #[tokio::test]
    async fn set_password_wraps_value() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/password-set"))
            .and(body_json(json!({"new_password": "hunter2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.set_password("hunter2").await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].body, br#"{"new_password":"hunter2"}"#);
        assert_eq!(yeti.state().get("status"), Some(&json!("ok")));
    }

    #[tokio::test]
    async fn post_sends_yeti_app_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/state"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", YETI_APP_USER_AGENT))
            .and(header("accept", "application/json"))
            .and(header("accept-language", "en-us"))
            .and(header("cache-control", "no-cache"))
            .and(body_json(json!({"acPortStatus": 1})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thingName": "yeti123", "acPortStatus": 1})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.update_state(&json!({"acPortStatus": 1})).await.unwrap();

        assert_eq!(yeti.state().output(Output::Ac), Some(PowerState::On));
    }

    #[tokio::test]
    async fn post_response_is_clamped_but_not_validated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"socPercent": 103})))
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.update_state(&json!({"backlight": 0})).await.unwrap();

        assert_eq!(
            serde_json::to_value(yeti.state()).unwrap(),
            json!({"socPercent": 100})
        );
    }

    #[tokio::test]
    async fn set_output_posts_port_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/state"))
            .and(body_json(json!({"v12PortStatus": 0})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thingName": "yeti123", "v12PortStatus": 0})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.set_output(Output::V12, PowerState::Off).await.unwrap();

        assert_eq!(yeti.state().output(Output::V12), Some(PowerState::Off));
    }

    #[tokio::test]
    async fn set_backlight_posts_flag() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/state"))
            .and(body_json(json!({"backlight": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"backlight": 1})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.set_backlight(PowerState::On).await.unwrap();

        assert_eq!(yeti.state().backlight(), Some(PowerState::On));
    }

    #[tokio::test]
    async fn payloadless_posts_send_empty_object() {
        let mock_server = MockServer::start().await;

        for endpoint in ["/join-direct", "/start-pair"] {
            Mock::given(method("POST"))
                .and(path(endpoint))
                .and(body_json(json!({})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let yeti = yeti_for(&mock_server);
        yeti.join_direct().await.unwrap();
        yeti.start_pair().await.unwrap();
    }

    #[tokio::test]
    async fn join_and_log_level_forward_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/join"))
            .and(body_json(json!({"wifi": "home", "pass": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"joined": true})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/loglevel"))
            .and(body_json(json!({"app": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"app": 3})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);

        yeti.join(&json!({"wifi": "home", "pass": "pw"})).await.unwrap();
        assert_eq!(yeti.state().get("joined"), Some(&json!(true)));

        yeti.update_log_level(&json!({"app": 3})).await.unwrap();
        assert_eq!(yeti.state().get("app"), Some(&json!(3)));
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn timeout_is_connect_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thingName": "yeti123"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let yeti = Yeti::builder(mock_server.address().to_string())
            .with_timeout(Duration::from_millis(100))
            .build_without_probe()
            .unwrap();

        let err = yeti.fetch_state().await.unwrap_err();
        assert!(err.is_connect());
        assert!(yeti.state().is_empty());
    }

    #[tokio::test]
    async fn non_json_body_is_connect_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sysinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        let err = yeti.fetch_sysinfo().await.unwrap_err();

        assert!(err.is_connect());
        assert!(yeti.sysinfo().is_empty());
    }

    #[tokio::test]
    async fn non_object_json_is_connect_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        let err = yeti.update_state(&json!({})).await.unwrap_err();

        assert!(err.is_connect());
    }

    #[tokio::test]
    async fn error_status_with_json_body_is_stored() {
        let mock_server = MockServer::start().await;
        mount_state(&mock_server, json!({"thingName": "yeti123"})).await;
        Mock::given(method("POST"))
            .and(path("/start-pair"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "busy"})))
            .mount(&mock_server)
            .await;

        let yeti = yeti_for(&mock_server);
        yeti.start_pair().await.unwrap();

        assert_eq!(yeti.state().get("error"), Some(&json!("busy")));
    }
}

// ============================================================================
// Request serialization
// ============================================================================

mod serialization {
    use super::*;

    #[tokio::test]
    async fn shared_gate_serializes_sessions() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thingName": "yeti123"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&mock_server)
            .await;

        let gate = RequestGate::new();
        let host = mock_server.address().to_string();
        let first = Yeti::builder(&host).with_gate(gate.clone()).build_without_probe().unwrap();
        let second = Yeti::builder(&host).with_gate(gate).build_without_probe().unwrap();

        let started = Instant::now();
        let (a, b) = tokio::join!(first.fetch_state(), second.fetch_state());
        a.unwrap();
        b.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn manager_sessions_share_one_gate() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/state"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"thingName": "yeti123"}))
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&mock_server)
            .await;

        let manager = DeviceManager::new().unwrap();
        let yeti = manager.add_device(&mock_server.address().to_string()).unwrap();

        let started = Instant::now();
        let (a, b, c) = tokio::join!(yeti.fetch_state(), yeti.fetch_state(), yeti.fetch_state());
        a.unwrap();
        b.unwrap();
        c.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(450));
        assert!(!manager.gate().is_busy());
    }
}
