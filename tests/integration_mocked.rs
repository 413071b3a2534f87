/// Integration tests with a mocked citizen backend
/// Tests backend-mode dispatch without hitting real external services
use rust_citizen_api::config::{ConfigPatch, ConfigStore, EndpointsPatch};
use rust_citizen_api::errors::CitizenError;
use rust_citizen_api::models::{CitizenPayload, CreateCitizenParams, IndexParams, SearchParams};
use rust_citizen_api::service::CitizenService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create a service pointed at `base_url`
fn create_test_service(base_url: &str, endpoints: EndpointsPatch) -> CitizenService {
    let store = ConfigStore::default();
    store.set(ConfigPatch {
        api_base_url: Some(base_url.to_string()),
        endpoints: Some(endpoints),
    });
    CitizenService::new(store)
        .unwrap()
        .with_mock_delay(Duration::ZERO)
}

fn index_endpoint(path: &str) -> EndpointsPatch {
    EndpointsPatch {
        index: Some(path.to_string()),
        ..Default::default()
    }
}

/// Counts ERROR events emitted by this crate.
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == tracing::Level::ERROR && meta.target().starts_with("rust_citizen_api")
        {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn test_index_calls_backend_with_params() {
    let mock_server = MockServer::start().await;

    let mock_response = serde_json::json!({
        "data": [
            {"id": "1", "name": "João Silva", "cpf": "12345678900"},
            {"id": "2", "name": "Maria Santos", "cpf": "98765432100"}
        ],
        "meta": {"current_page": 1, "per_page": 10, "total": 2, "last_page": 1}
    });

    Mock::given(method("GET"))
        .and(path("/citizens"))
        .and(query_param("page", "1"))
        .and(query_param("perPage", "10"))
        .and(query_param("searchString", "João"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&mock_response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server.uri(), index_endpoint("/citizens"));
    let result = service
        .index(&IndexParams::new(1, 10).with_search("João"))
        .await
        .unwrap();

    assert_eq!(result, CitizenPayload::Remote(mock_response));
}

#[tokio::test]
async fn test_index_sends_fields_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/citizens"))
        .and(query_param("fields[]", "name"))
        .and(query_param("fields[]", "cpf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server.uri(), index_endpoint("/citizens"));
    let result = service
        .index(&IndexParams::new(1, 10).with_fields(["name", "cpf"]))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_index_uses_mock_when_base_url_empty() {
    let service = create_test_service("", index_endpoint("/citizens"));
    let result = service.index(&IndexParams::new(1, 10)).await.unwrap();

    let page = result.into_mock().expect("mock page");
    assert_eq!(page.meta.total, 150);
    assert_eq!(page.data.len(), 10);
    assert_eq!(page.meta.last_page, 15);
}

#[tokio::test]
async fn test_index_uses_mock_when_endpoint_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server.uri(), index_endpoint(""));
    let result = service.index(&IndexParams::new(1, 10)).await.unwrap();

    assert!(!result.is_remote());
}

#[tokio::test]
async fn test_backend_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/citizens"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server.uri(), index_endpoint("/citizens"));
    let err = service.index(&IndexParams::new(1, 10)).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error fetching citizens: Request failed with status code 500"
    );
}

#[tokio::test]
async fn test_backend_unreachable() {
    // Nothing listens on port 1
    let service = create_test_service("http://127.0.0.1:1", index_endpoint("/citizens"));
    let err = service.index(&IndexParams::new(1, 10)).await.unwrap_err();

    match &err {
        CitizenError::Transport { message, .. } => {
            assert_ne!(message, "Unknown error");
        }
        other => panic!("Expected transport error, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Error fetching citizens: "));
}

#[tokio::test]
async fn test_backend_non_json_body_passes_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/citizens"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server.uri(), index_endpoint("/citizens"));
    let body = service
        .index(&IndexParams::new(1, 10))
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(body, serde_json::json!("plain ok"));
}

#[tokio::test]
async fn test_backend_empty_created_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/citizens"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(
        &mock_server.uri(),
        EndpointsPatch {
            create: Some("/citizens".to_string()),
            ..Default::default()
        },
    );
    let params = CreateCitizenParams {
        name: "Ana Costa".to_string(),
        cpf: "52998224725".to_string(),
        cns: String::new(),
        gender: "F".to_string(),
        birth_date: "1985-02-01".to_string(),
    };

    let result = service.create(&params).await.unwrap();
    assert!(result.is_remote());
    assert_eq!(result.into_value().unwrap(), serde_json::Value::Null);
}

#[tokio::test]
async fn test_transport_failure_logged_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
    let _guard = tracing::subscriber::set_default(subscriber);

    let service = create_test_service(&mock_server.uri(), index_endpoint("/citizens"));
    let result = service.index(&IndexParams::new(1, 10)).await;

    assert!(result.is_err());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_calls_backend() {
    let mock_server = MockServer::start().await;

    let mock_citizens = serde_json::json!([
        {"id": "1", "name": "João Silva", "cpf": "123.456.789-00", "cns": "123456789012345"}
    ]);

    Mock::given(method("GET"))
        .and(path("/api/citizens"))
        .and(query_param("searchString", "João"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&mock_citizens))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(
        &mock_server.uri(),
        EndpointsPatch {
            search: Some("/api/citizens".to_string()),
            ..Default::default()
        },
    );
    let result = service.search(&SearchParams::new("João")).await.unwrap();

    assert_eq!(result, CitizenPayload::Remote(mock_citizens));
}

#[tokio::test]
async fn test_search_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/citizens"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let service = create_test_service(
        &mock_server.uri(),
        EndpointsPatch {
            search: Some("/api/citizens".to_string()),
            ..Default::default()
        },
    );
    let err = service.search(&SearchParams::new("João")).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error fetching citizens: Request failed with status code 404"
    );
}

#[tokio::test]
async fn test_create_posts_wrapped_params() {
    let mock_server = MockServer::start().await;

    let params = CreateCitizenParams {
        name: "Ana Costa".to_string(),
        cpf: "52998224725".to_string(),
        cns: "123456789012345".to_string(),
        gender: "F".to_string(),
        birth_date: "1985-02-01".to_string(),
    };
    let created = serde_json::json!({"citizen": {"id": "42", "name": "Ana Costa"}});

    Mock::given(method("POST"))
        .and(path("/citizens"))
        .and(body_json(serde_json::json!({ "params": &params })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = create_test_service(
        &mock_server.uri(),
        EndpointsPatch {
            create: Some("/citizens".to_string()),
            ..Default::default()
        },
    );
    let result = service.create(&params).await.unwrap();

    assert_eq!(result, CitizenPayload::Remote(created));
}

#[tokio::test]
async fn test_create_error_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&mock_server)
        .await;

    let service = create_test_service(
        &mock_server.uri(),
        EndpointsPatch {
            create: Some("/citizens".to_string()),
            ..Default::default()
        },
    );
    let err = service
        .create(&CreateCitizenParams::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error creating citizen: Request failed with status code 422"
    );
}

#[tokio::test]
async fn test_mode_follows_config_changes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/citizens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = ConfigStore::default();
    let service = CitizenService::new(store.clone())
        .unwrap()
        .with_mock_delay(Duration::ZERO);

    let first = service.index(&IndexParams::new(1, 10)).await.unwrap();
    assert!(!first.is_remote());

    store.set(ConfigPatch {
        api_base_url: Some(mock_server.uri()),
        endpoints: None,
    });
    assert_eq!(service.config().get().api_base_url, mock_server.uri());
    let second = service.index(&IndexParams::new(1, 10)).await.unwrap();
    assert!(second.is_remote());
}

#[tokio::test]
async fn test_concurrent_api_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(10)
        .mount(&mock_server)
        .await;

    let service = create_test_service(&mock_server.uri(), index_endpoint("/citizens"));

    let mut handles = vec![];
    for i in 1..=10 {
        let service = service.clone();
        let handle =
            tokio::spawn(async move { service.index(&IndexParams::new(i, 10)).await });
        handles.push(handle);
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }
}
