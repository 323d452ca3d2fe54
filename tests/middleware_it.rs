#![cfg(feature = "middleware")]

// crates.io
use reqwest::header;
use serde_json::json;
use wiremock::{
	Mock, MockServer, ResponseTemplate,
	matchers::{header as header_eq, method, path},
};
// self
use auto_bearer::{config::TokenOptions, manager::TokenManager, middleware::BearerAuth};

fn client(server: &MockServer) -> reqwest_middleware::ClientWithMiddleware {
	let options = TokenOptions::new(
		format!("{}/token", server.uri()).parse().expect("Mock server URI should parse."),
		"client",
		"secret",
	);

	reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
		.with(BearerAuth::new(TokenManager::new(options)))
		.build()
}

#[tokio::test]
async fn bearer_header_is_injected_on_demand() {
	let server = MockServer::start().await;
	let _grant = Mock::given(method("POST"))
		.and(path("/token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"access_token": "a1",
			"expires_in": 3_600
		})))
		.expect(1)
		.mount_as_scoped(&server)
		.await;
	let _api = Mock::given(method("GET"))
		.and(path("/api/resource"))
		.and(header_eq("authorization", "Bearer a1"))
		.respond_with(ResponseTemplate::new(200))
		.expect(2)
		.mount_as_scoped(&server)
		.await;
	let client = client(&server);

	// Two requests, one token acquisition.
	for _ in 0..2 {
		let response = client
			.get(format!("{}/api/resource", server.uri()))
			.send()
			.await
			.expect("Request should succeed.");

		assert_eq!(response.status(), 200);
	}
}

#[tokio::test]
async fn caller_supplied_authorization_is_preserved() {
	let server = MockServer::start().await;
	let _grant = Mock::given(method("POST"))
		.and(path("/token"))
		.respond_with(ResponseTemplate::new(500))
		.expect(0)
		.mount_as_scoped(&server)
		.await;
	let _api = Mock::given(method("GET"))
		.and(path("/api/resource"))
		.and(header_eq("authorization", "Bearer caller-supplied"))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount_as_scoped(&server)
		.await;
	let response = client(&server)
		.get(format!("{}/api/resource", server.uri()))
		.header(header::AUTHORIZATION, "Bearer caller-supplied")
		.send()
		.await
		.expect("Request should succeed.");

	assert_eq!(response.status(), 200);
}
