// crates.io
use serde_json::json;
use time::{Duration, macros};
use wiremock::{
	Mock, MockServer, Request, ResponseTemplate,
	matchers::{body_string_contains, method, path},
};
// self
use auto_bearer::{clock::ManualClock, config::TokenOptions, manager::TokenManager};

const START: time::OffsetDateTime = macros::datetime!(2025-01-01 00:00 UTC);

struct LacksField(&'static str);
impl wiremock::Match for LacksField {
	fn matches(&self, request: &Request) -> bool {
		!String::from_utf8_lossy(&request.body).contains(self.0)
	}
}

fn options(server: &MockServer) -> TokenOptions {
	TokenOptions::new(
		format!("{}/token", server.uri()).parse().expect("Mock server URI should parse."),
		"client",
		"secret",
	)
	.with_expiry_buffer(Duration::ZERO)
}

fn issued(access_token: &str, expires_in: i64) -> serde_json::Value {
	json!({
		"access_token": access_token,
		"expires_in": expires_in,
		"refresh_token": "r1",
		"refresh_expires_in": 3_600,
		"token_type": "Bearer",
		"not-before-policy": 0,
		"session_state": "s1",
		"scope": "openid"
	})
}

#[tokio::test]
async fn token_is_cached_until_expiry_then_refreshed() {
	let server = MockServer::start().await;
	let _full = Mock::given(method("POST"))
		.and(path("/token"))
		.and(body_string_contains("grant_type=client_credentials"))
		.respond_with(ResponseTemplate::new(200).set_body_json(issued("a1", 60)))
		.expect(1)
		.mount_as_scoped(&server)
		.await;
	let _refresh = Mock::given(method("POST"))
		.and(path("/token"))
		.and(body_string_contains("grant_type=refresh_token"))
		.and(body_string_contains("refresh_token=r1"))
		.respond_with(ResponseTemplate::new(200).set_body_json(issued("a2", 60)))
		.expect(1)
		.mount_as_scoped(&server)
		.await;
	let clock = ManualClock::new(START);
	let manager = TokenManager::new(options(&server)).with_clock(clock.clone());
	let token = manager.token().await.expect("Initial acquisition should succeed.");

	assert_eq!(token.access_token, "a1");
	assert_eq!(token.expires_at, START + Duration::seconds(60));
	assert_eq!(token.refresh_expires_at, START + Duration::seconds(3_600));

	// Well within the lifetime, the cached token is reused without any endpoint call.
	clock.advance(Duration::seconds(30));

	assert_eq!(
		manager.token().await.expect("Cached acquisition should succeed.").access_token,
		"a1"
	);

	// Past the lifetime, the manager renews through the refresh grant.
	clock.advance(Duration::seconds(31));

	let renewed = manager.token().await.expect("Renewal should succeed.");

	assert_eq!(renewed.access_token, "a2");
	assert_eq!(renewed.expires_at, START + Duration::seconds(61 + 60));
}

#[tokio::test]
async fn configured_username_selects_the_password_grant() {
	let server = MockServer::start().await;
	let _password = Mock::given(method("POST"))
		.and(path("/token"))
		.and(body_string_contains("grant_type=password"))
		.and(body_string_contains("username=alice"))
		.and(body_string_contains("password=wonderland"))
		.respond_with(ResponseTemplate::new(200).set_body_json(issued("a1", 60)))
		.expect(1)
		.mount_as_scoped(&server)
		.await;
	let manager = TokenManager::new(
		options(&server).with_username("alice").with_password("wonderland"),
	)
	.with_clock(ManualClock::new(START));

	assert_eq!(
		manager.token().await.expect("Password grant should succeed.").access_token,
		"a1"
	);
}

#[tokio::test]
async fn client_credentials_grant_omits_resource_owner_fields() {
	let server = MockServer::start().await;
	let _full = Mock::given(method("POST"))
		.and(path("/token"))
		.and(body_string_contains("grant_type=client_credentials"))
		.and(body_string_contains("scope=openid"))
		.and(LacksField("username="))
		.and(LacksField("password="))
		.and(LacksField("refresh_token="))
		.respond_with(ResponseTemplate::new(200).set_body_json(issued("a1", 60)))
		.expect(1)
		.mount_as_scoped(&server)
		.await;
	let manager = TokenManager::new(options(&server)).with_clock(ManualClock::new(START));

	manager.token().await.expect("Client credentials grant should succeed.");
}

#[tokio::test]
async fn configured_audience_is_forwarded_on_full_grants() {
	let server = MockServer::start().await;
	let _full = Mock::given(method("POST"))
		.and(path("/token"))
		.and(body_string_contains("grant_type=client_credentials"))
		.and(body_string_contains("audience=analytics"))
		.respond_with(ResponseTemplate::new(200).set_body_json(issued("a1", 60)))
		.expect(1)
		.mount_as_scoped(&server)
		.await;
	let manager = TokenManager::new(options(&server).with_audience("analytics"))
		.with_clock(ManualClock::new(START));

	manager.token().await.expect("Audience-scoped grant should succeed.");
}
