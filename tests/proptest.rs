use std::sync::Arc;

use axum_test::TestServer;
use proptest::prelude::*;
use serde_json::{Value, json};

use sectorguide::{
    AppState, Collection, DocumentStore, InMemoryDocumentStore, Record, SearchResponse,
    StoreSettings, Tool, ValidationError, create_router, seed_tools,
};

/// Test infrastructure for property testing the sectorguide API
pub struct ApiTestServer {
    pub server: TestServer,
    pub data_store: Arc<InMemoryDocumentStore>,
}

impl Default for ApiTestServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiTestServer {
    /// Create a new test server with a fresh in-memory data store
    pub fn new() -> Self {
        let data_store = Arc::new(InMemoryDocumentStore::new());
        let state = AppState::with_store(data_store.clone(), StoreSettings::default());
        let server = TestServer::new(create_router(state)).unwrap();
        Self { server, data_store }
    }
}

/// Property test strategies for generating test data
pub mod strategies {
    use super::*;
    use proptest::collection::vec;
    use proptest::option;
    use proptest::string::string_regex;

    /// Strategy for non-empty single-line text
    pub fn text_strategy() -> impl Strategy<Value = String> {
        string_regex(r"[A-Za-z0-9][A-Za-z0-9 .,-]{0,31}").unwrap()
    }

    /// Strategy for http(s) URLs with a host
    pub fn website_strategy() -> impl Strategy<Value = String> {
        (
            prop_oneof![Just("http"), Just("https")],
            string_regex(r"[a-z][a-z0-9]{0,15}\.(com|io|ai)").unwrap(),
            string_regex(r"(/[a-z0-9]{1,8}){0,2}").unwrap(),
        )
            .prop_map(|(scheme, host, path)| format!("{}://{}{}", scheme, host, path))
    }

    /// Strategy for tool JSON with every constraint satisfied
    pub fn valid_tool_strategy() -> impl Strategy<Value = Value> {
        (
            text_strategy(),
            string_regex(r"[a-z][a-z-]{0,15}").unwrap(),
            text_strategy(),
            vec(text_strategy(), 0..4),
            option::of(website_strategy()),
            option::of(0.0f64..=5.0),
        )
            .prop_map(|(name, sector_slug, summary, strengths, website, rating)| {
                json!({
                    "name": name,
                    "sector_slug": sector_slug,
                    "summary": summary,
                    "strengths": strengths,
                    "website": website,
                    "rating": rating,
                })
            })
    }

    /// Strategy for finite ratings outside `[0, 5]`
    pub fn out_of_range_rating_strategy() -> impl Strategy<Value = f64> {
        prop_oneof![-1.0e9f64..-0.0001, 5.0001f64..1.0e9]
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn valid_tools_construct(value in strategies::valid_tool_strategy()) {
        let tool = Tool::from_value(value.clone());
        prop_assert!(tool.is_ok(), "{:?} rejected: {:?}", value, tool);
        let tool = tool.unwrap();
        if let Some(rating) = tool.rating {
            prop_assert!((0.0..=5.0).contains(&rating));
        }
    }

    #[test]
    fn out_of_range_rating_always_fails(
        value in strategies::valid_tool_strategy(),
        rating in strategies::out_of_range_rating_strategy(),
    ) {
        let mut value = value;
        value["rating"] = json!(rating);
        let err = Tool::from_value(value).unwrap_err();
        prop_assert_eq!(err.field_path(), Some("rating".to_string()));
        let bound_violation = matches!(
            err.root_cause(),
            ValidationError::BelowMinimum { .. } | ValidationError::AboveMaximum { .. }
        );
        prop_assert!(bound_violation);
    }

    #[test]
    fn website_without_scheme_fails(
        value in strategies::valid_tool_strategy(),
        host in "[a-z]{1,12}\\.com",
    ) {
        let mut value = value;
        value["website"] = json!(host);
        let err = Tool::from_value(value).unwrap_err();
        prop_assert_eq!(err.field_path(), Some("website".to_string()));
    }

    #[test]
    fn accepted_websites_are_well_formed(value in strategies::valid_tool_strategy()) {
        let tool = Tool::from_value(value).unwrap();
        if let Some(website) = tool.website {
            prop_assert!(sectorguide::is_http_url(&website), "{}", website);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    #[test]
    fn search_finds_every_seeded_name_by_any_case(index in 0usize..10, upper in any::<bool>()) {
        let tools = seed_tools().unwrap();
        let name = tools[index].name.clone();
        let query = if upper { name.to_uppercase() } else { name.to_lowercase() };

        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let api = ApiTestServer::new();
            api.server.post("/seed").await.assert_status_ok();
            let response: SearchResponse = api
                .server
                .post("/search")
                .json(&json!({"q": query}))
                .await
                .json();
            assert!(
                response.results.iter().any(|t| t.name == name),
                "{} not found by {:?}",
                name,
                query
            );
        });
    }

    #[test]
    fn search_results_contain_the_query(query in "[a-zA-Z ]{1,6}") {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let api = ApiTestServer::new();
            api.server.post("/seed").await.assert_status_ok();
            let response: SearchResponse = api
                .server
                .post("/search")
                .json(&json!({"q": query}))
                .await
                .json();
            let needle = query.to_lowercase();
            for tool in response.results {
                let haystacks = [&tool.name, &tool.summary, &tool.sector_slug];
                assert!(
                    haystacks.iter().any(|h| h.to_lowercase().contains(&needle)),
                    "{:?} does not contain {:?}",
                    tool,
                    query
                );
            }
        });
    }

    #[test]
    fn repeated_seeding_is_idempotent(times in 1usize..4) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let api = ApiTestServer::new();
            for _ in 0..times {
                api.server.post("/seed").await.assert_status_ok();
            }
            let tools = api.data_store.find_all(Collection::Tool).await.unwrap();
            assert_eq!(tools.len(), 10);
            for doc in tools {
                let tool = Tool::from_value(doc.body).unwrap();
                assert!(tool.rating.is_some());
            }
        });
    }
}
