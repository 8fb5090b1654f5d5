//! End-to-end client tests against an in-memory transport.

use chrono::{DateTime, TimeZone, Utc};
use cloudsearch::query::{
    Conjunction, Facet, GroupedCondition, IntCondition, IntFacetConstraints, Order, SearchQuery,
    StringCondition, StringFacetConstraints, StringListCondition,
};
use cloudsearch::{
    search_document, CloudSearch, CloudSearchError, CloudSearchSettings, Result, Transport,
};
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

search_document! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Movie {
        pub title: String,
        pub year: i64,
        pub rating: Option<i64>,
        pub genre: Vec<String>,
        pub released: Option<DateTime<Utc>>,
    }
}

/// Replays canned responses and records every request.
#[derive(Default)]
struct MockTransport {
    responses: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl MockTransport {
    fn replying(responses: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        })
    }

    fn next(&self) -> Result<String> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CloudSearchError::EmptyResponse("no more responses".into())))
    }

    fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push((url.to_string(), None));
        self.next()
    }

    fn post(&self, url: &str, body: &str) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), Some(body.to_string())));
        self.next()
    }
}

fn settings() -> CloudSearchSettings {
    CloudSearchSettings::new("movies", "2011-02-01")
}

fn movie(id: &str, title: &str, year: i64) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        year,
        rating: None,
        genre: vec!["Sci-Fi".to_string()],
        released: None,
    }
}

const SEARCH_RESPONSE: &str = r#"{
    "rank": "-year",
    "match-expr": "(and genre:'Sci-Fi')",
    "hits": {
        "found": 42,
        "start": 0,
        "hit": [
            {"id": "tt0076759", "data": {
                "title": ["Star Wars"],
                "year": ["1977"],
                "rating": ["8"],
                "genre": ["Sci-Fi", "Adventure"],
                "released": ["1977-05-25T00:00:00Z"]
            }},
            {"id": "tt0078748", "data": {
                "title": ["Alien"],
                "year": ["abc"]
            }}
        ]
    },
    "facets": {
        "genre": {"constraints": [{"value": "Sci-Fi", "count": 30}, {"value": "Horror", "count": 12}]},
        "year": {"constraints": [{"value": "1977", "count": 1}]}
    },
    "info": {"rid": "rid-1", "time-ms": 4, "cpu-time-ms": 1}
}"#;

#[test]
fn search_end_to_end() {
    let transport = MockTransport::replying(vec![Ok(SEARCH_RESPONSE.to_string())]);
    let client = CloudSearch::<Movie>::with_transport(settings(), transport.clone());

    let mut genres = StringFacetConstraints::new();
    genres.add_constraint("Sci-Fi");
    genres.add_constraint("Horror");
    let mut years = IntFacetConstraints::new();
    years.add_interval(1970, 1979);

    let query = SearchQuery::<Movie>::new()
        .with_keyword("space")
        .with_condition(GroupedCondition::new(
            StringCondition::new("genre", "Sci-Fi"),
            Conjunction::Or,
            StringCondition::new("genre", "Horror"),
        ))
        .with_facet(Facet::new("genre").with_top_result(5).with_constraint(genres))
        .with_facet(Facet::new("year").with_constraint(years))
        .with_fields(["title", "year"])
        .with_size(2)
        .with_order(Order::descending("year"));

    let result = client.try_search(&query).unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].0,
        "http://search-movies/2011-02-01/search?q=space\
         &bq=(and+(or+genre%3A'Sci-Fi'+genre%3A'Horror'))\
         &facet=genre,year&facet-genre-top-n=5&facet-genre-constraints='Sci-Fi','Horror'\
         &facet-year-constraints=1970..1979\
         &return-fields=title%2Cyear&size=2&start=0&rank=-year"
    );

    assert!(!result.is_error);
    assert_eq!(result.found, 42);
    assert_eq!(result.hits.len(), 2);

    let star_wars = &result.hits[0].data;
    assert_eq!(star_wars.id, "tt0076759");
    assert_eq!(star_wars.title, "Star Wars");
    assert_eq!(star_wars.year, 1977);
    assert_eq!(star_wars.rating, Some(8));
    assert_eq!(star_wars.genre, vec!["Sci-Fi", "Adventure"]);
    assert_eq!(
        star_wars.released,
        Some(Utc.with_ymd_and_hms(1977, 5, 25, 0, 0, 0).unwrap())
    );

    let alien = &result.hits[1].data;
    assert_eq!(alien.title, "Alien");
    assert_eq!(alien.year, 0);
    assert!(alien.genre.is_empty());

    let genre = result.facet("genre").unwrap();
    assert_eq!(genre.len(), 2);
    assert_eq!(genre[1].value, "Horror");
    assert_eq!(genre[1].count, 12);
    assert_eq!(result.info.as_ref().unwrap().rid, "rid-1");
    assert_eq!(result.match_expr.as_deref(), Some("(and genre:'Sci-Fi')"));
}

#[test]
fn persistent_conditions_apply_to_every_search() {
    let transport = MockTransport::replying(vec![
        Ok(r#"{"hits": {"found": 0, "start": 0, "hit": []}}"#.to_string()),
        Ok(r#"{"hits": {"found": 0, "start": 0, "hit": []}}"#.to_string()),
    ]);
    let settings = settings()
        .with_persistent_condition(StringCondition::new("tenant", "acme"))
        .with_persistent_condition(StringListCondition::new("region", ["eu", "us"]));
    let client = CloudSearch::<Movie>::with_transport(settings, transport.clone());

    let query = SearchQuery::<Movie>::new()
        .with_fields(["title"])
        .with_condition(IntCondition::equals("year", 1977));
    client.search(&query);
    client.search(&query);

    let requests = transport.requests();
    let expected = "http://search-movies/2011-02-01/search?\
        bq=(and+tenant%3A'acme')+(and+(or+year%3A1977)+(or+region%3A'eu'+region%3A'us'))\
        &return-fields=title&start=0";
    assert_eq!(requests[0].0, expected);
    assert_eq!(requests[1].0, expected);
    assert_eq!(query.boolean_query.len(), 1);
}

#[test]
fn search_degrades_instead_of_failing() {
    let transport = MockTransport::replying(vec![
        Err(CloudSearchError::EmptyResponse("http://search-movies".into())),
        Ok("not json".to_string()),
        Ok(r#"{"error": "Syntax error in bq"}"#.to_string()),
        Ok(r#"{"hits": {"found": 1, "start": 0, "hit": [{"id": "a", "data": {}}]}, "facets": [1]}"#.to_string()),
    ]);
    let client = CloudSearch::<Movie>::with_transport(settings(), transport);
    let query = SearchQuery::<Movie>::new();

    let transport_failure = client.search(&query);
    assert!(transport_failure.is_error);
    assert!(transport_failure.hits.is_empty());

    let malformed = client.search(&query);
    assert!(malformed.is_error);

    let service_error = client.search(&query);
    assert!(service_error.is_error);
    assert_eq!(service_error.error.as_deref(), Some("Syntax error in bq"));

    let bad_facets = client.search(&query);
    assert!(!bad_facets.is_error);
    assert_eq!(bad_facets.hits[0].id, "a");
    assert!(bad_facets.facets.is_empty());
}

#[test]
fn add_many_splits_into_batches() {
    let ok = || Ok(r#"{"status": "success", "adds": 2, "deletes": 0}"#.to_string());
    let transport = MockTransport::replying(vec![ok(), ok(), ok()]);

    let movies: Vec<Movie> = (0..6)
        .map(|i| movie(&format!("m{}", i), "Some title", 2000 + i))
        .collect();

    // Enough room for two add actions per batch.
    let one = serde_json::to_string(
        &cloudsearch::builder::ActionBuilder::new("en").add_action_with_version(&movies[0], cloudsearch::builder::current_version()),
    )
    .unwrap()
    .len();
    let settings = CloudSearchSettings {
        max_batch_bytes: 2 * one + 3 + 4,
        ..settings()
    };
    let client = CloudSearch::<Movie>::with_transport(settings, transport.clone());

    let result = client.add_many(&movies);

    assert!(!result.is_error);
    assert_eq!(result.adds, 6);

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    for (url, body) in &requests {
        assert_eq!(url, "http://doc-movies/2011-02-01/documents/batch");
        let batch: Vec<serde_json::Value> =
            serde_json::from_str(body.as_deref().unwrap()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0]["type"], "add");
        assert_eq!(batch[0]["lang"], "en");
        assert!(batch[0]["fields"].get("rating").is_none());
    }
}

#[test]
fn delete_and_update() {
    let transport = MockTransport::replying(vec![
        Ok(r#"{"status": "success", "adds": 0, "deletes": 1}"#.to_string()),
        Ok(r#"{"status": "error", "adds": 0, "deletes": 0, "errors": [{"message": "version conflict"}]}"#.to_string()),
        Err(CloudSearchError::EmptyResponse("http://doc-movies".into())),
    ]);
    let client = CloudSearch::<Movie>::with_transport(settings(), transport.clone());

    let deleted = client.delete(&movie("m1", "Alien", 1979));
    assert!(!deleted.is_error);
    assert_eq!(deleted.deletes, 1);

    let rejected = client.update(&movie("m1", "Alien", 1979));
    assert!(rejected.is_error);
    assert_eq!(rejected.errors[0].message, "version conflict");

    let failed = client.delete_many(["m2", "m3"]);
    assert!(failed.is_error);
    assert_eq!(failed.status, "error");

    let requests = transport.requests();
    let delete: serde_json::Value = serde_json::from_str(requests[0].1.as_deref().unwrap()).unwrap();
    assert_eq!(delete[0]["type"], "delete");
    assert_eq!(delete[0]["id"], "m1");
    assert!(delete[0].get("fields").is_none());

    let update: serde_json::Value = serde_json::from_str(requests[1].1.as_deref().unwrap()).unwrap();
    assert_eq!(update[0]["type"], "add");
    assert_eq!(update[0]["fields"]["title"], "Alien");

    let many: serde_json::Value = serde_json::from_str(requests[2].1.as_deref().unwrap()).unwrap();
    assert_eq!(many.as_array().unwrap().len(), 2);
}
