mod common;

use std::sync::Arc;

use itihas::cache::ResultCache;
use itihas::registry::Registry;
use itihas::{EmptyReason, Explorer, Lookup};
use chrono::{Datelike, Local};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    bindings, event_row, extract_page, literal, thumbnail_page, wikidata_client,
    wikipedia_client, SparqlContains,
};

fn explorer(server: &MockServer) -> Explorer {
    let cache = Arc::new(ResultCache::default());
    Explorer::new(
        Registry::default(),
        wikidata_client(server, cache.clone()),
        wikipedia_client(server, 150, cache),
    )
}

async fn mount_karnataka(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(SparqlContains("BIND(wd:Q3349636 AS ?item)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bindings(vec![json!({
            "label": literal("Krishnadevaraya"),
            "article": {"type": "uri", "value": "https://en.wikipedia.org/wiki/Krishnadevaraya"}
        })])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(SparqlContains("BIND(wd:Q34998 AS ?item)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bindings(vec![json!({
            "label": literal("Hampi"),
            "description": literal("UNESCO World Heritage Site in Karnataka")
        })])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(SparqlContains("FILTER(MONTH(?date) = 1 && DAY(?date) = 23)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bindings(vec![event_row(
            "Battle of Talikota",
            None,
            "1565-01-23T00:00:00Z",
        )])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/en/w/api.php"))
        .and(query_param("prop", "extracts"))
        .and(query_param("titles", "Krishnadevaraya"))
        .respond_with(ResponseTemplate::new(200).set_body_json(extract_page(
            "Krishnadevaraya",
            "Krishnadevaraya was an emperor of the Vijayanagara Empire who reigned from 1509 to 1529.",
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/en/w/api.php"))
        .and(query_param("prop", "pageimages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thumbnail_page(
            "Krishnadevaraya",
            "https://upload.wikimedia.org/krishnadevaraya.jpg",
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_karnataka_dashboard() {
    let server = MockServer::start().await;
    mount_karnataka(&server).await;

    let explorer = explorer(&server);
    let selection = explorer.select(Some("English"), Some("Karnataka")).unwrap();
    assert_eq!(selection.region.region_id.as_str(), "Q1185");

    let dashboard = explorer.dashboard(&selection, 1, 23).await;

    let figure = dashboard.featured_figure.details.found().unwrap();
    assert_eq!(figure.label, "Krishnadevaraya");
    assert_eq!(figure.page_title, "Krishnadevaraya");
    let article = dashboard
        .featured_figure
        .article
        .as_ref()
        .and_then(|a| a.found())
        .unwrap();
    assert!(article.summary.starts_with("Krishnadevaraya was an emperor"));
    assert!(!article.truncated);
    assert_eq!(
        article.image_url.as_deref(),
        Some("https://upload.wikimedia.org/krishnadevaraya.jpg")
    );

    let monument = dashboard.featured_monument.details.found().unwrap();
    assert_eq!(monument.label, "Hampi");
    assert_eq!(
        dashboard.featured_monument.article,
        Some(Lookup::Empty(EmptyReason::NoArticle))
    );

    let events = dashboard.on_this_day.found().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].year, 1565);
}

#[tokio::test]
async fn test_dashboard_with_service_down_still_renders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let explorer = explorer(&server);
    let selection = explorer.select(Some("kn"), Some("West Bengal")).unwrap();
    let dashboard = explorer.dashboard(&selection, 8, 15).await;

    assert!(dashboard.featured_figure.details.is_unavailable());
    assert_eq!(dashboard.featured_figure.article, None);
    assert!(dashboard.featured_monument.details.is_unavailable());
    assert!(dashboard.on_this_day.is_unavailable());
}

#[tokio::test]
async fn test_timeline_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(SparqlContains("?event wdt:P131 wd:Q1445 ."))
        .respond_with(ResponseTemplate::new(200).set_body_json(bindings(vec![
            event_row("Battle of Takkolam", None, "0949-01-01T00:00:00Z"),
            event_row("Battle of Venni", None, "0130-01-01T00:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let explorer = explorer(&server);
    let selection = explorer.select(Some("Tamil"), Some("tamil nadu")).unwrap();
    assert_eq!(selection.language.code.as_str(), "ta");

    let timeline = explorer.timeline(&selection).await;
    let events = timeline.events.found().unwrap();
    assert_eq!(events[0].label, "Battle of Venni");
    assert_eq!(events[1].formatted_date(), "0949-01-01");
}

#[tokio::test]
async fn test_unknown_selection_is_an_error() {
    let server = MockServer::start().await;
    let explorer = explorer(&server);

    assert!(explorer.select(Some("English"), Some("Atlantis")).is_err());
    assert!(explorer.select(Some("Latin"), Some("Karnataka")).is_err());

    let defaults = explorer.select(None, None).unwrap();
    assert_eq!(defaults.language.code.as_str(), "en");
    assert_eq!(defaults.region.name, "Karnataka");
}

#[tokio::test]
async fn test_dashboard_serializes_to_json() {
    let server = MockServer::start().await;
    mount_karnataka(&server).await;

    let explorer = explorer(&server);
    let selection = explorer.select(None, None).unwrap();
    let dashboard = explorer.dashboard(&selection, 1, 23).await;

    let value = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(value["featured_figure"]["details"]["status"], "found");
    assert_eq!(
        value["featured_figure"]["details"]["value"]["label"],
        "Krishnadevaraya"
    );
    assert_eq!(value["featured_monument"]["article"]["status"], "empty");
    assert_eq!(value["selection"]["region"]["region_id"], "Q1185");
}

#[tokio::test]
async fn test_dashboard_today_uses_local_date() {
    let server = MockServer::start().await;
    let today = Local::now().date_naive();
    let date_filter = format!(
        "FILTER(MONTH(?date) = {} && DAY(?date) = {})",
        today.month(),
        today.day()
    );
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(SparqlContains(date_filter))
        .respond_with(ResponseTemplate::new(200).set_body_json(bindings(vec![event_row(
            "Karnataka Rajyotsava",
            None,
            "1956-11-01T00:00:00Z",
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bindings(vec![])))
        .mount(&server)
        .await;

    let explorer = explorer(&server);
    let selection = explorer.select(None, Some("Karnataka")).unwrap();
    let dashboard = explorer.dashboard_today(&selection).await;

    assert_eq!((dashboard.month, dashboard.day), (today.month(), today.day()));
    assert_eq!(dashboard.on_this_day.found().unwrap()[0].year, 1956);
    assert_eq!(
        dashboard.featured_figure.details,
        Lookup::Empty(EmptyReason::NoMatch)
    );
}
