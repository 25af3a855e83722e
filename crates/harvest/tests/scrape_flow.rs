// ABOUTME: End-to-end tests of fetch + extraction + export through the public API.
// ABOUTME: Uses httpmock upstreams to check record shapes, inline errors and CSV output.

use std::time::Duration;

use digests_harvest::{flatten, to_csv, Client, ContentValue, SelectorRules, DEFAULT_TABLE_SELECTOR};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;

const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head><title> Field Notes </title></head>
<body>
  <h1>Field Notes</h1>
  <h2>Spring</h2>
  <p>Buds appeared.</p>
  <a href="/archive">Archive</a>
  <img src="img/cover.jpg" alt="Cover">
  <table>
    <tr><th>Day</th><th>Temp</th></tr>
    <tr><td>Mon</td><td>12</td></tr>
    <tr><td>Tue</td><td>14</td></tr>
  </table>
</body>
</html>"#;

fn client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client")
}

#[tokio::test]
async fn basic_scrape_then_export() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/notes/spring");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(ARTICLE);
    });

    let url = server.url("/notes/spring");
    let outcome = client().scrape(&url, None).await;
    let page = outcome.as_page().expect("page record");

    assert_eq!(page.title, "Field Notes");
    assert_eq!(
        page.content["links"],
        vec![ContentValue::Link {
            text: "Archive".into(),
            href: server.url("/archive"),
        }]
    );
    assert_eq!(
        page.content["images"],
        vec![ContentValue::Image {
            alt: "Cover".into(),
            src: server.url("/notes/img/cover.jpg"),
        }]
    );

    let rows = flatten(std::slice::from_ref(&outcome)).unwrap();
    let csv = to_csv(&rows);
    let header = csv.lines().next().unwrap();
    assert_eq!(header, "url,title,scraped_at,headings,paragraphs,links,images");
    assert!(csv.contains("Field Notes; Spring"));
}

#[tokio::test]
async fn selector_rules_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/notes");
        then.status(200).body(ARTICLE);
    });

    let mut rules = SelectorRules::new();
    rules.insert("cells".into(), "td".into());
    rules.insert("quotes".into(), "blockquote".into());

    let page = client()
        .try_scrape(&server.url("/notes"), Some(&rules))
        .await
        .expect("scrape");

    let cells: Vec<_> = page.content["cells"]
        .iter()
        .filter_map(|v| v.as_text())
        .collect();
    assert_eq!(cells, vec!["Mon", "12", "Tue", "14"]);
    assert!(page.content["quotes"].is_empty());
}

#[tokio::test]
async fn tables_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/notes");
        then.status(200).body(ARTICLE);
    });

    let outcome = client()
        .scrape_tables(&server.url("/notes"), DEFAULT_TABLE_SELECTOR)
        .await;
    let scrape = outcome.as_tables().expect("tables");
    assert_eq!(scrape.tables.len(), 1);
    assert_eq!(scrape.tables[0].headers, vec!["Day", "Temp"]);
    assert_eq!(scrape.tables[0].data, vec![vec!["Mon", "12"], vec!["Tue", "14"]]);
    assert_eq!(scrape.tables[0].total_rows, 3);
}

#[tokio::test]
async fn unreachable_host_is_inline_error() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let url = "http://127.0.0.1:9/nothing";
    let outcome = client().scrape(url, None).await;
    assert!(outcome.is_error());
    assert_eq!(outcome.url(), url);

    let value = serde_json::to_value(&outcome).unwrap();
    assert!(value["error"].is_string());
    assert_eq!(value["url"], url);
}
