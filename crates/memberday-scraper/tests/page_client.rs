//! Integration tests for `PageClient::scrape`.
//!
//! Uses `wiremock` to serve fixture pages so no real network traffic is made.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use memberday_core::{AreaRecord, StoreRecord};
use memberday_scraper::{HolidayExtractor, PageClient, PartyWorldExtractor, ScraperError};

fn test_client() -> PageClient {
    PageClient::new(5, "memberday-test/0.1").expect("failed to build test PageClient")
}

const HOLIDAY_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="table-responsive component">
    <table>
      <thead><tr><th>North</th><th>日期</th><th>日期</th></tr></thead>
      <tbody>
        <tr><th>Store A</th><td>1、8、15</td><td>22</td></tr>
      </tbody>
    </table>
  </div>
</body></html>"#;

const PARTY_WORLD_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <table class="ps-table ps-table--vendor">
    <thead><tr><th>門市</th><th>2024年</th><th>2025年</th></tr></thead>
    <tbody>
      <tr><td>Shop A</td><td>5、15</td><td>0120</td></tr>
    </tbody>
  </table>
</body></html>"#;

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

#[tokio::test]
async fn scrape_holiday_page_returns_normalized_areas() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/act/member/index.aspx"))
        .respond_with(html_response(HOLIDAY_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/act/member/index.aspx", server.uri());
    let areas = test_client()
        .scrape(&url, &HolidayExtractor)
        .await
        .expect("scrape holiday page");

    assert_eq!(
        areas,
        vec![AreaRecord {
            area: "North".to_string(),
            details: vec![StoreRecord {
                store: "Store A".to_string(),
                member_date: vec!["1 , 8 , 15".to_string(), "22".to_string()],
            }],
        }]
    );
}

#[tokio::test]
async fn scrape_party_world_page_returns_yearly_calendars() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/act/ktv/20200904/"))
        .respond_with(html_response(PARTY_WORLD_PAGE))
        .mount(&server)
        .await;

    let url = format!("{}/act/ktv/20200904/", server.uri());
    let yearly = test_client()
        .scrape(&url, &PartyWorldExtractor)
        .await
        .expect("scrape party world page");

    let json = serde_json::to_value(&yearly).expect("serialize");
    let expected_row = serde_json::json!([{"store": "Shop A", "member_date": ["5、15", "01、20"]}]);
    assert_eq!(json["2024"], expected_row);
    assert_eq!(json["2025"], expected_row);
}

#[tokio::test]
async fn scrape_reports_non_success_status_as_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = test_client()
        .scrape(&url, &HolidayExtractor)
        .await
        .unwrap_err();

    assert!(err.is_fetch(), "expected fetch error, got: {err:?}");
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 404, .. }),
        "expected UnexpectedStatus(404), got: {err:?}"
    );
}

#[tokio::test]
async fn scrape_reports_unreachable_host_as_fetch_error() {
    // Nothing listens on port 1; the connection is refused.
    let err = test_client()
        .scrape("http://127.0.0.1:1/", &PartyWorldExtractor)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::Http(_)),
        "expected Http error, got: {err:?}"
    );
}

#[tokio::test]
async fn scrape_reports_changed_markup_as_missing_structure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_response("<html><body><p>改版中</p></body></html>"))
        .mount(&server)
        .await;

    let err = test_client()
        .scrape(&server.uri(), &HolidayExtractor)
        .await
        .unwrap_err();

    assert!(!err.is_fetch());
    assert_eq!(err.to_string(), "未找到表格");
}
