//! Integration tests for the advanced searches
//!
//! A wiremock server stands in for the search endpoints; the tests check
//! the query each search sends and the rows it parses back.

use metallum::config::CacheConfig;
use metallum::{AlbumSearch, BandSearch, Config, FieldValue, Metallum, SongSearch};
use std::collections::HashMap;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BANDS: &str = r#"{
    "error": "",
    "iTotalRecords": 3,
    "iTotalDisplayRecords": 3,
    "sEcho": 0,
    "aaData": [
        ["<a href=\"https://www.metal-archives.com/bands/Death/141\">Death</a>", "Death Metal (early); Progressive Death Metal (later)", "United States"],
        ["<a href=\"https://www.metal-archives.com/bands/Death/3540333452\">Death</a>", "Thrash Metal", "Brazil"],
        ["<a href=\"https://www.metal-archives.com/bands/Death/3540390134\">Death</a>", "Black Metal", "Finland"]
    ]
}"#;

const ALBUMS: &str = r#"{
    "iTotalRecords": "2",
    "aaData": [
        ["<a href=\"https://www.metal-archives.com/bands/Death/141\" title=\"Death (US)\">Death</a>",
         "<a href=\"https://www.metal-archives.com/albums/Death/Symbolic/606\">Symbolic</a> <!-- 9.1 -->",
         "Full-length",
         "March 21st, 1995 <!-- 1995-03-21 -->"],
        ["<a href=\"https://www.metal-archives.com/bands/Death/141\" title=\"Death (US)\">Death</a>",
         "<a href=\"https://www.metal-archives.com/albums/Death/Symbolic_Demo/77001\">Symbolic Demo</a> <!-- 2.0 -->",
         "Demo",
         "1994 <!-- 1994-00-00 -->"]
    ]
}"#;

const SONGS: &str = r#"{
    "iTotalRecords": 1,
    "aaData": [
        ["<a href=\"https://www.metal-archives.com/bands/Death/141\" title=\"Death (US)\">Death</a>",
         "<a href=\"https://www.metal-archives.com/albums/Death/Symbolic/606\">Symbolic</a>",
         "Full-length",
         "Crystal Mountain",
         "Death Metal (early), Progressive Death Metal (later)",
         "<a href=\"javascript:;\" id=\"lyricsLink_6060\" title=\"Toggle lyrics display\" class=\"viewLyrics\"><span>Show lyrics</span></a>"]
    ]
}"#;

const ALBUM_PAGE: &str = r#"
    <h1 class="album_name"><a href="https://www.metal-archives.com/albums/Death/Symbolic/606">Symbolic</a></h1>
    <h2 class="band_name"><a href="https://www.metal-archives.com/bands/Death/141">Death</a></h2>
    <dl><dt>Type:</dt><dd>Full-length</dd><dt>Release date:</dt><dd>March 21st, 1995</dd>
    <dt>Label:</dt><dd><a href="https://www.metal-archives.com/labels/Roadrunner_Records/5">Roadrunner Records</a></dd></dl>
"#;

fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.client.base_url = base_url.to_string();
    config.client.request_delay_ms = 0;
    config.cache = CacheConfig::in_memory(300);
    config
}

async fn sent_query(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.unwrap();
    requests
        .last()
        .unwrap()
        .url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

#[tokio::test]
async fn test_band_search_rows_and_filtering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/ajax-advanced/searching/bands/"))
        .and(query_param("bandName", "Death"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BANDS))
        .expect(1)
        .mount(&server)
        .await;

    let client = Metallum::new(test_config(&server.uri())).unwrap();
    let results = client.band_search(&BandSearch::new("Death")).await.unwrap();

    assert_eq!(results.total, 3);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "141");
    assert_eq!(results[1].country, "Brazil");

    let finnish = results.rows().search(&[("country", "finland")]).await.unwrap();
    assert_eq!(finnish.len(), 1);
    assert_eq!(finnish[0].id, "3540390134");

    let query = sent_query(&server).await;
    assert_eq!(query.get("exactBandMatch").map(String::as_str), Some("1"));
    assert!(!query.contains_key("genre"));
    assert!(!query.contains_key("yearCreationFrom"));
    assert!(!query.contains_key("iDisplayStart"));
}

#[tokio::test]
async fn test_band_result_resolves_band() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/ajax-advanced/searching/bands/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BANDS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bands/_/141"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h1 class="band_name"><a href="https://www.metal-archives.com/bands/Death/141">Death</a></h1>
               <dl><dt>Status:</dt><dd>Split-up</dd></dl>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = Metallum::new(test_config(&server.uri())).unwrap();
    let results = client.band_search(&BandSearch::new("Death")).await.unwrap();

    let band = results[0].band();
    assert_eq!(band.value("country").await.unwrap(), FieldValue::from("United States"));
    assert!(!band.is_resolved());
    assert_eq!(band.value("status").await.unwrap(), FieldValue::from("Split-up"));

    let fetched = results[0].get().await.unwrap();
    assert_eq!(fetched.status, "Split-up");
}

#[tokio::test]
async fn test_album_search_query_and_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/ajax-advanced/searching/albums/"))
        .and(query_param("releaseTitle", "Symbolic"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALBUMS))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/albums/_/_/606"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALBUM_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = Metallum::new(test_config(&server.uri())).unwrap();
    let search = AlbumSearch::new("Symbolic")
        .strict(false)
        .band("Death")
        .released_from(1994, None)
        .release_type("1")
        .release_type("3");
    let results = client.album_search(&search).await.unwrap();

    assert_eq!(results.total, 2);
    assert_eq!(results[0].title, "Symbolic");
    assert_eq!(results[0].release_date, "March 21st, 1995");
    assert_eq!(results[1].kind, "Demo");

    let query = sent_query(&server).await;
    assert_eq!(query.get("exactReleaseMatch").map(String::as_str), Some("0"));
    assert_eq!(query.get("bandName").map(String::as_str), Some("Death"));
    assert_eq!(query.get("releaseYearFrom").map(String::as_str), Some("1994"));
    assert_eq!(query.get("releaseMonthFrom").map(String::as_str), Some("1"));
    assert!(!query.contains_key("releaseYearTo"));
    assert!(!query.contains_key("releaseMonthTo"));
    assert!(!query.contains_key("releaseLabelName"));

    let demos = results.rows().search(&[("type", "Demo")]).await.unwrap();
    assert_eq!(demos.len(), 1);
    assert_eq!(demos[0].id, "77001");

    let album = results[0].album();
    assert_eq!(album.value("year").await.unwrap(), FieldValue::from(1995));
    assert_eq!(album.value("label").await.unwrap(), FieldValue::from("Roadrunner Records"));
    assert_eq!(results[0].get().await.unwrap().title, "Symbolic");
}

#[tokio::test]
async fn test_album_search_repeats_list_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALBUMS))
        .mount(&server)
        .await;

    let client = Metallum::new(test_config(&server.uri())).unwrap();
    let search = AlbumSearch::new("Symbolic")
        .release_type("1")
        .release_type("3");
    client.album_search(&search).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let types: Vec<String> = requests[0]
        .url
        .query_pairs()
        .filter(|(key, _)| key == "releaseType[]")
        .map(|(_, value)| value.into_owned())
        .collect();
    assert_eq!(types, vec!["1", "3"]);
}

#[tokio::test]
async fn test_song_search_and_lyrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/ajax-advanced/searching/songs/"))
        .and(query_param("songTitle", "Crystal Mountain"))
        .and(query_param("genre", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SONGS))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/release/ajax-view-lyrics/id/6060"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Behind the ritual you'll find<br />\r\nThe ones who hide<br />\r\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Metallum::new(test_config(&server.uri())).unwrap();
    let results = client
        .song_search(&SongSearch::new("Crystal Mountain").band("Death"))
        .await
        .unwrap();

    assert_eq!(results.total, 1);
    let song = results[0].get();
    assert_eq!(song.id.as_deref(), Some("6060"));
    assert_eq!(song.title, "Crystal Mountain");
    assert_eq!(song.album_name, "Symbolic");
    assert_eq!(song.genres, vec!["Death Metal (early)", "Progressive Death Metal (later)"]);
    assert_eq!(song.bands()[0].id(), "141");
    assert_eq!(song.album().unwrap().id(), "606");

    let query = sent_query(&server).await;
    assert!(!query.contains_key("lyrics"));
    assert!(!query.contains_key("releaseTitle"));

    let lyrics = song.lyrics().await.unwrap();
    assert_eq!(lyrics.text, "Behind the ritual you'll find\nThe ones who hide");
}

#[tokio::test]
async fn test_malformed_search_response_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error": "busy"}"#))
        .mount(&server)
        .await;

    let client = Metallum::new(test_config(&server.uri())).unwrap();
    let err = client.band_search(&BandSearch::new("Death")).await.unwrap_err();
    assert_eq!(err.kind(), metallum::ErrorKind::Parse);
}
