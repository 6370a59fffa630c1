//! Integration tests for lazy entity resolution
//!
//! These tests run the public client against a wiremock server and check
//! which reads trigger page fetches.

use metallum::config::CacheConfig;
use metallum::{Config, FieldValue, Metallum};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BAND_PAGE: &str = r#"
    <html><body>
    <h1 class="band_name"><a href="https://www.metal-archives.com/bands/Darkthrone/146">Darkthrone</a></h1>
    <dl class="float_left">
        <dt>Country of origin:</dt><dd><a href="https://www.metal-archives.com/lists/NO">Norway</a></dd>
        <dt>Location:</dt><dd>Kolbotn, Viken</dd>
        <dt>Status:</dt><dd>Active</dd>
        <dt>Formed in:</dt><dd>1986</dd>
    </dl>
    <dl class="float_right">
        <dt>Genre:</dt><dd>Death Metal (early); Black Metal (later)</dd>
        <dt>Themes:</dt><dd>Darkness, Misanthropy</dd>
        <dt>Current label:</dt><dd><a href="https://www.metal-archives.com/labels/Peaceville_Records/54">Peaceville Records</a></dd>
    </dl>
    </body></html>
"#;

const DISCOGRAPHY: &str = r#"
    <table class="display discog">
        <thead><tr><th>Name</th><th>Type</th><th>Year</th><th>Reviews</th></tr></thead>
        <tbody>
            <tr><td><a href="https://www.metal-archives.com/albums/Darkthrone/Land_of_Frost/3300">Land of Frost</a></td><td>Demo</td><td>1987</td><td></td></tr>
            <tr><td><a href="https://www.metal-archives.com/albums/Darkthrone/A_Blaze_in_the_Northern_Sky/1470">A Blaze in the Northern Sky</a></td><td>Full-length</td><td>1992</td><td></td></tr>
            <tr><td><a href="https://www.metal-archives.com/albums/Darkthrone/Transilvanian_Hunger/1472">Transilvanian Hunger</a></td><td>Full-length</td><td>1994</td><td></td></tr>
        </tbody>
    </table>
"#;

const ALBUM_PAGE: &str = r#"
    <html><body>
    <h1 class="album_name"><a href="https://www.metal-archives.com/albums/Darkthrone/A_Blaze_in_the_Northern_Sky/1470">A Blaze in the Northern Sky</a></h1>
    <h2 class="band_name"><a href="https://www.metal-archives.com/bands/Darkthrone/146">Darkthrone</a></h2>
    <dl>
        <dt>Type:</dt><dd>Full-length</dd>
        <dt>Release date:</dt><dd>February 26th, 1992</dd>
        <dt>Label:</dt><dd><a href="https://www.metal-archives.com/labels/Peaceville_Records/54">Peaceville Records</a></dd>
        <dt>Reviews:</dt><dd>27 reviews (avg. 90%)</dd>
    </dl>
    <table class="display table_lyrics">
        <tr class="odd"><td><a name="12541" class="anchor"> </a>1.</td><td class="wrapWords">Kathaarian Life Code</td><td align="right">10:39</td><td></td></tr>
        <tr class="even"><td><a name="12542" class="anchor"> </a>2.</td><td class="wrapWords">In the Shadow of the Horns</td><td align="right">07:02</td><td></td></tr>
        <tr><td colspan="2"></td><td align="right"><strong>17:41</strong></td><td></td></tr>
    </table>
    </body></html>
"#;

const SPLIT_PAGE: &str = r#"
    <html><body>
    <h1 class="album_name"><a href="https://www.metal-archives.com/albums/Various/Split/900">Split</a></h1>
    <h2 class="band_name"><a href="https://www.metal-archives.com/bands/Darkthrone/146">Darkthrone</a> / <a href="https://www.metal-archives.com/bands/Satyricon/341">Satyricon</a></h2>
    <dl><dt>Type:</dt><dd>Split</dd><dt>Release date:</dt><dd>1995</dd></dl>
    <table class="display table_lyrics">
        <tr class="odd"><td><a name="801" class="anchor"> </a>1.</td><td class="wrapWords">Darkthrone - Transilvanian Hunger</td><td align="right">06:07</td><td></td></tr>
        <tr class="even"><td><a name="802" class="anchor"> </a>2.</td><td class="wrapWords">Satyricon - Mother North</td><td align="right">06:22</td><td></td></tr>
        <tr><td colspan="2"></td><td align="right"><strong>12:29</strong></td><td></td></tr>
    </table>
    </body></html>
"#;

fn test_config(base_url: &str, delay_ms: u64) -> Config {
    let mut config = Config::default();
    config.client.base_url = base_url.to_string();
    config.client.request_delay_ms = delay_ms;
    config.cache = CacheConfig::in_memory(300);
    config
}

async fn mount_page(server: &MockServer, at: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_discography_stub_fields_need_no_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, "/bands/_/146", BAND_PAGE, 1).await;
    mount_page(&server, "/band/discography/id/146/tab/all", DISCOGRAPHY, 1).await;
    mount_page(&server, "/albums/_/_/1470", ALBUM_PAGE, 0).await;

    let client = Metallum::new(test_config(&server.uri(), 0)).unwrap();
    let band = client.band_for_id("146").await.unwrap();
    let albums = band.albums().await.unwrap();
    assert_eq!(albums.len(), 3);

    let album = &albums[1];
    assert_eq!(album.title(), "A Blaze in the Northern Sky");
    assert_eq!(album.value("type").await.unwrap(), FieldValue::from("Full-length"));
    assert_eq!(album.value("year").await.unwrap(), FieldValue::from(1992));
    assert!(!album.is_resolved());
}

#[tokio::test]
async fn test_full_field_resolves_album_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/band/discography/id/146/tab/all", DISCOGRAPHY, 1).await;
    mount_page(&server, "/bands/_/146", BAND_PAGE, 1).await;
    mount_page(&server, "/albums/_/_/1470", ALBUM_PAGE, 1).await;

    let client = Metallum::new(test_config(&server.uri(), 0)).unwrap();
    let band = client.band_for_id("146").await.unwrap();
    let albums = band.albums().await.unwrap();
    let album = &albums[1];

    assert_eq!(album.value("label").await.unwrap(), FieldValue::from("Peaceville Records"));
    assert!(album.is_resolved());
    assert_eq!(album.value("score").await.unwrap(), FieldValue::from(90u32));
    assert_eq!(album.value("duration").await.unwrap(), FieldValue::from(1061u32));

    let full = album.resolve().await.unwrap();
    assert_eq!(full.title, album.title());
    assert_eq!(full.year().unwrap(), 1992);
    assert_eq!(full.tracks().len(), 2);
}

#[tokio::test]
async fn test_unknown_field_does_not_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, "/band/discography/id/146/tab/all", DISCOGRAPHY, 1).await;
    mount_page(&server, "/bands/_/146", BAND_PAGE, 1).await;
    mount_page(&server, "/albums/_/_/3300", ALBUM_PAGE, 0).await;

    let client = Metallum::new(test_config(&server.uri(), 0)).unwrap();
    let albums = client.band_for_id("146").await.unwrap().albums().await.unwrap();

    let err = albums[0].value("colour").await.unwrap_err();
    assert_eq!(err.kind(), metallum::ErrorKind::Lookup);
    assert!(!albums[0].is_resolved());
}

#[tokio::test]
async fn test_collection_search_filters_discography() {
    let server = MockServer::start().await;
    mount_page(&server, "/bands/_/146", BAND_PAGE, 1).await;
    mount_page(&server, "/band/discography/id/146/tab/all", DISCOGRAPHY, 1).await;

    let client = Metallum::new(test_config(&server.uri(), 0)).unwrap();
    let albums = client.band_for_id("146").await.unwrap().albums().await.unwrap();

    let full_lengths = albums.search(&[("type", "full-length")]).await.unwrap();
    let titles: Vec<&str> = full_lengths.iter().map(|album| album.title()).collect();
    assert_eq!(titles, vec!["A Blaze in the Northern Sky", "Transilvanian Hunger"]);

    let narrowed = albums
        .search(&[("type", "Full-length"), ("year", "1994")])
        .await
        .unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].id(), "1472");

    assert!(albums.search(&[("type", "Live album")]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_split_album_tracks_and_bands() {
    let server = MockServer::start().await;
    mount_page(&server, "/albums/_/_/900", SPLIT_PAGE, 1).await;
    mount_page(&server, "/bands/_/146", BAND_PAGE, 1).await;

    let client = Metallum::new(test_config(&server.uri(), 0)).unwrap();
    let album = client.album_for_id("900").await.unwrap();
    assert_eq!(album.bands().len(), 2);

    let tracks = album.tracks();
    assert_eq!(tracks[0].full_title, "Darkthrone - Transilvanian Hunger");
    assert_eq!(tracks[0].title().unwrap(), "Transilvanian Hunger");
    assert_eq!(tracks[1].title().unwrap(), "Mother North");

    let second_band = tracks[1].band().unwrap();
    assert_eq!(second_band.id(), "341");
    assert_eq!(second_band.value("name").await.unwrap(), FieldValue::from("Satyricon"));

    let first_band = tracks[0].band().unwrap();
    assert_eq!(first_band.value("status").await.unwrap(), FieldValue::from("Active"));
    assert_eq!(first_band.value("name").await.unwrap(), FieldValue::from("Darkthrone"));
}

#[tokio::test]
async fn test_shared_cache_across_stub_instances() {
    let server = MockServer::start().await;
    mount_page(&server, "/bands/_/146", BAND_PAGE, 1).await;
    mount_page(&server, "/band/discography/id/146/tab/all", DISCOGRAPHY, 1).await;
    mount_page(&server, "/albums/_/_/1470", ALBUM_PAGE, 1).await;

    let client = Metallum::new(test_config(&server.uri(), 0)).unwrap();
    let band = client.band_for_id("146").await.unwrap();

    let first = band.albums().await.unwrap();
    let second = band.albums().await.unwrap();
    first[1].resolve().await.unwrap();
    assert!(!second[1].is_resolved());

    let label = second[1].value("label").await.unwrap();
    assert_eq!(label, FieldValue::from("Peaceville Records"));

    let again = client.album_for_id("1470").await.unwrap();
    assert_eq!(again.label, "Peaceville Records");
}

#[tokio::test]
async fn test_uncached_requests_are_spaced() {
    let server = MockServer::start().await;
    mount_page(&server, "/bands/_/146", BAND_PAGE, 1).await;
    mount_page(&server, "/albums/_/_/1470", ALBUM_PAGE, 1).await;

    let client = Metallum::new(test_config(&server.uri(), 250)).unwrap();

    let started = Instant::now();
    client.band_for_id("146").await.unwrap();
    client.album_for_id("1470").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(250));

    let cached = Instant::now();
    client.band_for_id("146").await.unwrap();
    client.album_for_id("1470").await.unwrap();
    assert!(cached.elapsed() < Duration::from_millis(250));
}
