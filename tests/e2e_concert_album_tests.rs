//! End-to-end tests for concert events and media albums

mod common;

use chrono::{TimeZone, Utc};
use common::{MockMusicBrainz, TestEnv, OTHER_USER, TEST_USER};
use venu_stats::concert_events::{ConcertError, ConcertUpdate};
use venu_stats::media_albums::{AlbumError, MediaType};
use venu_stats::{AlbumStore, ConcertStore};

#[tokio::test]
async fn test_concert_album_flow() {
    let mb = MockMusicBrainz::start().await;
    let env = TestEnv::new(&mb.uri());
    let night = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();

    let concert = env
        .concerts
        .add_concert(TEST_USER, "Metallica", night, "Wembley", "London")
        .unwrap();
    let album = env.albums.create_album(TEST_USER, &concert.id).unwrap();

    let photo = env
        .albums
        .upload_media(TEST_USER, &album.id, "https://cdn.venu.example/a.jpg", night, MediaType::Photo)
        .unwrap();
    let video = env
        .albums
        .upload_media(TEST_USER, &album.id, "https://cdn.venu.example/b.mp4", night, MediaType::Video)
        .unwrap();

    let albums = env
        .albums
        .get_albums_by_user_and_concert(TEST_USER, &concert.id)
        .unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].items, vec![photo, video]);
    assert_eq!(albums[0].concert, concert.id);

    let update = ConcertUpdate {
        venue: Some("Twickenham".to_string()),
        ..Default::default()
    };
    let edited = env.concerts.edit_concert_details(&concert.id, &update).unwrap();
    assert_eq!(edited.venue, "Twickenham");
    assert_eq!(env.concerts.get_concerts_by_user(TEST_USER).unwrap(), vec![edited]);
}

#[tokio::test]
async fn test_other_users_cannot_touch_owned_data() {
    let mb = MockMusicBrainz::start().await;
    let env = TestEnv::new(&mb.uri());
    let night = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();

    let concert = env
        .concerts
        .add_concert(TEST_USER, "Radiohead", night, "O2 Arena", "London")
        .unwrap();
    let album = env.albums.create_album(TEST_USER, &concert.id).unwrap();

    let err = env
        .albums
        .upload_media(OTHER_USER, &album.id, "https://cdn.venu.example/x.jpg", night, MediaType::Photo)
        .unwrap_err();
    assert!(matches!(err, AlbumError::NotOwner { .. }));

    let err = env.concerts.delete_concert(OTHER_USER, &concert.id).unwrap_err();
    assert!(matches!(err, ConcertError::NotOwner { .. }));

    assert!(env
        .albums
        .get_albums_by_user_and_concert(OTHER_USER, &concert.id)
        .unwrap()
        .is_empty());
    assert!(env.concerts.get_concerts_by_user(OTHER_USER).unwrap().is_empty());
    assert!(env.albums.get_media_album(&album.id).unwrap().items.is_empty());
}
