use chrono::NaiveDate;
use fieldgate_application::{Album, AlbumId, CatalogRepository};
use rust_decimal::Decimal;

use super::InMemoryCatalogRepository;

fn album(name: &str) -> Album {
    Album {
        album_id: AlbumId::new(),
        album_name: name.to_owned(),
        artist: "Album Artist".to_owned(),
        diary: String::new(),
        release_date: NaiveDate::default(),
        price: Decimal::ZERO,
        tracks: Vec::new(),
    }
}

#[tokio::test]
async fn save_and_find_album() {
    let repository = InMemoryCatalogRepository::new();
    let stored = album("Album Name");
    let album_id = stored.album_id;

    assert!(repository.save_album(stored.clone()).await.is_ok());

    let found = repository.find_album(album_id).await;
    assert!(found.is_ok());
    assert_eq!(found.unwrap_or_default(), Some(stored));
}

#[tokio::test]
async fn find_album_returns_none_for_unknown_id() {
    let repository = InMemoryCatalogRepository::new();

    let found = repository.find_album(AlbumId::new()).await;
    assert!(matches!(found, Ok(None)));
}

#[tokio::test]
async fn list_albums_is_sorted_by_name() {
    let repository = InMemoryCatalogRepository::new();
    for name in ["Zebra", "Abbey", "Motion"] {
        assert!(repository.save_album(album(name)).await.is_ok());
    }

    let listed = repository.list_albums().await;
    assert!(listed.is_ok());
    let names: Vec<String> = listed
        .unwrap_or_default()
        .into_iter()
        .map(|album| album.album_name)
        .collect();
    assert_eq!(names, vec!["Abbey", "Motion", "Zebra"]);
}

#[tokio::test]
async fn save_album_replaces_existing_entry() {
    let repository = InMemoryCatalogRepository::new();
    let mut stored = album("Album Name");
    assert!(repository.save_album(stored.clone()).await.is_ok());

    stored.diary = "Second pressing".to_owned();
    assert!(repository.save_album(stored.clone()).await.is_ok());

    let listed = repository.list_albums().await;
    assert!(listed.is_ok());
    assert_eq!(listed.unwrap_or_default(), vec![stored]);
}
