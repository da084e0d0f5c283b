use chrono::NaiveDate;
use fieldgate_application::{Album, AlbumId, CatalogService, Track};
use fieldgate_core::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

const DEV_SEED_FIRST_ALBUM_ID: &str = "5b0c7a3e-4d5f-4b8e-9c21-0f6a2d1e7b11";
const DEV_SEED_SECOND_ALBUM_ID: &str = "c3e91f02-8a7b-4c6d-b5e4-7d2f1a0b9c22";

pub async fn run(catalog_service: &CatalogService) -> AppResult<()> {
    for album in demo_albums()? {
        catalog_service.save_album(album).await?;
    }

    info!(
        first_album_id = DEV_SEED_FIRST_ALBUM_ID,
        second_album_id = DEV_SEED_SECOND_ALBUM_ID,
        "seeded demo catalog"
    );
    Ok(())
}

pub fn demo_albums() -> AppResult<Vec<Album>> {
    Ok(vec![
        Album {
            album_id: parse_album_id(DEV_SEED_FIRST_ALBUM_ID, "DEV_SEED_FIRST_ALBUM_ID")?,
            album_name: "Night Shift Recordings".to_owned(),
            artist: "nina".to_owned(),
            diary: "Tracked the vocals at 3am, the neighbours complained twice.".to_owned(),
            release_date: seed_date(2019, 4, 12)?,
            price: Decimal::new(1499, 2),
            tracks: vec![
                seed_track(1, "Opening Hours", 231),
                seed_track(2, "Last Train", 198),
                seed_track(3, "Fluorescent", 264),
            ],
        },
        Album {
            album_id: parse_album_id(DEV_SEED_SECOND_ALBUM_ID, "DEV_SEED_SECOND_ALBUM_ID")?,
            album_name: "Harbour Lights".to_owned(),
            artist: "omar".to_owned(),
            diary: "Scrapped the first mix entirely.".to_owned(),
            release_date: seed_date(2021, 9, 3)?,
            price: Decimal::new(999, 2),
            tracks: vec![
                seed_track(1, "Low Tide", 245),
                seed_track(2, "Signal Fires", 187),
            ],
        },
    ])
}

fn seed_track(order: u32, title: &str, duration: u32) -> Track {
    Track {
        order,
        title: title.to_owned(),
        duration,
    }
}

fn seed_date(year: i32, month: u32, day: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AppError::Internal(format!("invalid seed date {year:04}-{month:02}-{day:02}"))
    })
}

fn parse_album_id(value: &str, name: &str) -> AppResult<AlbumId> {
    Uuid::parse_str(value)
        .map(AlbumId::from_uuid)
        .map_err(|error| AppError::Internal(format!("invalid {name}: {error}")))
}
