//! Application services and ports.

#![forbid(unsafe_code)]

mod catalog_ports;
mod catalog_serializers;
mod catalog_service;

pub use catalog_ports::{Album, AlbumId, CatalogRepository, Track};
pub use catalog_serializers::{IsArtist, album_serializer, track_serializer};
pub use catalog_service::CatalogService;
