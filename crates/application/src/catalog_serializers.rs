use fieldgate_core::{AppResult, RequestContext};
use fieldgate_domain::{
    Field, FieldPermission, IsAuthenticated, ListOptions, MethodField, PermissionSet, Serializer,
    SerializerContext,
};
use serde_json::Value;

use crate::{Album, Track};

/// Grants access only to the artist who recorded the album.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsArtist;

impl FieldPermission<Album> for IsArtist {
    fn has_object_permission(
        &self,
        request: &RequestContext,
        instance: Option<&Album>,
    ) -> AppResult<bool> {
        let Some(user) = request.user().filter(|user| user.is_authenticated()) else {
            return Ok(false);
        };

        Ok(instance.is_some_and(|album| album.artist == user.username()))
    }
}

/// Track serializer. The whole track list is hidden from anonymous requests.
pub fn track_serializer() -> AppResult<Serializer<Track>> {
    Serializer::<Track>::builder("track")
        .field("order", Field::integer())
        .field("title", Field::char())
        .field("duration", Field::integer())
        .permissions(PermissionSet::empty().with(IsAuthenticated))
        .build()
}

/// Album serializer used by the catalog endpoints.
pub fn album_serializer() -> AppResult<Serializer<Album>> {
    let tracks = track_serializer()?
        .many(ListOptions::default())
        .nested(|album: &Album| album.tracks.as_slice());

    Serializer::<Album>::builder("album")
        .field("album_id", Field::read_only())
        .field("album_name", Field::char())
        .field("artist", Field::char())
        .field(
            "diary",
            Field::char().permissions(PermissionSet::<Album>::empty().with(IsArtist)),
        )
        .field("release_date", Field::date())
        .field("price", Field::decimal(2))
        .field("tracks", tracks)
        .field("track_count", MethodField::new(track_count))
        .build()
}

fn track_count(album: &Album, _context: &SerializerContext) -> AppResult<Value> {
    Ok(Value::from(album.tracks.len()))
}
