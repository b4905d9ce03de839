//! Catalog subcommands

use lyra_catalog_client::CatalogClient;
use lyra_core::{CatalogService, Playlist, PlaylistId, TrackRef, UserId};
use std::time::Duration;

pub async fn list_tracks(client: &CatalogClient, json: bool) -> anyhow::Result<()> {
    let tracks = client.list_tracks().await?;
    tracing::debug!(count = tracks.len(), "Fetched tracks");
    print_tracks(&tracks, json)
}

pub async fn search(client: &CatalogClient, query: &str, json: bool) -> anyhow::Result<()> {
    let tracks = client.search_tracks(query).await?;
    if tracks.is_empty() && !json {
        println!("No tracks match '{query}'");
        return Ok(());
    }
    print_tracks(&tracks, json)
}

pub async fn list_playlists(
    client: &CatalogClient,
    owner: UserId,
    json: bool,
) -> anyhow::Result<()> {
    let playlists = client.list_playlists(owner).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&playlists)?);
        return Ok(());
    }

    for playlist in &playlists {
        println!("{}", playlist_line(playlist));
    }
    Ok(())
}

pub async fn show_playlist(
    client: &CatalogClient,
    id: PlaylistId,
    json: bool,
) -> anyhow::Result<()> {
    let playlist = client.get_playlist(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&playlist)?);
        return Ok(());
    }

    println!("{}", playlist_line(&playlist));
    print_tracks(&playlist.tracks, false)
}

fn print_tracks(tracks: &[TrackRef], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tracks)?);
        return Ok(());
    }

    for track in tracks {
        println!("{}", track_line(track));
    }
    Ok(())
}

fn playlist_line(playlist: &Playlist) -> String {
    let visibility = if playlist.is_public { "public" } else { "private" };
    format!(
        "[{}] {} ({} tracks, {visibility})",
        playlist.id,
        playlist.name,
        playlist.tracks.len()
    )
}

fn track_line(track: &TrackRef) -> String {
    let id = track.id().map(|id| id.to_string()).unwrap_or_default();
    format!(
        "{id:>6}  {} - {} ({}) [{}]",
        track.title(),
        track.artist(),
        track.album(),
        format_duration(track.duration_hint())
    )
}

/// `m:ss`, or `-:--` when unknown
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "-:--".to_string();
    }
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyra_core::TrackId;

    #[test]
    fn durations_format_as_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::ZERO), "-:--");
        assert_eq!(format_duration(Duration::from_secs(9)), "0:09");
        assert_eq!(format_duration(Duration::from_secs(337)), "5:37");
    }

    #[test]
    fn track_line_shows_metadata() {
        let track = TrackRef::catalog(TrackId::new(12), "Blue in Green", "Miles Davis")
            .with_album("Kind of Blue")
            .with_duration(Duration::from_secs(337));
        assert_eq!(
            track_line(&track),
            "    12  Blue in Green - Miles Davis (Kind of Blue) [5:37]"
        );
    }
}
