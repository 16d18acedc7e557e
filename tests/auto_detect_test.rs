//! Integration tests for mixed-media matching through `AutoDetectMatcher`

mod utils;

use mediamatch::modules::media::{Candidate, MediaFile, Track};
use mediamatch::modules::orchestration::{AutoDetectMatcher, MatchOptions, TrackMatcher};
use std::sync::Arc;
use utils::factories::{MovieFactory, SeriesFactory};
use utils::helpers::{remaining_names, test_config};
use utils::mocks::{MockEpisodeProvider, MockMovieService, MockMusicService};

fn mixed_files() -> Vec<MediaFile> {
    vec![
        MediaFile::new("/media/tv/Bones.S01E01.mkv"),
        MediaFile::new("/media/movies/Heat.1995.mkv"),
        MediaFile::new("/media/movies/Heat.1995.nfo"),
        MediaFile::new("/media/music/Daft Punk - One More Time.mp3"),
        MediaFile::new("/media/tv/Bones.S01E01.sample.mkv"),
    ]
}

fn full_matcher() -> AutoDetectMatcher {
    AutoDetectMatcher::new(test_config())
        .with_episode_provider(Arc::new(
            MockEpisodeProvider::new()
                .with_series("75682", SeriesFactory::new("Bones").season_of(3).build()),
        ))
        .with_movie_service(Arc::new(
            MockMovieService::new().with_movie(MovieFactory::new("Heat", 1995).build()),
        ))
        .with_music_service(Arc::new(MockMusicService::new().with_track(
            "Daft Punk - One More Time.mp3",
            Track::new("Daft Punk", "One More Time"),
        )))
}

#[tokio::test]
async fn test_mixed_files_reach_their_identifiers() {
    let files = mixed_files();

    let report = full_matcher()
        .match_files(files.clone(), &MatchOptions::default())
        .await
        .unwrap();

    assert!(matches!(report.candidate_for(&files[0]), Some(Candidate::Episode(_))));
    assert!(matches!(report.candidate_for(&files[1]), Some(Candidate::Movie(_))));
    assert!(matches!(report.candidate_for(&files[3]), Some(Candidate::Track(_))));
    assert_eq!(remaining_names(&report), vec!["Bones.S01E01.sample.mkv"]);

    let movie = report.candidate_for(&files[1]).unwrap();
    let info = report.candidate_for(&files[2]).unwrap();
    assert!(movie.same_record(info));
}

#[tokio::test]
async fn test_missing_identifier_leaves_route_unmatched() {
    let files = mixed_files();
    let matcher = AutoDetectMatcher::new(test_config()).with_movie_service(Arc::new(
        MockMovieService::new().with_movie(MovieFactory::new("Heat", 1995).build()),
    ));

    let report = matcher.match_files(files, &MatchOptions::default()).await.unwrap();

    assert_eq!(report.matches.len(), 2);
    assert_eq!(
        remaining_names(&report),
        vec![
            "Bones.S01E01.mkv",
            "Daft Punk - One More Time.mp3",
            "Bones.S01E01.sample.mkv",
        ]
    );
}

#[tokio::test]
async fn test_track_matching_skips_non_audio() {
    let music = Arc::new(MockMusicService::new().with_track(
        "Daft Punk - One More Time.mp3",
        Track::new("Daft Punk", "One More Time"),
    ));
    let matcher = TrackMatcher::new(music.clone(), test_config());
    let files = vec![
        MediaFile::new("/music/Daft Punk - One More Time.mp3"),
        MediaFile::new("/music/cover.jpg"),
        MediaFile::new("/music/Unknown Artist - Demo.flac"),
    ];

    let report = matcher.match_files(files, &MatchOptions::default()).await.unwrap();

    assert_eq!(report.matches.len(), 1);
    assert_eq!(remaining_names(&report), vec!["cover.jpg", "Unknown Artist - Demo.flac"]);
    assert_eq!(music.lookups(), 2);
}

#[tokio::test]
async fn test_strict_track_verification_rejects_mislabeled_file() {
    let music = Arc::new(MockMusicService::new().with_track(
        "Metallica - Enter Sandman.mp3",
        Track::new("Daft Punk", "One More Time"),
    ));
    let matcher = TrackMatcher::new(music, test_config());
    let files = vec![MediaFile::new("/music/Metallica - Enter Sandman.mp3")];

    let strict = matcher.match_files(files.clone(), &MatchOptions::strict()).await.unwrap();
    assert!(strict.matches.is_empty());

    let lenient = matcher.match_files(files, &MatchOptions::default()).await.unwrap();
    assert_eq!(lenient.matches.len(), 1);
}
