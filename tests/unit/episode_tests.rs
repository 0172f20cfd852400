/*!
 * Tests for episode metadata extraction from filenames
 */

use subtitle_dialogue::episode::EpisodeMetadataExtractor;
use subtitle_dialogue::errors::EpisodeError;

#[test]
fn test_extract_withConventionalName_shouldReadAllFields() {
    let meta = EpisodeMetadataExtractor::default()
        .extract("Westworld - 1x03 - The Stray.HDTV.KILLERS.en.srt")
        .unwrap();

    assert_eq!(meta.season_num, 1);
    assert_eq!(meta.episode_num, 3);
    assert_eq!(meta.episode_name, "The Stray");
    assert_eq!(meta.source_filename, "Westworld - 1x03 - The Stray.HDTV.KILLERS.en.srt");
}

#[test]
fn test_extract_withSeriesTitle_shouldRequireThatTitle() {
    let extractor = EpisodeMetadataExtractor::new(Some("Westworld"));

    assert!(extractor.extract("Westworld - 2x10 - The Passenger.en.srt").is_ok());
    let err = extractor.extract("Deadwood - 1x01 - Deadwood.en.srt").unwrap_err();
    assert_eq!(
        err,
        EpisodeError::FilenameFormatMismatch { filename: "Deadwood - 1x01 - Deadwood.en.srt".to_string() }
    );
}

#[test]
fn test_extract_withRegexCharactersInTitle_shouldMatchLiterally() {
    let extractor = EpisodeMetadataExtractor::new(Some("Mr. Robot (US)"));

    assert!(extractor.extract("Mr. Robot (US) - 1x01 - eps1.0_hellofriend.mov.en.srt").is_ok());
    assert!(extractor.extract("MrX Robot (US) - 1x01 - Pilot.en.srt").is_err());
}

#[test]
fn test_extract_withMissingSeasonMarker_shouldMismatch() {
    let extractor = EpisodeMetadataExtractor::default();

    assert!(extractor.extract("Westworld - Chestnut.en.srt").is_err());
    assert!(extractor.extract("Westworld - 1x02 - Chestnut.en.txt").is_err());
    assert!(extractor.extract("random_subtitles.srt").is_err());
}

#[test]
fn test_extract_withUppercaseExtension_shouldAccept() {
    let meta = EpisodeMetadataExtractor::default()
        .extract("Westworld - 1x10 - The Bicameral Mind.en.SRT")
        .unwrap();
    assert_eq!(meta.episode_num, 10);
    assert_eq!(meta.episode_name, "The Bicameral Mind");
}

#[test]
fn test_extract_withSeasonOutsideOneToThree_shouldMismatch() {
    let extractor = EpisodeMetadataExtractor::default();

    for name in [
        "Westworld - 0x01 - X.en.srt",
        "Westworld - 4x01 - X.en.srt",
        "Westworld - 12x01 - Far.en.srt",
    ] {
        assert_eq!(
            extractor.extract(name),
            Err(EpisodeError::FilenameFormatMismatch { filename: name.to_string() }),
            "{} should not match",
            name
        );
    }
    assert_eq!(extractor.extract("Westworld - 3x01 - Parce Domine.en.srt").unwrap().season_num, 3);
}

#[test]
fn test_extract_withDashInSeriesPrefix_shouldMismatch() {
    let extractor = EpisodeMetadataExtractor::default();

    assert!(extractor.extract("Some - Other - 1x01 - Name.en.srt").is_err());
    assert!(extractor.extract("Spider-Man - 1x01 - Pilot.en.srt").is_ok());
}
