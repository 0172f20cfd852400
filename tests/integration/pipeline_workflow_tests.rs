/*!
 * End-to-end tests for turning subtitle files into dialogue rows
 */

use anyhow::Result;
use subtitle_dialogue::app_config::Config;
use subtitle_dialogue::errors::{AppError, EpisodeError};
use subtitle_dialogue::pipeline::{FileStatus, PipelineOrchestrator, PipelineWarning};

use crate::common;

#[test]
fn test_process_content_withTwoBlocks_shouldYieldThreeRows() -> Result<()> {
    common::init_logger();
    let orchestrator = PipelineOrchestrator::default();

    let result = orchestrator.process_content(
        "Westworld - 1x01 - The Original.en.srt",
        common::TWO_BLOCK_SRT.as_bytes(),
    )?;

    assert_eq!(result.blocks, 2);
    assert_eq!(result.rows.len(), 3);

    let first = &result.rows[0];
    assert_eq!(first.text, "Hello there.");
    assert_eq!(first.fulltext, "Hello there.");
    assert_eq!(first.subtitle_index, 1);

    let (hi, hello) = (&result.rows[1], &result.rows[2]);
    assert_eq!(hi.text, "Hi!");
    assert_eq!(hello.text, "Hello yourself.");
    assert_eq!(hi.fulltext, "- Hi! - Hello yourself.");
    assert_eq!(hello.fulltext, hi.fulltext);
    assert_eq!(hi.start.to_string(), "00:00:03,000");
    assert_eq!(hi.end.to_string(), "00:00:04,500");
    assert_eq!((hi.start, hi.end), (hello.start, hello.end));

    for row in &result.rows {
        assert_eq!(row.episode.season_num, 1);
        assert_eq!(row.episode.episode_num, 1);
        assert_eq!(row.episode.episode_name, "The Original");
        assert!(!row.offscreen);
        assert_eq!(row.speaker, None);
    }
    Ok(())
}

#[test]
fn test_process_content_withRichEpisode_shouldHoldRowInvariants() -> Result<()> {
    common::init_logger();
    let orchestrator = PipelineOrchestrator::default();

    let result = orchestrator.process_content(
        "Westworld - 1x01 - The Original.en.srt",
        common::EPISODE_SRT.as_bytes(),
    )?;

    // Credit dropped, broken block rejected, last caption exploded
    assert_eq!(result.stats.styled_dropped, 1);
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.rows.len(), 4);

    for row in &result.rows {
        assert!(row.start <= row.end);
        assert!(!row.text.trim().is_empty());
        assert!(!row.fulltext.to_lowercase().contains("<font"));
        assert!(!row.text.contains('<'));
        assert_eq!(row.offscreen, row.fulltext.contains("<i>"));
    }

    assert_eq!(result.rows[0].speaker.as_deref(), Some("FORD"));
    assert!(result.rows[0].offscreen);
    assert_eq!(
        result.rows[1].text,
        "DOLORES: Have you ever questioned the nature of your reality?"
    );
    assert_eq!(result.rows[1].speaker.as_deref(), Some("DOLORES"));
    assert_eq!(result.rows[2].text, "Bernard?");
    assert_eq!(result.rows[3].text, "Yes.");

    assert!(result.warnings.iter().any(|w| matches!(w, PipelineWarning::BlockRejected { .. })));
    Ok(())
}

#[test]
fn test_process_content_withMismatchedFilename_shouldFailBeforeParsing() {
    let orchestrator = PipelineOrchestrator::default();

    let err = orchestrator
        .process_content("season1_episode1.srt", common::TWO_BLOCK_SRT.as_bytes())
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Episode(EpisodeError::FilenameFormatMismatch { ref filename }) if filename == "season1_episode1.srt"
    ));
}

#[test]
fn test_process_file_withLatin1Content_shouldDecodeAccents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_bytes(
        temp_dir.path(),
        "Westworld - 1x04 - Dissonance Theory.en.srt",
        b"1\n00:00:01,000 --> 00:00:02,000\nEL LAZO: \xa1Se\xf1or!\n",
    )?;

    let result = PipelineOrchestrator::default().process_file(&path)?;

    assert_eq!(result.encoding.label(), "windows-1252");
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].text, "EL LAZO: ¡Señor!");
    assert_eq!(result.rows[0].speaker.as_deref(), Some("EL LAZO"));
    Ok(())
}

#[test]
fn test_run_withMixedFiles_shouldSkipBadFileAndKeepOthers() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let good_one = common::create_test_subtitle(temp_dir.path(), "Westworld - 1x01 - The Original.en.srt")?;
    let bad = common::create_test_subtitle(temp_dir.path(), "bonus_features.srt")?;
    let good_two = common::create_test_file(
        temp_dir.path(),
        "Westworld - 1x02 - Chestnut.en.srt",
        common::EPISODE_SRT,
    )?;
    let missing = temp_dir.path().join("Westworld - 1x03 - The Stray.en.srt");

    let output = PipelineOrchestrator::default().run([&good_one, &bad, &good_two, &missing]);

    assert_eq!(output.report.outcomes.len(), 4);
    assert_eq!(output.report.processed_count(), 2);
    assert_eq!(output.report.skipped_count(), 2);
    assert_eq!(output.report.total_rows(), 7);
    assert_eq!(output.dataset.len(), 7);
    assert_eq!(output.report.rejected_blocks(), 1);

    assert!(matches!(output.report.outcomes[1].status, FileStatus::Skipped(AppError::Episode(_))));
    assert!(matches!(output.report.outcomes[3].status, FileStatus::Skipped(AppError::File(_))));

    // Rows keep file order, then block order
    assert_eq!(output.dataset.rows()[0].episode.episode_num, 1);
    assert_eq!(output.dataset.rows()[3].episode.episode_num, 2);
    Ok(())
}

#[test]
fn test_run_withSeriesTitle_shouldSkipOtherSeries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let westworld = common::create_test_subtitle(temp_dir.path(), "Westworld - 1x01 - The Original.en.srt")?;
    let other = common::create_test_subtitle(temp_dir.path(), "Deadwood - 1x01 - Deadwood.en.srt")?;

    let mut config = Config::default();
    config.episode.series_title = Some("Westworld".to_string());
    let output = PipelineOrchestrator::new(&config).run([westworld, other]);

    assert_eq!(output.report.processed_count(), 1);
    assert_eq!(output.dataset.len(), 3);
    assert!(output.report.has_failures());
    Ok(())
}

#[test]
fn test_run_withObserver_shouldSeeEveryOutcomeInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let a = common::create_test_subtitle(temp_dir.path(), "Westworld - 1x01 - The Original.en.srt")?;
    let b = common::create_test_subtitle(temp_dir.path(), "nope.srt")?;

    let mut seen = Vec::new();
    PipelineOrchestrator::default().run_with_observer([&a, &b], |outcome| {
        seen.push((outcome.path.clone(), outcome.is_processed()));
    });

    assert_eq!(seen, vec![(a.clone(), true), (b.clone(), false)]);
    Ok(())
}

#[test]
fn test_dataset_statistics_withAttributedRows_shouldCountSpeakers() -> Result<()> {
    let orchestrator = PipelineOrchestrator::default();
    let srt = "1\n00:00:01,000 --> 00:00:02,000\nFORD: One.\n\n\
               2\n00:00:03,000 --> 00:00:04,000\n- BERNARD: Two. - FORD: Three.\n\n\
               3\n00:00:05,000 --> 00:00:06,000\n<i>Four.</i>\n";
    let result = orchestrator.process_content("Westworld - 1x08 - Trace Decay.en.srt", srt.as_bytes())?;
    let dataset = subtitle_dialogue::pipeline::Dataset::from_rows(result.rows);

    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.attributed_count(), 3);
    assert_eq!(dataset.offscreen_count(), 1);
    assert_eq!(dataset.distinct_speakers(), 2);
    assert_eq!(
        dataset.speaker_counts(),
        vec![("FORD".to_string(), 2), ("BERNARD".to_string(), 1)]
    );
    Ok(())
}
