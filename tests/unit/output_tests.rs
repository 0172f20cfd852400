/*!
 * Tests for the dataset writer
 */

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use subtitle_dialogue::app_config::OutputFormat;
use subtitle_dialogue::dialogue::DialogueRow;
use subtitle_dialogue::episode::EpisodeMetadata;
use subtitle_dialogue::errors::AppError;
use subtitle_dialogue::output::{COLUMNS, DatasetWriter};
use subtitle_dialogue::subtitle_processor::Timecode;

use crate::common;

fn rows() -> Vec<DialogueRow> {
    let episode = Arc::new(EpisodeMetadata {
        season_num: 1,
        episode_num: 5,
        episode_name: "Contrapasso".to_string(),
        source_filename: "Westworld - 1x05 - Contrapasso.en.srt".to_string(),
    });

    vec![
        DialogueRow {
            subtitle_index: 12,
            start: Timecode::from_millis(61_000),
            end: Timecode::from_millis(62_500),
            fulltext: "<i>LOGAN: Come on.</i>".to_string(),
            text: "LOGAN: Come on.".to_string(),
            offscreen: true,
            speaker: Some("LOGAN".to_string()),
            episode: Arc::clone(&episode),
        },
        DialogueRow {
            subtitle_index: 13,
            start: Timecode::from_millis(63_000),
            end: Timecode::from_millis(64_000),
            fulltext: "He said \"no\".".to_string(),
            text: "He said \"no\".".to_string(),
            offscreen: false,
            speaker: None,
            episode,
        },
    ]
}

#[test]
fn test_write_csv_withRows_shouldReadBackInColumnOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("subtitle_data.csv");

    let written = DatasetWriter::new(&path, OutputFormat::Csv).write(&rows())?;
    assert_eq!(written, 2);

    let mut reader = csv::Reader::from_path(&path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    assert_eq!(headers, COLUMNS.to_vec());

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "00:01:01,000");
    assert_eq!(&records[0][4], "LOGAN: Come on.");
    assert_eq!(&records[0][5], "true");
    assert_eq!(&records[0][6], "LOGAN");
    assert_eq!(&records[0][9], "Contrapasso");
    assert_eq!(&records[1][4], "He said \"no\".");
    assert_eq!(&records[1][6], "");
    assert_eq!(&records[1][10], "Westworld - 1x05 - Contrapasso.en.srt");
    Ok(())
}

#[test]
fn test_write_jsonl_withRows_shouldWriteOneObjectPerLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("data.jsonl");

    DatasetWriter::new(&path, OutputFormat::Jsonl).write(&rows())?;

    let content = fs::read_to_string(&path)?;
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["speaker"], "LOGAN");
    assert_eq!(lines[0]["offscreen"], true);
    assert_eq!(lines[1]["speaker"], serde_json::Value::Null);
    assert_eq!(lines[1]["season_num"], 1);
    Ok(())
}

#[test]
fn test_write_withExistingFile_shouldRefuseWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "subtitle_data.csv", "keep me")?;

    let result = DatasetWriter::new(&path, OutputFormat::Csv).write(&rows());
    assert!(matches!(result, Err(AppError::Output(_))));
    assert_eq!(fs::read_to_string(&path)?, "keep me");

    DatasetWriter::new(&path, OutputFormat::Csv).force_overwrite(true).write(&rows())?;
    assert!(fs::read_to_string(&path)?.starts_with("subtitle_index,"));
    Ok(())
}

#[test]
fn test_write_withEmptyDataset_shouldStillWriteHeader() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested/out.csv");

    DatasetWriter::new(&path, OutputFormat::Csv).write(&[])?;

    assert_eq!(fs::read_to_string(&path)?.trim_end(), COLUMNS.join(","));
    // Only the dataset is left behind, no temporary files
    assert_eq!(fs::read_dir(temp_dir.path().join("nested"))?.count(), 1);
    Ok(())
}

#[test]
fn test_check_destination_withExistingFile_shouldNameForceFlag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "subtitle_data.csv", "keep me")?;

    let err = DatasetWriter::new(&path, OutputFormat::Csv).check_destination().unwrap_err();
    assert!(err.to_string().contains("-f/--force-overwrite"));

    DatasetWriter::new(&path, OutputFormat::Csv).force_overwrite(true).check_destination()?;
    DatasetWriter::new(temp_dir.path().join("fresh.csv"), OutputFormat::Csv).check_destination()?;
    Ok(())
}
