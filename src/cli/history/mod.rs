//! History commands - record and list interactions from the command line

use chrono::{DateTime, Utc};
use clap::Args;

use crate::domain::recent::{format_relative, FeatureTag, InteractionRecord, Payload};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Feature tag, e.g. TextToImage or text-to-image
    pub feature: String,

    /// Payload field as key=value (repeatable)
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Feature tag; omit to show the merged view across features
    pub feature: Option<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Record an interaction and print the feature's updated history
pub async fn add(args: AddArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let state = crate::create_app_state(&config).await?;

    let tag = FeatureTag::new(&args.feature)?;
    let payload: Payload = args.fields.into_iter().collect();

    let records = state.recent_searches.add_record(&tag, payload).await?;
    print_records(&records, false)
}

/// Print one feature's history or the merged view
pub async fn list(args: ListArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let state = crate::create_app_state(&config).await?;

    let records = match args.feature {
        Some(feature) => {
            let tag = FeatureTag::new(&feature)?;
            state.recent_searches.get_records(&tag).await
        }
        None => state.recent_searches.get_all_records().await,
    };

    print_records(&records, args.json)
}

fn print_records(records: &[InteractionRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    let now = Utc::now();

    for record in records {
        println!("{}", render_line(record, now));
    }

    Ok(())
}

fn render_line(record: &InteractionRecord, now: DateTime<Utc>) -> String {
    format!(
        "{:<12} {}  ({})",
        record.feature(),
        record.preview(),
        format_relative(record.timestamp(), now)
    )
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recent::{Feature, RecordId};
    use chrono::Duration;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("prompt=a cat=dog"),
            Ok(("prompt".to_string(), "a cat=dog".to_string()))
        );
        assert_eq!(parse_field("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_render_line() {
        let now = DateTime::from_timestamp_millis(1_714_564_800_000).unwrap();
        let record = InteractionRecord::new(
            RecordId::new(1),
            now - Duration::hours(2),
            Feature::VoiceToText.into(),
            Payload::new().with("text", "hello"),
        );

        assert_eq!(render_line(&record, now), "VoiceToText  hello  (2h ago)");
    }
}
