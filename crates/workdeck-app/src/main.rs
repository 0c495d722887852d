//! Workdeck preview binary - composition root.
//!
//! Plays the host's part for one refresh:
//! 1. Load configuration from TOML
//! 2. Load the record export and push it through `update_view`
//! 3. Run the requested user action against the dashboard control
//! 4. Print the rendered frame and the drained output actions

mod cli;

use std::path::Path;

use clap::Parser;

use workdeck_core::config::WorkdeckConfig;
use workdeck_core::Timestamp;
use workdeck_host::{DashboardControl, UpdateContext};
use workdeck_ingest::RecordSet;

use cli::{CliArgs, Command};

fn load_records(path: Option<&Path>) -> Result<RecordSet, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::warn!("No record export given, starting with an empty collection");
        return Ok(RecordSet::new());
    };
    let json = std::fs::read_to_string(path)?;
    let records = RecordSet::from_json(&json)?;
    tracing::info!(path = %path.display(), count = records.len(), "Records loaded");
    Ok(records)
}

fn run_command(
    control: &mut DashboardControl,
    command: &Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Gallery => {}
        Command::Detail { card_id } => control.select_card(card_id)?,
        Command::Analytics => control.open_analytics()?,
        Command::Send { card_id, edit } => {
            control.select_card(card_id)?;
            if let Some(text) = edit {
                control.begin_edit()?;
                control.update_edit(text)?;
            }
            control.request_send()?;
            control.confirm_send(Timestamp::now())?;
        }
        Command::Copy { card_id } => control.copy_draft(card_id)?,
        Command::Dismiss { card_id } => control.dismiss_card(card_id)?,
        Command::Ask { text, card_id } => {
            if let Some(id) = card_id {
                control.select_card(id)?;
            }
            if !control.submit_command(text)? {
                tracing::warn!("Command ignored");
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = WorkdeckConfig::load_or_default(&config_file);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Workdeck v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let records = load_records(args.records.as_deref())?;

    let mut control = DashboardControl::new(config);
    control.init(Box::new(|| tracing::debug!("Output actions pending")));

    let ctx = UpdateContext::new(&records, Timestamp::now())
        .with_filters(args.filters())
        .with_size(args.width, args.height);
    control.update_view(ctx);

    if let Err(e) = run_command(&mut control, &args.command) {
        tracing::error!(error = %e, "Action refused");
        return Err(e);
    }

    let frame = control.render();
    println!("{}", frame);

    let outputs = control.get_outputs();
    if !outputs.is_empty() {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workdeck_ingest::normalizer::{COL_FULL_JSON, COL_HUMANIZED_DRAFT, COL_SENDER_EMAIL};
    use workdeck_ingest::MemoryRecord;

    fn records() -> RecordSet {
        let payload = json!({
            "trigger_type": "EMAIL",
            "triage_tier": "FULL",
            "card_status": "READY",
            "item_summary": "Quarterly review invite",
        });
        RecordSet::from_records(vec![MemoryRecord::new("c1")
            .with_value(COL_FULL_JSON, payload.to_string())
            .with_value(COL_HUMANIZED_DRAFT, "Happy to join on Tuesday.")
            .with_value(COL_SENDER_EMAIL, "dana@contoso.com")])
    }

    fn refreshed(records: &RecordSet) -> DashboardControl {
        let mut control = DashboardControl::new(WorkdeckConfig::default());
        control.update_view(UpdateContext::new(records, Timestamp::now()));
        control
    }

    #[test]
    fn test_send_command_emits_edited_payload() {
        let records = records();
        let mut control = refreshed(&records);

        let command = Command::Send {
            card_id: "c1".into(),
            edit: Some("Thursday works better for me.".into()),
        };
        run_command(&mut control, &command).unwrap();

        let outputs = control.get_outputs();
        assert_eq!(outputs.selected_card_id, "c1");
        let payload: serde_json::Value =
            serde_json::from_str(&outputs.send_draft_action).unwrap();
        assert_eq!(payload["cardId"], "c1");
        assert_eq!(payload["finalText"], "Thursday works better for me.");
        assert!(payload["editDistanceRatio"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_send_command_as_is_has_zero_ratio() {
        let records = records();
        let mut control = refreshed(&records);

        let command = Command::Send {
            card_id: "c1".into(),
            edit: None,
        };
        run_command(&mut control, &command).unwrap();

        let payload: serde_json::Value =
            serde_json::from_str(&control.get_outputs().send_draft_action).unwrap();
        assert_eq!(payload["finalText"], "Happy to join on Tuesday.");
        assert_eq!(payload["editDistanceRatio"], 0);
    }

    #[test]
    fn test_send_command_for_unknown_card_is_refused() {
        let records = records();
        let mut control = refreshed(&records);

        let command = Command::Send {
            card_id: "missing".into(),
            edit: None,
        };
        assert!(run_command(&mut control, &command).is_err());
        assert!(control.get_outputs().is_empty());
    }
}
