//! localesync push command.

use anyhow::Result;
use serde::Serialize;

use localesync::{Config, HttpDirectory, PushResult, PushSummary};

use super::CliError;
use crate::output::Output;

/// JSON output for the push command.
#[derive(Serialize)]
struct PushOutput<'a> {
    files: &'a [PushResult],
    summary: PushCounts,
}

#[derive(Serialize)]
struct PushCounts {
    uploaded: usize,
    created: usize,
    failed: usize,
    translation_keys_created: u64,
    translations_created: u64,
    translations_updated: u64,
}

fn report(output: &Output, result: &PushResult) {
    if output.is_json() {
        return;
    }
    match &result.error {
        Some(e) => output.error(&format!("Failed to push {}: {e}", result.path.display())),
        None => {
            let verb = if result.created { "Created and uploaded" } else { "Uploaded" };
            output.success(&format!("{verb} {} ({})", result.path.display(), result.locale));
            if result.summary.has_changes() {
                output.info(&format!(
                    "  keys created: {}, translations created: {}, translations updated: {}",
                    result.summary.translation_keys_created,
                    result.summary.translations_created,
                    result.summary.translations_updated
                ));
            }
        }
    }
}

/// Run the push command.
pub fn run(output: &Output, config: &Config, branch: Option<&str>) -> Result<()> {
    let sources = config.sources()?;

    let mut summary = PushSummary::default();
    for source in &sources {
        log::debug!("Pushing source {}", source.file);
        let directory = HttpDirectory::new(config.host(), source.access_token.as_str())?;
        let pushed = source.push(&directory, branch, |result| report(output, result))?;
        summary.merge(pushed);
    }

    if output.is_json() {
        output.json(&PushOutput {
            files: &summary.results,
            summary: PushCounts {
                uploaded: summary.uploaded,
                created: summary.created,
                failed: summary.failed,
                translation_keys_created: summary.remote.translation_keys_created,
                translations_created: summary.remote.translations_created,
                translations_updated: summary.remote.translations_updated,
            },
        });
    } else if !output.is_quiet() {
        output.info(&format!(
            "Summary: {} uploaded, {} locales created, {} failed",
            summary.uploaded, summary.created, summary.failed
        ));
    }

    if summary.failed > 0 {
        return Err(CliError::PushFailed(summary.failed).into());
    }
    Ok(())
}
