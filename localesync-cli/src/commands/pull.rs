//! localesync pull command.

use anyhow::Result;
use serde::Serialize;

use localesync::{Config, HttpDirectory, LocaleCache, PullResult, PullSummary};

use super::CliError;
use crate::output::Output;

/// JSON output for the pull command.
#[derive(Serialize)]
struct PullOutput<'a> {
    files: &'a [PullResult],
    summary: PullCounts,
}

#[derive(Serialize)]
struct PullCounts {
    downloaded: usize,
    failed: usize,
}

/// Run the pull command.
pub fn run(output: &Output, config: &Config, branch: Option<&str>) -> Result<()> {
    let targets = config.targets()?;

    let mut cache = LocaleCache::new();
    let mut summary = PullSummary::default();
    let pb = output.file_progress(0);

    for target in &targets {
        log::debug!("Pulling target {}", target.file);
        let directory = HttpDirectory::new(config.host(), target.access_token.as_str())?;
        let pulled = target.pull(&directory, &mut cache, branch, |result| {
            pb.inc_length(1);
            pb.inc(1);
            if output.is_json() {
                return;
            }
            pb.suspend(|| match (&result.error, &result.path) {
                (Some(e), _) => output.warn(&format!("Skipped {}: {e}", result.locale)),
                (None, Some(path)) => {
                    output.success(&format!("Downloaded {} to {}", result.locale, path.display()))
                }
                (None, None) => output.success(&format!("Downloaded {}", result.locale)),
            });
        })?;
        summary.merge(pulled);
    }

    pb.finish_and_clear();

    if output.is_json() {
        output.json(&PullOutput {
            files: &summary.results,
            summary: PullCounts {
                downloaded: summary.downloaded,
                failed: summary.failed,
            },
        });
    } else if !output.is_quiet() {
        output.info(&format!(
            "Summary: {} downloaded, {} failed",
            summary.downloaded, summary.failed
        ));
    }

    if summary.failed > 0 {
        return Err(CliError::PullFailed(summary.failed).into());
    }
    Ok(())
}
