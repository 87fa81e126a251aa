//! `langtabs inspect` command implementation.

use std::path::PathBuf;

use clap::Args;
use langtabs_config::{CliSettings, Config};
use langtabs_grouper::{HtmlPage, TabGrouper};
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// HTML pages to inspect.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover langtabs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recognized language, in priority order; repeat for several (overrides config).
    #[arg(short, long = "lang", value_name = "LANG")]
    languages: Vec<String>,

    /// Print the report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

/// Groups found in one page.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct PageReport {
    path: PathBuf,
    groups: Vec<GroupReport>,
}

/// One group of adjacent recognized code blocks.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct GroupReport {
    languages: Vec<String>,
    tabbed: bool,
}

impl InspectArgs {
    /// Execute the inspect command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a page can't be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            languages: (!self.languages.is_empty()).then_some(self.languages),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let grouper = TabGrouper::new(config.tabs.languages.iter().cloned());

        let reports = self
            .files
            .into_iter()
            .map(|path| inspect_page(&grouper, path))
            .collect::<Result<Vec<_>, _>>()?;

        if self.json {
            output.data(&serde_json::to_string_pretty(&reports)?);
            return Ok(());
        }

        for report in &reports {
            output.highlight(&report.path.display().to_string());
            if report.groups.is_empty() {
                output.detail("  no recognized code blocks");
            }
            for (idx, group) in report.groups.iter().enumerate() {
                let line = format!("  #{idx}: {}", group.languages.join(" | "));
                if group.tabbed {
                    output.success(&line);
                } else {
                    output.detail(&format!("{line} (single, not tabbed)"));
                }
            }
        }
        Ok(())
    }
}

fn inspect_page(grouper: &TabGrouper, path: PathBuf) -> Result<PageReport, CliError> {
    let html = std::fs::read_to_string(&path).map_err(CliError::page(&path))?;
    let page = HtmlPage::parse(&html);
    let groups = grouper
        .scan(&page)
        .iter()
        .map(|group| GroupReport {
            languages: group.languages().map(str::to_owned).collect(),
            tabbed: group.is_tabbable(),
        })
        .collect();
    Ok(PageReport { path, groups })
}
