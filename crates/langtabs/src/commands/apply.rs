//! `langtabs apply` command implementation.

use std::path::PathBuf;

use clap::Args;
use langtabs_config::{CliSettings, Config};
use langtabs_grouper::Enhancer;

use crate::error::CliError;
use crate::output::Output;
use crate::site::{SiteProcessor, discover_pages};

/// Arguments for the apply command.
#[derive(Args)]
pub(crate) struct ApplyArgs {
    /// Path to configuration file (default: auto-discover langtabs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rendered site directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory (overrides config; default rewrites pages in place).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Recognized language, in priority order; repeat for several (overrides config).
    #[arg(short, long = "lang", value_name = "LANG")]
    languages: Vec<String>,

    /// Process pages without writing anything.
    #[arg(long)]
    dry_run: bool,
}

impl ApplyArgs {
    /// Execute the apply command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a page can't be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            languages: (!self.languages.is_empty()).then_some(self.languages),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = &config.site_resolved;

        output.info(&format!("Source: {}", site.source_dir.display()));
        match &site.output_dir {
            Some(dir) => output.info(&format!("Output: {}", dir.display())),
            None => output.info("Output: in place"),
        }
        output.info(&format!("Languages: {}", config.tabs.languages.join(", ")));
        if config.tabs.languages.is_empty() {
            output.warning("No languages configured, nothing will be grouped");
        }

        let pages = discover_pages(
            &site.source_dir,
            &site.page_filter()?,
            site.output_dir.as_deref(),
        )?;
        if pages.is_empty() {
            output.warning("No pages found");
            return Ok(());
        }

        let enhancer = Enhancer::new().with_lang_tabs(config.tabs.languages.iter().cloned());
        let processor =
            SiteProcessor::new(enhancer, site.output_dir.clone()).with_dry_run(self.dry_run);

        let mut tabbed_pages = 0;
        let mut groups = 0;
        let mut tab_controls = 0;
        let mut written = 0;
        for page in &pages {
            let outcome = processor.process(page)?;
            groups += outcome.groups;
            if outcome.tab_controls > 0 {
                tabbed_pages += 1;
                tab_controls += outcome.tab_controls;
                output.detail(&format!(
                    "  {} ({} tab groups)",
                    page.relative, outcome.tab_controls
                ));
            }
            if outcome.written {
                written += 1;
            }
        }

        let summary = format!(
            "{tab_controls} tab groups ({groups} code block runs) in {tabbed_pages} of {} pages, \
             {written} pages written",
            pages.len()
        );
        if self.dry_run {
            output.highlight(&format!("Dry run: {summary}"));
        } else {
            output.success(&summary);
        }
        Ok(())
    }
}
