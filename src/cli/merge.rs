// merge.rs - Merge configuration file with CLI arguments

use crate::cli::args::*;
use crate::cli::config::{
    CompareConfig, Config, ExtractConfig, FilterConfig, HousekeepingConfig, SelectConfig,
};
use crate::core::filter::DEFAULT_MIN_SCAFFOLD_LENGTH;
use crate::core::select::DEFAULT_THRESHOLD;
use crate::error::Result;

/// Replace `value` only while it still holds the command line default
fn fill_default<T: PartialEq>(value: &mut T, default: T, from_config: Option<T>) {
    if *value == default {
        if let Some(v) = from_config {
            *value = v;
        }
    }
}

fn fill_string(value: &mut String, default: &str, from_config: Option<String>) {
    if value == default {
        if let Some(v) = from_config {
            *value = v;
        }
    }
}

fn fill_none<T>(value: &mut Option<T>, from_config: Option<T>) {
    if value.is_none() {
        *value = from_config;
    }
}

/// Switches can only be turned on by the config file
fn fill_switch(value: &mut bool, from_config: Option<bool>) {
    if !*value && from_config.unwrap_or(false) {
        *value = true;
    }
}

impl FilterArgs {
    pub fn merge_with_config(mut self, config: FilterConfig) -> Self {
        fill_none(&mut self.input_dir, config.input_dir);
        fill_none(&mut self.output, config.output);
        fill_string(&mut self.layout, DEFAULT_LAYOUT_A, config.layout);
        fill_string(&mut self.extension, DEFAULT_EXTENSION, config.extension);
        fill_none(&mut self.min_identity, config.min_identity);
        fill_none(&mut self.min_length, config.min_length);
        fill_default(
            &mut self.min_scaffold_length,
            DEFAULT_MIN_SCAFFOLD_LENGTH,
            config.min_scaffold_length,
        );
        fill_none(&mut self.fai_dir, config.fai_dir);
        fill_string(
            &mut self.genome_separator,
            DEFAULT_GENOME_SEPARATOR,
            config.genome_separator,
        );
        fill_string(&mut self.label, DEFAULT_LABEL_A, config.label);
        fill_switch(&mut self.strict, config.strict);
        fill_switch(&mut self.provenance, config.provenance);
        fill_none(&mut self.threads, config.threads);
        self
    }
}

impl SelectArgs {
    pub fn merge_with_config(mut self, config: SelectConfig) -> Self {
        fill_none(&mut self.hits, config.hits);
        fill_none(&mut self.fasta_dir, config.fasta_dir);
        fill_string(&mut self.output_dir, DEFAULT_SELECTED_DIR, config.output_dir);
        self
    }
}

impl CompareArgs {
    pub fn merge_with_config(mut self, config: CompareConfig) -> Self {
        fill_none(&mut self.hits_a, config.hits_a);
        fill_none(&mut self.hits_b, config.hits_b);
        fill_string(&mut self.output, DEFAULT_COMPARISON_OUTPUT, config.output);
        fill_string(&mut self.candidates, DEFAULT_CANDIDATES_OUTPUT, config.candidates);
        fill_default(&mut self.threshold, DEFAULT_THRESHOLD, config.threshold);
        fill_string(&mut self.label_a, DEFAULT_LABEL_A, config.label_a);
        fill_string(&mut self.label_b, DEFAULT_LABEL_B, config.label_b);
        fill_string(&mut self.layout_a, DEFAULT_LAYOUT_A, config.layout_a);
        fill_string(&mut self.layout_b, DEFAULT_LAYOUT_B, config.layout_b);
        fill_switch(&mut self.strict, config.strict);
        fill_switch(&mut self.provenance, config.provenance);
        fill_none(&mut self.summary, config.summary);
        self
    }
}

impl ExtractArgs {
    pub fn merge_with_config(mut self, config: ExtractConfig) -> Self {
        fill_string(&mut self.candidates, DEFAULT_CANDIDATES_OUTPUT, config.candidates);
        fill_none(&mut self.genome, config.genome);
        fill_string(&mut self.output, DEFAULT_EXTRACT_OUTPUT, config.output);
        fill_string(&mut self.label_a, DEFAULT_LABEL_A, config.label_a);
        fill_switch(&mut self.strict, config.strict);
        self
    }
}

impl HousekeepingArgs {
    /// An inline keyword list in the config is kept for validation in `keywords`
    pub fn merge_with_config(mut self, config: HousekeepingConfig) -> (Self, Option<Vec<String>>) {
        fill_none(&mut self.annotations, config.annotations);
        fill_none(&mut self.seed_orthologs, config.seed_orthologs);
        fill_string(&mut self.input, DEFAULT_EXTRACT_OUTPUT, config.input);
        fill_string(&mut self.output, DEFAULT_HOUSEKEEPING_OUTPUT, config.output);
        fill_none(&mut self.keywords, config.keywords_file);
        // A keywords file given on the command line wins over an inline list
        let inline = if self.keywords.is_none() {
            config.keywords
        } else {
            None
        };
        (self, inline)
    }
}

/// Arguments after merging, plus config-only settings
#[derive(Debug)]
pub struct MergedArgs {
    pub args: Args,
    pub housekeeping_keywords: Option<Vec<String>>,
}

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> MergedArgs {
        fill_default(&mut self.verbose, DEFAULT_VERBOSE, config.verbose);

        let mut housekeeping_keywords = None;
        self.command = match self.command.take() {
            Some(Command::Filter(a)) => Some(Command::Filter(
                a.merge_with_config(config.filter.unwrap_or_default()),
            )),
            Some(Command::Select(a)) => Some(Command::Select(
                a.merge_with_config(config.select.unwrap_or_default()),
            )),
            Some(Command::Compare(a)) => Some(Command::Compare(
                a.merge_with_config(config.compare.unwrap_or_default()),
            )),
            Some(Command::Extract(a)) => Some(Command::Extract(
                a.merge_with_config(config.extract.unwrap_or_default()),
            )),
            Some(Command::Housekeeping(a)) => {
                let (merged, inline) =
                    a.merge_with_config(config.housekeeping.unwrap_or_default());
                housekeeping_keywords = inline;
                Some(Command::Housekeeping(merged))
            }
            None => None,
        };

        MergedArgs {
            args: self,
            housekeeping_keywords,
        }
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<MergedArgs> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }

    /// No configuration file: arguments as given
    pub fn without_config(self) -> MergedArgs {
        MergedArgs {
            args: self,
            housekeeping_keywords: None,
        }
    }
}
