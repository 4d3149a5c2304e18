// args.rs - Command line arguments definition

use argh::FromArgs;

pub const DEFAULT_VERBOSE: u8 = 1;
pub const DEFAULT_LABEL_A: &str = "fungi";
pub const DEFAULT_LABEL_B: &str = "plant";
pub const DEFAULT_LAYOUT_A: &str = "full";
pub const DEFAULT_LAYOUT_B: &str = "reduced";
pub const DEFAULT_EXTENSION: &str = "blast";
pub const DEFAULT_GENOME_SEPARATOR: &str = "_VS_";
pub const DEFAULT_COMPARISON_OUTPUT: &str = "fungi_vs_plant_comparison.tsv";
pub const DEFAULT_CANDIDATES_OUTPUT: &str = "hgt_candidates.tsv";
pub const DEFAULT_SELECTED_DIR: &str = "selected";
pub const DEFAULT_EXTRACT_OUTPUT: &str = "hgt_candidates.fasta";
pub const DEFAULT_HOUSEKEEPING_OUTPUT: &str = "hgt_filtered.fasta";

#[derive(FromArgs, Debug)]
/// hgtscan - Best-hit comparison pipeline for horizontal gene transfer candidates
pub struct Args {
    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// log verbosity: 0 = warnings, 1 = info, 2 = debug (default: 1)
    #[argh(option, default = "DEFAULT_VERBOSE")]
    pub verbose: u8,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
pub enum Command {
    Filter(FilterArgs),
    Select(SelectArgs),
    Compare(CompareArgs),
    Extract(ExtractArgs),
    Housekeeping(HousekeepingArgs),
}

#[derive(FromArgs, Debug)]
/// Filter a directory of raw aligner results into one tagged hit table
#[argh(subcommand, name = "filter")]
pub struct FilterArgs {
    /// directory of raw aligner result files
    #[argh(option)]
    pub input_dir: Option<String>,

    /// output tagged hit table
    #[argh(option)]
    pub output: Option<String>,

    /// layout of the raw files: full (12 columns) or reduced (6 columns) (default: full)
    #[argh(option, default = "String::from(DEFAULT_LAYOUT_A)")]
    pub layout: String,

    /// extension of the raw result files (default: blast)
    #[argh(option, default = "String::from(DEFAULT_EXTENSION)")]
    pub extension: String,

    /// minimum percent identity (default: 80 for full layout, 0 for reduced)
    #[argh(option)]
    pub min_identity: Option<f64>,

    /// minimum alignment length in bp (default: 500 for full layout, 0 for reduced)
    #[argh(option)]
    pub min_length: Option<u64>,

    /// minimum query scaffold length in bp, applied with --fai-dir (default: 20000)
    #[argh(option, default = "crate::core::filter::DEFAULT_MIN_SCAFFOLD_LENGTH")]
    pub min_scaffold_length: u64,

    /// directory of .fai indexes named after the genome tag
    #[argh(option)]
    pub fai_dir: Option<String>,

    /// separator before the genome tag in result file names (default: _VS_)
    #[argh(option, default = "String::from(DEFAULT_GENOME_SEPARATOR)")]
    pub genome_separator: String,

    /// population label naming the genome column (default: fungi)
    #[argh(option, default = "String::from(DEFAULT_LABEL_A)")]
    pub label: String,

    /// abort on the first malformed row instead of skipping it
    #[argh(switch)]
    pub strict: bool,

    /// write command and timestamp comment lines at the top of the output
    #[argh(switch)]
    pub provenance: bool,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,
}

#[derive(FromArgs, Debug)]
/// Extract the subject sequences hit by a tagged hit table
#[argh(subcommand, name = "select")]
pub struct SelectArgs {
    /// tagged hit table providing the sseqid column
    #[argh(option)]
    pub hits: Option<String>,

    /// directory of FASTA files to select from
    #[argh(option)]
    pub fasta_dir: Option<String>,

    /// output directory for selected_<name>.fasta files (default: selected)
    #[argh(option, default = "String::from(DEFAULT_SELECTED_DIR)")]
    pub output_dir: String,
}

#[derive(FromArgs, Debug)]
/// Compare best hits of two populations and select transfer candidates
#[argh(subcommand, name = "compare")]
pub struct CompareArgs {
    /// tagged hit table of population A
    #[argh(option)]
    pub hits_a: Option<String>,

    /// tagged hit table of population B
    #[argh(option)]
    pub hits_b: Option<String>,

    /// full comparison output (default: fungi_vs_plant_comparison.tsv)
    #[argh(option, default = "String::from(DEFAULT_COMPARISON_OUTPUT)")]
    pub output: String,

    /// candidate output (default: hgt_candidates.tsv)
    #[argh(option, default = "String::from(DEFAULT_CANDIDATES_OUTPUT)")]
    pub candidates: String,

    /// differential score a candidate must exceed (default: 0)
    #[argh(option, default = "crate::core::select::DEFAULT_THRESHOLD")]
    pub threshold: f64,

    /// label of population A (default: fungi)
    #[argh(option, default = "String::from(DEFAULT_LABEL_A)")]
    pub label_a: String,

    /// label of population B (default: plant)
    #[argh(option, default = "String::from(DEFAULT_LABEL_B)")]
    pub label_b: String,

    /// column layout of population A: full or reduced (default: full)
    #[argh(option, default = "String::from(DEFAULT_LAYOUT_A)")]
    pub layout_a: String,

    /// column layout of population B: full or reduced (default: reduced)
    #[argh(option, default = "String::from(DEFAULT_LAYOUT_B)")]
    pub layout_b: String,

    /// abort on the first malformed row instead of skipping it
    #[argh(switch)]
    pub strict: bool,

    /// write command and timestamp comment lines at the top of both outputs
    #[argh(switch)]
    pub provenance: bool,

    /// write a JSON run summary to this file
    #[argh(option)]
    pub summary: Option<String>,
}

#[derive(FromArgs, Debug)]
/// Extract candidate regions from the genome of population A
#[argh(subcommand, name = "extract")]
pub struct ExtractArgs {
    /// candidate or comparison table (default: hgt_candidates.tsv)
    #[argh(option, default = "String::from(DEFAULT_CANDIDATES_OUTPUT)")]
    pub candidates: String,

    /// genome FASTA the population A targets come from
    #[argh(option)]
    pub genome: Option<String>,

    /// output FASTA (default: hgt_candidates.fasta)
    #[argh(option, default = "String::from(DEFAULT_EXTRACT_OUTPUT)")]
    pub output: String,

    /// label of population A in the table (default: fungi)
    #[argh(option, default = "String::from(DEFAULT_LABEL_A)")]
    pub label_a: String,

    /// abort on the first row with invalid coordinates
    #[argh(switch)]
    pub strict: bool,
}

#[derive(FromArgs, Debug)]
/// Remove housekeeping genes from candidate sequences
#[argh(subcommand, name = "housekeeping")]
pub struct HousekeepingArgs {
    /// eggNOG-mapper .annotations file
    #[argh(option)]
    pub annotations: Option<String>,

    /// eggNOG-mapper .seed_orthologs file
    #[argh(option)]
    pub seed_orthologs: Option<String>,

    /// candidate FASTA (default: hgt_candidates.fasta)
    #[argh(option, default = "String::from(DEFAULT_EXTRACT_OUTPUT)")]
    pub input: String,

    /// filtered output FASTA (default: hgt_filtered.fasta)
    #[argh(option, default = "String::from(DEFAULT_HOUSEKEEPING_OUTPUT)")]
    pub output: String,

    /// file of housekeeping keywords, one per line (default: built-in list)
    #[argh(option)]
    pub keywords: Option<String>,
}
