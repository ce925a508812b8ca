use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "abx",
    about = "Android Binary XML toolkit: convert, generate, and semantically compare",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert XML to Android Binary XML
    ToAbx(ToAbxArgs),
    /// Convert Android Binary XML to XML
    ToXml(ToXmlArgs),
    /// Semantically compare two XML documents
    Diff(DiffArgs),
    /// Verify a document survives an encode/decode round trip
    Roundtrip(RoundtripArgs),
    /// Generate a synthetic XML document
    Gen(GenArgs),
}

#[derive(Args)]
pub struct ToAbxArgs {
    /// Input XML file ('-' for stdin)
    pub input: String,
    /// Output ABX file ('-' for stdout)
    pub output: Option<String>,
    /// Overwrite the input file with the converted output
    #[arg(short = 'i', long)]
    pub in_place: bool,
    /// Drop whitespace-only text instead of preserving it
    #[arg(short = 'c', long)]
    pub collapse_whitespace: bool,
}

#[derive(Args)]
pub struct ToXmlArgs {
    /// Input ABX file ('-' for stdin)
    pub input: String,
    /// Output XML file ('-' for stdout, the default)
    pub output: Option<String>,
    /// Overwrite the input file with the converted output
    #[arg(short = 'i', long)]
    pub in_place: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// First XML document
    pub left: String,
    /// Second XML document
    pub right: String,
}

#[derive(Args)]
pub struct RoundtripArgs {
    /// XML document to push through the codec
    pub input: String,
    /// Encode with whitespace collapsing
    #[arg(short = 'c', long)]
    pub collapse_whitespace: bool,
}

#[derive(Args)]
pub struct GenArgs {
    /// Output XML file ('-' for stdout)
    pub output: String,
    /// RNG seed; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the profile's maximum depth
    #[arg(long)]
    pub depth: Option<usize>,
    /// Generation profile (TOML)
    #[arg(long)]
    pub profile: Option<String>,
    /// Mutate an existing document instead of generating a fresh one
    #[arg(long, value_name = "INPUT")]
    pub mutate: Option<String>,
    /// Per-element mutation probability
    #[arg(long, default_value = "0.3")]
    pub change_prob: f64,
}
