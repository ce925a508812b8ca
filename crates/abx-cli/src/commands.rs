use std::io::{Read, Write};
use std::time::Instant;

use anyhow::Context;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use abx_codec::EncodeOptions;
use abx_diff::{diff_elements, render_report, TreeDiff};
use abx_gen::GenProfile;
use abx_tree::Element;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::ToAbx(args) => cmd_to_abx(args),
        Command::ToXml(args) => cmd_to_xml(args),
        Command::Diff(args) => cmd_diff(args, &cli.format),
        Command::Roundtrip(args) => cmd_roundtrip(args, &cli.format),
        Command::Gen(args) => cmd_gen(args),
    }
}

fn cmd_to_abx(args: ToAbxArgs) -> anyhow::Result<()> {
    let output = resolve_output(&args.input, args.output.as_deref(), args.in_place)?;
    let xml = read_to_string(&args.input)?;

    let options = EncodeOptions {
        preserve_whitespace: !args.collapse_whitespace,
    };
    let mut abx = Vec::new();
    abx_codec::encode_str(&xml, &mut abx, options)
        .with_context(|| format!("failed to encode {}", display_name(&args.input)))?;

    debug!(xml_bytes = xml.len(), abx_bytes = abx.len(), "encoded");
    write_bytes(&output, &abx)
}

fn cmd_to_xml(args: ToXmlArgs) -> anyhow::Result<()> {
    let output = resolve_output(&args.input, args.output.as_deref(), args.in_place)?;
    let abx = read_bytes(&args.input)?;

    let xml = abx_codec::decode_to_string(&abx)
        .with_context(|| format!("failed to decode {}", display_name(&args.input)))?;

    write_bytes(&output, xml.as_bytes())
}

fn cmd_diff(args: DiffArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let left = parse_document(&args.left)?;
    let right = parse_document(&args.right)?;

    let diff = diff_elements(&left, &right);
    print_diff(&diff, format);
    Ok(())
}

fn cmd_roundtrip(args: RoundtripArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let xml = read_to_string(&args.input)?;
    let original = abx_tree::parse_str(&xml)
        .with_context(|| format!("failed to parse {}", display_name(&args.input)))?;

    let options = EncodeOptions {
        preserve_whitespace: !args.collapse_whitespace,
    };

    let encode_start = Instant::now();
    let mut abx = Vec::new();
    abx_codec::encode_str(&xml, &mut abx, options)?;
    let encode_time = encode_start.elapsed();

    let decode_start = Instant::now();
    let restored_xml = abx_codec::decode_to_string(&abx)?;
    let decode_time = decode_start.elapsed();

    let restored = abx_tree::parse_str(&restored_xml)
        .context("decoded output failed to parse")?;
    let diff = diff_elements(&original, &restored);

    println!(
        "  xml: {} bytes, abx: {} bytes ({:.1}% of original)",
        xml.len().to_string().bold(),
        abx.len().to_string().bold(),
        100.0 * abx.len() as f64 / xml.len().max(1) as f64,
    );
    println!(
        "  encode: {:.2?}, decode: {:.2?}",
        encode_time, decode_time
    );

    print_diff(&diff, format);
    if diff.is_empty() {
        println!("{} Round trip verified", "✓".green().bold());
        Ok(())
    } else {
        anyhow::bail!("round trip produced {} difference(s)", diff.len());
    }
}

fn cmd_gen(args: GenArgs) -> anyhow::Result<()> {
    let mut profile = match &args.profile {
        Some(path) => GenProfile::from_file(path)
            .with_context(|| format!("failed to load profile {path}"))?,
        None => GenProfile::default(),
    };
    if let Some(depth) = args.depth {
        profile.max_depth = depth;
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let document = match &args.mutate {
        Some(input) => {
            let base = parse_document(input)?;
            abx_gen::mutate(&mut rng, &base, args.change_prob)
        }
        None => abx_gen::generate(&mut rng, &profile),
    };

    let xml = abx_tree::xml_to_string_pretty(&document)?;
    write_bytes(&args.output, xml.as_bytes())?;

    if args.output != "-" {
        println!(
            "{} Generated {} ({} elements, {} bytes)",
            "✓".green().bold(),
            args.output.bold(),
            document.subtree_size(),
            xml.len(),
        );
    }
    Ok(())
}

fn print_diff(diff: &TreeDiff, format: &OutputFormat) {
    match format {
        OutputFormat::Text => print!(
            "{}",
            ensure_trailing_newline(render_report(diff))
        ),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(diff).expect("diff records serialize")
            );
        }
    }
}

fn ensure_trailing_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

fn parse_document(path: &str) -> anyhow::Result<Element> {
    let xml = read_to_string(path)?;
    abx_tree::parse_str(&xml).with_context(|| format!("failed to parse {}", display_name(path)))
}

fn resolve_output(input: &str, output: Option<&str>, in_place: bool) -> anyhow::Result<String> {
    if in_place {
        if input == "-" {
            anyhow::bail!("cannot convert stdin in place");
        }
        return Ok(input.to_string());
    }
    Ok(output.unwrap_or("-").to_string())
}

fn display_name(path: &str) -> &str {
    if path == "-" {
        "<stdin>"
    } else {
        path
    }
}

fn read_to_string(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

fn read_bytes(path: &str) -> anyhow::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("failed to read {path}"))
    }
}

fn write_bytes(path: &str, data: &[u8]) -> anyhow::Result<()> {
    if path == "-" {
        std::io::stdout()
            .write_all(data)
            .context("failed to write stdout")?;
        Ok(())
    } else {
        std::fs::write(path, data).with_context(|| format!("failed to write {path}"))
    }
}
