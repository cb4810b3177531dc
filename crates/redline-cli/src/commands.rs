use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use redline_diff::{Action, DiffOptions, HtmlDiff, Operation};
use redline_tokenizer::{is_tag, is_whitespace, Token};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let options = build_options(&cli.options)?;
    let differ = HtmlDiff::new(options).context("invalid diff options")?;
    match cli.command {
        Command::Diff(args) => cmd_diff(&differ, args),
        Command::Ops(args) => cmd_ops(&differ, args, &cli.format),
        Command::Tokens(args) => cmd_tokens(&differ, args, &cli.format),
    }
}

/// Options from the config file, if any, with command-line flags applied on
/// top.
pub fn build_options(args: &OptionArgs) -> anyhow::Result<DiffOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = read(path)?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => DiffOptions::default(),
    };

    if let Some(granularity) = args.granularity {
        options.match_granularity = granularity;
    }
    if let Some(threshold) = args.orphan_threshold {
        options.orphan_match_threshold = threshold;
    }
    if args.combine_words {
        options.combine_words = true;
    }
    if args.ignore_whitespace {
        options.ignore_whitespace_differences = true;
    }
    options.block_expressions.extend(args.blocks.iter().cloned());

    debug!(?options, "resolved diff options");
    Ok(options)
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_diff(differ: &HtmlDiff, args: DiffArgs) -> anyhow::Result<()> {
    let old = read(&args.old)?;
    let new = read(&args.new)?;
    let html = differ.diff(&old, &new)?;
    match args.output {
        Some(path) => {
            fs::write(&path, &html).with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} Wrote diff to {}", "✓".green().bold(), path.display().to_string().bold());
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn cmd_ops(differ: &HtmlDiff, args: OpsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let old = read(&args.old)?;
    let new = read(&args.new)?;
    let ops = differ.operations(&old, &new)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ops)?),
        OutputFormat::Text => {
            let old_words = differ.tokenizer().tokenize(&old)?;
            let new_words = differ.tokenizer().tokenize(&new)?;
            for op in &ops {
                println!("{}", describe_operation(op, &old_words, &new_words));
            }
            let changed = ops.iter().filter(|op| op.action != Action::Equal).count();
            println!("\n{} regions, {} changed", ops.len().to_string().bold(), changed.to_string().bold());
        }
    }
    Ok(())
}

fn describe_operation(op: &Operation, old: &[Token<'_>], new: &[Token<'_>]) -> String {
    let ranges = format!(
        "old {}..{}  new {}..{}",
        op.start_in_old, op.end_in_old, op.start_in_new, op.end_in_new
    );
    let old_text = old[op.old_range()].concat();
    let new_text = new[op.new_range()].concat();
    match op.action {
        Action::Equal => format!("{:<8} {}", "equal".dimmed(), ranges.dimmed()),
        Action::Insert => format!("{:<8} {}  {}", "insert".green(), ranges, new_text.green()),
        Action::Delete => format!("{:<8} {}  {}", "delete".red(), ranges, old_text.red()),
        Action::Replace => format!(
            "{:<8} {}  {} → {}",
            "replace".yellow(),
            ranges,
            old_text.red(),
            new_text.green()
        ),
    }
}

#[derive(Serialize)]
struct TokenView<'a> {
    index: usize,
    kind: &'static str,
    text: Token<'a>,
}

fn token_kind(token: &str) -> &'static str {
    if is_tag(token) {
        "tag"
    } else if is_whitespace(token) {
        "whitespace"
    } else {
        "text"
    }
}

fn cmd_tokens(differ: &HtmlDiff, args: TokensArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let text = read(&args.file)?;
    let tokens = differ.tokenizer().tokenize(&text)?;
    let views: Vec<TokenView<'_>> = tokens
        .iter()
        .enumerate()
        .map(|(index, &text)| TokenView {
            index,
            kind: token_kind(text),
            text,
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
        OutputFormat::Text => {
            for view in &views {
                let kind = match view.kind {
                    "tag" => view.kind.cyan(),
                    "whitespace" => view.kind.dimmed(),
                    _ => view.kind.normal(),
                };
                println!("{:>5}  {:<10}  {:?}", view.index, kind, view.text);
            }
            println!("\n{} tokens", views.len().to_string().bold());
        }
    }
    Ok(())
}
