use anyhow::{Context, Result};
use markdown_richtext_config::Config;
use markdown_richtext_engine::{DefaultNodeFactory, to_rich_text, to_tree, unescape_newlines};
use std::io::Read;
use std::path::PathBuf;
use std::{env, fs, io, process};

const USAGE: &str = "[--tree] [--unescape-newlines] [--config <path>] <file|->";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    input: Input,
    tree: bool,
    unescape_newlines: bool,
    config_path: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut tree = false;
    let mut unescape = false;
    let mut config_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tree" => tree = true,
            "--unescape-newlines" => unescape = true,
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
            }
            "-" if input.is_none() => input = Some(Input::Stdin),
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            path if input.is_none() => input = Some(Input::File(PathBuf::from(path))),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }

    Ok(Args {
        input: input.ok_or("no input file given")?,
        tree,
        unescape_newlines: unescape,
        config_path,
    })
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
    let config_path = match explicit {
        Some(path) => Config::expand_path(path).unwrap_or_else(|| path.clone()),
        None => Config::config_path(),
    };
    match Config::load_from_path(&config_path)? {
        Some(config) => {
            log::debug!("loaded config from {}", config_path.display());
            Ok(config)
        }
        None => {
            if explicit.is_some() {
                log::warn!("config file {} not found, using defaults", config_path.display());
            }
            Ok(Config::default())
        }
    }
}

fn read_input(input: &Input) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .context("Failed to read Markdown from stdin")?;
            Ok(markdown)
        }
        Input::File(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read Markdown from '{}'", path.display())),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config_path.as_ref())?;
    let mut markdown = read_input(&args.input)?;
    if args.unescape_newlines || config.unescape_newlines {
        markdown = unescape_newlines(&markdown);
    }

    if args.tree {
        let factory = DefaultNodeFactory::new(config.tree.clone());
        let tree = to_tree(&markdown, &config.style, factory)?;
        print!("{}", tree.outline());
    } else {
        print!("{}", to_rich_text(&markdown, &config.style)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("markdown-richtext-cli");

    let parsed = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program} {USAGE}");
            process::exit(1);
        }
    };

    run(&parsed)
}
