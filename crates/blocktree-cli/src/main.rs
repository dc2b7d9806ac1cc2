use anyhow::{Context, Result};
use blocktree_config::Config;
use blocktree_engine::{
    Converter, RawBlock,
    component::serialize_all,
    io::{self, DirectoryReferences},
};
use std::{
    env,
    io::{Read, Write},
    path::PathBuf,
    process,
};

struct Args {
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    init_config: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--config <config.toml>] [blocks.json]\n       {program} [--config <config.toml>] --init-config"
    )
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let program = args.first().map(String::as_str).unwrap_or("blocktree");
    let mut parsed = Args {
        config_path: None,
        input: None,
        init_config: false,
    };

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = rest.next().ok_or_else(|| usage(program))?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            "--init-config" => parsed.init_config = true,
            "--help" | "-h" => return Err(usage(program)),
            _ if parsed.input.is_none() => parsed.input = Some(PathBuf::from(arg)),
            _ => return Err(usage(program)),
        }
    }

    if parsed.init_config && parsed.input.is_some() {
        return Err(usage(program));
    }

    Ok(parsed)
}

/// Writes a default config file, refusing to overwrite an existing one.
fn init_config(args: &Args) -> Result<PathBuf> {
    let path = args.config_path.clone().unwrap_or_else(Config::config_path);
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }
    Config::default().save_to_path(&path)?;
    Ok(path)
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config_path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file not found: {}", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(config)
}

fn read_input(args: &Args) -> Result<Vec<RawBlock>> {
    match &args.input {
        Some(path) => Ok(io::read_blocks_file(path)?),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read blocks from stdin")?;
            Ok(RawBlock::list_from_str(&content)?)
        }
    }
}

fn build_converter(config: &Config) -> Result<Converter> {
    let mut builder = Converter::builder()
        .options(config.converter.clone())
        .registry(config.registry());

    if let Some(dir) = &config.references_dir {
        log::info!("Resolving block references from {}", dir.display());
        builder = builder.references(DirectoryReferences::new(dir)?);
    }

    Ok(builder.build())
}

fn run(args: &Args) -> Result<()> {
    if args.init_config {
        let path = init_config(args)?;
        log::info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = load_config(args)?;
    let converter = build_converter(&config)?;
    let blocks = read_input(args)?;
    log::info!("Converting {} blocks", blocks.len());

    let nodes = converter.convert_blocks(&blocks)?;
    let serialized = serialize_all(&nodes);
    let output = if config.pretty {
        serde_json::to_string_pretty(&serialized)?
    } else {
        serde_json::to_string(&serialized)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

fn main() {
    // Logs go to stderr; RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let raw_args: Vec<String> = env::args().collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Or create a config file at {}", Config::config_path().display());
            process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
