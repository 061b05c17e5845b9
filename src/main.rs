use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use deepmerge_cli::config::{
	discover_layers, load_merged_layers, parse_assignments, parse_mapping_file, user_layer_path,
	write_mapping_file,
};
use deepmerge_cli::merge::{MergeOptions, SequencePolicy, deep_update_with, merge_dicts_with};
use deepmerge_cli::node::Mapping;

#[derive(Parser)]
#[command(name = "deepmerge")]
#[command(
	author,
	version,
	about = "Deep-merge layered TOML configuration with override-wins semantics"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Increase log verbosity (-d info, -dd debug, -ddd trace)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	debug: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Merge OVERRIDE over BASE and print the result
	Merge {
		/// Base configuration file
		base: PathBuf,

		/// Override configuration file
		#[arg(value_name = "OVERRIDE")]
		overlay: PathBuf,

		#[command(flatten)]
		merge: MergeArgs,
	},
	/// Deep-update TARGET with each SOURCE in order
	Update {
		/// Configuration file to update
		target: PathBuf,

		/// Source files, applied left to right
		sources: Vec<PathBuf>,

		/// Write the result back to TARGET instead of printing it
		#[arg(long)]
		in_place: bool,

		#[command(flatten)]
		merge: MergeArgs,
	},
	/// Display the effective configuration of the layer cascade
	Show {
		#[command(flatten)]
		merge: MergeArgs,
	},
	/// Check all layer files for errors without merging anything
	Validate,
}

#[derive(Args)]
struct MergeArgs {
	/// Override a value, e.g. --set params.car=4gheap (repeatable).
	/// Quote segments that contain dots: --set 'settings."cache.size"=5%'
	#[arg(long = "set", value_name = "KEY=VALUE")]
	set: Vec<String>,

	/// How sequences under the same key combine: concat, union or replace
	#[arg(long, value_name = "POLICY", default_value_t = SequencePolicy::Concat)]
	sequences: SequencePolicy,
}

impl MergeArgs {
	fn options(&self) -> MergeOptions {
		MergeOptions::with_sequences(self.sequences)
	}

	/// Apply `--set` assignments as a final override layer.
	fn apply_assignments(&self, target: &mut Mapping) -> Result<()> {
		if self.set.is_empty() {
			return Ok(());
		}
		let overrides = parse_assignments(&self.set).context("Invalid --set override")?;
		deep_update_with(target, [&overrides], self.options());
		Ok(())
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_logging(cli.debug);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn setup_logging(verbosity: u8) {
	let level = match verbosity {
		0 => LevelFilter::WARN,
		1 => LevelFilter::INFO,
		2 => LevelFilter::DEBUG,
		_ => LevelFilter::TRACE,
	};

	// RUST_LOG wins over -d when set.
	let filter = EnvFilter::builder()
		.with_default_directive(level.into())
		.from_env_lossy();

	let fmt_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(true)
		.with_thread_names(false)
		.with_filter(filter);

	tracing_subscriber::registry().with(fmt_layer).init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	match cli.command {
		Commands::Merge {
			base,
			overlay,
			merge,
		} => handle_merge(&base, &overlay, &merge),
		Commands::Update {
			target,
			sources,
			in_place,
			merge,
		} => handle_update(&target, &sources, in_place, &merge),
		Commands::Show { merge } => handle_show(&merge),
		Commands::Validate => handle_validate(),
	}
}

fn read_mapping(path: &Path) -> Result<Mapping> {
	parse_mapping_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn render(mapping: &Mapping) -> Result<String> {
	mapping
		.to_toml_string()
		.context("Failed to render merged configuration")
}

fn handle_merge(base: &Path, overlay: &Path, args: &MergeArgs) -> Result<ExitCode> {
	let base = read_mapping(base)?;
	let overlay = read_mapping(overlay)?;

	let mut merged = merge_dicts_with(&base, &overlay, args.options()).into_mapping();
	args.apply_assignments(&mut merged)?;

	print!("{}", render(&merged)?);
	Ok(ExitCode::SUCCESS)
}

fn handle_update(
	target_path: &Path,
	source_paths: &[PathBuf],
	in_place: bool,
	args: &MergeArgs,
) -> Result<ExitCode> {
	let mut target = read_mapping(target_path)?;
	let sources = source_paths
		.iter()
		.map(|path| read_mapping(path))
		.collect::<Result<Vec<_>>>()?;

	deep_update_with(&mut target, &sources, args.options());
	args.apply_assignments(&mut target)?;

	if in_place {
		write_mapping_file(target_path, &target).context("Failed to update in place")?;
		println!("Updated {}", target_path.display());
	} else {
		print!("{}", render(&target)?);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_show(args: &MergeArgs) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let mut merged =
		load_merged_layers(&cwd, args.options()).context("Failed to discover layer files")?;

	if merged.sources.is_empty() && args.set.is_empty() {
		println!("No layer files found.");
		return Ok(ExitCode::SUCCESS);
	}

	args.apply_assignments(&mut merged.data)?;

	println!("# Layers (in merge order):");
	for source in &merged.sources {
		println!("# Source: {}", source.display());
	}
	if !args.set.is_empty() {
		println!("# Source: --set ({} overrides)", args.set.len());
	}
	println!();
	print!("{}", render(&merged.data)?);

	Ok(ExitCode::SUCCESS)
}

fn handle_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_layers(&cwd) {
		Ok(layers) => {
			if layers.is_empty() {
				println!("No layer files found.");
			} else {
				println!("All layer files are valid:");
				for loaded in &layers {
					let root = if loaded.layer.meta.root { ", root" } else { "" };
					println!(
						"  {} ({} keys{})",
						loaded.path.display(),
						loaded.layer.data.len(),
						root
					);
				}
			}
			if let Ok(user_path) = user_layer_path() {
				println!("User layer path: {}", user_path.display());
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Layer error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
