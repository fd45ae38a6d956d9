use std::{path::PathBuf, sync::Arc};

use balderdash::{
	Clock, DocumentStore, FsVault, KeywordDates, RandomIds, Settings, SystemClock,
	cancel::{CancelScope, cancel_tasks},
	pipeline::Pipeline,
	processors::{Services, TaskFileProcessor},
};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod shell_init;

#[derive(Debug, Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " ", env!("GIT_HASH")), about, long_about = None)]
pub struct Cli {
	/// Root of the vault; document paths are relative to it
	#[arg(long, global = true, default_value = ".")]
	vault: PathBuf,
	/// Settings file. Defaults to $XDG_CONFIG_HOME/balderdash/config.toml
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Move a fragment of a document into its own note and file everything it asks for
	Block(FragmentArgs),
	/// File the tasks, resources and acronyms in a fragment, in place
	Selection(FragmentArgs),
	/// Cancel the open tasks read from stdin
	Cancel(CancelArgs),
	/// Re-file the checklist lines read from stdin by their own context
	FileTasks(FileTasksArgs),
	/// Shell aliases and completions
	ShellInit(shell_init::ShellInitArgs),
}

#[derive(Args, Debug)]
struct FragmentArgs {
	/// Document the fragment comes from, relative to the vault
	#[arg(long)]
	file: String,
	/// The fragment itself; read from stdin when omitted
	#[arg(long)]
	selection: Option<String>,
}

#[derive(Args, Debug)]
struct CancelArgs {
	/// Only tasks tagged #habit
	#[arg(long)]
	habit: bool,
}

#[derive(Args, Debug)]
struct FileTasksArgs {
	/// Document the lines come from, relative to the vault
	#[arg(long)]
	file: String,
}

fn init_tracing() -> Result<()> {
	let directives = std::env::var("RUST_LOG").ok().or_else(|| option_env!("LOG_DIRECTIVES").map(str::to_owned)).unwrap_or_else(|| "info".to_owned());
	let filter = EnvFilter::try_new(&directives).wrap_err_with(|| format!("invalid log directives {directives:?}"))?;

	let json = match std::env::var_os("BALDERDASH_TRACE_FILE") {
		Some(path) => {
			let file = std::fs::File::create(&path).wrap_err("failed to create trace file")?;
			Some(fmt::layer().json().with_writer(Arc::new(file)))
		}
		None => None,
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr).with_target(false))
		.with(json)
		.init();
	Ok(())
}

async fn read_stdin() -> Result<String> {
	let mut text = String::new();
	tokio::io::stdin().read_to_string(&mut text).await.wrap_err("failed to read stdin")?;
	Ok(text)
}

async fn fragment(args: &FragmentArgs) -> Result<String> {
	match &args.selection {
		Some(selection) => Ok(selection.clone()),
		None => read_stdin().await,
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	init_tracing()?;
	let cli = Cli::parse();

	let settings = Settings::load(cli.config.as_deref())?;
	let store = Arc::new(FsVault::new(&cli.vault));
	let services = Services::new(store.clone(), Arc::new(KeywordDates), Arc::new(RandomIds), Arc::new(SystemClock));

	match cli.command {
		Commands::Block(args) => {
			let text = fragment(&args).await?;
			let outcome = Pipeline::new(settings, services).process_block(&text, &args.file).await?;
			println!("{}", outcome.new_document);
		}
		Commands::Selection(args) => {
			let text = fragment(&args).await?;
			let processed = Pipeline::new(settings, services).process_selection(&text, &args.file).await?;
			println!("{processed}");
		}
		Commands::Cancel(args) => {
			let scope = if args.habit { CancelScope::Habits } else { CancelScope::All };
			println!("{}", cancel_tasks(&read_stdin().await?, scope, SystemClock.today()));
		}
		Commands::FileTasks(args) => {
			let current = store.get(&args.file).await.ok_or_else(|| eyre!("{} is not a document in {}", args.file, cli.vault.display()))?;
			let text = read_stdin().await?;
			println!("{}", TaskFileProcessor::new(&settings.task, services).process_text(&text, &current).await);
		}
		Commands::ShellInit(args) => shell_init::output(args),
	}
	Ok(())
}
