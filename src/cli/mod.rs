pub mod output;
pub mod session;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use output::{render_folder, render_list};
use session::{apply, run_session, SessionCommand};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    config::{Config, CONFIG_FILE},
    error::Error,
    selector::select_list,
    store::list_store::{FileListStore, ListStore},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, expand_home},
        input::{LineInput, StdinInput},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "onelist", version, long_about = None)]
#[command(about = "Terminal task lists with a built-in time tracker", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Task directory for this run. Overrides the configured one without saving it"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Pick a list and work on it interactively. The default")]
    Open,
    #[command(about = "Set the directory holding task lists")]
    SetDir { path: PathBuf },
    #[command(about = "Create a new task list")]
    CreateList { name: Vec<String> },
    #[command(about = "Add a task to a list")]
    Add {
        #[arg(required = true)]
        title: Vec<String>,
    },
    #[command(about = "Start or pause the task at a position")]
    Toggle { position: usize },
    #[command(about = "Mark the task at a position as done")]
    Done { position: usize },
    #[command(about = "Remove the task at a position")]
    Rm { position: usize },
    #[command(about = "Print a list")]
    List,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let config_path = app_dir.join(CONFIG_FILE);
    let config = Config::load_or_create(&config_path).await?;

    let command = args.command.unwrap_or(Commands::Open);
    if let Commands::SetDir { path } = command {
        return set_dir(config, &config_path, &path).await;
    }

    let config = config.with_override(args.dir);
    let dir = match config.task_dir() {
        Ok(dir) => dir.to_owned(),
        Err(e) => {
            println!("❌ {e}");
            println!("💡 Run 'onelist set-dir <path>' first");
            return Err(e.into());
        }
    };

    let store = FileListStore::new(dir, Box::new(DefaultClock));
    let mut input = StdinInput::new();
    run_command(command, &store, &mut input, &DefaultClock).await
}

async fn run_command(
    command: Commands,
    store: &FileListStore,
    input: &mut impl LineInput,
    clock: &dyn Clock,
) -> Result<()> {
    let operation = match command {
        Commands::SetDir { .. } => return Err(anyhow!("set-dir is handled before opening a list")),
        Commands::CreateList { name } => return create_list(store, input, &name.join(" ")).await,
        Commands::Open => {
            if let Some(path) = choose_list(store, input).await? {
                run_session(store, &path, input, clock).await?;
            }
            return Ok(());
        }
        Commands::List => None,
        Commands::Add { title } => Some(SessionCommand::Add(title.join(" "))),
        Commands::Toggle { position } => Some(SessionCommand::Toggle(position)),
        Commands::Done { position } => Some(SessionCommand::Done(position)),
        Commands::Rm { position } => Some(SessionCommand::Remove(position)),
    };

    let Some(path) = choose_list(store, input).await? else {
        return Err(Error::NoListsFound.into());
    };
    let mut list = store.load(&path).await?;

    if let Some(operation) = operation {
        let message = apply(&mut list, operation, clock)?;
        store
            .save(&path, &mut list)
            .await
            .with_context(|| format!("Failed to save {path:?}"))?;
        println!("{message}");
    }
    println!("{}", render_list(&list, clock.time()));
    Ok(())
}

/// `None` when the directory holds no lists, after showing what it does hold.
async fn choose_list(store: &FileListStore, input: &mut impl LineInput) -> Result<Option<PathBuf>> {
    match select_list(store, input).await {
        Ok(path) => Ok(Some(path)),
        Err(Error::NoListsFound) => {
            println!("❌ {}", Error::NoListsFound);
            println!("💡 Create one with 'onelist create-list <name>'");
            let contents = store.folder_contents().await?;
            println!("{}", render_folder(store.dir(), &contents));
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

async fn create_list(store: &FileListStore, input: &mut impl LineInput, name: &str) -> Result<()> {
    let name = if name.trim().is_empty() {
        input.prompt("Enter list name: ").await?
    } else {
        name.to_string()
    };

    let path = store.create_list(&name).await?;
    println!("✅ Created list: {} ({})", name.trim(), path.display());
    Ok(())
}

async fn set_dir(mut config: Config, config_path: &Path, path: &Path) -> Result<()> {
    let expanded = expand_home(path);
    let dir = tokio::fs::canonicalize(&expanded)
        .await
        .with_context(|| format!("Directory {expanded:?} does not exist"))?;
    if !tokio::fs::metadata(&dir).await?.is_dir() {
        return Err(anyhow!("{dir:?} is not a directory"));
    }

    config.task_dir = Some(dir.clone());
    config.save(config_path).await?;
    info!("Task directory set to {dir:?}");
    println!("✅ Task directory set to {}", dir.display());

    let store = FileListStore::new(dir, Box::new(DefaultClock));
    let contents = store.folder_contents().await?;
    println!("{}", render_folder(store.dir(), &contents));
    Ok(())
}
