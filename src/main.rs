use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use tasklist::logging::{self, LogTarget};
use tasklist::{Backend, Config, TaskList, TaskState};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "TaskList - a single-screen to-do list kept on this device")]
#[command(version)]
struct Cli {
    /// Directory holding the task store and log file
    #[arg(short, long, env = "TASKLIST_DIR")]
    data_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(short, long, value_enum, env = "TASKLIST_BACKEND", default_value_t = Backend::Sqlite)]
    backend: Backend,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive list (default)
    Ui,

    /// Print every task in order
    List,

    /// Add a task without opening the interactive list
    Add {
        /// Task text; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli.data_dir, cli.backend, cli.verbose);
    let command = cli.command.unwrap_or(Commands::Ui);

    // The interactive screen owns stdout, so its logs go to a file
    let target = match command {
        Commands::Ui => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    logging::init(&config, target)?;

    let mut state = TaskState::open(config.open_store()?)?;

    match command {
        Commands::Ui => {
            state = tasklist::ui::run(state)?;
        }
        Commands::List => print_tasks(state.tasks()),
        Commands::Add { text } => {
            let task = state
                .add(&text.join(" "))
                .ok_or_else(|| eyre!("Task text cannot be empty"))?;
            println!("Added: {}", task.text.as_str().bold());
        }
    }

    state.flush();
    Ok(())
}

fn print_tasks(tasks: &TaskList) {
    if tasks.is_empty() {
        println!("{}", "No tasks yet".dimmed());
        return;
    }

    for (i, task) in tasks.iter().enumerate() {
        let (checkbox, text) = if task.completed {
            ("[x]".green(), task.text.as_str().strikethrough().dimmed())
        } else {
            ("[ ]".normal(), task.text.as_str().normal())
        };
        println!("{:>3}. {} {}  {}", i + 1, checkbox, text, task.date.as_str().dimmed());
    }
}
