use clap::Parser;
use regtracker::cli::{
    handle_action_add, handle_action_delete, handle_action_edit, handle_choices, handle_init,
    handle_list, handle_show, handle_status, ActionSubcommand, Cli, Commands,
};
use regtracker::{Config, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref(), cli.db)?;
    init_logging(&config);

    match cli.command {
        Commands::Init { no_seed } => handle_init(&config, no_seed),
        Commands::List {
            query,
            source,
            status,
            category,
            json,
        } => handle_list(&config, query, source, status, category, json),
        Commands::Show { id, json } => handle_show(&config, id, json),
        Commands::Status { id, status, json } => handle_status(&config, id, status, json),
        Commands::Action(action_cmd) => match action_cmd.action {
            ActionSubcommand::Add {
                regulation_id,
                title,
                description,
                status,
                assignee,
                due,
                json,
            } => handle_action_add(
                &config,
                regulation_id,
                title,
                description,
                status,
                assignee,
                due,
                json,
            ),
            ActionSubcommand::Edit {
                id,
                title,
                description,
                status,
                assignee,
                due,
                clear_assignee,
                clear_due,
                done,
                json,
            } => handle_action_edit(
                &config,
                id,
                title,
                description,
                status,
                assignee,
                due,
                clear_assignee,
                clear_due,
                done,
                json,
            ),
            ActionSubcommand::Delete { id, force } => handle_action_delete(&config, id, force),
        },
        Commands::Choices { json } => handle_choices(&config, json),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
