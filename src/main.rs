use clap::Parser;
use roomrelay::cli::{self, Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli::resolve_config_path(cli.config.as_deref());

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => cli::handle_run(&config_path).await,
        Command::Extract { category, file } => cli::handle_extract(&category, file.as_deref()),
        Command::Simulate { category, files } => {
            cli::handle_simulate(&config_path, category.as_deref(), &files).await
        }
        Command::Config(ConfigCommand::Show) => cli::handle_config_show(&config_path),
        Command::Config(ConfigCommand::Path) => {
            cli::handle_config_path(&config_path);
            Ok(())
        }
        Command::Config(ConfigCommand::Schema) => cli::handle_config_schema(),
        Command::Config(ConfigCommand::Validate) => cli::handle_config_validate(&config_path),
        Command::Version => {
            cli::handle_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
