use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use sectorguide::{
    cli_utils::{self, OutputFormat},
    commands::{
        handle_schema_command, handle_search_command, handle_sectors_command,
        handle_seed_command, handle_status_command, handle_test_command,
    },
    http_utils,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the sectorguide server")]
    base_url: String,
    #[arrrg(optional, "Output format: json or yaml (default: json)")]
    output: OutputFormat,
}

const USAGE: &str = r#"Usage: sectorctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the sectorguide server (default: http://localhost:8000)
  --output <format>    Output format: json or yaml (default: json)

Commands:
  status                 Check that the server is running
  schema                 Show the sector, tool, and comparison schemas
  test                   Show document store diagnostics
  seed                   Seed empty collections with starter data
  sectors list           List all sectors
  sectors get <slug>     Show a sector with its tools and comparison
  search <query>         Search tools by name, summary, or sector"#;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) =
        Options::from_command_line_relaxed("USAGE: sectorctl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        options.base_url
    };

    let client = http_utils::SectorGuideClient::new(base_url);
    let args = &free[1..];

    match free[0].as_str() {
        "status" => handle_status_command(args, &client, options.output).await,
        "schema" => handle_schema_command(args, &client, options.output).await,
        "test" => handle_test_command(args, &client, options.output).await,
        "seed" => handle_seed_command(args, &client, options.output).await,
        "sectors" => handle_sectors_command(args, &client, options.output).await,
        "search" => handle_search_command(args, &client, options.output).await,
        "help" => println!("{}", USAGE),
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: status, schema, test, seed, sectors, search",
                free[0]
            ));
        }
    }

    Ok(())
}
