//! # Sector Command Handler

use crate::{
    SectorDetailResponse, SectorListItem, cli_utils,
    commands::shared::{dispatch_command, validate_args_count_or_exit},
    http_utils,
};

const SECTORS_USAGE: &str = "Usage: sectorctl sectors <list|get> [args...]";

/// Handles all sector-related commands.
///
/// # Arguments
/// * `args` - Command arguments (first element is the subcommand)
/// * `client` - HTTP client for API communication
/// * `output_format` - Output format for printed responses
pub async fn handle_sectors_command(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    output_format: cli_utils::OutputFormat,
) {
    dispatch_command!("sectors", SECTORS_USAGE, args, client, output_format, {
        "list" => handle_sectors_list,
        "get" => handle_sectors_get,
    });
}

async fn handle_sectors_list(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: sectorctl sectors list");
    let sectors = http_utils::execute_or_exit(
        || client.get::<Vec<SectorListItem>>("sectors"),
        "Failed to list sectors",
    )
    .await;
    cli_utils::print_formatted_or_exit(&sectors, output_format, "sectors");
}

async fn handle_sectors_get(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: sectorctl sectors get <slug>");

    let slug = args[1].as_str();
    let segments = ["sectors", slug];
    let error_msg = format!("Failed to get sector {}", slug);

    let detail = http_utils::execute_or_exit(
        || client.get_segments::<SectorDetailResponse>(&segments),
        &error_msg,
    )
    .await;
    cli_utils::print_formatted_or_exit(&detail, output_format, "sector");
}
