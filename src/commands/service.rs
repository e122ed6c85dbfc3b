//! # Service Command Handlers
//!
//! Commands that talk to the service as a whole rather than to one kind of record.

use crate::{
    RootResponse, SchemaResponse, SeedResponse, TestReport, cli_utils,
    commands::shared::validate_args_count_or_exit, http_utils,
};

/// `sectorctl status`: prints the liveness message.
pub async fn handle_status_command(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 0, 0, "status", "Usage: sectorctl status");
    let response = http_utils::execute_or_exit(
        || client.get::<RootResponse>("/"),
        "Failed to reach server",
    )
    .await;
    cli_utils::print_formatted_or_exit(&response, output_format, "status");
}

/// `sectorctl schema`: prints the record schemas.
pub async fn handle_schema_command(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 0, 0, "schema", "Usage: sectorctl schema");
    let schemas = http_utils::execute_or_exit(
        || client.get::<SchemaResponse>("schema"),
        "Failed to fetch schemas",
    )
    .await;
    cli_utils::print_formatted_or_exit(&schemas, output_format, "schemas");
}

/// `sectorctl test`: prints the store diagnostics.
pub async fn handle_test_command(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 0, 0, "test", "Usage: sectorctl test");
    let report = http_utils::execute_or_exit(
        || client.get::<TestReport>("test"),
        "Failed to run store check",
    )
    .await;
    cli_utils::print_formatted_or_exit(&report, output_format, "store check");
}

/// `sectorctl seed`: seeds empty collections.
pub async fn handle_seed_command(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    _output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 0, 0, "seed", "Usage: sectorctl seed");
    let response = http_utils::execute_or_exit(
        || client.post_empty::<SeedResponse>("seed"),
        "Failed to seed",
    )
    .await;
    println!("Seed status: {}", response.status);
}
