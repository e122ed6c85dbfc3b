//! # Search Command Handler

use crate::{
    SearchRequest, SearchResponse, cli_utils, commands::shared::validate_args_count_or_exit,
    http_utils,
};

/// `sectorctl search <query>`: tools matching the query.
///
/// Multiple words are joined with spaces into a single query.
pub async fn handle_search_command(
    args: &[String],
    client: &http_utils::SectorGuideClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        1,
        usize::MAX,
        "search",
        "Usage: sectorctl search <query>",
    );
    let request = SearchRequest { q: args.join(" ") };
    let response = http_utils::execute_or_exit(
        || client.post::<SearchRequest, SearchResponse>("search", &request),
        "Failed to search",
    )
    .await;
    cli_utils::print_formatted_or_exit(&response, output_format, "search results");
}
