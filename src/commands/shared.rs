//! # Shared Command Utilities
//!
//! Argument checks and the subcommand dispatcher used by the command handlers.

use crate::cli_utils;

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) {
    if let Err(message) = check_args_count(args.len(), min_count, max_count, command) {
        cli_utils::exit_with_usage_error(&message, usage);
    }
}

fn check_args_count(
    count: usize,
    min_count: usize,
    max_count: usize,
    command: &str,
) -> Result<(), String> {
    if count < min_count {
        return Err(format!("{} command requires more arguments", command));
    }
    if count > max_count {
        return Err(format!("{} command has too many arguments", command));
    }
    Ok(())
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $client:expr, $output_format:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {
        if $args.is_empty() {
            crate::cli_utils::exit_with_usage_error(
                &format!("{} command requires a subcommand", $command_name),
                $usage,
            );
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $client, $output_format).await,
            )*
            _ => {
                let available_subcommands = vec![$($subcommand),*];
                crate::cli_utils::exit_with_error(&format!(
                    "Unknown {} subcommand '{}'. Available subcommands: {}",
                    $command_name,
                    $args[0],
                    available_subcommands.join(", ")
                ));
            }
        }
    };
}

pub(crate) use dispatch_command;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_count_bounds() {
        assert!(check_args_count(2, 2, 2, "get").is_ok());
        assert_eq!(
            check_args_count(1, 2, 2, "get").unwrap_err(),
            "get command requires more arguments"
        );
        assert_eq!(
            check_args_count(3, 2, 2, "get").unwrap_err(),
            "get command has too many arguments"
        );
    }
}
