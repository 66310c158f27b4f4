use petcore_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change shell preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )
    .with_subcommands(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_ascii_lowercase()).as_deref() {
        None | Some("show") => context.show_config(),
        Some("set") => {
            let (Some(key), Some(_)) = (args.get(1), args.get(2)) else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            };
            let value = args[2..].join(" ");
            context.set_config_value(key, value.trim())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}
