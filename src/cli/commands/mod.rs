pub mod config;
pub mod pets;
pub mod system;
pub mod wizard;

use crate::cli::registry::CommandRegistry;

/// Registers every shell command in the order `help` lists them.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in pets::definitions()
        .into_iter()
        .chain(wizard::definitions())
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
