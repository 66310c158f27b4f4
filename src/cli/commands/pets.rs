use petcore_core::ViewRoute;
use petcore_domain::{Pet, WeightUnit};
use tracing::debug;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{forms, io, render};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "user",
            "Load a user and their pets, or show the current user",
            "user [id]",
            cmd_user,
        ),
        CommandEntry::new("pets", "Show the pet dashboard", "pets", cmd_pets),
        CommandEntry::new(
            "show",
            "Open a pet profile by id or name",
            "show <pet> [--json]",
            cmd_show,
        ),
        CommandEntry::new("types", "List the known pet types", "types", cmd_types),
        CommandEntry::new("add", "Start the add-pet wizard", "add", cmd_add),
        CommandEntry::new(
            "edit",
            "Start the edit wizard for a pet",
            "edit <pet>",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Delete a pet", "delete <pet>", cmd_delete),
    ]
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(user_id) = args.first() else {
        let owner = context.session.owner().ok_or(CommandError::UserNotLoaded)?;
        render::owner(owner);
        return Ok(());
    };

    let result = context.session.load_user(user_id).map(|_| ());
    context.settle(result)?;
    let result = context.session.load_user_pets().map(|_| ());
    context.settle(result)?;
    context.coordinator.pop_to_root();
    if let Some(owner) = context.session.owner() {
        render::owner(owner);
    }
    io::print_info(format!("  {} pet(s) loaded.", context.session.pets().len()));
    Ok(())
}

fn cmd_pets(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require_owner()?;
    let result = context.session.load_user_pets().map(|_| ());
    context.settle(result)?;
    context.coordinator.pop_to_root();
    let today = context.session.clock().today();
    render::dashboard(context.session.owner(), context.session.pets(), today);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let query = pet_argument(args, "show <pet> [--json]")?;
    let as_json = args.iter().any(|arg| *arg == "--json");
    let pet = resolve_pet(context, query)?;

    context.session.select_pet(pet);
    let result = context.session.refresh_selected_pet().cloned();
    let pet = context.settle(result)?;
    if context.coordinator.current() != ViewRoute::PetProfile {
        context.coordinator.navigate(ViewRoute::PetProfile);
    }

    if as_json {
        let json = serde_json::to_string_pretty(&pet)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        io::print_info(json);
    } else {
        render::profile(&pet, context.session.clock().today());
    }
    Ok(())
}

fn cmd_types(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.pet_types().is_empty() {
        let result = context.session.load_pet_types().map(|_| ());
        context.settle(result)?;
    }
    render::pet_types(context.session.pet_types());
    Ok(())
}

fn cmd_add(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require_owner()?;
    ensure_no_wizard(context)?;

    context.session.begin_create();
    if let Ok(unit) = context.config.weight_unit.parse::<WeightUnit>() {
        context.session.wizard_mut().set_weight_unit(unit);
    }
    context.coordinator.present(ViewRoute::CreatePet);
    debug!("create wizard opened");
    open_wizard(context)
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let query = pet_argument(args, "edit <pet>")?;
    context.require_owner()?;
    ensure_no_wizard(context)?;
    let pet_id = resolved_id(context, query)?;

    let result = context.session.begin_edit(&pet_id);
    context.settle(result)?;
    context.coordinator.navigate(ViewRoute::UpdatePet);
    debug!(pet_id = %pet_id, "edit wizard opened");
    open_wizard(context)
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let query = pet_argument(args, "delete <pet>")?;
    let pet = resolve_pet(context, query)?;
    let pet_id = pet.id.clone().ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{}` has no id yet.", pet.name_or_unknown()))
    })?;

    if context.can_prompt() {
        let prompt = format!("Delete {}?", pet.name_or_unknown());
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    let result = context.session.delete_pet(&pet_id);
    context.settle(result)?;
    if context.coordinator.current() == ViewRoute::PetProfile {
        context.coordinator.pop();
    }
    Ok(())
}

fn pet_argument<'a>(args: &[&'a str], usage: &str) -> Result<&'a str, CommandError> {
    args.iter()
        .copied()
        .find(|arg| !arg.starts_with("--"))
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

fn ensure_no_wizard(context: &ShellContext) -> CommandResult {
    match context.active_wizard() {
        Some(route) => Err(CommandError::InvalidArguments(format!(
            "{} is already open. Use `wizard cancel` first.",
            route
        ))),
        None => Ok(()),
    }
}

/// Shows the first step, then hands over to the guided prompts when interactive.
fn open_wizard(context: &mut ShellContext) -> CommandResult {
    render::wizard_step(context.session.wizard());
    if context.can_prompt() {
        let outcome = forms::run_guided(context)?;
        debug!(?outcome, "guided wizard finished");
    }
    Ok(())
}

/// Looks `query` up in the loaded pets, reloading them once on a miss.
pub(crate) fn resolve_pet(context: &mut ShellContext, query: &str) -> Result<Pet, CommandError> {
    if let Some(pet) = context.session.find_pet(query) {
        return Ok(pet.clone());
    }
    if context.session.owner().is_some() {
        let result = context.session.load_user_pets().map(|_| ());
        context.settle(result)?;
    }
    context
        .session
        .find_pet(query)
        .cloned()
        .ok_or_else(|| CommandError::InvalidArguments(format!("No pet matches `{}`.", query)))
}

/// Like [`resolve_pet`], but an unknown query is passed through as an id.
fn resolved_id(context: &mut ShellContext, query: &str) -> Result<String, CommandError> {
    match resolve_pet(context, query) {
        Ok(pet) => Ok(pet.id.unwrap_or_else(|| query.to_string())),
        Err(CommandError::InvalidArguments(_)) => Ok(query.to_string()),
        Err(err) => Err(err),
    }
}
