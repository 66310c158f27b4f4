//! Guided, prompt-driven walk through the add/edit wizard.
//!
//! Each step prompts for its fields with the current values pre-filled, then
//! asks where to go next. Values go through the same `wizard set` parsing as
//! the scripted commands, so both paths enforce identical rules.

use chrono::NaiveDate;
use petcore_core::PetWizard;
use petcore_domain::{Gender, Size, WeightUnit};

use crate::cli::commands::wizard::{save, set_field};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{io, render};

/// What the user picked at the end of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAction {
    Next,
    Back,
    Save,
    Pause,
    Cancel,
}

impl StepAction {
    fn label(self) -> &'static str {
        match self {
            StepAction::Next => "Next",
            StepAction::Back => "Back",
            StepAction::Save => "Save",
            StepAction::Pause => "Continue in the shell",
            StepAction::Cancel => "Cancel",
        }
    }
}

/// Outcome of a guided session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormResult {
    Saved,
    Paused,
    Cancelled,
}

pub(crate) fn run_guided(context: &mut ShellContext) -> Result<FormResult, CommandError> {
    loop {
        let step = context.session.wizard().current_step();
        if step < context.session.wizard().total_steps() - 1 {
            prompt_step(context, step)?;
        }
        render::wizard_step(context.session.wizard());

        match choose_action(context)? {
            StepAction::Next => {
                let result = context.session.advance_wizard();
                // A rejected step stays put; the alert already names the field.
                let _ = context.settle(result);
            }
            StepAction::Back => {
                context.session.retreat_wizard();
            }
            StepAction::Save => match save(context) {
                Ok(()) => return Ok(FormResult::Saved),
                Err(CommandError::Alerted(_)) => {}
                Err(err) => return Err(err),
            },
            StepAction::Pause => {
                io::print_hint("Use `wizard show`, `wizard set`, and `wizard save` to continue.");
                return Ok(FormResult::Paused);
            }
            StepAction::Cancel => {
                context.session.wizard_mut().reset(0);
                context.close_wizard();
                io::print_info("Wizard closed. Nothing was saved.");
                return Ok(FormResult::Cancelled);
            }
        }
    }
}

fn choose_action(context: &ShellContext) -> Result<StepAction, CommandError> {
    let wizard = context.session.wizard();
    let mut actions = Vec::new();
    if wizard.is_last_step() {
        actions.push(StepAction::Save);
    } else {
        actions.push(StepAction::Next);
    }
    if !wizard.is_first_step() {
        actions.push(StepAction::Back);
    }
    actions.extend([StepAction::Pause, StepAction::Cancel]);

    let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
    let picked = io::select_index(&context.theme, "What next?", &labels, 0)?;
    Ok(actions.get(picked).copied().unwrap_or(StepAction::Pause))
}

fn prompt_step(context: &mut ShellContext, step: usize) -> CommandResult {
    match step {
        0 => {
            ask_text(context, "name", "Pet name", |w| w.form().name.clone())?;
            ask_pet_type(context)
        }
        1 => {
            ask_text(context, "breed", "Breed", |w| w.form().breed.clone())?;
            let current = context
                .session
                .wizard()
                .image()
                .and_then(|image| image.url.clone());
            let answer = io::prompt_text(
                &context.theme,
                "Image URL or file (none to remove)",
                current.as_deref(),
            )?;
            if answer.trim() != current.as_deref().unwrap_or("") {
                let image = crate::cli::commands::wizard::parse_image(&answer);
                context.session.wizard_mut().set_image(image);
            }
            Ok(())
        }
        2 => {
            ask_text(context, "description", "Description", |w| {
                w.form().description.clone()
            })?;
            ask_choice(context, "gender", "Gender", &Gender::ALL, |w| w.form().gender)?;
            ask_text(context, "birthday", "Birthday (YYYY-MM-DD)", |w| {
                w.form().birthday.map(day_text)
            })?;
            ask_adoption(context)?;
            let lost = io::confirm_action(
                &context.theme,
                "Is this pet lost?",
                context.session.wizard().form().is_lost,
            )?;
            context.session.wizard_mut().set_lost(lost);
            Ok(())
        }
        3 => {
            ask_text(context, "weight", "Weight", |w| w.form().weight.clone())?;
            ask_choice(context, "unit", "Weight unit", &[WeightUnit::Kg, WeightUnit::Lb], |w| {
                Some(w.form().weight_unit)
            })?;
            ask_choice(context, "size", "Size", &Size::ALL, |w| w.form().size)
        }
        _ => Ok(()),
    }
}

/// Prompts until `set_field` accepts the answer.
fn ask_text(
    context: &mut ShellContext,
    field: &str,
    prompt: &str,
    current: impl Fn(&PetWizard) -> Option<String>,
) -> CommandResult {
    loop {
        let initial = current(context.session.wizard());
        let answer = io::prompt_text(&context.theme, prompt, initial.as_deref())?;
        match set_field(context.session.wizard_mut(), field, &answer) {
            Ok(()) => return Ok(()),
            Err(CommandError::InvalidArguments(message)) => io::print_error(message),
            Err(CommandError::App(err)) => io::print_error(err),
            Err(err) => return Err(err),
        }
    }
}

fn ask_choice<T>(
    context: &mut ShellContext,
    field: &str,
    prompt: &str,
    options: &[T],
    current: impl Fn(&PetWizard) -> Option<T>,
) -> CommandResult
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let mut labels: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    labels.push("(none)".to_string());
    let selected = current(context.session.wizard());
    let default = options
        .iter()
        .position(|option| Some(*option) == selected)
        .unwrap_or(options.len());
    let picked = io::select_index(&context.theme, prompt, &labels, default)?;
    let value = options
        .get(picked)
        .map(|option| option.to_string())
        .unwrap_or_default();
    set_field(context.session.wizard_mut(), field, &value)
}

fn ask_pet_type(context: &mut ShellContext) -> CommandResult {
    let tags: Vec<String> = context
        .session
        .pet_types()
        .iter()
        .filter_map(|entry| entry.tag())
        .collect();
    if tags.is_empty() {
        return ask_text(context, "type", "Pet type", |w| w.form().pet_type.clone());
    }
    let current = context.session.wizard().form().pet_type.clone();
    let default = tags
        .iter()
        .position(|tag| Some(tag) == current.as_ref())
        .unwrap_or(0);
    let picked = io::select_index(&context.theme, "Pet type", &tags, default)?;
    if let Some(tag) = tags.get(picked) {
        context.session.wizard_mut().set_pet_type(tag.as_str());
    }
    Ok(())
}

fn ask_adoption(context: &mut ShellContext) -> CommandResult {
    if context.session.wizard().should_offer_copy_birthday_shortcut()
        && io::confirm_action(&context.theme, "Adoption date same as birthday?", false)?
    {
        if let Err(err) = context.session.wizard_mut().adoption_date_same_as_birthday() {
            io::print_error(err);
        } else {
            return Ok(());
        }
    }
    ask_text(context, "adoption", "Adoption date (YYYY-MM-DD)", |w| {
        w.form().adoption_date.map(day_text)
    })
}

fn day_text(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
