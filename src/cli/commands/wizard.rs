use std::str::FromStr;

use chrono::NaiveDate;
use petcore_core::{PetWizard, SubmitOutcome, ValidationError};
use petcore_domain::{ImageRef, WeightUnit};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{io, render};
use crate::errors::AppError;

pub(crate) const FIELDS: &[&str] = &[
    "name",
    "type",
    "breed",
    "description",
    "gender",
    "birthday",
    "adoption",
    "lost",
    "weight",
    "unit",
    "size",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "wizard",
        "Drive the open add/edit wizard",
        "wizard [show|set <field> <value>|next|back|copy-birthday|image <url|path|none>|save|cancel]",
        cmd_wizard,
    )
    .with_subcommands(&[
        "show",
        "set",
        "next",
        "back",
        "copy-birthday",
        "image",
        "save",
        "cancel",
    ])]
}

fn cmd_wizard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_wizard()?;
    let action = args
        .first()
        .map(|action| action.to_ascii_lowercase())
        .unwrap_or_else(|| "show".to_string());

    match action.as_str() {
        "show" => {
            render::wizard_step(context.session.wizard());
            Ok(())
        }
        "set" => {
            let Some(field) = args.get(1) else {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: wizard set <{}> <value>",
                    FIELDS.join("|")
                )));
            };
            let value = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
            set_field(context.session.wizard_mut(), field, &value)
        }
        "next" => {
            let result = context.session.advance_wizard();
            context.settle(result)?;
            render::wizard_step(context.session.wizard());
            Ok(())
        }
        "back" => {
            context.session.retreat_wizard();
            render::wizard_step(context.session.wizard());
            Ok(())
        }
        "copy-birthday" => {
            context
                .session
                .wizard_mut()
                .adoption_date_same_as_birthday()
                .map_err(rejected)?;
            io::print_success("Adoption date set to the birthday.");
            Ok(())
        }
        "image" => {
            let raw = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
            let changed = context.session.wizard_mut().set_image(parse_image(&raw));
            if changed {
                io::print_info("Image changed.");
            } else {
                io::print_info("Image unchanged.");
            }
            Ok(())
        }
        "save" => save(context),
        "cancel" => {
            context.session.wizard_mut().reset(0);
            context.close_wizard();
            io::print_info("Wizard closed. Nothing was saved.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown wizard action `{}`",
            other
        ))),
    }
}

/// Submits the wizard and closes it on success; a failure leaves it open with its values.
pub(crate) fn save(context: &mut ShellContext) -> CommandResult {
    let result = context.session.submit_wizard();
    let (pet, outcome) = context.settle(result)?;
    context.close_wizard();
    if outcome == SubmitOutcome::Created {
        if let Some(id) = pet.id.as_deref() {
            io::print_info(format!("  {} saved with id {}", pet.name_or_unknown(), id));
        }
    }
    Ok(())
}

/// Applies one `wizard set` assignment. An empty value clears the field.
pub(crate) fn set_field(wizard: &mut PetWizard, field: &str, value: &str) -> CommandResult {
    let value = value.trim();
    match field.to_ascii_lowercase().as_str() {
        "name" => wizard.set_name(value),
        "type" => wizard.set_pet_type(value),
        "breed" => {
            let mut parts = value.rsplitn(2, " --id ");
            let (id, name) = match (parts.next(), parts.next()) {
                (Some(id), Some(name)) => (Some(id.to_string()), name),
                (Some(name), None) => (None, name),
                _ => (None, value),
            };
            wizard.set_breed(name, id);
        }
        "description" => wizard.set_description(value),
        "gender" => wizard.set_gender(parse_optional(value)?),
        "birthday" => match parse_day(value)? {
            Some(day) => wizard.set_birthday(day).map_err(rejected)?,
            None => wizard.clear_birthday(),
        },
        "adoption" => match parse_day(value)? {
            Some(day) => wizard.set_adoption_date(day).map_err(rejected)?,
            None => wizard.clear_adoption_date(),
        },
        "lost" => wizard.set_lost(parse_flag(value)?),
        "weight" => {
            wizard.set_weight(value);
            if let Some(message) = wizard.error(petcore_core::WizardField::Weight) {
                io::print_warning(message);
            }
        }
        "unit" if is_clear(value) => wizard.set_weight_unit(WeightUnit::default()),
        "unit" => wizard.set_weight_unit(WeightUnit::from_str(value).map_err(invalid)?),
        "size" => wizard.set_size(parse_optional(value)?),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown field `{}`; expected one of {}",
                other,
                FIELDS.join(", ")
            )))
        }
    }
    Ok(())
}

/// `YYYY-MM-DD`, or `none`/empty to clear.
pub(crate) fn parse_day(value: &str) -> Result<Option<NaiveDate>, CommandError> {
    if is_clear(value) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a YYYY-MM-DD date", value)))
}

/// `http(s)://` becomes a remote image, anything else a picked local file.
pub(crate) fn parse_image(value: &str) -> Option<ImageRef> {
    let value = value.trim();
    if is_clear(value) {
        None
    } else if value.starts_with("http://") || value.starts_with("https://") {
        Some(ImageRef::from_url(value))
    } else {
        Some(ImageRef::local(value))
    }
}

fn parse_optional<T>(value: &str) -> Result<Option<T>, CommandError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if is_clear(value) {
        return Ok(None);
    }
    value.parse::<T>().map(Some).map_err(invalid)
}

fn parse_flag(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" | "y" => Ok(true),
        "no" | "false" | "off" | "n" | "" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected yes or no, got `{}`",
            other
        ))),
    }
}

fn is_clear(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("none")
}

fn invalid(err: impl std::fmt::Display) -> CommandError {
    CommandError::InvalidArguments(err.to_string())
}

fn rejected(err: ValidationError) -> CommandError {
    CommandError::App(AppError::Core(err.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use petcore_core::{FixedClock, WizardField};
    use petcore_domain::{Gender, Size};

    use super::*;

    fn wizard() -> PetWizard {
        PetWizard::new(Arc::new(FixedClock::on(
            NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
        )))
    }

    #[test]
    fn set_parses_enums_dates_and_flags() {
        let mut wizard = wizard();
        set_field(&mut wizard, "gender", "female").unwrap();
        set_field(&mut wizard, "size", "xl").unwrap();
        set_field(&mut wizard, "birthday", "2022-08-02").unwrap();
        set_field(&mut wizard, "lost", "yes").unwrap();
        set_field(&mut wizard, "breed", "Labrador --id b-7").unwrap();

        let form = wizard.form();
        assert_eq!(form.gender, Some(Gender::Female));
        assert_eq!(form.size, Some(Size::ExtraLarge));
        assert_eq!(form.birthday, NaiveDate::from_ymd_opt(2022, 8, 2));
        assert!(form.is_lost);
        assert_eq!(form.breed.as_deref(), Some("Labrador"));
        assert_eq!(form.breed_id.as_deref(), Some("b-7"));
    }

    #[test]
    fn future_birthday_is_rejected_and_none_clears() {
        let mut wizard = wizard();
        let err = set_field(&mut wizard, "birthday", "2024-08-02").unwrap_err();
        assert!(err.to_string().contains("cannot be today or in the future"));
        assert!(wizard.error(WizardField::Birthday).is_some());

        set_field(&mut wizard, "birthday", "none").unwrap();
        assert!(wizard.form().birthday.is_none());
        assert!(wizard.error(WizardField::Birthday).is_none());
    }

    #[test]
    fn bad_input_names_the_problem() {
        let mut wizard = wizard();
        assert!(matches!(
            set_field(&mut wizard, "birthday", "02/08/2022"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            set_field(&mut wizard, "colour", "brown"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(set_field(&mut wizard, "size", "giant").is_err());
    }

    #[test]
    fn image_argument_picks_remote_or_local() {
        assert_eq!(
            parse_image("https://cdn.example/rex.jpg"),
            Some(ImageRef::from_url("https://cdn.example/rex.jpg"))
        );
        assert!(parse_image("./rex.jpg").is_some_and(|image| image.is_pending_upload()));
        assert_eq!(parse_image("none"), None);
    }
}
