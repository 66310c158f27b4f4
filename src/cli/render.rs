//! Text renderings of the dashboard, profile, and wizard screens.

use chrono::NaiveDate;
use petcore_core::{
    dates, Alert, PetWizard, WizardField, ERROR_ALERT_TITLE, VALIDATION_ALERT_TITLE,
};
use petcore_domain::{Owner, Pet, PetType};

use super::io as cli_io;
use super::output;

const DASH: &str = "-";

pub(crate) fn alert(alert: &Alert) {
    let text = format!("{}: {}", alert.title, alert.message);
    match alert.title.as_str() {
        _ if alert.success => cli_io::print_success(text),
        VALIDATION_ALERT_TITLE | ERROR_ALERT_TITLE => cli_io::print_error(text),
        _ => cli_io::print_warning(text),
    }
}

pub(crate) fn owner(owner: &Owner) {
    output::section("User");
    let name = owner.full_name();
    let rows = [
        ("Id", owner.id.clone()),
        ("Name", (!name.is_empty()).then_some(name)),
        ("Email", owner.email.clone()),
        ("Phone", owner.phone.clone()),
        ("City", owner.city.clone()),
    ];
    for (label, value) in rows {
        cli_io::print_info(format!("  {:<8} {}", label, value.as_deref().unwrap_or(DASH)));
    }
}

/// One line per pet: id, name, type, breed, age.
pub(crate) fn dashboard_rows(pets: &[Pet], today: NaiveDate) -> Vec<String> {
    pets.iter()
        .map(|pet| {
            let age = pet
                .date_of_birth
                .as_deref()
                .map(|born| dates::age_label(born, today))
                .unwrap_or_else(|| dates::UNKNOWN_AGE.to_string());
            let lost = if pet.is_lost() { "  [LOST]" } else { "" };
            format!(
                "  {:<36}  {:<12} {:<8} {:<16} {}{}",
                pet.id.as_deref().unwrap_or(DASH),
                pet.name_or_unknown(),
                pet.pet_type.as_deref().unwrap_or(DASH),
                pet.breed_name.as_deref().unwrap_or(DASH),
                age,
                lost
            )
        })
        .collect()
}

pub(crate) fn dashboard(owner: Option<&Owner>, pets: &[Pet], today: NaiveDate) {
    let heading = match owner.map(Owner::full_name).filter(|name| !name.is_empty()) {
        Some(name) => format!("My Pets ({name})"),
        None => "My Pets".to_string(),
    };
    output::section(heading);
    if pets.is_empty() {
        cli_io::print_info("  No pets yet. Use `add` to create one.");
        return;
    }
    for row in dashboard_rows(pets, today) {
        cli_io::print_info(row);
    }
}

pub(crate) fn profile_rows(pet: &Pet, today: NaiveDate) -> Vec<(&'static str, String)> {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| DASH.to_string());
    let day = |value: &Option<String>| {
        value
            .as_deref()
            .map(dates::format_date)
            .unwrap_or_else(|| DASH.to_string())
    };
    vec![
        ("Id", text(&pet.id)),
        ("Type", text(&pet.pet_type)),
        ("Breed", text(&pet.breed_name)),
        (
            "Age",
            pet.date_of_birth
                .as_deref()
                .map(|born| dates::age_label(born, today))
                .unwrap_or_else(|| dates::UNKNOWN_AGE.to_string()),
        ),
        ("Birthday", day(&pet.date_of_birth)),
        ("Adopted", day(&pet.adoption_date)),
        (
            "Gender",
            pet.gender.map(|g| g.to_string()).unwrap_or_else(|| DASH.into()),
        ),
        (
            "Size",
            pet.size.map(|s| s.to_string()).unwrap_or_else(|| DASH.into()),
        ),
        ("Weight", text(&pet.weight_value)),
        ("Lost", if pet.is_lost() { "Yes" } else { "No" }.to_string()),
        (
            "Image",
            pet.image
                .as_ref()
                .and_then(|image| image.url.clone())
                .unwrap_or_else(|| DASH.into()),
        ),
        ("About", text(&pet.description)),
    ]
}

pub(crate) fn profile(pet: &Pet, today: NaiveDate) {
    output::section(pet.name_or_unknown());
    for (label, value) in profile_rows(pet, today) {
        cli_io::print_info(format!("  {:<9} {}", label, value));
    }
}

pub(crate) fn pet_types(types: &[PetType]) {
    output::section("Pet types");
    for entry in types {
        cli_io::print_info(format!(
            "  {:<10} {}",
            entry.tag().unwrap_or_else(|| DASH.into()),
            entry.id.as_deref().unwrap_or(DASH)
        ));
    }
}

fn field_line(wizard: &PetWizard, field: WizardField, value: String) -> String {
    match wizard.error(field) {
        Some(error) => format!("  {:<14} {}  <- {}", field.label(), value, error),
        None => format!("  {:<14} {}", field.label(), value),
    }
}

/// Current step with its values and any recorded field errors.
pub(crate) fn wizard_step(wizard: &PetWizard) {
    output::section(wizard.progress_label());
    let form = wizard.form();
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| DASH.to_string());
    let day = |value: Option<NaiveDate>| {
        value
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| DASH.to_string())
    };

    let lines: Vec<String> = match wizard.current_step() {
        0 => vec![
            field_line(wizard, WizardField::Name, text(&form.name)),
            field_line(wizard, WizardField::PetType, text(&form.pet_type)),
        ],
        1 => vec![
            field_line(wizard, WizardField::Breed, text(&form.breed)),
            format!("  {:<14} {}", "Breed id", text(&form.breed_id)),
            format!(
                "  {:<14} {}{}",
                "Image",
                image_label(wizard),
                if wizard.is_dirty() { " (changed)" } else { "" }
            ),
        ],
        2 => vec![
            field_line(wizard, WizardField::Description, text(&form.description)),
            format!(
                "  {:<14} {}",
                "Gender",
                form.gender.map(|g| g.to_string()).unwrap_or_else(|| DASH.into())
            ),
            field_line(wizard, WizardField::Birthday, day(form.birthday)),
            field_line(wizard, WizardField::AdoptionDate, day(form.adoption_date)),
            format!("  {:<14} {}", "Lost", if form.is_lost { "yes" } else { "no" }),
        ],
        3 => vec![
            field_line(
                wizard,
                WizardField::Weight,
                format!("{} {}", text(&form.weight), form.weight_unit),
            ),
            field_line(
                wizard,
                WizardField::Size,
                form.size.map(|s| s.to_string()).unwrap_or_else(|| DASH.into()),
            ),
        ],
        _ => wizard
            .review_rows()
            .into_iter()
            .map(|(label, value)| format!("  {:<14} {}", label, value))
            .collect(),
    };
    for line in lines {
        cli_io::print_info(line);
    }
    if wizard.should_offer_copy_birthday_shortcut() && wizard.current_step() == 2 {
        cli_io::print_hint("`wizard copy-birthday` sets the adoption date to the birthday.");
    }
}

fn image_label(wizard: &PetWizard) -> String {
    match wizard.image() {
        None => DASH.to_string(),
        Some(image) => match (&image.url, &image.local) {
            (Some(url), _) => url.clone(),
            (None, Some(local)) => format!("{} (not uploaded)", local.path.display()),
            (None, None) => image.image_id.clone().unwrap_or_else(|| DASH.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petcore_domain::Gender;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 2).unwrap()
    }

    #[test]
    fn dashboard_row_shows_age_and_lost_marker() {
        let pet = Pet {
            id: Some("p1".into()),
            date_of_birth: Some("2022-08-02T00:00:00.000Z".into()),
            is_lost: Some(true),
            ..Pet::named("Rex", "DOG")
        };
        let rows = dashboard_rows(&[pet], today());
        assert!(rows[0].contains("Rex"));
        assert!(rows[0].contains("2 years old"));
        assert!(rows[0].ends_with("[LOST]"));
    }

    #[test]
    fn profile_formats_dates_and_falls_back() {
        let pet = Pet {
            date_of_birth: Some("2022-08-02T00:00:00.000Z".into()),
            adoption_date: Some("sometime".into()),
            gender: Some(Gender::Female),
            ..Pet::named("Luna", "CAT")
        };
        let rows: std::collections::HashMap<_, _> =
            profile_rows(&pet, today()).into_iter().collect();
        assert_eq!(rows["Birthday"], "Aug 2, 2022");
        assert_eq!(rows["Adopted"], "sometime");
        assert_eq!(rows["Age"], "2 years old");
        assert_eq!(rows["Breed"], "-");
    }
}
