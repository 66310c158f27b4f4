//! Core CLI dispatch, error reporting, and shell context helpers.

use std::io;

use petcore_config::ConfigError;
use petcore_core::{CoreError, ViewRoute};
use thiserror::Error;

use super::io as cli_io;
use super::registry::CommandEntry;
use super::render;
pub use super::shell_context::{CliMode, ShellContext};
use crate::errors::AppError;
pub use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("No wizard in progress. Use `add` or `edit <pet>` first.")]
    NoActiveWizard,
    #[error("No user loaded. Use `user <id>` first.")]
    UserNotLoaded,
    /// Already shown to the user through the session alert.
    #[error("{0}")]
    Alerted(CoreError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::App(AppError::Config(err))
    }
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());
        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn prompt(&self) -> String {
        let wizard = self.session.wizard();
        match self.active_wizard() {
            Some(route) => format!(
                "petcore:{} ({}/{})> ",
                route,
                wizard.current_step() + 1,
                wizard.total_steps()
            ),
            None => format!("petcore:{}> ", self.coordinator.current()),
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(|err| match err {
            CommandError::Dialoguer(err) => CliError::Prompt(err),
            other => CliError::Input(other.to_string()),
        })
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested | CommandError::Alerted(_) => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    /// Prints and clears the session alert. Returns whether one was shown.
    pub(crate) fn flush_alert(&mut self) -> bool {
        match self.session.dismiss_alert() {
            Some(alert) => {
                render::alert(&alert);
                true
            }
            None => false,
        }
    }

    /// Shows the alert for `result` and marks a failure as already reported.
    pub(crate) fn settle<T>(&mut self, result: Result<T, CoreError>) -> Result<T, CommandError> {
        self.flush_alert();
        result.map_err(CommandError::Alerted)
    }

    pub(crate) fn require_wizard(&self) -> Result<ViewRoute, CommandError> {
        self.active_wizard().ok_or(CommandError::NoActiveWizard)
    }

    pub(crate) fn require_owner(&self) -> Result<(), CommandError> {
        match self.session.owner() {
            Some(_) => Ok(()),
            None => Err(CommandError::UserNotLoaded),
        }
    }

    /// Leaves the wizard screen without touching the backend.
    pub(crate) fn close_wizard(&mut self) {
        match self.active_wizard() {
            Some(ViewRoute::CreatePet) => {
                self.coordinator.dismiss_sheet();
            }
            Some(_) => {
                self.coordinator.pop();
            }
            None => {}
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn show_config(&self) -> CommandResult {
        crate::cli::output::section("Configuration");
        for (key, value) in self.config.entries() {
            cli_io::print_info(format!("  {:<22} {}", key, value));
        }
        cli_io::print_info(format!(
            "  {:<22} {}",
            "config_path",
            self.config_manager.config_path().display()
        ));
        Ok(())
    }

    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        self.config.set(&key.to_lowercase(), value)?;
        self.persist_config()?;
        cli_io::print_success("Configuration updated.");
        if matches!(key, "backend" | "api_base_url" | "request_timeout_secs" | "access_token_env") {
            cli_io::print_hint("Backend settings apply the next time the shell starts.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use petcore_config::{Config, ConfigManager};
    use petcore_core::{FixedClock, PetDataSource};
    use tempfile::TempDir;

    use super::*;
    use crate::cli::shell_context::{demo_backend, DEMO_OWNER_ID};

    fn context() -> (ShellContext, Arc<petcore_core::InMemoryDataSource>, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        let mut config = Config::default();
        config.user_id = Some(DEMO_OWNER_ID.into());
        let source = Arc::new(demo_backend());
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 8, 2).unwrap()));
        let mut ctx =
            ShellContext::with_parts(CliMode::Script, manager, config, source.clone(), clock);
        ctx.bootstrap();
        (ctx, source, dir)
    }

    fn run(ctx: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            if let Err(err) = ctx.process_line(line) {
                ctx.report_error(err).expect("report");
            }
        }
    }

    #[test]
    fn script_lines_drive_the_create_wizard() {
        let (mut ctx, source, _dir) = context();
        run(
            &mut ctx,
            &[
                "add",
                "wizard set name Rex",
                "wizard set type dog",
                "wizard next",
                "wizard set breed Labrador",
                "wizard next",
                "wizard set description \"Good boy\"",
                "wizard set birthday 2022-08-02",
                "wizard copy-birthday",
                "wizard next",
                "wizard set weight 12.5",
                "wizard set size large",
                "wizard next",
                "wizard save",
            ],
        );

        let pets = source.fetch_owner_pets(DEMO_OWNER_ID).unwrap();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].name.as_deref(), Some("Rex"));
        assert_eq!(pets[0].adoption_date, pets[0].date_of_birth);
        assert_eq!(pets[0].weight_value.as_deref(), Some("12.5 kg"));
        assert!(ctx.active_wizard().is_none());
        assert_eq!(ctx.session.wizard().current_step(), 0);
    }

    #[test]
    fn wizard_commands_require_an_open_wizard() {
        let (mut ctx, _, _dir) = context();
        let err = ctx.process_line("wizard next").unwrap_err();
        assert!(matches!(err, CommandError::NoActiveWizard));
    }

    #[test]
    fn failed_step_keeps_wizard_on_same_step() {
        let (mut ctx, _, _dir) = context();
        run(&mut ctx, &["add", "wizard set name Rex"]);
        let err = ctx.process_line("wizard next").unwrap_err();
        assert!(matches!(err, CommandError::Alerted(_)));
        assert_eq!(ctx.session.wizard().current_step(), 0);
        assert_eq!(ctx.prompt(), "petcore:Add Pet (1/5)> ");
    }

    #[test]
    fn edit_and_delete_by_name() {
        let (mut ctx, source, _dir) = context();
        source
            .insert_pet(petcore_domain::Pet {
                owner_id: Some(DEMO_OWNER_ID.into()),
                breed_name: Some("Tabby".into()),
                description: Some("Naps".into()),
                weight: Some(4.0),
                size: Some(petcore_domain::Size::Small),
                ..petcore_domain::Pet::named("Milo", "CAT")
            })
            .expect("seed pet");
        run(&mut ctx, &["pets", "edit milo"]);
        assert_eq!(ctx.active_wizard(), Some(ViewRoute::UpdatePet));

        run(&mut ctx, &["wizard set name Milo2", "wizard save"]);
        assert!(ctx.active_wizard().is_none());
        assert_eq!(ctx.session.pets()[0].name.as_deref(), Some("Milo2"));

        run(&mut ctx, &["delete Milo2"]);
        assert_eq!(source.pet_count(), 0);
    }

    #[test]
    fn config_set_persists() {
        let (mut ctx, _, _dir) = context();
        run(&mut ctx, &["config set weight_unit lb"]);
        let stored = ctx.config_manager.load().expect("load");
        assert_eq!(stored.weight_unit, "lb");
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut ctx, _, _dir) = context();
        assert_eq!(ctx.process_line("exit").unwrap(), LoopControl::Exit);
        assert!(!ctx.running);
    }
}
