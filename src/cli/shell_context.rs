//! Shared runtime state for CLI interactions and command execution.

use std::{env, sync::Arc};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use petcore_config::{Backend, Config, ConfigManager};
use petcore_core::{
    Clock, Coordinator, FixedClock, InMemoryDataSource, PetDataSource, PetSession, SystemClock,
    ViewRoute,
};
use petcore_domain::Owner;
use petcore_http::HttpPetDataSource;
use tracing::{info, warn};

use super::{commands, io as cli_io, output, registry::CommandRegistry};
use crate::errors::CliError;

pub const SCRIPT_ENV: &str = "PETCORE_CLI_SCRIPT";
/// Pins "today" (`YYYY-MM-DD`) for reproducible date validation.
pub const TODAY_ENV: &str = "PETCORE_TODAY";
pub const DEMO_OWNER_ID: &str = "demo-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: PetSession,
    pub coordinator: Coordinator,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(ConfigManager::default_base_dir())?;
        let config = config_manager.load_effective()?;
        let clock = clock_from_env()?;
        let source = data_source_for(&config);

        let mut context = Self::with_parts(mode, config_manager, config, source, clock);
        context.bootstrap();
        Ok(context)
    }

    /// Assembles a context from explicit parts; nothing is loaded yet.
    pub fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        source: Arc<dyn PetDataSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        output::set_preferences(output::OutputPreferences {
            color: config.ui_color_enabled && mode == CliMode::Interactive,
            quiet: false,
        });

        Self {
            mode,
            registry,
            session: PetSession::new(source, clock),
            coordinator: Coordinator::new(),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        }
    }

    /// Loads the configured user, their pets, and the type taxonomy.
    pub fn bootstrap(&mut self) {
        let Some(user_id) = self.effective_user_id() else {
            cli_io::print_hint("No user configured. Use `config set user_id <id>` or `user <id>`.");
            return;
        };
        if self.session.load_user(&user_id).is_err() {
            self.flush_alert();
            warn!(user_id = %user_id, "could not load configured user");
            return;
        }
        let _ = self.session.load_user_pets();
        let _ = self.session.load_pet_types();
        self.flush_alert();
        info!(user_id = %user_id, pets = self.session.pets().len(), "session ready");
    }

    pub fn effective_user_id(&self) -> Option<String> {
        self.config.user_id.clone().or_else(|| {
            (self.config.backend == Backend::Memory).then(|| DEMO_OWNER_ID.to_string())
        })
    }

    /// Route of the wizard currently open, if any.
    pub fn active_wizard(&self) -> Option<ViewRoute> {
        match (self.coordinator.sheet, self.coordinator.current()) {
            (Some(ViewRoute::CreatePet), _) => Some(ViewRoute::CreatePet),
            (_, ViewRoute::UpdatePet) => Some(ViewRoute::UpdatePet),
            _ => None,
        }
    }

    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, route: {}, pets: {} }}",
            self.running,
            self.last_command,
            self.coordinator.current(),
            self.session.pets().len()
        )
    }
}

fn clock_from_env() -> Result<Arc<dyn Clock>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| CliError::Input(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`")))?;
            Ok(Arc::new(FixedClock::on(day)))
        }
        _ => Ok(Arc::new(SystemClock)),
    }
}

fn data_source_for(config: &Config) -> Arc<dyn PetDataSource> {
    match config.backend {
        Backend::Memory => Arc::new(demo_backend()),
        Backend::Http => Arc::new(HttpPetDataSource::from_config(config)),
    }
}

/// In-memory backend with a single demo owner and no pets.
pub fn demo_backend() -> InMemoryDataSource {
    InMemoryDataSource::new().with_owner(Owner {
        first_name: Some("Demo".into()),
        last_name: Some("Owner".into()),
        email: Some("demo@petcore.local".into()),
        ..Owner::with_id(DEMO_OWNER_ID)
    })
}
