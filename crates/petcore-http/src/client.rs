use std::env;
use std::time::Duration;

use petcore_config::Config;
use petcore_core::{routes::Method, ApiRoute, DataSourceError, PetDataSource};
use petcore_domain::{Owner, Pet, PetType};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ureq::{Agent, AgentBuilder};

const MAX_ERROR_BODY: usize = 200;

/// `PetDataSource` over the pet REST API.
#[derive(Debug, Clone)]
pub struct HttpPetDataSource {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpPetDataSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration, token: Option<String>) -> Self {
        let agent = AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// Builds a client from the config; the token is read from `access_token_env`.
    pub fn from_config(config: &Config) -> Self {
        let token = env::var(&config.access_token_env).ok();
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
            token,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn url_for(&self, route: ApiRoute, id: Option<&str>) -> Result<String, DataSourceError> {
        let path = route.path(id).ok_or_else(|| {
            DataSourceError::InvalidRequest(format!("{route:?} requires an id"))
        })?;
        Ok(format!("{}{}", self.base_url, path))
    }

    fn send(
        &self,
        route: ApiRoute,
        id: Option<&str>,
        body: Option<&Pet>,
    ) -> Result<ureq::Response, DataSourceError> {
        let url = self.url_for(route, id)?;
        let method = route.method();
        debug!(%method, %url, "request");

        let mut request = self
            .agent
            .request(method.as_str(), &url)
            .set("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        let result = match (method, body) {
            (Method::Post | Method::Put, Some(pet)) => request.send_json(pet),
            _ => request.call(),
        };
        result.map_err(|err| {
            let mapped = map_ureq_error(err);
            warn!(%method, %url, error = %mapped, "request failed");
            mapped
        })
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        route: ApiRoute,
        id: Option<&str>,
        body: Option<&Pet>,
    ) -> Result<T, DataSourceError> {
        let response = self.send(route, id, body)?;
        response
            .into_json::<T>()
            .map_err(|err| DataSourceError::Decode(err.to_string()))
    }
}

impl PetDataSource for HttpPetDataSource {
    fn add_pet(&self, pet: &Pet) -> Result<Pet, DataSourceError> {
        self.fetch(ApiRoute::AddPet, None, Some(pet))
    }

    fn edit_pet(&self, pet: &Pet) -> Result<Pet, DataSourceError> {
        self.fetch(ApiRoute::EditPet, pet.id.as_deref(), Some(pet))
    }

    fn delete_pet(&self, pet_id: &str) -> Result<(), DataSourceError> {
        self.send(ApiRoute::DeletePet, Some(pet_id), None)
            .map(|_| ())
    }

    fn fetch_pet_by_id(&self, pet_id: &str) -> Result<Pet, DataSourceError> {
        self.fetch(ApiRoute::FetchPet, Some(pet_id), None)
    }

    fn fetch_owner_pets(&self, owner_id: &str) -> Result<Vec<Pet>, DataSourceError> {
        self.fetch(ApiRoute::FetchOwnerPets, Some(owner_id), None)
    }

    fn fetch_user_by_id(&self, user_id: &str) -> Result<Owner, DataSourceError> {
        self.fetch(ApiRoute::FetchUser, Some(user_id), None)
    }

    fn fetch_pet_types(&self) -> Result<Vec<PetType>, DataSourceError> {
        self.fetch(ApiRoute::FetchPetTypes, None, None)
    }
}

fn map_ureq_error(err: ureq::Error) -> DataSourceError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            status_error(status, &body)
        }
        ureq::Error::Transport(transport) => DataSourceError::Transport(transport.to_string()),
    }
}

/// Maps a non-2xx status and its body onto a `DataSourceError`.
pub fn status_error(status: u16, body: &str) -> DataSourceError {
    let message = error_message(body);
    if status == 404 {
        return DataSourceError::NotFound(if message.is_empty() {
            "resource".to_string()
        } else {
            message
        });
    }
    DataSourceError::Status { status, message }
}

/// Prefers a JSON `message`/`error` field, else the trimmed body.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        });
    let text = from_json.unwrap_or_else(|| body.trim().to_string());
    text.chars().take(MAX_ERROR_BODY).collect()
}
