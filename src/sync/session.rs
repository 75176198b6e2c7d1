use tracing::info;

use crate::api::types::User;
use crate::api::{paths, ApiGateway};
use crate::confirm::Confirmation;

use super::{log_read_failure, SyncEngine};

impl<G: ApiGateway, C: Confirmation> SyncEngine<G, C> {
  /// Send `bearer` as the Authorization header on every following request.
  pub fn set_bearer(&self, bearer: &str) {
    self.gateway.set_authorization(Some(bearer.to_string()));
  }

  pub fn reset_bearer(&self) {
    self.gateway.set_authorization(None);
  }

  /// Fetch the authenticated user's profile.
  pub async fn get_profile(&self) {
    match self.fetch::<User>(paths::PROFILE).await {
      Ok(user) => {
        info!(user = %user.id, "Profile loaded");
        self.cache.replace_user(user);
      }
      Err(e) => log_read_failure("profile", "", &e),
    }
  }
}
