use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct SearchParams {
    /// Case-insensitive name fragment to search for.
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AvatarParams {
    pub avatar_url: String,
}
