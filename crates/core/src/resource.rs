//! Resource namespaces and the per-resource binding trait.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Namespace of a backend collection. Doubles as the first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ResourceName {
    Leads,
    Customers,
    Labels,
    Statuses,
    Campaigns,
    Automations,
    Addons,
    Packages,
    Features,
    Workspaces,
    ChatAgents,
}

impl ResourceName {
    pub const ALL: &'static [ResourceName] = &[
        Self::Leads,
        Self::Customers,
        Self::Labels,
        Self::Statuses,
        Self::Campaigns,
        Self::Automations,
        Self::Addons,
        Self::Packages,
        Self::Features,
        Self::Workspaces,
        Self::ChatAgents,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Leads => "leads",
            Self::Customers => "customers",
            Self::Labels => "labels",
            Self::Statuses => "statuses",
            Self::Campaigns => "campaigns",
            Self::Automations => "automations",
            Self::Addons => "addons",
            Self::Packages => "packages",
            Self::Features => "features",
            Self::Workspaces => "workspaces",
            Self::ChatAgents => "chat-agents",
        }
    }

    /// Field that must be a non-empty string on create.
    #[must_use]
    pub const fn display_field(&self) -> &'static str {
        match *self {
            Self::Leads | Self::Customers | Self::Workspaces | Self::ChatAgents => "name",
            Self::Labels
            | Self::Statuses
            | Self::Campaigns
            | Self::Automations
            | Self::Addons
            | Self::Packages
            | Self::Features => "title",
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownResource(s.to_owned()))
    }
}

/// Binds a namespace to its record and payload types.
///
/// Implemented once per backend collection; every generic client, query and
/// view is instantiated through it.
pub trait Resource: Send + Sync + 'static {
    const NAME: ResourceName;

    /// Path segment of the update endpoint, `/{resource}/{EDIT_PATH}`.
    const EDIT_PATH: &'static str = "edit";

    type Item: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;
    type Create: Serialize + DeserializeOwned + fmt::Debug + Send + Sync;
    type Update: Serialize + DeserializeOwned + fmt::Debug + Send + Sync;
}
