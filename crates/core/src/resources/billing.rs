//! Billing catalog: packages, add-ons and the features they unlock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceName};

/// Purchasable extra on top of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in the workspace billing currency.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Addons;

impl Resource for Addons {
    const NAME: ResourceName = ResourceName::Addons;
    type Item = Addon;
    type Create = AddonInput;
    type Update = AddonInput;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    #[default]
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub interval: BillingInterval,
    /// Feature ids included in this package.
    #[serde(default)]
    pub feature_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub interval: BillingInterval,
    #[serde(default)]
    pub feature_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Packages;

impl Resource for Packages {
    const NAME: ResourceName = ResourceName::Packages;
    type Item = Package;
    type Create = PackageInput;
    type Update = PackageInput;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Usage cap enforced by the backend; `None` means unlimited.
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct Features;

impl Resource for Features {
    const NAME: ResourceName = ResourceName::Features;
    type Item = Feature;
    type Create = FeatureInput;
    type Update = FeatureInput;
}
