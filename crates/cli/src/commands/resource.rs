use std::sync::Arc;

use anyhow::{Context, Result};
use leadsync_client::{ApiClient, ResourceApi};
use leadsync_core::resources::{
    Addons, Automations, Campaigns, ChatAgents, Customers, Features, Labels, Leads, Packages,
    Statuses, Workspaces,
};
use leadsync_core::{CacheConfig, ClientConfig, PageRequest, Resource, ResourceName};
use leadsync_query::{ListView, Mutation, MutationOp, QueryClient, Reconciler};

pub(crate) enum ResourceAction {
    List { page: i64, limit: i64 },
    Create { json: String },
    Update { id: String, json: String },
    Delete { id: String },
}

/// Runs `action` against `resource` and returns pretty JSON for stdout.
pub(crate) async fn run(
    config: &ClientConfig,
    resource: &str,
    action: ResourceAction,
) -> Result<String> {
    let name: ResourceName = resource.parse()?;
    let api = Arc::new(ApiClient::new(config)?);
    match name {
        ResourceName::Leads => run_for::<Leads>(&api, action).await,
        ResourceName::Customers => run_for::<Customers>(&api, action).await,
        ResourceName::Labels => run_for::<Labels>(&api, action).await,
        ResourceName::Statuses => run_for::<Statuses>(&api, action).await,
        ResourceName::Campaigns => run_for::<Campaigns>(&api, action).await,
        ResourceName::Automations => run_for::<Automations>(&api, action).await,
        ResourceName::Addons => run_for::<Addons>(&api, action).await,
        ResourceName::Packages => run_for::<Packages>(&api, action).await,
        ResourceName::Features => run_for::<Features>(&api, action).await,
        ResourceName::Workspaces => run_for::<Workspaces>(&api, action).await,
        ResourceName::ChatAgents => run_for::<ChatAgents>(&api, action).await,
        other => anyhow::bail!("resource not supported by this CLI: {other}"),
    }
}

async fn run_for<R: Resource>(api: &Arc<ApiClient>, action: ResourceAction) -> Result<String> {
    let resource: Arc<dyn ResourceApi<R>> = Arc::new(api.resource::<R>());
    let client = Arc::new(QueryClient::new(CacheConfig::from_env()));

    match action {
        ResourceAction::List { page, limit } => {
            let view = ListView::new(client, resource, PageRequest::new(page, limit)?);
            let page = view.open().await.map_err(|e| anyhow::anyhow!(e.user_message()))?;
            Ok(serde_json::to_string_pretty(&*page)?)
        },
        ResourceAction::Create { json } => {
            let input = parse_payload::<R::Create>(&json)?;
            mutate(resource, client, MutationOp::Create(input)).await
        },
        ResourceAction::Update { id, json } => {
            let input = parse_payload::<R::Update>(&json)?;
            mutate(resource, client, MutationOp::Update { id, input }).await
        },
        ResourceAction::Delete { id } => mutate(resource, client, MutationOp::Delete { id }).await,
    }
}

async fn mutate<R: Resource>(
    api: Arc<dyn ResourceApi<R>>,
    client: Arc<QueryClient>,
    op: MutationOp<R>,
) -> Result<String> {
    let mutation = Mutation::new(api, Reconciler::new(client));
    let response = mutation.execute(op).await.map_err(|e| anyhow::anyhow!(e.user_message()))?;
    Ok(serde_json::to_string_pretty(&response)?)
}

fn parse_payload<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).context("invalid --json payload")
}
