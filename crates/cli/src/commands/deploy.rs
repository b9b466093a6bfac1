//! Cluster deployment CLI commands

use anyhow::Result;

use crate::client::ApiClient;
use crate::commands::read_spec;
use crate::output::print_success;

/// Create the deployment for a pod spec in the cluster
pub async fn create_deployment(client: &ApiClient, file: &str) -> Result<()> {
    let spec = read_spec(file)?;
    client.send_post("api/v1/deployments", &spec).await?;
    print_success(&format!(
        "Created deployment {}/{}",
        spec.namespace, spec.name
    ));
    Ok(())
}

/// Replace the cluster deployment for a pod spec
pub async fn update_deployment(client: &ApiClient, file: &str) -> Result<()> {
    let spec = read_spec(file)?;
    client.send_put("api/v1/deployments", &spec).await?;
    print_success(&format!(
        "Updated deployment {}/{}",
        spec.namespace, spec.name
    ));
    Ok(())
}

/// Delete the deployment tracked by a pod record
pub async fn delete_deployment(client: &ApiClient, id: i64) -> Result<()> {
    client
        .send_delete(&format!("api/v1/pods/{}/deployment", id))
        .await?;
    print_success(&format!("Deleted deployment for pod record {}", id));
    Ok(())
}
