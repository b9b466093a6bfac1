//! Pod record CLI commands

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, CreatedResponse, PodRecord};
use crate::commands::read_spec;
use crate::output::{format_quantity, print_success, print_warning, OutputFormat};

/// Row for the pod record table
#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Replicas")]
    replicas: i32,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Pull Policy")]
    pull_policy: String,
}

impl From<&PodRecord> for PodRow {
    fn from(record: &PodRecord) -> Self {
        Self {
            id: record.id,
            name: record.spec.name.clone(),
            namespace: record.spec.namespace.clone(),
            image: record.spec.image.clone(),
            replicas: record.spec.replicas,
            cpu: format_quantity(record.spec.cpu_max),
            memory: format_quantity(record.spec.memory_max),
            pull_policy: record.spec.pull_policy.clone(),
        }
    }
}

fn print_records(records: &[PodRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Table => {
            if records.is_empty() {
                print_warning("No pod records found");
                return Ok(());
            }
            let rows: Vec<PodRow> = records.iter().map(PodRow::from).collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }
    Ok(())
}

/// List all pod records
pub async fn list_pods(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let records: Vec<PodRecord> = client.get("api/v1/pods").await?;
    print_records(&records, format)
}

/// Show a single pod record
pub async fn get_pod(client: &ApiClient, id: i64, format: OutputFormat) -> Result<()> {
    let record: PodRecord = client.get(&format!("api/v1/pods/{}", id)).await?;
    print_records(&[record], format)
}

/// Register a new pod record from a spec file
pub async fn register_pod(client: &ApiClient, file: &str) -> Result<()> {
    let spec = read_spec(file)?;
    let created: CreatedResponse = client.post("api/v1/pods", &spec).await?;
    print_success(&format!(
        "Registered pod record {} for {}/{}",
        created.id, spec.namespace, spec.name
    ));
    Ok(())
}

/// Update a pod record from a spec file
pub async fn update_pod(client: &ApiClient, id: i64, file: &str) -> Result<()> {
    let spec = read_spec(file)?;
    client.send_put(&format!("api/v1/pods/{}", id), &spec).await?;
    print_success(&format!("Updated pod record {}", id));
    Ok(())
}

/// Remove a pod record
pub async fn remove_pod(client: &ApiClient, id: i64) -> Result<()> {
    client.send_delete(&format!("api/v1/pods/{}", id)).await?;
    print_success(&format!("Removed pod record {}", id));
    Ok(())
}
