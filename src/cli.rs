//! Command line subcommands and output rendering

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use volctl::{Error, VolumeCreate, VolumeManager};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List volumes
    List {
        /// Use the summary endpoint instead of the detailed one
        #[arg(long)]
        summary: bool,
        /// Only volumes whose attribute equals the value, as key=value
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, Value)>,
    },
    /// Show one volume
    Show { volume_id: String },
    /// Create a volume
    Create {
        /// Size in GB
        size: u64,
        #[arg(long)]
        snapshot_id: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long)]
        display_description: Option<String>,
        #[arg(long)]
        volume_type: Option<String>,
    },
    /// Delete a volume
    Delete { volume_id: String },
    /// Set attachment metadata on a volume
    Attach {
        volume_id: String,
        instance_uuid: String,
        mountpoint: String,
    },
    /// Clear attachment metadata
    Detach { volume_id: String },
    Reserve { volume_id: String },
    Unreserve { volume_id: String },
    /// Initialize a connection; prints the connection info
    InitConnection {
        volume_id: String,
        /// Connector object as JSON
        #[arg(long, value_parser = parse_json)]
        connector: Value,
    },
    TerminateConnection {
        volume_id: String,
        #[arg(long, value_parser = parse_json)]
        connector: Value,
    },
    /// List volumes attached to a server
    ServerVolumes { server_id: String },
    /// Show one server attachment
    ServerVolume {
        server_id: String,
        attachment_id: String,
    },
    /// Attach a volume to a server
    AttachServer {
        server_id: String,
        volume_id: String,
        device: String,
    },
    /// Detach a volume from a server
    DetachServer {
        server_id: String,
        attachment_id: String,
    },
    /// Save --endpoint/--token (and timeout) to the config file
    Configure {
        /// Request timeout in seconds, 0 disables it
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

/// `key=value`; the value is read as JSON when it parses, else as a string
fn parse_filter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", text.trim_end());
    Ok(())
}

pub async fn run(manager: &VolumeManager, command: Command, format: OutputFormat) -> Result<()> {
    match command {
        Command::List { summary, filters } => {
            let volumes = if filters.is_empty() {
                manager.list(!summary).await?
            } else {
                let filters: Vec<(&str, Value)> = filters
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.clone()))
                    .collect();
                manager.findall(&filters).await?
            };
            let resources: Vec<_> = volumes.iter().map(|v| v.resource()).collect();
            render(&resources, format)
        }
        Command::Show { volume_id } => {
            let volume = manager.get(&volume_id).await?;
            render(volume.resource(), format)
        }
        Command::Create {
            size,
            snapshot_id,
            display_name,
            display_description,
            volume_type,
        } => {
            let request = VolumeCreate {
                size,
                snapshot_id,
                display_name,
                display_description,
                volume_type,
            };
            let volume = manager.create(&request).await?;
            tracing::info!("Created {}", volume);
            render(volume.resource(), format)
        }
        Command::Delete { volume_id } => {
            manager.delete(&volume_id).await?;
            tracing::info!("Deleted volume {}", volume_id);
            Ok(())
        }
        Command::Attach {
            volume_id,
            instance_uuid,
            mountpoint,
        } => {
            let response = manager.attach(&volume_id, &instance_uuid, &mountpoint).await?;
            render(&response.body, format)
        }
        Command::Detach { volume_id } => {
            let response = manager.detach(&volume_id).await?;
            render(&response.body, format)
        }
        Command::Reserve { volume_id } => {
            let response = manager.reserve(&volume_id).await?;
            render(&response.body, format)
        }
        Command::Unreserve { volume_id } => {
            let response = manager.unreserve(&volume_id).await?;
            render(&response.body, format)
        }
        Command::InitConnection {
            volume_id,
            connector,
        } => {
            let info = manager.initialize_connection(&volume_id, &connector).await?;
            render(&info, format)
        }
        Command::TerminateConnection {
            volume_id,
            connector,
        } => {
            manager.terminate_connection(&volume_id, &connector).await?;
            Ok(())
        }
        Command::ServerVolumes { server_id } => {
            let attachments = manager.get_server_volumes(&server_id).await?;
            let resources: Vec<_> = attachments.iter().map(|a| &**a).collect();
            render(&resources, format)
        }
        Command::ServerVolume {
            server_id,
            attachment_id,
        } => {
            let attachment = manager.get_server_volume(&server_id, &attachment_id).await?;
            render(&*attachment, format)
        }
        Command::AttachServer {
            server_id,
            volume_id,
            device,
        } => {
            let attachment = manager
                .create_server_volume(&server_id, &volume_id, &device)
                .await?;
            render(&*attachment, format)
        }
        Command::DetachServer {
            server_id,
            attachment_id,
        } => {
            manager
                .delete_server_volume(&server_id, &attachment_id)
                .await
                .context("Failed to detach volume from server")?;
            Ok(())
        }
        Command::Configure { .. } => Ok(()),
    }
}

/// Format an error for display, without leaking raw API bodies
pub fn format_api_error(error: &anyhow::Error) -> String {
    if let Some(api_error) = error.downcast_ref::<Error>() {
        if let Some(status) = api_error.status() {
            let message = match status.as_u16() {
                400 => "Invalid request. Check your parameters.",
                401 => "Authentication failed. Check your auth token.",
                403 => "Permission denied.",
                404 => "Resource not found.",
                409 => "Resource conflict. The volume may be in use or in the wrong state.",
                413 | 429 => "Rate or quota limit exceeded. Please try again later.",
                500 | 503 => "Volume service temporarily unavailable. Please try again.",
                _ => "Request failed.",
            };
            return format!("{message} ({status})");
        }
    }

    let error_str = format!("{:#}", error);

    // Truncate long error messages and strip control characters
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
