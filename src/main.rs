use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pixel_studio::app::{self, App};
use pixel_studio::catalog::Tool;
use pixel_studio::request::ToolForm;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "pixel-studio")]
#[command(about = "Generate and edit images with Gemini from the command line")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every tool with its fields and image slots.
    Tools,
    /// Run one tool and save the result.
    Run {
        /// Tool id, e.g. `face-swap` (see `tools`).
        #[arg(value_parser = parse_tool_arg)]
        tool: Tool,
        /// Image input as `slot=path`; a bare path fills the tool's first slot.
        #[arg(long = "image", value_name = "SLOT=PATH")]
        images: Vec<String>,
        /// Text field as `key=value`.
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Output directory (defaults to OUTPUT_DIR).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Interactive chat. `/reset` clears the session, `/quit` exits.
    Chat,
}

fn parse_tool_arg(input: &str) -> std::result::Result<Tool, String> {
    Tool::from_id(input).ok_or_else(|| {
        let ids: Vec<&str> = Tool::ALL.iter().map(|t| t.id()).collect();
        format!("Unknown tool '{}'. Expected one of: {}", input, ids.join(", "))
    })
}

fn parse_key_value(input: &str) -> std::result::Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid '{}'. Expected KEY=VALUE", input)),
    }
}

/// Split `slot=path`, falling back to `default_slot` for a bare path.
fn parse_image_arg(
    input: &str,
    default_slot: Option<&str>,
) -> std::result::Result<(String, PathBuf), String> {
    match input.split_once('=') {
        Some((slot, path)) if !slot.is_empty() && !path.is_empty() => {
            Ok((slot.to_string(), PathBuf::from(path)))
        }
        Some(_) => Err(format!("Invalid '{}'. Expected SLOT=PATH", input)),
        None => default_slot
            .map(|slot| (slot.to_string(), PathBuf::from(input)))
            .ok_or_else(|| format!("'{}' needs a slot name; this tool takes no images", input)),
    }
}

fn build_form(tool: Tool, images: &[String], fields: &[(String, String)]) -> Result<ToolForm> {
    let default_slot = tool.descriptor().image_slots.first().map(|s| s.name);
    let mut form = ToolForm::new();
    for (key, value) in fields {
        form.set_field(key.clone(), value.clone());
    }
    for raw in images {
        let (slot, path) = parse_image_arg(raw, default_slot).map_err(anyhow::Error::msg)?;
        let image = app::load_image(&path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        form.add_image(slot, image);
    }
    Ok(form)
}

async fn execute(command: Command) -> Result<()> {
    match command {
        Command::Tools => {
            for line in app::describe_tools() {
                println!("{}", line);
            }
        }
        Command::Run {
            tool,
            images,
            fields,
            out,
        } => {
            let form = build_form(tool, &images, &fields)?;
            let mut app = App::new().context("Failed to initialize application")?;
            let path = app.run_tool(tool, &form, out.as_deref()).await?;
            info!("Saved {}", path.display());
            println!("{}", path.display());
        }
        Command::Chat => {
            let mut app = App::new().context("Failed to initialize application")?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app.chat_repl(stdin, tokio::io::stdout()).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    if let Err(e) = execute(args.command).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
