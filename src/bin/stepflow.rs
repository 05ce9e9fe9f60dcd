use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use stepflow::campaign::CampaignPlan;
use stepflow::config::EditorConfig;
use stepflow::editor::WorkflowEditor;
use stepflow::graph::Outcome;
use stepflow::persist::{load_workflow, write_workflow};
use stepflow::workflow::{Delay, DelayUnit, StepData, StepType};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Editor config file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty workflow file
    New {
        file: PathBuf,

        #[arg(long, default_value = "Untitled Workflow")]
        title: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Append a step below the last one and connect it
    AddStep {
        file: PathBuf,

        #[arg(long = "type", short = 't')]
        step_type: StepType,

        #[arg(long, short)]
        label: String,

        #[arg(long, default_value_t = 0)]
        delay_value: u32,

        #[arg(long, default_value = "mins")]
        delay_unit: DelayUnit,

        #[arg(long)]
        description: Option<String>,

        /// Step id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Change a step's label, type or delay
    Edit {
        file: PathBuf,
        id: String,

        #[arg(long)]
        label: Option<String>,

        #[arg(long = "type", short = 't')]
        step_type: Option<String>,

        #[arg(long)]
        delay_value: Option<u32>,

        #[arg(long)]
        delay_unit: Option<DelayUnit>,
    },

    /// Delete a step and its edges
    Remove { file: PathBuf, id: String },

    /// Connect two steps
    Connect {
        file: PathBuf,
        source: String,
        target: String,
    },

    /// Print a summary of the workflow graph
    Inspect { file: PathBuf },

    /// Print the campaign schedule derived from the step sequence
    Schedule {
        file: PathBuf,

        /// Campaign start time (RFC 3339), defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
}

fn open(file: &Path, config: EditorConfig) -> Result<WorkflowEditor> {
    let workflow = load_workflow(file)?;
    let id = workflow.id.clone();
    let mut editor = WorkflowEditor::headless(config);
    editor.repository_mut().import(workflow)?;
    let _ = editor.switch_to(&id);
    Ok(editor)
}

fn save(editor: &mut WorkflowEditor, file: &Path) -> Result<()> {
    check(editor.save())?;
    let workflow = editor.active().ok_or_else(|| anyhow!("No active workflow"))?;
    write_workflow(file, workflow)?;
    info!("Saved workflow {} to {}", workflow.id, file.display());
    Ok(())
}

fn check<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Applied(value) => Ok(value),
        Outcome::Ignored(reason) => bail!("Nothing changed: {}", reason),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::New {
            file,
            title,
            description,
        } => {
            let mut editor = WorkflowEditor::headless(config);
            let workflow = editor.new_workflow(&title, &description);
            write_workflow(&file, &workflow)?;
            println!("{}", workflow.id);
        }

        Commands::AddStep {
            file,
            step_type,
            label,
            delay_value,
            delay_unit,
            description,
            id,
        } => {
            let mut editor = open(&file, config)?;
            let mut data = StepData::new(label, step_type, Delay::new(delay_value, delay_unit));
            data.description = description;
            if let Some(edge) = check(editor.add_step(id, data))? {
                info!("Connected {} -> {}", edge.source, edge.target);
            }
            save(&mut editor, &file)?;
        }

        Commands::Edit {
            file,
            id,
            label,
            step_type,
            delay_value,
            delay_unit,
        } => {
            let mut editor = open(&file, config)?;
            let mut form = editor
                .edit_form(&id)
                .ok_or_else(|| anyhow!("Step not found: {}", id))?;
            if let Some(label) = label {
                form.label = label;
            }
            if let Some(step_type) = step_type {
                form.step_type = step_type;
            }
            if let Some(value) = delay_value {
                form.delay_value = value;
            }
            if let Some(unit) = delay_unit {
                form.delay_unit = unit;
            }
            check(editor.edit_step(&id, form))?;
            save(&mut editor, &file)?;
        }

        Commands::Remove { file, id } => {
            let mut editor = open(&file, config)?;
            check(editor.remove_step(&id))?;
            save(&mut editor, &file)?;
        }

        Commands::Connect { file, source, target } => {
            let mut editor = open(&file, config)?;
            let edge = check(editor.connect(&source, &target))?;
            info!("Added edge {}", edge.id);
            save(&mut editor, &file)?;
        }

        Commands::Inspect { file } => {
            let workflow = load_workflow(&file)?;
            println!("{} ({})", workflow.title, workflow.id);
            if !workflow.description.is_empty() {
                println!("  {}", workflow.description);
            }
            println!("  updated {}", workflow.updated_at.to_rfc3339());
            println!("  {} steps, {} edges", workflow.nodes.len(), workflow.edges.len());
            for node in &workflow.nodes {
                println!(
                    "  [{}] {} {:?} ({}) @ ({}, {})",
                    node.id, node.data.step_type, node.data.label, node.data.delay, node.position.x, node.position.y
                );
            }
            for edge in &workflow.edges {
                println!("  {} -> {}", edge.source, edge.target);
            }
        }

        Commands::Schedule { file, start } => {
            let workflow = load_workflow(&file)?;
            let plan = CampaignPlan::from_workflow(&workflow)?;
            for line in plan.preview() {
                println!("{}", line);
            }
            let start = start.unwrap_or_else(Utc::now);
            for (node_id, at) in plan.fire_times(start)? {
                println!("  {} at {}", node_id, at.to_rfc3339());
            }
        }
    }

    Ok(())
}
