use crate::cmd::{load_model, save_model};
use crate::output;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum FlowSubcommand {
    /// Record that two components exchange data. The side named first fixes
    /// the direction shown in topic labels.
    Add { source: String, dest: String },

    /// Remove the flow between two components, named in either order
    Remove { a: String, b: String },

    /// List data flows
    List,
}

pub fn run(model_path: &Path, subcommand: FlowSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        FlowSubcommand::Add { source, dest } => {
            let mut model = load_model(model_path)?;
            for endpoint in [&source, &dest] {
                if !model.contains_component(endpoint) {
                    anyhow::bail!("no component named '{endpoint}'");
                }
            }
            model.add_flow(&source, &dest)?;
            save_model(model_path, &model)?;
            println!("Added flow '{source} <-> {dest}'");
            Ok(())
        }
        FlowSubcommand::Remove { a, b } => {
            let mut model = load_model(model_path)?;
            if !model.flow_exists(&a, &b) {
                anyhow::bail!("no flow between '{a}' and '{b}'");
            }
            model.remove_flow(&a, &b);
            save_model(model_path, &model)?;
            println!("Removed flow between '{a}' and '{b}'");
            Ok(())
        }
        FlowSubcommand::List => {
            let model = load_model(model_path)?;
            if json {
                return output::print_json(&model.flows());
            }
            let rows = model
                .flows()
                .iter()
                .map(|f| vec![f.source.clone(), f.dest.clone()])
                .collect();
            output::print_table(&["SOURCE", "DEST"], rows);
            Ok(())
        }
    }
}
