use crate::cmd::{load_model, save_model};
use crate::output;
use clap::Subcommand;
use std::path::Path;
use stride_core::types::Trait;

#[derive(Subcommand)]
pub enum ComponentSubcommand {
    /// Add a component to the model
    Add {
        /// Component name, e.g. "Web Frontend"
        name: String,

        /// Traits to assign, e.g. --trait acts_as_a_server
        #[arg(long = "trait", value_name = "TRAIT")]
        traits: Vec<Trait>,
    },

    /// Remove a component and every data flow that touches it
    Remove { name: String },

    /// List components and their traits
    List,

    /// Add or remove a single trait on a component
    Trait {
        #[command(subcommand)]
        subcommand: TraitSubcommand,
    },
}

#[derive(Subcommand)]
pub enum TraitSubcommand {
    Add {
        component: String,
        #[arg(value_name = "TRAIT")]
        r#trait: Trait,
    },
    Remove {
        component: String,
        #[arg(value_name = "TRAIT")]
        r#trait: Trait,
    },
}

pub fn run(model_path: &Path, subcommand: ComponentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        ComponentSubcommand::Add { name, traits } => {
            let mut model = load_model(model_path)?;
            if model.contains_component(&name) {
                anyhow::bail!("component '{name}' already exists");
            }
            model.add_component(&name);
            model.set_traits(&name, traits)?;
            save_model(model_path, &model)?;
            println!("Added component '{name}'");
            Ok(())
        }
        ComponentSubcommand::Remove { name } => {
            let mut model = load_model(model_path)?;
            if !model.contains_component(&name) {
                anyhow::bail!("no component named '{name}'");
            }
            model.remove_component(&name);
            save_model(model_path, &model)?;
            println!("Removed component '{name}'");
            Ok(())
        }
        ComponentSubcommand::List => {
            let model = load_model(model_path)?;
            if json {
                let entries: Vec<serde_json::Value> = model
                    .components()
                    .iter()
                    .map(|name| {
                        let traits: Vec<&str> =
                            model.traits_of(name).iter().map(|t| t.as_str()).collect();
                        serde_json::json!({ "name": name, "traits": traits })
                    })
                    .collect();
                return output::print_json(&entries);
            }
            let rows = model
                .components()
                .iter()
                .map(|name| {
                    let traits: Vec<&str> =
                        model.traits_of(name).iter().map(|t| t.name()).collect();
                    vec![name.clone(), traits.join(", ")]
                })
                .collect();
            output::print_table(&["COMPONENT", "TRAITS"], rows);
            Ok(())
        }
        ComponentSubcommand::Trait { subcommand } => {
            let mut model = load_model(model_path)?;
            match subcommand {
                TraitSubcommand::Add { component, r#trait } => {
                    model.add_trait(&component, r#trait)?;
                    save_model(model_path, &model)?;
                    println!("Added trait '{}' to '{component}'", r#trait.name());
                }
                TraitSubcommand::Remove { component, r#trait } => {
                    model.remove_trait(&component, r#trait)?;
                    save_model(model_path, &model)?;
                    println!("Removed trait '{}' from '{component}'", r#trait.name());
                }
            }
            Ok(())
        }
    }
}
