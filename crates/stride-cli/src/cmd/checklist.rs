use crate::output;
use anyhow::Context;
use clap::Subcommand;
use std::path::PathBuf;
use stride_core::checklist::{self, ChecklistData, QuestionData, QuestionPath};
use stride_core::StrideError;

#[derive(Subcommand)]
pub enum ChecklistSubcommand {
    /// Print the checklist's questions and the task lists they can pull in
    Show {
        #[arg(long, default_value = "pr-checklist.yml")]
        file: PathBuf,
    },

    /// Validate a checklist document against the expected schema
    Validate {
        #[arg(long, default_value = "pr-checklist.yml")]
        file: PathBuf,
    },

    /// Resolve the tasks implied by a set of answers
    Tasks {
        #[arg(long, default_value = "pr-checklist.yml")]
        file: PathBuf,

        /// Question to answer "yes", addressed by path (e.g. --answer 1.0).
        /// Repeatable. Answers recorded in the file itself also count.
        #[arg(long = "answer", value_name = "PATH")]
        answers: Vec<QuestionPath>,
    },
}

pub fn run(subcommand: ChecklistSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        ChecklistSubcommand::Show { file } => {
            let checklist = load_checklist(&file)?;
            if json {
                return output::print_json(&checklist);
            }
            println!("Questions:");
            print_questions(&checklist.questions, &mut Vec::new());
            println!();
            println!("Task lists:");
            for (name, list) in &checklist.task_lists {
                match &list.extends_task_list {
                    Some(parent) => println!("  {name} (extends {parent}):"),
                    None => println!("  {name}:"),
                }
                for task in &list.tasks {
                    println!("    - {}", task.text);
                }
            }
            Ok(())
        }
        ChecklistSubcommand::Validate { file } => {
            match load_checklist(&file) {
                Ok(_) => {
                    println!("{} is valid", file.display());
                    Ok(())
                }
                Err(err) => match err.downcast_ref::<StrideError>() {
                    Some(StrideError::SchemaInvalid { messages }) => {
                        eprintln!("Loaded checklist data does not conform to expected schema");
                        for message in messages {
                            eprintln!("  {message}");
                        }
                        std::process::exit(1);
                    }
                    _ => Err(err),
                },
            }
        }
        ChecklistSubcommand::Tasks { file, answers } => {
            let mut checklist = load_checklist(&file)?;
            for path in &answers {
                checklist::set_checked(&mut checklist.questions, path, true)
                    .with_context(|| format!("no question at path {path}"))?;
            }
            let tasks = checklist::required_tasks(&checklist)?;
            if json {
                return output::print_json(&tasks);
            }
            if tasks.is_empty() {
                println!("No additional tasks are needed for this PR.");
            } else {
                println!("Make sure to perform the following additional tasks for this PR:");
                for task in &tasks {
                    println!("  - {}", task.text);
                }
            }
            Ok(())
        }
    }
}

fn load_checklist(file: &std::path::Path) -> anyhow::Result<ChecklistData> {
    ChecklistData::load(file).with_context(|| format!("failed to load {}", file.display()))
}

fn print_questions(questions: &[QuestionData], prefix: &mut Vec<usize>) {
    for (index, question) in questions.iter().enumerate() {
        prefix.push(index);
        let path = QuestionPath::new(prefix.clone());
        let mark = if question.is_checked { "x" } else { " " };
        let indent = "  ".repeat(prefix.len());
        println!("{indent}[{mark}] {path}  {}", question.text);
        if let Some(condition) = &question.when_true {
            print_questions(&condition.additional_questions_to_ask, prefix);
        }
        prefix.pop();
    }
}
