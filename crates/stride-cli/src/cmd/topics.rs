use crate::cmd::load_model;
use crate::output;
use std::path::Path;
use stride_core::guidance::{BlockKind, GuidanceBlock};
use stride_core::topics::{self, DiscussionTopic};

pub fn run(
    model_path: &Path,
    group_by_kind: bool,
    labels_only: bool,
    json: bool,
) -> anyhow::Result<()> {
    let model = load_model(model_path)?;
    let topics = topics::generate_topics(&model);

    if json {
        if group_by_kind {
            let grouped: Vec<serde_json::Value> = topics::group_by_kind(&topics)
                .into_iter()
                .map(|(kind, bucket)| {
                    serde_json::json!({ "kind": kind, "topics": bucket })
                })
                .collect();
            return output::print_json(&grouped);
        }
        return output::print_json(&topics);
    }

    if topics.is_empty() {
        println!("No topics: the model has no in-scope components or flows.");
        return Ok(());
    }

    if group_by_kind {
        for (kind, bucket) in topics::group_by_kind(&topics) {
            println!("== {kind} ==");
            for topic in bucket {
                print_topic(topic, labels_only);
            }
            println!();
        }
    } else {
        for topic in &topics {
            print_topic(topic, labels_only);
        }
    }
    Ok(())
}

fn print_topic(topic: &DiscussionTopic, labels_only: bool) {
    if labels_only {
        println!("{}", topic.label);
        return;
    }
    println!("# {}", topic.label);
    for block in &topic.content {
        print_block(block);
    }
    println!();
}

fn print_block(block: &GuidanceBlock) {
    match block.kind {
        BlockKind::Discussion => println!("{}", block.text),
        BlockKind::Tip => println!("Tip: {}", block.text),
        BlockKind::Warning => println!("Warning: {}", block.text),
    }
}
