use crate::output;
use stride_core::types::Trait;

pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = Trait::all()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.as_str(),
                    "name": t.name(),
                    "description": t.description(),
                })
            })
            .collect();
        return output::print_json(&entries);
    }

    let rows = Trait::all()
        .iter()
        .map(|t| {
            vec![
                t.as_str().to_string(),
                t.name().to_string(),
                t.description().to_string(),
            ]
        })
        .collect();
    output::print_table(&["ID", "NAME", "DESCRIPTION"], rows);
    Ok(())
}
