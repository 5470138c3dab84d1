use std::path::Path;
use stride_core::io;

const EMPTY_MODEL: &str = "components: []\n";
const DEFAULT_CHECKLIST: &str = include_str!("../../assets/default-pr-checklist.yml");

pub fn run(model_path: &Path) -> anyhow::Result<()> {
    if io::write_if_missing(model_path, EMPTY_MODEL.as_bytes())? {
        println!("Created {}", model_path.display());
    } else {
        println!("{} already exists", model_path.display());
    }

    let checklist_path = Path::new("pr-checklist.yml");
    if io::write_if_missing(checklist_path, DEFAULT_CHECKLIST.as_bytes())? {
        println!("Created {}", checklist_path.display());
    } else {
        println!("{} already exists", checklist_path.display());
    }

    Ok(())
}
