use anyhow::Result;

fn main() -> Result<()> {
    mindmap_cli::main_entry()
}
