use anyhow::Result;

fn main() -> Result<()> {
    simtab_cli::main_entry()
}
