use anyhow::Context;
use prayer_core::export::{self, ExportFormat};
use prayer_core::io;
use std::path::Path;

pub fn run(root: &Path, format: ExportFormat, out: Option<&Path>) -> anyhow::Result<()> {
    let mut session = super::open_session(root)?;
    let body = export::render(session.roster(), format)?;

    let Some(out) = out else {
        print!("{body}");
        if !body.ends_with('\n') {
            println!();
        }
        return Ok(());
    };

    let target = if out.is_dir() {
        out.join(format.default_file_name())
    } else {
        out.to_path_buf()
    };
    io::atomic_write(&target, body.as_bytes())
        .with_context(|| format!("failed to write {}", target.display()))?;
    println!("Exported {} to {}", format.as_str(), target.display());
    Ok(())
}
