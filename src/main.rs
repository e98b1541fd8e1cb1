use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use core_types::FieldId;
use surface::{BackingStore, DEFAULT_CONFIG_FILE, FieldStore, PageNode, SurfaceConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Edit text files in line-numbered editors.
#[derive(Parser, Debug)]
#[command(name = "gutterline", about, long_about = None)]
struct Cli {
    /// Files to open, one editor each
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Load configuration from a specific file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write edited contents back to the files on exit
    #[arg(long)]
    save: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SurfaceConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SurfaceConfig::load_or_default(DEFAULT_CONFIG_FILE),
    };

    let page = build_page(&cli.files, &config.discovery.class_name)?;
    let store = platform::run(config, page, FieldStore::new())?;

    if cli.save {
        save_files(&cli.files, &store)?;
    }
    Ok(())
}

/// One textarea per file, field ids counting from 1 in argument order.
fn build_page(files: &[PathBuf], class_name: &str) -> Result<PageNode> {
    if files.is_empty() {
        return Ok(PageNode::document(vec![PageNode::textarea(1, class_name, "")]));
    }

    let mut fields = Vec::with_capacity(files.len());
    for (i, path) in files.iter().enumerate() {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{} does not exist yet, starting empty", path.display());
                String::new()
            }
            Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
        };
        // Discovery drops one leading newline, as textarea parsing does.
        let text = if text.starts_with(['\n', '\r']) {
            format!("\n{text}")
        } else {
            text
        };
        fields.push(PageNode::textarea(i as u32 + 1, class_name, &text));
    }
    Ok(PageNode::document(fields))
}

fn save_files(files: &[PathBuf], store: &FieldStore) -> Result<()> {
    for (i, path) in files.iter().enumerate() {
        let Some(value) = store.value(FieldId(i as u32 + 1)) else {
            continue;
        };
        fs::write(path, value).with_context(|| format!("writing {}", path.display()))?;
        log::info!("saved {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface::discover_fields;

    #[test]
    fn no_files_gives_one_empty_field() {
        let page = build_page(&[], "gutterline").unwrap();
        let found = discover_fields(&page, "gutterline");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, FieldId(1));
        assert_eq!(found[0].initial, "");
    }

    #[test]
    fn files_keep_a_leading_blank_line() {
        let dir = std::env::temp_dir().join(format!("gutterline-main-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let a = dir.join("a.txt");
        let b = dir.join("b.txt");
        fs::write(&a, "\nfirst\r\nsecond").unwrap();
        fs::write(&b, "x").unwrap();
        let missing = dir.join("missing.txt");

        let page = build_page(&[a, b, missing], "gutterline").unwrap();
        let found = discover_fields(&page, "gutterline");
        let initial: Vec<_> = found.iter().map(|f| f.initial.as_str()).collect();
        assert_eq!(initial, ["\nfirst\nsecond", "x", ""]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
