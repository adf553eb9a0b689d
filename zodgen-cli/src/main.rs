//! zodgen
//!
//! Generate Zod CRUD validation schemas from model definitions.
//!
//! Usage:
//!   zodgen schema.model -o src/generated/crud-zod.ts

#![deny(warnings)]
#![deny(missing_docs)]

use clap::Parser;
use std::path::PathBuf;

mod parser;

/// Instructional prompt copied verbatim into the trailing `systemPrompt`
/// export. Host configuration; the compiler core never computes it.
const SYSTEM_PROMPT: &str = r#"
You are a Database CRUD operator. Based on the user's request to call the individual tools to perform CRUD operations of Prisma client API:

**Instructions:**
1. When invoking the query tools `findMany`, if user asks for "my" and "I", simply ignore it when generating query parameters.
"#;

#[derive(Parser, Debug)]
#[command(name = "zodgen")]
#[command(about = "Generate Zod CRUD validation schemas from model definitions")]
struct Args {
    /// Input model file(s) containing entity definitions
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output TypeScript file path
    #[arg(short, long, default_value = "crud-zod.ts")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let entities = parser::parse_model_files(&args.input)?;
    if entities.is_empty() {
        eprintln!("No models found in the given input files");
        return Ok(());
    }

    let file_name = args
        .output
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("crud-zod.ts")
        .to_string();
    let options = zodgen::Options {
        file_name,
        system_prompt: SYSTEM_PROMPT.to_string(),
    };
    let source = zodgen::generate(&entities, &options)?;

    if let Some(dir) = args.output.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    std::fs::write(&args.output, source.render())?;

    eprintln!(
        "Generated {} with schemas for {} models",
        args.output.display(),
        entities.len()
    );

    Ok(())
}
