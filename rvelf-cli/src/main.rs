use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rvelf_core::{count_instructions, parse, read_raw_bytes, ElfSectionWalker, ParsedElf};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// Pull the machine code out of RISC-V ELF objects
#[derive(Parser)]
#[command(
    name = "rvelf",
    about = "Extract and inspect the .text section of RISC-V ELF files",
    version,
    author
)]
struct Cli {
    /// Path to ELF file
    #[arg(required = true)]
    path: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show address width, .text size and instruction count
    Info,
    /// Dump the .text section
    Text {
        /// Write the raw bytes here instead of printing a hex dump
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List all sections
    Sections,
}

#[derive(Serialize)]
struct Info {
    path: String,
    address_width: String,
    text_size: usize,
    instructions: usize,
    compressed_instructions: usize,
    trailing_bytes: usize,
    warning: Option<String>,
}

#[derive(Serialize, Tabled)]
struct SectionRow {
    #[tabled(rename = "Index")]
    index: u64,
    #[tabled(rename = "Section")]
    name: String,
    #[tabled(rename = "Offset")]
    offset: String,
    #[tabled(rename = "Size")]
    size: String,
}

fn warn_missing_text(parsed: &ParsedElf) {
    if let Some(advisory) = parsed.advisory {
        eprintln!("{} {}", "warning:".yellow().bold(), advisory);
    }
}

fn hex_dump(bytes: &[u8]) {
    for (i, line) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = line.iter().map(|b| format!("{b:02x}")).collect();
        println!("{:08x}  {}", i * 16, hex.join(" "));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let bytes = read_raw_bytes(&cli.path)?;
    let path = cli.path.display().to_string();

    match cli.command {
        Command::Info => {
            let parsed = parse(&bytes).with_context(|| format!("failed to parse {path}"))?;
            let count = count_instructions(&parsed.text_bytecode);
            let info = Info {
                path,
                address_width: parsed.address_width.to_string(),
                text_size: parsed.text_bytecode.len(),
                instructions: count.total,
                compressed_instructions: count.compressed,
                trailing_bytes: count.trailing_bytes,
                warning: parsed.advisory.map(|a| a.to_string()),
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                warn_missing_text(&parsed);
                println!("File:          {}", info.path);
                println!("Class:         {}", info.address_width);
                println!(".text size:    {} bytes", info.text_size);
                println!(
                    "Instructions:  {} ({} compressed)",
                    info.instructions, info.compressed_instructions
                );
                if info.trailing_bytes > 0 {
                    println!("Trailing:      {} bytes", info.trailing_bytes);
                }
            }
        }

        Command::Text { output } => {
            let parsed = parse(&bytes).with_context(|| format!("failed to parse {path}"))?;
            warn_missing_text(&parsed);

            match output {
                Some(out) => {
                    std::fs::write(&out, &parsed.text_bytecode)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    log::info!(
                        "wrote {} bytes to {}",
                        parsed.text_bytecode.len(),
                        out.display()
                    );
                }
                None => hex_dump(&parsed.text_bytecode),
            }
        }

        Command::Sections => {
            let walker =
                ElfSectionWalker::new(&bytes).with_context(|| format!("failed to parse {path}"))?;
            let rows: Vec<SectionRow> = walker
                .sections()?
                .into_iter()
                .map(|s| SectionRow {
                    index: s.index,
                    name: s.name,
                    offset: format!("0x{:x}", s.file_offset),
                    size: format!("0x{:x}", s.size),
                })
                .collect();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No sections found.");
            } else {
                println!("{} ({})", path, walker.address_width());
                println!("{}", Table::new(rows));
            }
        }
    }

    Ok(())
}
