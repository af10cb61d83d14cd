// src/cli.rs
//
// One search per invocation. Prints a table, or writes an export file
// with `--export`. `--fallback` runs the extended search when the first
// pass comes back empty.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use crate::{
    attachment::{Attachment, MemoryStore},
    config::{consts::CONFIG_FILE, options::AppOptions},
    export::{self, ExportFormat},
    lead::{Criteria, Field, LeadRecord},
    progress::Progress,
    search::{Orchestrator, SearchSession, SearchState},
};

/// Widest a table column gets before cells are cut.
const MAX_COL: usize = 40;

#[derive(Parser, Debug)]
#[command(name = "cli", version, about = "Search for leads by name, location and technology")]
pub struct Args {
    /// Name contains
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Location contains
    #[arg(short, long, default_value = "")]
    pub location: String,

    /// Technology contains
    #[arg(short, long, default_value = "")]
    pub technology: String,

    /// Attach a file. Spreadsheets (csv, tsv, xls, xlsx, ods) are searched locally.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Run the extended search if nothing is found
    #[arg(long, default_value_t = false)]
    pub fallback: bool,

    /// Write results as csv, xlsx or pdf instead of printing them
    #[arg(short, long, value_name = "FORMAT")]
    pub export: Option<ExportFormat>,

    /// Export directory (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Config file (default: ./lead_search.toml, then the platform config dir)
    #[arg(short, long, value_name = "PATH", help_heading = "Config")]
    pub config: Option<PathBuf>,
}

/// Prints state changes to stderr so stdout stays clean for the table.
struct CliProgress;

impl Progress for CliProgress {
    fn stage(&mut self, state: SearchState) {
        eprintln!("{}", state.message());
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    run_with(args)
}

pub fn run_with(args: Args) -> Result<()> {
    crate::log::init();

    let opts = AppOptions::load_from(args.config.as_deref())
        .wrap_err_with(|| format!("loading {}", CONFIG_FILE))?;
    let orch = Orchestrator::from_options(&opts).wrap_err("setting up HTTP client")?;
    let mut session = SearchSession::new(Box::new(MemoryStore::new(opts.cache.max_bytes)));

    if let Some(path) = &args.file {
        let att = Attachment::from_path(path)
            .wrap_err_with(|| format!("reading {}", path.display()))?;
        if let Some(w) = session.attach(att) {
            logd!("CLI: {}", w);
        }
    }

    let criteria = Criteria::new(&args.name, &args.location, &args.technology);
    let mut progress = CliProgress;

    let mut state = session.submit(&orch, criteria, Some(&mut progress))?;
    if state.offers_fallback() && args.fallback {
        state = session.request_fallback(&orch, Some(&mut progress))?;
    }
    eprintln!("{}", state.message());

    let results = session.results();
    match args.export {
        Some(format) => {
            let mut target = opts.export;
            if let Some(dir) = args.out {
                target.dir = dir;
            }
            match export::export_records(format, results, &target)? {
                Some(path) => println!("{}", path.display()),
                None => eprintln!("Nothing to export"),
            }
        }
        None => print!("{}", render_table(results)),
    }
    Ok(())
}

/// Plain-text table, columns padded to their widest cell.
pub fn render_table(records: &[LeadRecord]) -> String {
    if records.is_empty() {
        return s!();
    }

    let mut widths = Field::ALL.map(|f| f.title().len());
    for rec in records {
        for (w, cell) in widths.iter_mut().zip(rec.cells()) {
            *w = (*w).max(cell.chars().count()).min(MAX_COL);
        }
    }

    let mut out = s!();
    push_line(&mut out, &Field::ALL.map(|f| f.title()), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths);
    for rec in records {
        push_line(&mut out, &rec.cells(), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| {
            let cut: String = c.chars().take(*w).collect();
            format!("{:<width$}", cut, width = *w)
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_export_format() {
        let a = Args::try_parse_from(["cli", "-l", "Austin", "--export", "pdf"]).unwrap();
        assert_eq!(a.location, "Austin");
        assert_eq!(a.export, Some(ExportFormat::Pdf));
        assert!(Args::try_parse_from(["cli", "--export", "docx"]).is_err());
    }

    #[test]
    fn table_pads_and_cuts() {
        let rec = LeadRecord {
            name: s!("Jane"),
            email: "x".repeat(60),
            ..Default::default()
        };
        let t = render_table(&[rec]);
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name  Location"));
        assert!(lines[2].contains(&"x".repeat(MAX_COL)));
        assert!(!lines[2].contains(&"x".repeat(MAX_COL + 1)));
    }
}
