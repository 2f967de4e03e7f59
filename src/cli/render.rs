use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use super::RenderArgs;
use crate::error::Result;
use crate::export;
use crate::flow::{derive_flow, Flow, FlowOptions};
use crate::fmt::amount;
use crate::importer::{import_files, FileSummary, ImportOptions};
use crate::models::SankeyDiagram;
use crate::settings::{load_settings, Settings};

fn apply_overrides(mut settings: Settings, args: &RenderArgs) -> Settings {
    if let Some(c) = &args.category_column {
        settings.category_column = c.clone();
    }
    if let Some(c) = &args.amount_column {
        settings.amount_column = c.clone();
    }
    if let Some(f) = args.number_format {
        settings.number_format = f;
    }
    if let Some(c) = &args.currency {
        settings.currency = c.clone();
    }
    settings
}

fn default_html_path() -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    PathBuf::from(format!("sankey-{date}.html"))
}

fn print_imports(files: &[FileSummary]) {
    for f in files {
        if f.duplicate_file {
            println!(
                "{} {} (identical to an earlier file)",
                "Skipped".yellow(),
                f.path.display()
            );
        } else if f.skipped > 0 {
            println!(
                "Read {} rows from {} ({} without category or amount)",
                f.imported,
                f.path.display(),
                f.skipped
            );
        } else {
            println!("Read {} rows from {}", f.imported, f.path.display());
        }
    }
}

pub(crate) fn totals_table(diagram: &SankeyDiagram) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Value", ""]);
    for node in &diagram.nodes {
        let marker = if Some(node.index) == diagram.income_root {
            "(income source)".green().bold()
        } else if node.is_income {
            "(income)".green()
        } else {
            "".normal()
        };
        table.add_row(vec![
            Cell::new(&node.path),
            Cell::new(amount(node.value)).set_alignment(CellAlignment::Right),
            Cell::new(marker),
        ]);
    }
    table
}

fn print_links(flow: &Flow) {
    println!("\nLinks (source -> target)");
    for link in &flow.links {
        println!("  {}", flow.describe_link(link));
    }
}

pub fn run(args: RenderArgs, verbose: bool) -> Result<()> {
    let settings = apply_overrides(load_settings()?, &args);
    let import_options = ImportOptions {
        skip_duplicate_files: args.skip_duplicates,
        ..settings.import_options()
    };
    let imported = import_files(&args.files, &import_options)?;
    if !args.quiet {
        print_imports(&imported.files);
    }

    let options = FlowOptions {
        divisor: args.div,
        prune_threshold: args.threshold,
    };
    let flow = derive_flow(&imported.transactions, &options)?;
    let diagram = flow.to_diagram(&settings.currency);

    if diagram.is_empty() {
        println!(
            "Every category is at or below the threshold of {}; nothing to draw.",
            amount(args.threshold)
        );
    } else if !args.quiet {
        println!("\nCategory totals\n{}", totals_table(&diagram));
        if let Some(root) = diagram.income_root_node() {
            println!("Income source: {}", root.path.green().bold());
        }
        if verbose {
            print_links(&flow);
        }
    }

    if let Some(path) = &args.json {
        export::write_json(&diagram, path)?;
        println!("Wrote {}", path.display());
    }
    let html = args
        .html
        .clone()
        .or_else(|| args.plot.then(default_html_path));
    if let Some(path) = html {
        export::write_html(&diagram, &path, &args.title)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
