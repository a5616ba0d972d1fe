use iqcompare::{Comparison, TableFormat};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("Usage: compare_files <metrics.json>... ");
        std::process::exit(2);
    }

    let mut cmp = Comparison::new();
    let report = cmp.load_files(&paths);
    for (path, err) in &report.rejected {
        eprintln!("Skipped {}: {err}", path.display());
    }
    println!(
        "Loaded {} records from {} file(s); {} model(s).",
        report.records_appended,
        report.accepted_batches,
        cmp.model_names().len()
    );

    print!("{}", cmp.render_table(TableFormat::Plain));

    for (view, payload) in cmp.snapshot().payloads() {
        println!("{}: {} axis/axes", view.id(), payload.labels.len());
    }
    Ok(())
}
