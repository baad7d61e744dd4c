//! Operator CLI: fetch one marketplace listing, normalize it through a
//! format grammar, render the fixed template, and write the artifact.
//! Progress and file names go to stderr; a JSON run summary goes to stdout.

use relist::generate::degradation_warnings;
use relist::{render_listing, Generator, Options, SourceFormat, SpecSection};
use serde::Serialize;
use std::env;
use std::error::Error;
use std::fs;
use std::process;

#[derive(Serialize)]
struct Summary<'a> {
    format: &'a str,
    item_id: &'a str,
    output: &'a str,
    title: Option<&'a str>,
    images: usize,
    description_blocks: usize,
    spec_entries: usize,
    compatibility_groups: usize,
    notes: usize,
    warnings: &'a [String],
}

fn print_usage() {
    eprintln!("Usage: relist [--source] <format> <listing-url> <item-id> [template] [output]");
    eprintln!();
    eprintln!("  format       one of: xtreme, carparts, ourstore");
    eprintln!("  listing-url  marketplace listing page URL");
    eprintln!("  item-id      item id used to fetch the image gallery");
    eprintln!("  template     template file to fill (default: template.html)");
    eprintln!("  output       artifact path (default: <item-id>.html)");
    eprintln!();
    eprintln!("  --source     also write the fetched description to <item-id>-source.html");
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut positional: Vec<String> = Vec::new();
    let mut dump_source = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--source" => dump_source = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    if !(3..=5).contains(&positional.len()) {
        print_usage();
        process::exit(1);
    }

    let Some(format) = SourceFormat::from_tag(&positional[0]) else {
        let tags = SourceFormat::ALL.map(SourceFormat::tag).join(", ");
        eprintln!("expected one of: {tags}");
        return Err(relist::Error::UnknownFormat(positional[0].clone()).into());
    };
    let listing_url = positional[1].as_str();
    let item_id = positional[2].as_str();
    let template_path = positional.get(3).map_or("template.html", String::as_str);
    let default_output = format!("{item_id}.html");
    let output_path = positional.get(4).map_or(default_output.as_str(), String::as_str);

    let template = fs::read_to_string(template_path)
        .map_err(|e| format!("failed to read template {template_path}: {e}"))?;

    let generator = Generator::new(Options::default());

    eprintln!("Fetching description for {listing_url} ...");
    let source_html = generator.fetch_source(listing_url)?;
    if dump_source {
        let source_path = format!("{item_id}-source.html");
        fs::write(&source_path, &source_html)
            .map_err(|e| format!("failed to write {source_path}: {e}"))?;
        eprintln!("Wrote: {source_path}");
    }

    eprintln!("Extracting with the {} grammar ...", format.tag());
    let listing = generator.extract(format, &source_html);
    let images = generator.fetch_images(item_id);
    let warnings = degradation_warnings(&listing, &images);

    eprintln!("Generating {output_path} ...");
    let html = render_listing(&template, &listing, &images, format)?;
    fs::write(output_path, &html).map_err(|e| format!("failed to write {output_path}: {e}"))?;
    eprintln!("Wrote: {output_path}");
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let spec_entries = match &listing.specs {
        SpecSection::Rows(rows) => rows.len(),
        SpecSection::Pairs(table) => table.len(),
    };
    let summary = Summary {
        format: format.tag(),
        item_id,
        output: output_path,
        title: listing.title.as_deref(),
        images: images.len(),
        description_blocks: listing.description.len(),
        spec_entries,
        compatibility_groups: listing.compatibility.len(),
        notes: listing.notes.len(),
        warnings: &warnings,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
