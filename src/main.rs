use std::env;
use std::process::ExitCode;

use schema_erd::{compute_layout, layout_report, LayoutConfig, Schema, SchemaGraph};

fn print_banner() {
    println!("schema-erd — entity-relationship layout and routing for Django-style schemas");
}

fn print_help() {
    print_banner();
    println!(
        "\nUsage:\n  \
         schema-erd check <schema.json>          validate a schema and print its stats\n  \
         schema-erd layout <schema.json>          run the placement + routing pipeline and print it as JSON\n  \
         schema-erd svg <schema.json> [out.svg]   render the layout to an SVG file (stdout if omitted)\n  \
         schema-erd view <schema.json>            open the desktop viewer\n  \
         schema-erd help                          show this message\n\n\
         With no path argument, schema JSON is read from stdin."
    );
}

fn load_schema(path: Option<&str>) -> Result<Schema, schema_erd::SchemaError> {
    match path {
        Some(p) => Schema::from_file(p),
        None => Schema::from_reader(std::io::stdin()),
    }
}

fn check_schema(path: Option<&str>) -> ExitCode {
    match load_schema(path) {
        Ok(schema) => {
            let app_count = schema.apps.len();
            let model_count: usize = schema.apps.values().map(|a| a.models.len()).sum();
            let config = LayoutConfig::default();
            let g = SchemaGraph::build(&schema, &config);
            println!(
                "✓ schema ok: {} app(s), {} model(s), {} relationship(s)",
                app_count,
                model_count,
                g.graph.edge_count()
            );
            if let Some(hub) = g.hub() {
                println!("  hub: {} ({} connection(s))", g.graph[hub].key, g.graph[hub].connections.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn layout_schema(path: Option<&str>) -> ExitCode {
    match load_schema(path) {
        Ok(schema) => {
            let config = LayoutConfig::default();
            let g = SchemaGraph::build(&schema, &config);
            let result = compute_layout(&g, &config);
            let report = layout_report(&g, &result);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("✗ could not serialize layout: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render_svg(path: Option<&str>, out: Option<&str>) -> ExitCode {
    match load_schema(path) {
        Ok(schema) => {
            let config = LayoutConfig::default();
            let g = SchemaGraph::build(&schema, &config);
            let result = compute_layout(&g, &config);
            let svg = schema_erd::svg_export::render_svg(&g, &result, &config);
            match out {
                Some(p) => match std::fs::write(p, svg) {
                    Ok(()) => {
                        println!("✓ wrote {}", p);
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("✗ could not write {}: {}", p, e);
                        ExitCode::FAILURE
                    }
                },
                None => {
                    println!("{}", svg);
                    ExitCode::SUCCESS
                }
            }
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn view_schema(path: Option<&str>) -> ExitCode {
    match load_schema(path) {
        Ok(schema) => match schema_erd::viewer::render_window(schema) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("✗ viewer error: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("check") => check_schema(args.get(2).map(String::as_str)),
        Some("layout") => layout_schema(args.get(2).map(String::as_str)),
        Some("svg") => render_svg(args.get(2).map(String::as_str), args.get(3).map(String::as_str)),
        Some("view") => view_schema(args.get(2).map(String::as_str)),
        Some("help") | None => {
            print_help();
            ExitCode::SUCCESS
        }
        Some(other) => {
            eprintln!("✗ unknown command '{}'\n", other);
            print_help();
            ExitCode::FAILURE
        }
    }
}
