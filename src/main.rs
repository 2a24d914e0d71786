//! diamond – command-line double diamond diagram generator.
//!
//! Usage:
//!   diamond [output.svg|output.pdf] [--preset NAME] [--config FILE]
//!           [--<field> VALUE]... [--preview FILE] [--dump-config] [--dump-model]
//!           [--dump-preview]
//!
//! If the output path is omitted the diagram is written to
//! `double-diamond.svg` in the current directory.

use std::{env, fs, path::Path, path::PathBuf, process};

use diamond_forge::config::{DiagramConfig, DiagramDraft, DRAFT_FIELDS};
use diamond_forge::layout::compute_layout;
use diamond_forge::pipeline::ExportFormat;
use diamond_forge::presets::{preset, PRESET_NAMES};
use diamond_forge::preview::{render_preview_pdf, DisplayList};
use diamond_forge::render_model::RenderModel;
use diamond_forge::svg::write_svg;
use diamond_forge::DiagramError;

const DEFAULT_OUTPUT: &str = "double-diamond.svg";

struct Options {
    output: PathBuf,
    preset: Option<String>,
    config_path: Option<PathBuf>,
    fields: Vec<(String, String)>,
    preview: Option<PathBuf>,
    dump_config: bool,
    dump_model: bool,
    dump_preview: bool,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("diamond");

    let mut output: Option<PathBuf> = None;
    let mut opts = Options {
        output: PathBuf::from(DEFAULT_OUTPUT),
        preset: None,
        config_path: None,
        fields: Vec::new(),
        preview: None,
        dump_config: false,
        dump_model: false,
        dump_preview: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage(prog);
                process::exit(0);
            }
            "--dump-config" => opts.dump_config = true,
            "--dump-model" => opts.dump_model = true,
            "--dump-preview" => opts.dump_preview = true,
            "--preset" | "-p" => opts.preset = Some(expect_value(prog, arg, iter.next())),
            "--config" | "-c" => {
                opts.config_path = Some(PathBuf::from(expect_value(prog, arg, iter.next())))
            }
            "--preview" => opts.preview = Some(PathBuf::from(expect_value(prog, arg, iter.next()))),
            flag if flag.starts_with("--") && DRAFT_FIELDS.contains(&&flag[2..]) => {
                let value = expect_value(prog, flag, iter.next());
                opts.fields.push((flag[2..].to_string(), value));
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(prog);
                process::exit(1);
            }
            path => {
                if output.is_some() {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(prog);
                    process::exit(1);
                }
                output = Some(PathBuf::from(path));
            }
        }
    }
    if let Some(o) = output {
        opts.output = o;
    }

    if let Err(e) = run(&opts) {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

fn expect_value(prog: &str, flag: &str, value: Option<&String>) -> String {
    match value {
        Some(v) => v.clone(),
        None => {
            eprintln!("Missing value for {flag}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn run(opts: &Options) -> Result<(), DiagramError> {
    let config = build_config(opts)?;
    let model = compute_layout(&config)?;

    if opts.dump_config {
        println!("{}", config.to_json());
    }
    if opts.dump_model {
        println!("{}", model.to_json());
    }
    if opts.dump_preview {
        println!("{}", DisplayList::of(&model).to_json());
    }

    let format = ExportFormat::from_path(&opts.output).ok_or_else(|| {
        DiagramError::Unexpected(format!(
            "cannot tell the output format of '{}' (use .svg or .pdf)",
            opts.output.display()
        ))
    })?;
    match format {
        ExportFormat::Svg => write_svg_file(&model, &opts.output)?,
        ExportFormat::Pdf => write_pdf_file(&model, &opts.output)?,
    }
    if let Some(preview) = &opts.preview {
        write_pdf_file(&model, preview)?;
    }
    Ok(())
}

/// Preset, config file or defaults, then individual field flags on top.
///
/// A config file is a complete diagram (missing sections take the factory
/// defaults), so it cannot be combined with a preset.
fn build_config(opts: &Options) -> Result<DiagramConfig, DiagramError> {
    let base = match (&opts.preset, &opts.config_path) {
        (Some(_), Some(_)) => {
            return Err(DiagramError::Unexpected(
                "--preset and --config cannot be combined; use --<field> flags to adjust a preset"
                    .into(),
            ))
        }
        (Some(name), None) => preset(name).ok_or_else(|| {
            DiagramError::Unexpected(format!(
                "unknown preset '{name}' (available: {})",
                PRESET_NAMES.join(", ")
            ))
        })?,
        (None, Some(path)) => {
            let json = fs::read_to_string(path).map_err(|e| {
                DiagramError::Unexpected(format!("reading '{}': {e}", path.display()))
            })?;
            DiagramConfig::from_json(&json)?
        }
        (None, None) => DiagramConfig::default(),
    };

    let mut draft = DiagramDraft::from(&base);
    for (field, value) in &opts.fields {
        draft.set(field, value.as_str());
    }
    draft.compute()
}

fn ensure_parent(path: &Path) -> Result<(), DiagramError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_svg_file(model: &RenderModel, path: &Path) -> Result<(), DiagramError> {
    ensure_parent(path)?;
    let file = fs::File::create(path)
        .map_err(|e| DiagramError::Unexpected(format!("writing '{}': {e}", path.display())))?;
    write_svg(model, std::io::BufWriter::new(file))?;
    eprintln!("Wrote '{}'", path.display());
    Ok(())
}

fn write_pdf_file(model: &RenderModel, path: &Path) -> Result<(), DiagramError> {
    ensure_parent(path)?;
    let bytes = render_preview_pdf(model);
    fs::write(path, &bytes)
        .map_err(|e| DiagramError::Unexpected(format!("writing '{}': {e}", path.display())))?;
    eprintln!("Wrote '{}' ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn print_usage(prog: &str) {
    eprintln!("diamond – double diamond diagram generator (diamond-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} [output.svg|output.pdf] [options] [--<field> VALUE]...");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [output]         Output path; .svg writes the vector file, .pdf the preview");
    eprintln!("                   (default: {DEFAULT_OUTPUT})");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --preset, -p     Start from a preset: {}", PRESET_NAMES.join(", "));
    eprintln!("  --config, -c     Start from a JSON configuration file (not with --preset)");
    eprintln!("  --preview FILE   Also write a PDF preview to FILE");
    eprintln!("  --dump-config    Print the resolved configuration as JSON to stdout");
    eprintln!("  --dump-model     Print the render model as JSON to stdout");
    eprintln!("  --dump-preview   Print the preview draw commands as JSON to stdout");
    eprintln!("  --help           Print this message");
    eprintln!();
    eprintln!("Fields:");
    for chunk in DRAFT_FIELDS.chunks(4) {
        let names: Vec<String> = chunk.iter().map(|f| format!("--{f}")).collect();
        eprintln!("  {}", names.join("  "));
    }
    eprintln!();
    eprintln!("Exit status: 0 on success, 2 for an invalid dimension, 1 otherwise.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options {
            output: PathBuf::from(DEFAULT_OUTPUT),
            preset: None,
            config_path: None,
            fields: Vec::new(),
            preview: None,
            dump_config: false,
            dump_model: false,
            dump_preview: false,
        }
    }

    #[test]
    fn preset_and_config_file_are_exclusive() {
        let mut opts = options();
        opts.preset = Some("monochrome".into());
        opts.config_path = Some(PathBuf::from("diagram.json"));
        let err = build_config(&opts).unwrap_err();
        assert!(!err.is_invalid_dimension());
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("--preset and --config"));
    }

    #[test]
    fn fields_apply_on_top_of_preset() {
        let mut opts = options();
        opts.preset = Some("monochrome".into());
        opts.fields.push(("gap".into(), "35".into()));
        let cfg = build_config(&opts).unwrap();
        let mono = preset("monochrome").unwrap();
        assert_eq!(cfg.canvas.gap, 35.0);
        assert_eq!(cfg.style, mono.style);
        assert_eq!(cfg.phases, mono.phases);
    }

    #[test]
    fn unknown_preset_is_reported() {
        let mut opts = options();
        opts.preset = Some("neon".into());
        let err = build_config(&opts).unwrap_err();
        assert!(err.to_string().contains("classic"));
    }
}
