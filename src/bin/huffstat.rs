use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use huffstat::{CoderConfig, HuffmanCoder, OutputFormat};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        let progname = args.first().map(String::as_str).unwrap_or("huffstat");
        eprintln!("usage: {progname} <input> <output> [config.json]");
        return ExitCode::from(2);
    }

    match run(Path::new(&args[1]), Path::new(&args[2]), args.get(3).map(Path::new)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, output: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => CoderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CoderConfig::default(),
    };
    let format = config.output_format;
    let coder = HuffmanCoder::new(config);

    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let analysis = coder
        .analyze_reader(file)
        .with_context(|| format!("encoding {}", input.display()))?;

    let out = BufWriter::new(
        File::create(output).with_context(|| format!("creating {}", output.display()))?,
    );
    let written = match format {
        OutputFormat::Text => analysis.encoded.write_text(out),
        OutputFormat::Packed => analysis.encoded.write_packed(out),
    };
    written.with_context(|| format!("writing {}", output.display()))?;

    let report = analysis
        .report
        .with_files(input.display().to_string(), output.display().to_string());
    let report_path = table_path(output);
    let mut table = BufWriter::new(
        File::create(&report_path).with_context(|| format!("creating {}", report_path.display()))?,
    );
    write!(table, "{report}")
        .and_then(|()| table.flush())
        .with_context(|| format!("writing {}", report_path.display()))?;

    print!("{report}");
    Ok(())
}

/// `dir/out.txt` -> `dir/Tableout.txt`
fn table_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("Table{name}"))
}
