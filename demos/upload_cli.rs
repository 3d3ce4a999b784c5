//! Upload CLI Example
//!
//! アップロード処理をコマンドラインで再現するサンプル。
//! ワークブックを読み込み、シートごとのCSVをまとめたZIPを入力ファイルの隣に書き出します。

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use sheetzip::{ConversionError, ConverterBuilder};

/// アップロード画面と同じ上限（12MB）
const MAX_UPLOAD_SIZE: u64 = 12 * 1024 * 1024;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <workbook.xlsx|workbook.xls> [--parallel]", args[0]);
        eprintln!("\nOptions:");
        eprintln!("  --parallel    Convert sheets in parallel");
        eprintln!("\nExamples:");
        eprintln!("  {} sales.xlsx", args[0]);
        eprintln!("  {} legacy.xls --parallel", args[0]);
        process::exit(1);
    }

    let input_path = Path::new(&args[1]);
    let mut parallel = false;
    for option in &args[2..] {
        match option.as_str() {
            "--parallel" => parallel = true,
            _ => {
                eprintln!("Error: Unknown option: {}", option);
                process::exit(1);
            }
        }
    }

    match convert_upload(input_path, parallel) {
        Ok(output_path) => {
            println!(
                "Conversion completed: {} -> {}",
                input_path.display(),
                output_path.display()
            );
        }
        Err(CliError::Io(e)) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        Err(CliError::Conversion(e)) => {
            eprintln!("Error ({}): {}", e.status().code(), e);
            process::exit(2);
        }
    }
}

enum CliError {
    Io(std::io::Error),
    Conversion(ConversionError),
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<ConversionError> for CliError {
    fn from(e: ConversionError) -> Self {
        CliError::Conversion(e)
    }
}

fn convert_upload(input_path: &Path, parallel: bool) -> Result<PathBuf, CliError> {
    let converter = ConverterBuilder::new()
        .with_max_payload_size(MAX_UPLOAD_SIZE)
        .with_accepted_extensions([".xlsx", ".xls"])
        .with_parallel(parallel)
        .build()?;

    let bytes = fs::read(input_path)?;
    let filename = input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let archive = converter.convert(&bytes, &filename)?;

    let output_path = input_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&archive.filename);
    fs::write(&output_path, &archive.bytes)?;

    Ok(output_path)
}
