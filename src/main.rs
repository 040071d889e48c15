//! # Sheetpress CLI
//!
//! Usage:
//!   sheetpress hero.json -o hero.pdf
//!   sheetpress hero.json -o pages/hero --format png --dpi 300
//!   echo '{ ... }' | sheetpress -o hero.pdf
//!   sheetpress --example > hero.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sheetpress::{
    Document, Error, ExportFormat, ExportSettings, Exporter, LiveTheme, SectionRegistry,
    ThemeMode,
};

#[derive(Parser, Debug)]
#[command(version, about = "Paginate a sheet and export it as PDF or images")]
struct Args {
    /// Document JSON. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Output file (pdf) or base name (images).
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// pdf, png, jpeg or webp. Guessed from the output extension if omitted.
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Export settings JSON.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Raster resolution, overriding the settings file.
    #[arg(long)]
    dpi: Option<u32>,

    /// Theme active outside the export. Exports always render light.
    #[arg(long, default_value = "light")]
    theme: ThemeMode,

    /// Print an example document and exit.
    #[arg(long)]
    example: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.example {
        print!("{}", example_sheet_json());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(files) => {
            for file in files {
                eprintln!("✓ Written {}", file.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Vec<PathBuf>, Error> {
    let input = match &args.input {
        Some(path) => fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.clone(),
            source: e,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map_err(|e| Error::Io {
                path: PathBuf::from("<stdin>"),
                source: e,
            })?;
            buf
        }
    };
    let document = Document::from_json(&input)?;

    let mut settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| Error::Io {
                path: path.clone(),
                source: e,
            })?;
            ExportSettings::from_json(&json)?
        }
        None => ExportSettings::default(),
    };
    if let Some(dpi) = args.dpi {
        settings.image_resolution = dpi;
        settings.normalize();
    }

    let format = match args.format {
        Some(format) => format,
        None => args
            .output
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::parse::<ExportFormat>)
            .transpose()?
            .unwrap_or(ExportFormat::Pdf),
    };

    let theme = LiveTheme::new(args.theme);
    let registry = SectionRegistry::standard();
    let mut exporter = Exporter::new(&document, settings, &registry, &theme)?;
    exporter.export(format, &args.output)
}

fn example_sheet_json() -> &'static str {
    r##"{
  "kind": "sheet",
  "metadata": { "title": "Mira Vance", "author": "Player One" },
  "top": {
    "title": "Mira Vance",
    "columns": 3,
    "fields": [
      { "label": "Player", "value": "Player One" },
      { "label": "Height", "value": "5'7\"" },
      { "label": "Weight", "value": "130 lb" },
      { "label": "ST", "value": "10" },
      { "label": "DX", "value": "13" },
      { "label": "IQ", "value": "12" }
    ]
  },
  "lists": {
    "melee": {
      "title": "Melee Weapons",
      "columns": [
        { "title": "Weapon", "weight": 3 },
        { "title": "Damage", "weight": 1 },
        { "title": "Reach", "weight": 1, "align": "middle" }
      ],
      "rows": [
        { "cells": ["Shortsword", "1d+1 cut", "1"] },
        { "cells": ["Dagger", "1d-2 imp", "C"] }
      ]
    },
    "skills": {
      "title": "Skills",
      "columns": [
        { "title": "Skill", "weight": 4 },
        { "title": "Level", "weight": 1, "align": "end" }
      ],
      "rows": [
        { "cells": ["Shortsword", "14"] },
        { "cells": ["Stealth", "13"] },
        { "cells": ["Urban", "12"], "depth": 1 }
      ]
    },
    "notes": {
      "rows": [
        { "cells": ["Owes the Thieves' Guild a favour."] }
      ]
    }
  },
  "footer": "Modified 2026-10-16"
}
"##
}
