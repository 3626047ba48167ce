use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use inquire::{Select, Text};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use test_case_generator::commands::{
    extract_requirement, generate_test_cases, list_sheets, report_sheet,
};
use test_case_generator::config::Config;
use test_case_generator::sources::SourceSpec;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Archivo de configuración TOML (por defecto testgen.toml si existe)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Más detalle en los logs (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generar casos de prueba a partir de un requisito y guardarlos en la hoja
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Hoja destino
        #[arg(short, long)]
        sheet: Option<String>,
    },
    /// Mostrar el texto del requisito sin llamar al modelo
    Extract {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Listar las hojas CSV disponibles
    List,
    /// Generar un informe en Markdown de una hoja CSV
    Report {
        /// Nombre de la hoja
        #[arg(short, long)]
        sheet: String,

        /// Ruta del informe (por defecto junto a la hoja)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Clave de la incidencia de Jira (ej. MER-895)
    #[arg(long)]
    jira: Option<String>,

    /// ID de la página de Confluence
    #[arg(long)]
    confluence: Option<String>,

    /// Archivo local con el requisito (ADF en JSON o texto)
    #[arg(long)]
    file: Option<PathBuf>,
}

impl SourceArgs {
    fn into_spec(self) -> Result<SourceSpec> {
        match (self.jira, self.confluence, self.file) {
            (Some(key), None, None) => Ok(SourceSpec::Jira(key)),
            (None, Some(page_id), None) => Ok(SourceSpec::Confluence(page_id)),
            (None, None, Some(path)) => Ok(SourceSpec::File(path)),
            _ => bail!("Indica exactamente uno de --jira, --confluence o --file"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("❌ ERROR: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // RUST_LOG tiene prioridad sobre -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Generate { source, sheet }) => {
            generate_test_cases(&config, &source.into_spec()?, sheet.as_deref())
        }
        Some(Commands::Extract { source }) => extract_requirement(&config, &source.into_spec()?),
        Some(Commands::List) => list_sheets(&config),
        Some(Commands::Report { sheet, output }) => {
            report_sheet(&config, &sheet, output.as_deref())
        }
        None => interactive_menu(&config),
    }
}

/// Menú interactivo si no se proporciona un comando
fn interactive_menu(config: &Config) -> Result<()> {
    let options = vec![
        "Generar casos de prueba",
        "Ver requisito extraído",
        "Listar hojas",
        "Generar informe de una hoja",
        "Salir",
    ];

    let selection = Select::new("¿Qué deseas hacer?", options).prompt();

    match selection {
        Ok("Generar casos de prueba") => {
            if let Some(spec) = select_source() {
                let sheet = Text::new("Hoja destino:")
                    .with_default(&config.sheet.name)
                    .prompt()
                    .ok();
                generate_test_cases(config, &spec, sheet.as_deref())?
            }
        }
        Ok("Ver requisito extraído") => {
            if let Some(spec) = select_source() {
                extract_requirement(config, &spec)?
            }
        }
        Ok("Listar hojas") => list_sheets(config)?,
        Ok("Generar informe de una hoja") => {
            match Text::new("Nombre de la hoja:")
                .with_default(&config.sheet.name)
                .prompt()
            {
                Ok(sheet) => report_sheet(config, &sheet, None)?,
                Err(_) => println!("{}", "Operación cancelada.".yellow()),
            }
        }
        _ => println!("¡Hasta pronto!"),
    }

    Ok(())
}

/// Pregunta el origen del requisito y su identificador
fn select_source() -> Option<SourceSpec> {
    let options = vec!["Jira", "Confluence", "Archivo local"];
    let kind = Select::new("¿De dónde se obtiene el requisito?", options)
        .prompt()
        .ok()?;

    let question = match kind {
        "Jira" => "Clave de la incidencia (ej. MER-895):",
        "Confluence" => "ID de la página:",
        _ => "Ruta del archivo:",
    };

    let id = match Text::new(question).prompt() {
        Ok(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => {
            println!("{}", "Operación cancelada.".yellow());
            return None;
        }
    };

    Some(match kind {
        "Jira" => SourceSpec::Jira(id),
        "Confluence" => SourceSpec::Confluence(id),
        _ => SourceSpec::File(PathBuf::from(id)),
    })
}
