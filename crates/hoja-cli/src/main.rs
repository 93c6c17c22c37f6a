use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use hoja_core::batch;
use hoja_core::convert::{convert, ConvertOptions, Mode, Outcome};
use hoja_core::error::HojaError;
use hoja_core::extract::grid::GridBackend;
use hoja_core::extract::source::LopdfSource;
use hoja_core::extract::tabula::TabulaBackend;
use hoja_core::extract::text::{TextLayout, TextOptions};
use hoja_core::extract::{TableBackend, TableOptions};
use hoja_core::pages::PageSelection;
use hoja_core::probe;

#[derive(Parser)]
#[command(
    name = "hoja",
    version,
    about = "Exporta PDF a Excel (.xlsx). Soporta tablas y texto."
)]
struct Cli {
    /// Ruta al PDF de entrada, o carpeta con PDFs si se usa --batch
    #[arg(required_unless_present = "probe")]
    entrada: Option<PathBuf>,

    /// Ruta del Excel de salida (o carpeta de salida con --batch)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Modo de extracción: 'auto' detecta tablas primero
    #[arg(short, long, value_enum, default_value = "auto")]
    modo: Modo,

    /// Páginas a procesar: 'all', '1', '1,3,5', '1-5'
    #[arg(short, long, default_value = "all")]
    paginas: String,

    /// Modo lattice: tablas con bordes visibles
    #[arg(long)]
    lattice: bool,

    /// Modo stream: tablas sin bordes
    #[arg(long)]
    stream: bool,

    /// Detectar múltiples tablas por página (siempre activo; se acepta
    /// por compatibilidad)
    #[arg(long = "multiple-tablas")]
    multiple_tablas: bool,

    /// Volcar todas las tablas en una sola hoja (por defecto, una hoja
    /// por tabla)
    #[arg(long = "una-hoja")]
    una_hoja: bool,

    /// Separador para dividir líneas en columnas (ej: ';', ',', '|')
    #[arg(long)]
    separador: Option<String>,

    /// Omitir líneas vacías al extraer texto
    #[arg(long = "sin-vacias")]
    sin_vacias: bool,

    /// Disposición del texto extraído
    #[arg(long = "modo-texto", value_enum, default_value = "linea")]
    modo_texto: ModoTexto,

    /// Procesar todos los PDFs de una carpeta
    #[arg(long)]
    batch: bool,

    /// Codificación esperada de la salida de tabula
    #[arg(long, default_value = "utf-8")]
    encoding: String,

    /// Mostrar el estado de las dependencias externas y salir
    #[arg(long)]
    probe: bool,

    /// Mostrar información detallada
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Modo {
    Auto,
    Tablas,
    Texto,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModoTexto {
    Linea,
    Pagina,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), HojaError> {
    let report = probe::probe();
    if cli.probe {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    let entrada = cli
        .entrada
        .clone()
        .ok_or_else(|| HojaError::InvalidInput("falta la ruta de entrada".into()))?;

    let mut backends: Vec<Box<dyn TableBackend>> = Vec::new();
    if matches!(cli.modo, Modo::Auto | Modo::Tablas) {
        match &report.tabula_jar {
            Some(jar) if report.java => {
                backends.push(Box::new(TabulaBackend::new(jar.clone())));
            }
            _ => log::warn!(
                "tabula no disponible (java: {}, jar: {:?}); solo extractor interno",
                report.java,
                report.tabula_jar
            ),
        }
        backends.push(Box::new(GridBackend::new()));
    }

    if !cli.encoding.eq_ignore_ascii_case("utf-8") {
        log::warn!("solo se soporta utf-8; se ignora --encoding {}", cli.encoding);
    }
    if cli.multiple_tablas {
        log::debug!("--multiple-tablas: la detección múltiple ya es el comportamiento normal");
    }

    let opts = ConvertOptions {
        mode: match cli.modo {
            Modo::Auto => Mode::Auto,
            Modo::Tablas => Mode::Tables,
            Modo::Texto => Mode::Text,
        },
        pages: PageSelection::parse(&cli.paginas)?,
        table: TableOptions {
            lattice: cli.lattice,
            stream: cli.stream,
        },
        text: TextOptions {
            layout: match cli.modo_texto {
                ModoTexto::Linea => TextLayout::Line,
                ModoTexto::Pagina => TextLayout::Page,
            },
            skip_blank: cli.sin_vacias,
            separator: cli.separador.clone(),
        },
        single_sheet: cli.una_hoja,
    };

    if cli.batch {
        batch_mode(&entrada, cli.output.as_deref(), &backends, &opts)?;
    } else {
        if !entrada.is_file() {
            return Err(HojaError::InvalidInput(format!(
                "no se encontró el archivo '{}'",
                entrada.display()
            )));
        }
        let salida = cli
            .output
            .clone()
            .unwrap_or_else(|| entrada.with_extension("xlsx"));
        convert_one(&entrada, &salida, &backends, &opts)?;
    }

    println!("\n¡Listo!");
    Ok(())
}

fn batch_mode(
    entrada: &Path,
    output: Option<&Path>,
    backends: &[Box<dyn TableBackend>],
    opts: &ConvertOptions,
) -> Result<(), HojaError> {
    if !entrada.is_dir() {
        return Err(HojaError::InvalidInput(format!(
            "'{}' no es una carpeta (requerido con --batch)",
            entrada.display()
        )));
    }
    let pdfs = batch::find_pdfs(entrada)?;
    if pdfs.is_empty() {
        return Err(HojaError::InvalidInput(format!(
            "no se encontraron archivos .pdf en '{}'",
            entrada.display()
        )));
    }

    let out_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| entrada.join("excel_output"));
    std::fs::create_dir_all(&out_dir)?;

    println!("Modo batch: {} PDFs encontrados.", pdfs.len());
    let summary = batch::run_batch(&pdfs, &out_dir, |pdf, out| {
        convert_one(pdf, out, backends, opts)
    });

    if !summary.failures.is_empty() {
        println!(
            "\n{} archivo(s) con errores: {}",
            summary.failures.len(),
            summary.failures.join(", ")
        );
    }
    println!("\nBatch completado. Archivos en: {}", out_dir.display());
    Ok(())
}

fn convert_one(
    pdf: &Path,
    out: &Path,
    backends: &[Box<dyn TableBackend>],
    opts: &ConvertOptions,
) -> Result<Outcome, HojaError> {
    println!("\nProcesando: {}", pdf.display());

    let source = LopdfSource::open(pdf)?;
    let refs: Vec<&dyn TableBackend> = backends.iter().map(|b| b.as_ref()).collect();
    let outcome = convert(pdf, out, &source, &refs, opts)?;

    match outcome {
        Outcome::Tables { tables, rows } => {
            println!("  OK: {tables} tabla(s), {rows} filas -> {}", out.display());
        }
        Outcome::Text { rows } => {
            println!("  OK: {rows} registros de texto -> {}", out.display());
        }
        Outcome::Nothing => match opts.mode {
            Mode::Tables => println!("  Sin tablas encontradas."),
            _ => println!("  Sin texto extraído."),
        },
    }
    Ok(outcome)
}
