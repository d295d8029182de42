use lineage::render::{
    ActiveDot, Bounds, Brush, LayoutPoint, Minimap, PositionedNode, ZoomTransform, path_data,
};
use lineage::{LineageConfig, LoadError, NodeId, RawRecord, Selection, SelectionSummary, Session};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Load(LoadError),
    Config(lineage::Error),
    Json(serde_json::Error),
    UnknownRecord(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Load(err) => write!(f, "{err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::UnknownRecord(name) => write!(f, "No record named {name:?}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LoadError> for CliError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<lineage::Error> for CliError {
    fn from(value: lineage::Error) -> Self {
        Self::Config(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Default)]
enum Command {
    #[default]
    Layout,
    Search(String),
    Select(String),
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
}

#[derive(Serialize)]
struct LinkOut<'a> {
    source: Option<NodeId>,
    target: NodeId,
    key: i64,
    points: &'a [LayoutPoint],
    path: String,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    nodes: &'a [PositionedNode],
    links: Vec<LinkOut<'a>>,
    active_dots: &'a [ActiveDot],
    bounds: Bounds,
    root: LayoutPoint,
    minimap: &'a Minimap,
    transform: ZoomTransform,
    brush: Brush,
}

#[derive(Serialize)]
struct SelectOut<'a> {
    name: &'a str,
    big: Option<&'a str>,
    littles: Vec<&'a str>,
    ancestors: Vec<&'a str>,
    descendants: Vec<&'a str>,
    summary: &'a SelectionSummary,
}

fn usage() -> &'static str {
    "lineage-cli\n\
\n\
USAGE:\n\
  lineage-cli [layout] [--pretty] [--config <path>] [--viewport-width <w>] [--viewport-height <h>] [<path>|-]\n\
  lineage-cli search <query> [--pretty] [--config <path>] [<path>|-]\n\
  lineage-cli select <name> [--pretty] [--config <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a JSON array of records: {id, name, parent, year, active, pledge_label, year_label}.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --config takes a JSON object merged over the defaults (node_box, minimap, zoom, search, viewport).\n\
  - Set RUST_LOG=debug to see pipeline diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "search" => {
                let Some(query) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.command = Command::Search(query.clone());
            }
            "select" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.command = Command::Select(name.clone());
            }
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = Some(parse_extent(w)?);
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = Some(parse_extent(h)?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn parse_extent(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(args: &Args) -> Result<LineageConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            let overrides: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            LineageConfig::from_overrides(&overrides)?
        }
        None => LineageConfig::default(),
    };
    if let Some(w) = args.viewport_width {
        config.viewport.width = w;
    }
    if let Some(h) = args.viewport_height {
        config.viewport.height = h;
    }
    Ok(config)
}

fn layout_out(session: &Session) -> LayoutOut<'_> {
    LayoutOut {
        nodes: session.nodes(),
        links: session
            .links()
            .iter()
            .map(|l| LinkOut {
                source: l.source,
                target: l.target,
                key: l.key,
                points: &l.points,
                path: path_data(&l.points),
            })
            .collect(),
        active_dots: session.active_dots(),
        bounds: session.bounds(),
        root: session.layout().root,
        minimap: session.minimap(),
        transform: session.viewport().transform(),
        brush: session.brush(),
    }
}

fn select_out<'a>(session: &'a Session, selection: &'a Selection) -> SelectOut<'a> {
    let name = move |id: NodeId| session.tree().node(id).name();
    SelectOut {
        name: &selection.summary.name,
        big: selection.summary.big.map(name),
        littles: session
            .tree()
            .true_children(selection.selected)
            .iter()
            .map(|&id| name(id))
            .collect(),
        ancestors: selection.ancestors.iter().map(|&id| name(id)).collect(),
        descendants: selection.descendants.iter().map(|&id| name(id)).collect(),
        summary: &selection.summary,
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let text = read_input(args.input.as_deref())?;
    let records: Vec<RawRecord> = serde_json::from_str(&text)?;
    debug!(records = records.len(), "read input");

    let mut session = Session::load(records, config)?;

    match &args.command {
        Command::Layout => write_json(&layout_out(&session), args.pretty),
        Command::Search(query) => write_json(&session.search(query), args.pretty),
        Command::Select(name) => {
            let Some(id) = session.find(name) else {
                return Err(CliError::UnknownRecord(name.clone()));
            };
            let Some(selection) = session.select(id).cloned() else {
                return Err(CliError::UnknownRecord(name.clone()));
            };
            write_json(&select_out(&session, &selection), args.pretty)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
