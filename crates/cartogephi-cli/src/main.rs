use cartogephi::{DEFAULT_MODULARITY_ATTRIBUTE, DEFAULT_OUTPUT_FILE, ExtractOptions, SearchKey};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CARTOGEPHI_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Cartogephi(cartogephi::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Cartogephi(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<cartogephi::Error> for CliError {
    fn from(value: cartogephi::Error) -> Self {
        Self::Cartogephi(value)
    }
}

#[derive(Debug)]
struct Args {
    gexf: String,
    image: String,
    modularity: String,
    search: SearchKey,
    out: PathBuf,
    pretty: bool,
}

fn usage() -> &'static str {
    "cartogephi\n\
\n\
USAGE:\n\
  cartogephi [--modularity <attr>] [--search <key>] [--out <path>] [--pretty] <gexf>|- <image>\n\
\n\
OPTIONS:\n\
  --modularity <attr>  attvalue holding the cluster label (default: modularityclasses)\n\
  --search <key>       search column: id, label, or an attvalue name (default: id)\n\
  --out <path>         descriptor path (default: ./cartogephi.json)\n\
  --pretty             indent the JSON output\n\
\n\
NOTES:\n\
  - If <gexf> is '-', the document is read from stdin.\n\
  - <image> is copied into the descriptor as-is; it is not opened.\n\
  - Set CARTOGEPHI_LOG (e.g. CARTOGEPHI_LOG=debug) to see extraction diagnostics.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut modularity = DEFAULT_MODULARITY_ATTRIBUTE.to_string();
    let mut search = SearchKey::Id;
    let mut out = PathBuf::from(DEFAULT_OUTPUT_FILE);
    let mut pretty = false;
    let mut positional: Vec<String> = Vec::new();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => pretty = true,
            "--modularity" => {
                let Some(attr) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                modularity = attr.clone();
            }
            "--search" => {
                let Some(key) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                search = key.parse().map_err(|_| CliError::Usage(usage()))?;
            }
            "--out" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                out = PathBuf::from(path);
            }
            "--" => positional.extend(it.by_ref().cloned()),
            "-" => positional.push(a.clone()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => positional.push(path.to_string()),
        }
    }

    let [gexf, image]: [String; 2] = positional
        .try_into()
        .map_err(|_| CliError::Usage(usage()))?;

    Ok(Args {
        gexf,
        image,
        modularity,
        search,
        out,
        pretty,
    })
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, CliError> {
    if path == "-" {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = std::fs::File::open(path)?;
    Ok(Box::new(std::io::BufReader::new(file)))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let options = ExtractOptions {
        modularity_attribute: args.modularity,
        search_key: args.search,
    };
    let input = open_input(&args.gexf)?;
    let descriptor = cartogephi::generate(input, &args.image, &options)?;
    descriptor.write_to(&args.out, args.pretty)?;
    tracing::info!(
        out = %args.out.display(),
        nodes = descriptor.index.len(),
        modularities = descriptor.modularities.len(),
        "wrote map descriptor"
    );
    Ok(())
}

fn main() {
    init_logging();

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
