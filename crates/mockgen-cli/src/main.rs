use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use mockgen_core::config::{self, CONFIG_FILE_NAME, MockgenConfig, Scheme};
use mockgen_core::ir::CompiledRoutes;
use mockgen_core::parse::{self, ApiDocument};
use mockgen_core::transform::{self, CompileOptions};
use mockgen_core::{CodeGenerator, GeneratedFile};
use mockgen_json_server::JsonServerGenerator;

#[derive(Parser)]
#[command(
    name = "mockgen",
    about = "json-server mock generator for OpenAPI v2/v3 specs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a mock server project from a spec
    Generate(GenerateArgs),

    /// Parse and compile a spec, then print a summary
    Validate {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the compiled route table of a spec
    Inspect {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        #[command(flatten)]
        compile: CompileArgs,
    },

    /// Initialize a new mockgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Flags override `.mockgen.yaml`, which overrides the defaults.
#[derive(Args)]
struct GenerateArgs {
    /// Path to the spec file (YAML or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the project is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transport of the mock server
    #[arg(long)]
    scheme: Option<SchemeArg>,

    /// Port the mock server listens on
    #[arg(short, long)]
    port: Option<u16>,

    /// File name of the generated database
    #[arg(short, long)]
    db_file: Option<String>,

    /// File name of the generated server script
    #[arg(short = 'f', long)]
    server_file: Option<String>,

    #[command(flatten)]
    compile: CompileArgs,
}

#[derive(Args)]
struct CompileArgs {
    /// How deep referenced, nested and array item schemas are expanded
    #[arg(short = 'r', long)]
    max_recursion_depth: Option<usize>,

    /// Fill bodies with random example data
    #[arg(short = 'e', long)]
    examples: bool,

    /// Seed for reproducible example data
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Http,
    Https,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Http => Scheme::Http,
            SchemeArg::Https => Scheme::Https,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

impl GenerateArgs {
    fn apply(&self, cfg: &mut MockgenConfig) {
        if let Some(input) = &self.input {
            cfg.input = input.display().to_string();
        }
        if let Some(output) = &self.output {
            cfg.output = output.display().to_string();
        }
        if let Some(scheme) = self.scheme {
            cfg.server.scheme = scheme.into();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(db_file) = &self.db_file {
            cfg.server.db_file = db_file.clone();
        }
        if let Some(server_file) = &self.server_file {
            cfg.server.server_file = server_file.clone();
        }
        self.compile.apply(cfg);
    }
}

impl CompileArgs {
    fn apply(&self, cfg: &mut MockgenConfig) {
        if let Some(depth) = self.max_recursion_depth {
            cfg.compile.max_recursion_depth = depth;
        }
        if self.examples {
            cfg.compile.generate_examples = true;
        }
        if self.seed.is_some() {
            cfg.compile.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect {
            input,
            format,
            compile,
        } => cmd_inspect(input, format, compile),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "mockgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<MockgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

/// Read and parse a spec. `.json` files are parsed as JSON, anything else as YAML.
fn load_document(path: &Path) -> Result<ApiDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let document = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(
        "parsed {} ({} paths)",
        path.display(),
        document.path_count()
    );
    Ok(document)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    args.apply(&mut cfg);

    let document = load_document(Path::new(&cfg.input))?;
    let routes = transform::compile_document(&document, &CompileOptions::from(&cfg.compile));
    eprintln!(
        "Compiled {} routes ({} handlers) from {}",
        routes.table.len(),
        routes.backing_routes.len(),
        cfg.input
    );

    let options = JsonServerGenerator::build_options(&document.info().title, &cfg.server);
    let files = JsonServerGenerator
        .generate(&routes, &options)
        .context("failed to render the json-server project")?;

    let output_dir = PathBuf::from(&cfg.output);
    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &files)?;

    eprintln!(
        "Generated {} files in {} ({} on port {})",
        files.len(),
        output_dir.display(),
        cfg.server.scheme.as_str(),
        cfg.server.port
    );
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let document = load_document(&input)?;
    let kind = match document {
        ApiDocument::Swagger(_) => "Swagger",
        ApiDocument::OpenApi(_) => "OpenAPI",
    };

    eprintln!(
        "Valid {kind} {} spec: {}",
        document.version(),
        document.info().title
    );
    eprintln!("  Version: {}", document.info().version);
    eprintln!("  Paths: {}", document.path_count());
    eprintln!("  Schemas: {}", document.definition_count());

    let routes = transform::compile_document(&document, &CompileOptions::default());
    eprintln!("  Routes: {}", routes.table.len());
    eprintln!("  Handlers: {}", routes.backing_routes.len());
    eprintln!("  Collections: {}", routes.collections.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat, compile: CompileArgs) -> Result<()> {
    let mut cfg = MockgenConfig::default();
    compile.apply(&mut cfg);

    let document = load_document(&input)?;
    let routes = transform::compile_document(&document, &CompileOptions::from(&cfg.compile));

    match format {
        InspectFormat::Yaml => print!("{}", render_yaml(&routes)?),
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&routes)?),
    }
    Ok(())
}

fn render_yaml(routes: &CompiledRoutes) -> Result<String> {
    serde_yaml_ng::to_string(routes).context("failed to serialize the route table")
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
