use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a project JSON into an MLT document.
    Compile(CompileArgs),
    /// Print eligible beats, timeline length and referenced media.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Composition title (defaults to the input file stem).
    #[arg(long)]
    name: Option<String>,

    /// How media URLs are written into the document.
    #[arg(long, value_enum, default_value_t = ModeChoice::Local)]
    mode: ModeChoice,

    /// Output MLT path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the media fetch plan as JSON to this path.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Host prepended to app-local media URLs in `full` mode.
    #[arg(long, env = "HOST_URL")]
    host_url: Option<String>,

    /// URL prefix identifying media stored by the app.
    #[arg(long, env = "STORYREEL_MEDIA_PREFIX", default_value = storyreel::DEFAULT_MEDIA_PREFIX)]
    media_prefix: String,

    /// Append an MP4 render consumer to the document.
    #[arg(long)]
    render_target: bool,

    /// Skip project validation before compiling.
    #[arg(long)]
    no_validate: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// URL prefix identifying media stored by the app.
    #[arg(long, env = "STORYREEL_MEDIA_PREFIX", default_value = storyreel::DEFAULT_MEDIA_PREFIX)]
    media_prefix: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Full,
    Local,
}

impl From<ModeChoice> for storyreel::UrlMode {
    fn from(choice: ModeChoice) -> Self {
        match choice {
            ModeChoice::Full => storyreel::UrlMode::Full,
            ModeChoice::Local => storyreel::UrlMode::Local,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn read_project_json(path: &Path) -> anyhow::Result<storyreel::Project> {
    let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
    let r = BufReader::new(f);
    let project: storyreel::Project =
        serde_json::from_reader(r).with_context(|| "parse project JSON")?;
    Ok(project)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let project = read_project_json(&args.in_path)?;
    if !args.no_validate {
        project.validate()?;
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .in_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let opts = storyreel::CompileOptions {
        mode: args.mode.into(),
        media_prefix: args.media_prefix,
        host_url: args.host_url,
        render_target: args.render_target,
    };

    let out = storyreel::compile(&project, &name, &opts)?;

    match &args.out {
        Some(path) => {
            write_output(path, out.xml.as_bytes())?;
            eprintln!("wrote {}", path.display());
        }
        None => std::io::stdout()
            .write_all(out.xml.as_bytes())
            .context("write mlt to stdout")?,
    }

    if let Some(path) = &args.manifest {
        let plan = out.manifest.fetch_plan();
        let json = serde_json::to_vec_pretty(&plan).context("serialize fetch plan")?;
        write_output(path, &json)?;
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let project = read_project_json(&args.in_path)?;
    let normalized = storyreel::normalize(&project);
    let opts = storyreel::CompileOptions {
        media_prefix: args.media_prefix,
        ..storyreel::CompileOptions::local()
    };
    let out = storyreel::compile(&project, "inspect", &opts)?;

    println!(
        "beats:  {} eligible, {} skipped",
        normalized.beats.len(),
        normalized.skipped
    );
    println!(
        "frames: {} (spent {}, authored {})",
        out.durations.total_frames(),
        out.durations.spent_frames,
        out.durations.authored_frames
    );
    println!("files:  {}", out.manifest.len());
    for entry in out.manifest.iter() {
        let origin = if entry.is_local_to_app_storage {
            "storage"
        } else {
            "http"
        };
        println!("  {:<16} {:<7} {}", entry.assigned_name, origin, entry.source_url);
    }
    Ok(())
}
