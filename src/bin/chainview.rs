use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chainview", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a configuration and dump the diagram geometry as JSON.
    Layout(LayoutArgs),
    /// Render a configuration as an SVG drawing.
    Svg(SvgArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input linearized configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    /// Input linearized configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Svg(args) => cmd_svg(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_channels(path: &Path) -> anyhow::Result<Vec<chainview::ChannelConfig>> {
    chainview::linearized_from_path(path)
        .with_context(|| format!("read configuration '{}'", path.display()))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let channels = read_channels(&args.in_path)?;
    let diagram = chainview::Diagram::build(&channels, &chainview::DeclaredLayout)?;

    match args.out {
        Some(out) => {
            ensure_parent(&out)?;
            let f = File::create(&out).with_context(|| format!("create '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &diagram).with_context(|| "serialize diagram")?;
            w.flush()
                .with_context(|| format!("write '{}'", out.display()))?;
            eprintln!(
                "wrote {} ({} lanes, {} nodes, {} wires)",
                out.display(),
                diagram.lanes.len(),
                diagram.node_count(),
                diagram.wire_count()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, &diagram).with_context(|| "serialize diagram")?;
            writeln!(w).with_context(|| "write stdout")?;
        }
    }
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let source = chainview::StaticConfigSource::new(read_channels(&args.in_path)?);
    let surface = chainview::SvgSurface::new(chainview::SvgSurfaceOpts::default());
    let mut renderer = chainview::PipelineRenderer::new(source, surface);

    let result = pollster::block_on(renderer.initialize());
    let lanes = renderer.lanes().len();
    let (_, surface) = renderer.into_parts();

    // The error panel is still written so the failure is visible in the drawing.
    ensure_parent(&args.out)?;
    surface
        .write_to(&args.out)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    result.with_context(|| "render diagram")?;

    eprintln!("wrote {} ({lanes} lanes)", args.out.display());
    Ok(())
}
