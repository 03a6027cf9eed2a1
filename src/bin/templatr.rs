use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "templatr", version)]
struct Cli {
    /// Settings JSON; defaults apply to anything it omits.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the auto-fit default placement for an image as JSON.
    Autofit(AutofitArgs),
    /// Composite a foreground onto a background at the background's native size.
    Compose(ComposeArgs),
    /// Render a JPEG thumbnail of the auto-fit default.
    Thumbnail(ThumbnailArgs),
    /// Export a templates JSON file as a slide deck JSON.
    Slides(SlidesArgs),
}

#[derive(Parser, Debug)]
struct AutofitArgs {
    /// Foreground image.
    #[arg(long)]
    foreground: PathBuf,

    /// Container size as WIDTHxHEIGHT; defaults to the editor container.
    #[arg(long)]
    container: Option<templatr::Canvas>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[arg(long)]
    background: PathBuf,

    #[arg(long)]
    foreground: PathBuf,

    /// Saved layout JSON. Without it the auto-fit default is rendered.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 90)]
    quality: u8,
}

#[derive(Parser, Debug)]
struct ThumbnailArgs {
    #[arg(long)]
    background: PathBuf,

    #[arg(long)]
    foreground: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SlidesArgs {
    /// Templates JSON (an array of template records). Image references resolve relative to it.
    #[arg(long)]
    templates: PathBuf,

    /// Output deck JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

const BACKGROUND_REF: &str = "background";
const FOREGROUND_REF: &str = "foreground";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.settings {
        Some(path) => templatr::Settings::from_json_path(path)?,
        None => templatr::Settings::default(),
    }
    .with_env_overrides();
    settings.validate()?;

    match cli.cmd {
        Command::Autofit(args) => cmd_autofit(args, &settings),
        Command::Compose(args) => cmd_compose(args, &settings),
        Command::Thumbnail(args) => cmd_thumbnail(args, &settings),
        Command::Slides(args) => cmd_slides(args, &settings),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn pair_source(background: &Path, foreground: &Path) -> anyhow::Result<templatr::MemoryImageSource> {
    // a missing foreground is left out so rendering falls back to the background
    let mut source =
        templatr::MemoryImageSource::new().with(BACKGROUND_REF, read_file(background)?);
    match read_file(foreground) {
        Ok(bytes) => source.insert(FOREGROUND_REF, bytes),
        Err(err) => tracing::warn!(error = %format!("{err:#}"), "foreground unreadable"),
    }
    Ok(source)
}

fn cmd_autofit(args: AutofitArgs, settings: &templatr::Settings) -> anyhow::Result<()> {
    let bytes = read_file(&args.foreground)?;
    let natural = templatr::probe_dimensions(&args.foreground.to_string_lossy(), &bytes)?;
    let container = match args.container {
        Some(c) => templatr::ContainerContext::from_size(c.size())?,
        None => settings.editor.container()?,
    };
    let placement = templatr::compute_auto_fit_placement(natural, container, &settings.auto_fit);
    println!("{}", serde_json::to_string_pretty(&placement)?);
    Ok(())
}

fn cmd_compose(args: ComposeArgs, settings: &templatr::Settings) -> anyhow::Result<()> {
    let source = pair_source(&args.background, &args.foreground)?;
    let background = templatr::ImageRef::new(BACKGROUND_REF);
    let foreground = templatr::ImageRef::new(FOREGROUND_REF);

    let outcome = match &args.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read layout '{}'", path.display()))?;
            let layout: templatr::SavedLayout =
                serde_json::from_str(&text).with_context(|| "parse layout JSON")?;
            layout.validate()?;
            let pair = templatr::ComposablePair::from_layout(background, foreground, &layout);
            templatr::render_pair(&source, &pair, templatr::OutputSize::Native)?
        }
        None => templatr::render_auto_fit(
            &source,
            &background,
            &foreground,
            templatr::OutputSize::Native,
            &settings.auto_fit,
        )?,
    };

    let format = match args.format {
        FormatChoice::Png => templatr::OutputFormat::Png,
        FormatChoice::Jpeg => templatr::OutputFormat::Jpeg {
            quality: args.quality,
        },
    };
    let bytes = templatr::encode_frame(&outcome.frame, format)?;
    write_file(&args.out, &bytes)?;

    if !outcome.foreground_drawn {
        eprintln!("warning: foreground could not be drawn; wrote background only");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_thumbnail(args: ThumbnailArgs, settings: &templatr::Settings) -> anyhow::Result<()> {
    let source = pair_source(&args.background, &args.foreground)?;
    let thumbnail = templatr::encode_thumbnail(
        &source,
        &templatr::ImageRef::new(BACKGROUND_REF),
        &templatr::ImageRef::new(FOREGROUND_REF),
        settings,
    )?;
    write_file(&args.out, &thumbnail.bytes)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_slides(args: SlidesArgs, settings: &templatr::Settings) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.templates)
        .with_context(|| format!("read templates '{}'", args.templates.display()))?;
    let templates: Vec<templatr::TemplateRecord> =
        serde_json::from_str(&text).with_context(|| "parse templates JSON")?;

    let root = args.templates.parent().unwrap_or_else(|| Path::new("."));
    let source = templatr::FsImageSource::new(root);
    let (deck, stats) = templatr::export_deck(&source, &templates, settings);

    write_file(&args.out, serde_json::to_string_pretty(&deck)?.as_bytes())?;
    eprintln!(
        "wrote {} ({} slides, {} background-only, {} skipped)",
        args.out.display(),
        stats.exported,
        stats.background_only,
        stats.skipped
    );
    Ok(())
}
