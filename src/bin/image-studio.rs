//! CLI for Image Studio - generate and edit images through the studio API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use image_studio::{
    ApiConfig, DataUri, HttpImageApi, ImageApi, ImageFile, ImageSize, StatusLine, Studio,
    StudioState,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-studio")]
#[command(about = "Create an image from a prompt, then refine it with another prompt")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the image service (empty means http://localhost:8000)
    #[arg(long, global = true, env = "IMAGE_STUDIO_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a text prompt
    Generate(GenerateArgs),

    /// Edit an uploaded or freshly generated image
    Edit(EditArgs),

    /// Check that the image service is up
    Health,

    /// Interactive session with both forms
    Studio,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Image size
    #[arg(short, long, value_enum, default_value = "1024x1024")]
    size: SizeArg,
}

#[derive(Args)]
struct EditArgs {
    /// The text prompt describing the change
    prompt: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Image to edit (path to image file)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Generate the base image from this prompt first
    #[arg(short, long, conflicts_with = "image")]
    generate: Option<String>,

    /// Size used with --generate
    #[arg(short, long, value_enum, default_value = "1024x1024")]
    size: SizeArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    #[value(name = "1024x1024")]
    Square,
    #[value(name = "1536x1024")]
    Landscape,
    #[value(name = "1024x1536")]
    Portrait,
    #[value(name = "auto")]
    Auto,
}

impl From<SizeArg> for ImageSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Square => ImageSize::Square,
            SizeArg::Landscape => ImageSize::Landscape,
            SizeArg::Portrait => ImageSize::Portrait,
            SizeArg::Auto => ImageSize::Auto,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = cli
        .api_base_url
        .as_deref()
        .map(ApiConfig::new)
        .unwrap_or_default();
    tracing::debug!(base_url = config.base_url(), "using image service");
    let studio = Studio::new(HttpImageApi::builder().config(config).build());

    match cli.command {
        Commands::Generate(args) => generate(&studio, args, cli.json).await?,
        Commands::Edit(args) => edit(&studio, args, cli.json).await?,
        Commands::Health => health(&studio, cli.json).await?,
        Commands::Studio => run_shell(&studio).await?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Maps a failed submission to the message shown in the status line.
fn status_error(studio: &Studio<HttpImageApi>) -> anyhow::Error {
    let message = studio
        .snapshot()
        .status_line
        .error()
        .unwrap_or("request failed")
        .to_string();
    anyhow::anyhow!(message)
}

async fn generate(
    studio: &Studio<HttpImageApi>,
    args: GenerateArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    studio.set_generate_prompt(&args.prompt);
    studio.set_size(args.size.into());

    let image = match studio.submit_generate().await {
        Ok(image) => image,
        Err(_) => return Err(status_error(studio)),
    };
    let bytes = image.save(&args.output).await?;
    report(studio, "generated", &args.output, bytes, json_output)
}

async fn edit(
    studio: &Studio<HttpImageApi>,
    args: EditArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    if let Some(path) = &args.image {
        studio.select_upload(ImageFile::read(path).await?);
    } else if let Some(prompt) = &args.generate {
        studio.set_generate_prompt(prompt);
        studio.set_size(args.size.into());
        if studio.submit_generate().await.is_err() {
            return Err(status_error(studio));
        }
    }

    studio.set_edit_prompt(&args.prompt);
    let image = match studio.submit_edit().await {
        Ok(image) => image,
        Err(_) => return Err(status_error(studio)),
    };
    let bytes = image.save(&args.output).await?;
    report(studio, "edited", &args.output, bytes, json_output)
}

fn report(
    studio: &Studio<HttpImageApi>,
    kind: &str,
    output: &Path,
    bytes: usize,
    json_output: bool,
) -> anyhow::Result<()> {
    let state = studio.snapshot();
    if json_output {
        let result = serde_json::json!({
            "type": kind,
            "success": true,
            "output": output.display().to_string(),
            "size_bytes": bytes,
            "status": state.status_line.status(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if let Some(status) = state.status_line.status() {
            println!("{status}");
        }
        println!("Saved {kind} image: {} ({} bytes)", output.display(), bytes);
    }
    Ok(())
}

async fn health(studio: &Studio<HttpImageApi>, json_output: bool) -> anyhow::Result<()> {
    let base_url = studio.api().config().base_url().to_string();
    let result = studio.api().health().await;

    if json_output {
        let value = serde_json::json!({
            "base_url": base_url,
            "healthy": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if result.is_ok() {
        println!("{base_url}: ok");
    }

    result.map_err(Into::into)
}

const SHELL_HELP: &str = "\
Commands:
  prompt <text>          set the generation prompt
  size <label>           1024x1024, 1536x1024, 1024x1536 or auto
  generate [text]        submit the generation form
  upload <path>          use a local file as the image to edit
  use-generated          edit the generated image instead of the upload
  edit [text]            submit the edit form
  save <which> <path>    write the generated, base or edited image
  show                   print the current view
  help                   show this help
  quit                   leave the studio";

/// Reads commands from stdin until EOF or `quit`.
///
/// Submissions run as background tasks, so a generation and an edit can be
/// in flight at the same time.
async fn run_shell(studio: &Studio<HttpImageApi>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Image generation & editing");
    println!("Create an image from a prompt, then refine it with another prompt.");
    println!("Type `help` for commands.\n");
    render(&studio.snapshot());

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "quit" | "exit" => break,
            "help" => println!("{SHELL_HELP}"),
            "show" => render(&studio.snapshot()),
            "prompt" => studio.set_generate_prompt(rest),
            "size" => match rest.parse::<ImageSize>() {
                Ok(size) => studio.set_size(size),
                Err(e) => println!("{e}"),
            },
            "generate" => {
                if !rest.is_empty() {
                    studio.set_generate_prompt(rest);
                }
                let studio = studio.clone();
                tokio::spawn(async move {
                    let _ = studio.submit_generate().await;
                    render(&studio.snapshot());
                });
            }
            "upload" => match ImageFile::read(rest).await {
                Ok(file) => {
                    studio.select_upload(file);
                    render(&studio.snapshot());
                }
                Err(e) => println!("Could not read {rest}: {e}"),
            },
            "use-generated" => {
                if studio.use_generated_for_editing() {
                    render(&studio.snapshot());
                } else {
                    println!("Nothing generated yet.");
                }
            }
            "edit" => {
                if !rest.is_empty() {
                    studio.set_edit_prompt(rest);
                }
                let studio = studio.clone();
                tokio::spawn(async move {
                    let _ = studio.submit_edit().await;
                    render(&studio.snapshot());
                });
            }
            "save" => save(studio, rest).await,
            other => println!("Unknown command `{other}`. Type `help` for commands."),
        }
        stdout.flush()?;
    }

    Ok(())
}

async fn save(studio: &Studio<HttpImageApi>, args: &str) {
    let Some((which, path)) = args.split_once(' ') else {
        println!("Usage: save <generated|base|edited> <path>");
        return;
    };
    let state = studio.snapshot();
    let image = match which {
        "generated" => state.generated_image.clone(),
        "base" => state.base_image.preview().cloned(),
        "edited" => state.edited_image.clone(),
        _ => {
            println!("Unknown image `{which}`; expected generated, base or edited.");
            return;
        }
    };
    let Some(image) = image else {
        println!("No {which} image yet.");
        return;
    };
    match image.save(path.trim()).await {
        Ok(bytes) => println!("Saved {which} image to {} ({bytes} bytes)", path.trim()),
        Err(e) => println!("Could not save {which} image: {e}"),
    }
}

fn render(state: &StudioState) {
    match &state.status_line {
        StatusLine::Idle => {}
        StatusLine::Status(message) => println!("[ok] {message}"),
        StatusLine::Error(message) => println!("[error] {message}"),
    }

    println!("-- Step 1: Create image");
    println!("   prompt: {}", quoted(&state.generate_prompt));
    println!("   size:   {}", state.size.display_label());
    println!("   [{}]", state.generate_button_label());
    println!("   generated image: {}", describe(state.generated_image.as_ref()));

    println!("-- Step 2: Edit image");
    println!("   prompt: {}", quoted(&state.edit_prompt));
    let base = match state.base_image.uploaded_file() {
        Some(file) => format!("{} ({}, {} bytes)", file.name, file.media_type, file.size()),
        None => describe(state.base_image.preview()),
    };
    println!("   image to edit: {base}");
    println!("   [{}]", state.edit_button_label());
    println!("   edited image: {}", describe(state.edited_image.as_ref()));
    println!();
}

fn quoted(text: &str) -> String {
    if text.is_empty() {
        "(empty)".into()
    } else {
        format!("\"{text}\"")
    }
}

fn describe(image: Option<&DataUri>) -> String {
    match image {
        Some(uri) => format!("{} ({} base64 chars)", uri.media_type(), uri.payload().len()),
        None => "none".into(),
    }
}
