//! # pthfill CLI
//!
//! `pthfill <in.gcode> <holes.drl> <edge_cuts.svg> <out.gcode>`
//!
//! Reads the slicer output, the drill program and the board outline, and
//! writes a copy of the G-Code that fills every hole of the chosen drill
//! tool right after the switch to the conductive filament.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use pthfill::{init_logging, read_program, write_program, Config, HoleFillInjector};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Inject G-Code to fill plated through-holes in a 3D printed circuit board"
)]
struct Cli {
    /// Input G-Code file
    #[clap(value_parser = gcode_file)]
    in_gcode: PathBuf,

    /// Input drill file
    #[clap(value_parser = drill_file)]
    drl: PathBuf,

    /// Input board outline (edge cuts) file
    #[clap(value_parser = svg_file)]
    svg: PathBuf,

    /// Output G-Code file
    out_gcode: PathBuf,

    /// Drill tool whose holes are filled (e.g. T1)
    #[clap(long)]
    tool: Option<String>,

    /// Filament extruded into each hole (mm)
    #[clap(long)]
    extrusion: Option<f64>,

    /// Retraction before and after each hole (mm)
    #[clap(long)]
    retraction: Option<f64>,

    /// Configuration file (.toml or .json)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Overwrite the output file without asking
    #[clap(short, long)]
    yes: bool,

    /// Print the injection plan instead of writing the output
    #[clap(long)]
    dry_run: bool,

    /// Log as JSON lines
    #[clap(long)]
    log_json: bool,
}

fn existing_with_extension(value: &str, extension: &str) -> Result<PathBuf, String> {
    if !value.to_lowercase().ends_with(extension) {
        return Err(format!("File must have a {} extension", extension));
    }
    let path = PathBuf::from(value);
    if !path.is_file() {
        return Err(format!("File {} does not exist", value));
    }
    Ok(path)
}

fn gcode_file(value: &str) -> Result<PathBuf, String> {
    existing_with_extension(value, ".gcode")
}

fn drill_file(value: &str) -> Result<PathBuf, String> {
    existing_with_extension(value, ".drl")
}

fn svg_file(value: &str) -> Result<PathBuf, String> {
    existing_with_extension(value, ".svg")
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, cli);
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

/// Command line flags win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(tool) = &cli.tool {
        config.drill.tool = tool.clone();
    }
    if let Some(extrusion) = cli.extrusion {
        config.fill.extrusion_amount = extrusion;
    }
    if let Some(retraction) = cli.retraction {
        config.fill.retraction_amount = retraction;
    }
}

/// Ask on stdin whether `path` may be replaced; only `y` confirms
fn confirm_overwrite(path: &Path, input: &mut impl BufRead) -> anyhow::Result<bool> {
    print!(
        "File {} already exists. Do you want to overwrite it? (y/n): ",
        path.display()
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;

    if !cli.dry_run
        && cli.out_gcode.exists()
        && !cli.yes
        && !confirm_overwrite(&cli.out_gcode, &mut io::stdin().lock())?
    {
        println!("Exiting without overwriting the file.");
        return Ok(());
    }

    let program = read_program(&cli.in_gcode)
        .with_context(|| format!("Failed to read {}", cli.in_gcode.display()))?;
    let drill = fs::read_to_string(&cli.drl)
        .with_context(|| format!("Failed to read {}", cli.drl.display()))?;
    let outline = fs::read_to_string(&cli.svg)
        .with_context(|| format!("Failed to read {}", cli.svg.display()))?;

    let injector = HoleFillInjector::new(&config);
    let plan = injector.plan(&program, &drill, &outline)?;

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let output = injector.apply(&program, &plan)?;
    write_program(&cli.out_gcode, &output)
        .with_context(|| format!("Failed to write {}", cli.out_gcode.display()))?;

    println!(
        "Combined G-code has been written to {}",
        cli.out_gcode.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_json)?;
    tracing::debug!("pthfill {} (built {})", pthfill::VERSION, pthfill::BUILD_DATE);

    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extension_check() {
        let err = gcode_file("board.txt").unwrap_err();
        assert_eq!(err, "File must have a .gcode extension");

        let err = drill_file("/definitely/not/here.DRL").unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_extension_check_accepts_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.SVG");
        fs::write(&path, "<svg/>").unwrap();
        assert_eq!(svg_file(path.to_str().unwrap()).unwrap(), path);
    }

    #[test]
    fn test_confirm_overwrite_answers() {
        let path = Path::new("out.gcode");
        assert!(confirm_overwrite(path, &mut "y\n".as_bytes()).unwrap());
        assert!(confirm_overwrite(path, &mut "Y\n".as_bytes()).unwrap());
        assert!(!confirm_overwrite(path, &mut "yes\n".as_bytes()).unwrap());
        assert!(!confirm_overwrite(path, &mut "".as_bytes()).unwrap());
    }

    fn cli(tool: Option<&str>, extrusion: Option<f64>, config: Option<PathBuf>) -> Cli {
        Cli {
            in_gcode: PathBuf::from("in.gcode"),
            drl: PathBuf::from("in.drl"),
            svg: PathBuf::from("in.svg"),
            out_gcode: PathBuf::from("out.gcode"),
            tool: tool.map(str::to_string),
            extrusion,
            retraction: None,
            config,
            yes: false,
            dry_run: false,
            log_json: false,
        }
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        apply_overrides(&mut config, &cli(Some("T2"), Some(0.6), None));
        assert_eq!(config.drill.tool, "T2");
        assert_eq!(config.fill.extrusion_amount, 0.6);
        assert_eq!(
            config.fill.retraction_amount,
            Config::default().fill.retraction_amount
        );
    }

    #[test]
    fn test_overrides_win_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[drill]\ntool = \"T3\"\n[fill]\nextrusion_amount = 0.3\n").unwrap();

        let config = load_config(&cli(None, Some(0.6), Some(path))).unwrap();
        assert_eq!(config.drill.tool, "T3");
        assert_eq!(config.fill.extrusion_amount, 0.6);
    }
}
