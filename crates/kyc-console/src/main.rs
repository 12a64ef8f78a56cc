use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, Command};
use kyc_console::{catalog_text, errors_text, load_draft, run_script, stepper_line, CatalogDump, Script};
use kyc_onboarding::{Cursor, OnboardingConfig, Step, Validator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("kyc-console")
        .version(kyc_console::VERSION)
        .about("KYC private-organization onboarding console")
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("catalog").about("Print the service catalog").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a draft against one wizard screen")
                .arg(
                    Arg::new("draft")
                        .long("draft")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Organization draft as JSON"),
                )
                .arg(
                    Arg::new("step")
                        .long("step")
                        .default_value("1")
                        .value_parser(value_parser!(u8).range(1..=4))
                        .help("Wizard step (1-4)"),
                )
                .arg(
                    Arg::new("sub-step")
                        .long("sub-step")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Configuration sub-screen on step 2"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Onboarding config (TOML)"),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a YAML script of wizard actions")
                .arg(
                    Arg::new("script")
                        .long("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Script file (YAML)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Onboarding config (TOML)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<OnboardingConfig> {
    match path {
        Some(path) => OnboardingConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(OnboardingConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("catalog", args)) => {
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&CatalogDump::new())?);
            } else {
                print!("{}", catalog_text());
            }
        }
        Some(("validate", args)) => {
            let path = args.get_one::<PathBuf>("draft").context("--draft is required")?;
            let step = args.get_one::<u8>("step").copied().unwrap_or(1);
            let sub_step = args.get_one::<usize>("sub-step").copied().unwrap_or(0);
            let config = load_config(args.get_one::<PathBuf>("config"))?;

            let draft = load_draft(path)?;
            let step = Step::from_number(step).context("step must be 1-4")?;
            let cursor = Cursor::new(step, sub_step);
            let validator = Validator::new(config.validation)?;
            let errors = validator.validate(&draft, cursor);

            println!("{}", stepper_line(cursor));
            print!("{}", errors_text(&errors));
            if !errors.is_empty() {
                bail!("{} field(s) failed on step {}", errors.len(), step.number());
            }
        }
        Some(("replay", args)) => {
            let path = args.get_one::<PathBuf>("script").context("--script is required")?;
            let config = load_config(args.get_one::<PathBuf>("config"))?;
            let script = Script::load(path)?;

            let report = run_script(&script, &config).await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.generate_text());
            }
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
