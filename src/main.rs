use clap::{Arg, ArgAction, Command};
use inspr::mt::{MockMode, MockTranslator, ProviderId, ProviderRegistry};
use inspr::{CaseStyle, Engine, Settings};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let matches = Command::new("inspr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Suggest code identifiers for a phrase using online dictionaries")
        .arg(
            Arg::new("phrase")
                .help("Phrase to translate, e.g. 苹果")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .short('s')
                .help(
                    "Identifier case style: lower_camel_case, upper_camel_case, \
                     lower_underscores or upper_underscores",
                )
                .default_value("lower_camel_case"),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .help("Dictionary to query (Youdao, Baidu, Microsoft); repeat for several")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .short('c')
                .help("JSON settings file"),
        )
        .arg(
            Arg::new("pick")
                .long("pick")
                .short('p')
                .help("Print only the Nth suggestion (1-based)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Answer with this candidate instead of calling the dictionaries; repeatable")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log provider requests and cache activity")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let phrase = matches
        .get_one::<String>("phrase")
        .ok_or("missing phrase")?;
    let style: CaseStyle = matches
        .get_one::<String>("style")
        .map_or(Ok(CaseStyle::default()), |s| s.parse())?;

    let settings = match matches.get_one::<String>("settings") {
        Some(path) => Settings::load_from_file(Path::new(path))?,
        None => Settings::default(),
    };
    let mut settings = settings.with_env_overrides();

    if let Some(sources) = matches.get_many::<String>("source") {
        settings.dictionary_source = sources
            .map(|s| s.parse::<ProviderId>())
            .collect::<Result<_, _>>()?;
    }

    let engine = match matches.get_many::<String>("mock") {
        Some(candidates) => {
            let candidates: Vec<String> = candidates.cloned().collect();
            let registry = settings
                .dictionary_source
                .iter()
                .fold(ProviderRegistry::new(), |registry, id| {
                    let mock = MockTranslator::new(MockMode::Candidates(candidates.clone()))
                        .named(id.as_str());
                    registry.with(*id, Arc::new(mock))
                });
            Engine::with_registry(settings, registry)
        }
        None => Engine::new(settings)?,
    };

    if verbose {
        eprintln!("Phrase: \"{}\"", phrase);
        eprintln!("Style: {}", style);
        eprintln!("{:?}", engine);
    }

    let suggestions = match engine.inspire(phrase, style).await {
        Ok(suggestions) => suggestions,
        Err(status) => {
            eprintln!("{}", status);
            return Ok(ExitCode::FAILURE);
        }
    };

    match matches.get_one::<usize>("pick") {
        Some(&n) => match n.checked_sub(1).and_then(|i| suggestions.get(i)) {
            Some(choice) => println!("{}", choice),
            None => {
                eprintln!(
                    "No suggestion #{}, there are {}",
                    n,
                    suggestions.len()
                );
                return Ok(ExitCode::FAILURE);
            }
        },
        None => {
            for (i, suggestion) in suggestions.iter().enumerate() {
                println!("{:>2}. {}", i + 1, suggestion);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
