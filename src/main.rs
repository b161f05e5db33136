//! Niche Forge - competitor domain pattern mining and domain recommendations
//!
//! Thin terminal front end over [`niche_forge::NicheAnalyzer`].

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use niche_forge::{AnalysisReport, AnalyzerConfig, NicheCatalog, Outcome};
use rand::seq::SliceRandom;
use std::env;
use std::process;
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("NICHE_FORGE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("niche_forge=warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

struct CliArgs {
    json: bool,
    niche: String,
}

fn parse_args(args: &[String]) -> Option<CliArgs> {
    let mut json = false;
    let mut words = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return None,
            "--json" => json = true,
            _ => words.push(arg.as_str()),
        }
    }
    Some(CliArgs {
        json,
        niche: words.join(" "),
    })
}

#[tokio::main]
async fn main() {
    if let Err(e) = niche_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e.user_message());
        process::exit(1);
    }
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(cli) = parse_args(&args) else {
        print_help();
        return;
    };

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<niche_forge::NicheForgeError>() {
            Some(forge) => eprintln!("{}", forge.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

async fn run(cli: CliArgs) -> Result<()> {
    let config = AnalyzerConfig::from_env().context("reading configuration")?;
    let analyzer = config.build_analyzer().context("setting up collaborators")?;

    let niche = if cli.niche.trim().is_empty() {
        ask_niche(analyzer.catalog())
    } else {
        cli.niche
    };

    if !cli.json {
        println!("🔥 Niche Forge - domain ideas from your competitors");
        println!("═══════════════════════════════════════════════════");
        println!();
        if !config.has_llm() {
            println!("💡 No LLM provider configured; using rule-based generation");
        }
        if !config.registrar.has_credentials() {
            println!("💡 NAMECOM_USERNAME/NAMECOM_TOKEN not set; prices are unavailable");
        }
        println!("🎯 Analyzing niche: \"{}\"", niche);
        println!();
    }

    let spinner = (!cli.json).then(|| {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("Mining competitor patterns and checking candidates...");
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    });

    let report = analyzer.analyze(&niche).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report, config.pipeline.retry.price_ceiling);
    }
    Ok(())
}

/// Interactive prompt, or a random catalog niche when there is no terminal
fn ask_niche(catalog: &NicheCatalog) -> String {
    let niches = catalog.niches();
    let random = || {
        niches
            .choose(&mut rand::thread_rng())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "backyard".to_string())
    };

    match inquire::Text::new("Which niche are you building a store for?")
        .with_help_message("e.g. backyard, sauna, home theater")
        .prompt()
    {
        Ok(answer) if !answer.trim().is_empty() => answer,
        Ok(_) => random(),
        Err(e) => {
            tracing::debug!(error = %e, "Prompt unavailable; picking a catalog niche");
            let niche = random();
            println!("🎲 No niche given, picked: \"{}\"", niche);
            niche
        }
    }
}

fn display_report(report: &AnalysisReport, price_ceiling: f64) {
    println!(
        "🏪 Competitors ({}): {}",
        report.profile.competitors.len(),
        report.profile.competitors.join(", ")
    );
    println!();

    if !report.advice.is_empty() {
        println!("🧭 Pattern insights:");
        println!("───────────────────");
        for line in &report.advice {
            println!("   • {}", line);
        }
        println!();
    }

    match &report.outcome {
        Outcome::Failed { reason } => {
            println!("❌ No recommendations: {}", reason);
            return;
        }
        Outcome::Exhausted { attempts } => {
            println!("⚠️  Stopped after {} attempt(s) with fewer viable domains than hoped", attempts);
            println!();
        }
        Outcome::Done => {}
    }

    println!("🎨 Recommended Domains ({}):", report.recommendations.len());
    println!("═══════════════════════════");
    for (index, candidate) in report.recommendations.iter().enumerate() {
        let marker = if candidate.is_viable(price_ceiling) { "✅" } else if candidate.available { "💸" } else { "❌" };
        let score = candidate.quality_score.map_or("-".to_string(), |s| s.to_string());
        println!(
            "{:2}. {} {:<24} score {:>3}  {:>9}",
            index + 1,
            marker,
            candidate.domain,
            score,
            candidate.price_display()
        );
        if let Some(reason) = &candidate.reason {
            println!("       💭 {}", reason);
        }
    }
    println!();

    let viable = report.viable(price_ceiling).len();
    println!("📈 Summary:");
    println!("   ✅ Viable: {}", viable);
    println!("   📊 Total checked: {}", report.metrics.registrar_checks);
    println!("   🔁 Attempts: {}", report.attempts);
    if report.metrics.fallbacks > 0 {
        println!("   🛟 Local fallbacks used: {}", report.metrics.fallbacks);
    }
    let elapsed = report.finished_at - report.started_at;
    println!("   ⏱️  Total time: {:.2}s", elapsed.num_milliseconds() as f64 / 1000.0);
}

fn print_help() {
    println!("🔥 Niche Forge - domain ideas from your competitors");
    println!("═══════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    niche-forge [--json] [NICHE...]");
    println!();
    println!("EXAMPLES:");
    println!("    niche-forge                     # Prompt for a niche");
    println!("    niche-forge backyard            # Analyze a catalog niche");
    println!("    niche-forge --json pizza oven   # Machine-readable report");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    OPENAI_API_KEY      OpenAI API key");
    println!("    ANTHROPIC_API_KEY   Anthropic API key");
    println!("    GEMINI_API_KEY      Google Gemini API key");
    println!("    OLLAMA_MODEL        Local Ollama model (OLLAMA_BASE_URL optional)");
    println!("    NAMECOM_USERNAME    Name.com API username");
    println!("    NAMECOM_TOKEN       Name.com API token");
    println!();
    println!("    NICHE_FORGE_STRATEGY         rule | llm");
    println!("    NICHE_FORGE_MAX_ATTEMPTS     Generate-and-rank passes (default: 3)");
    println!("    NICHE_FORGE_MIN_VIABLE       Viable domains wanted (default: 5)");
    println!("    NICHE_FORGE_PRICE_CEILING    Max price for a viable domain (default: 100)");
    println!("    NICHE_FORGE_LLM_INDUSTRY_TERMS  Let the LLM pick industry terms (true/false)");
    println!("    NICHE_FORGE_LOG              Log filter (default: niche_forge=warn)");
    println!();
    println!("Made with ❤️ and 🦀 Rust");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse_args(&args(&["--json", "pizza", "oven"])).unwrap();
        assert!(cli.json);
        assert_eq!(cli.niche, "pizza oven");

        assert!(parse_args(&args(&["backyard", "-h"])).is_none());
        assert!(parse_args(&[]).unwrap().niche.is_empty());
    }
}
